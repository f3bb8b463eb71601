//! Terminal host
//!
//! Implements `EditorSurface` over a file on disk and the controlling
//! terminal: the file is the buffer, `--selection` ranges are the
//! selection regions, prompts read from stdin, and "new tab" output goes
//! to stdout. This is the host the binary runs the workflows under.

use anyhow::{bail, Context, Result};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sealedit::{EditorSurface, Selection};

pub struct TerminalSurface {
    path: PathBuf,
    buffer: String,
    selections: Vec<Selection>,
    dirty: bool,
}

impl TerminalSurface {
    /// Open `path` as the active buffer with the given selection ranges
    pub fn open(path: &Path, ranges: &[String]) -> Result<Self> {
        let buffer = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let mut selections = Vec::new();
        for range in ranges {
            let (begin, end) = parse_range(range)?;
            if end > buffer.len() {
                bail!(
                    "Selection {}..{} is out of bounds (file is {} bytes)",
                    begin,
                    end,
                    buffer.len()
                );
            }
            if !buffer.is_char_boundary(begin) || !buffer.is_char_boundary(end) {
                bail!("Selection {}..{} splits a UTF-8 character", begin, end);
            }
            let text = buffer[begin..end].to_string();
            selections.push(Selection { begin, end, text });
        }

        Ok(Self {
            path: path.to_path_buf(),
            buffer,
            selections,
            dirty: false,
        })
    }

    /// Write the buffer back to disk if a workflow mutated it
    pub fn save(&self) -> Result<()> {
        if self.dirty {
            fs::write(&self.path, &self.buffer)
                .with_context(|| format!("Failed to write file: {}", self.path.display()))?;
        }
        Ok(())
    }
}

impl EditorSurface for TerminalSurface {
    fn buffer_text(&self) -> String {
        self.buffer.clone()
    }

    fn selections(&self) -> Vec<Selection> {
        self.selections.clone()
    }

    fn prompt(&mut self, label: &str, default: &str) -> Option<String> {
        eprint!("{} [{}] ", label, default);
        let _ = io::stderr().flush();

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            // EOF with nothing typed = cancelled
            Ok(0) => None,
            Ok(_) => {
                let input = input.trim();
                if input.is_empty() {
                    // Empty line accepts the offered default, matching an
                    // input panel pre-filled with it
                    Some(default.to_string())
                } else {
                    Some(input.to_string())
                }
            }
            Err(_) => None,
        }
    }

    fn notify_error(&mut self, message: &str) {
        eprintln!("error: {}", message);
    }

    fn notify_status(&mut self, message: &str) {
        eprintln!("info: {}", message);
    }

    fn replace_range(&mut self, begin: usize, end: usize, text: &str) {
        self.buffer.replace_range(begin..end, text);
        self.dirty = true;
    }

    fn open_document(&mut self, title: &str, content: &str, _syntax: &str) {
        eprintln!("info: {}", title);
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }

    fn show_overlay(&mut self, markup: &str) {
        println!("{}", markup);
    }
}

/// Parse a selection range like "120..158"
pub fn parse_range(range: &str) -> Result<(usize, usize)> {
    let parts: Vec<&str> = range.split("..").collect();
    if parts.len() != 2 {
        bail!("Invalid selection '{}', expected START..END", range);
    }

    let begin: usize = parts[0]
        .trim()
        .parse()
        .with_context(|| format!("Invalid selection start in '{}'", range))?;
    let end: usize = parts[1]
        .trim()
        .parse()
        .with_context(|| format!("Invalid selection end in '{}'", range))?;

    if begin > end {
        bail!("Invalid selection '{}', start is past end", range);
    }

    Ok((begin, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_yaml(content: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = env::temp_dir().join(format!(
            "sealedit_terminal_{}_{}.yaml",
            std::process::id(),
            id
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_parse_range() {
        assert_eq!(parse_range("0..5").unwrap(), (0, 5));
        assert_eq!(parse_range("120..158").unwrap(), (120, 158));
        assert!(parse_range("5..2").is_err());
        assert!(parse_range("abc..5").is_err());
        assert!(parse_range("5").is_err());
    }

    #[test]
    fn test_open_captures_selection_text() {
        let path = temp_yaml("hello world");
        let surface = TerminalSurface::open(&path, &["6..11".to_string()]).unwrap();

        let selections = surface.selections();
        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].text, "world");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_open_rejects_out_of_bounds() {
        let path = temp_yaml("short");
        assert!(TerminalSurface::open(&path, &["0..99".to_string()]).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_only_when_dirty() {
        let path = temp_yaml("hello world");
        let mut surface = TerminalSurface::open(&path, &["0..5".to_string()]).unwrap();

        // No mutation, no write: mtime-insensitive check via content
        surface.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello world");

        surface.replace_range(0, 5, "goodbye");
        surface.save().unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "goodbye world");
        let _ = fs::remove_file(&path);
    }
}
