//! Host editor seam
//!
//! The workflows never talk to an editor API directly; they go through
//! the `EditorSurface` trait. The binary implements it on top of a file
//! and the terminal, an embedding host implements it on top of its own
//! buffer and UI primitives, and tests implement it with a recorder.

/// A contiguous selected span in the active buffer, captured at command
/// invocation time. Offsets are byte offsets into the buffer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub begin: usize,
    pub end: usize,
    pub text: String,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Capabilities the workflows need from the host editor.
///
/// All methods are called from the single interactive thread that owns
/// buffer mutation. `prompt` is modal: it blocks until the user confirms
/// or cancels.
pub trait EditorSurface {
    /// Full text of the active buffer
    fn buffer_text(&self) -> String;

    /// Non-empty selection regions, in buffer order
    fn selections(&self) -> Vec<Selection>;

    /// Modal text input. Returns `None` if the user cancelled.
    fn prompt(&mut self, label: &str, default: &str) -> Option<String>;

    /// Blocking error dialog
    fn notify_error(&mut self, message: &str);

    /// Transient status-bar message
    fn notify_status(&mut self, message: &str);

    /// Replace `begin..end` of the active buffer with `text`
    fn replace_range(&mut self, begin: usize, end: usize, text: &str);

    /// Open a new document containing `content`, with a syntax hint
    /// such as "yaml"
    fn open_document(&mut self, title: &str, content: &str, syntax: &str);

    /// Render pre-escaped markup in an inline overlay
    fn show_overlay(&mut self, markup: &str);
}
