//! Persisted settings
//!
//! Stored as JSON at `~/.config/sealedit/settings.json`. Settings are
//! re-read on every command invocation; nothing is cached in memory, so
//! edits to the file take effect immediately.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Where decrypted output goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecryptOutput {
    /// Open a new document with the plaintext (default)
    #[default]
    NewTab,
    /// Render the plaintext in an inline overlay
    Popup,
}

/// Plugin settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the sealing certificate (public key), required for encrypt
    #[serde(default)]
    pub cert_path: String,

    /// Path to the recovery private key, required for decrypt
    #[serde(default)]
    pub private_key_path: String,

    /// Program name or path of the kubeseal binary
    #[serde(default = "default_kubeseal_path")]
    pub kubeseal_path: String,

    /// Timeout in seconds for one tool invocation
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Where decrypted output goes: "new_tab" or "popup"
    #[serde(default)]
    pub decrypt_output: DecryptOutput,
}

fn default_kubeseal_path() -> String {
    "kubeseal".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cert_path: String::new(),
            private_key_path: String::new(),
            kubeseal_path: default_kubeseal_path(),
            timeout: default_timeout(),
            decrypt_output: DecryptOutput::default(),
        }
    }
}

impl Settings {
    /// Path to the settings file
    pub fn path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("sealedit")
            .join("settings.json")
    }

    /// Load settings from disk. A missing file yields defaults; a
    /// malformed file is an error rather than silently losing config.
    pub fn load() -> Result<Settings> {
        Self::load_from(&Self::path())
    }

    /// Load settings from a specific file
    pub fn load_from(path: &Path) -> Result<Settings> {
        if !path.exists() {
            return Ok(Settings::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Write a default settings file (for `settings init`)
    pub fn write_default() -> Result<PathBuf> {
        let path = Self::path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&Settings::default())?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))?;

        Ok(path)
    }
}
