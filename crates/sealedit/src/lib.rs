//! sealedit - editor-integration engine for kubeseal
//!
//! Encrypts or decrypts selected text by shelling out to kubeseal,
//! inferring the secret's namespace and name from the surrounding YAML
//! and prompting for whatever is missing. The engine is host-agnostic:
//! everything it needs from an editor goes through the `EditorSurface`
//! trait, so the same workflows drive the bundled terminal host, an
//! embedding editor plugin, or a test double.

pub mod editor;
pub mod error;
pub mod metadata;
pub mod runner;
pub mod sealed;
pub mod settings;
pub mod workflow;

pub use editor::{EditorSurface, Selection};
pub use error::SealError;
pub use metadata::Metadata;
pub use settings::{DecryptOutput, Settings};
