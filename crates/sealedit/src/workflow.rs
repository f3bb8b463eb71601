//! Encrypt and decrypt workflows
//!
//! Each command runs the same pipeline: check preconditions, resolve the
//! secret's identity (from the buffer or by prompting), run kubeseal off
//! the interactive thread, then route the result back into the editor.
//! On any failure the buffer is left untouched and the user sees exactly
//! one error dialog.

use std::path::Path;
use tracing::debug;

use crate::editor::{EditorSurface, Selection};
use crate::error::SealError;
use crate::metadata::{self, Metadata};
use crate::runner::run_tool;
use crate::sealed::SealedSecret;
use crate::settings::{DecryptOutput, Settings};

/// Prompt labels differ between encrypt and decrypt
struct PromptLabels {
    namespace: &'static str,
    name: &'static str,
}

const ENCRYPT_PROMPTS: PromptLabels = PromptLabels {
    namespace: "Enter namespace:",
    name: "Enter secret name:",
};

const DECRYPT_PROMPTS: PromptLabels = PromptLabels {
    namespace: "Enter namespace (used during encryption):",
    name: "Enter secret name (used during encryption):",
};

/// States of the metadata-resolution machine. The prompt chain is linear:
/// namespace first, then name, then done.
#[derive(Debug)]
enum ResolveState {
    Extracting,
    PromptingNamespace,
    PromptingName { namespace: String },
    Resolved(Metadata),
    Aborted,
}

/// One transition of the resolution machine
fn resolve_step(
    state: ResolveState,
    surface: &mut dyn EditorSurface,
    labels: &PromptLabels,
) -> Result<ResolveState, SealError> {
    match state {
        ResolveState::Extracting => match metadata::extract(&surface.buffer_text()) {
            Some(meta) => {
                surface.notify_status(&format!(
                    "Using metadata from file: namespace={}, name={}",
                    meta.namespace, meta.name
                ));
                Ok(ResolveState::Resolved(meta))
            }
            None => {
                surface.notify_status("No metadata found in file, prompting for values...");
                Ok(ResolveState::PromptingNamespace)
            }
        },

        ResolveState::PromptingNamespace => match surface.prompt(labels.namespace, "default") {
            None => Ok(ResolveState::Aborted),
            Some(entry) => {
                let namespace = entry.trim().to_string();
                if namespace.is_empty() {
                    return Err(SealError::Input("Namespace cannot be empty".to_string()));
                }
                Ok(ResolveState::PromptingName { namespace })
            }
        },

        ResolveState::PromptingName { namespace } => match surface.prompt(labels.name, "mysecret")
        {
            None => Ok(ResolveState::Aborted),
            Some(entry) => {
                let name = entry.trim().to_string();
                if name.is_empty() {
                    return Err(SealError::Input("Secret name cannot be empty".to_string()));
                }
                Ok(ResolveState::Resolved(Metadata { namespace, name }))
            }
        },

        done => Ok(done),
    }
}

/// Drive the machine to completion. `Ok(None)` means the user cancelled
/// a prompt; that aborts the operation without an error dialog.
fn resolve_metadata(
    surface: &mut dyn EditorSurface,
    labels: &PromptLabels,
) -> Result<Option<Metadata>, SealError> {
    let mut state = ResolveState::Extracting;
    loop {
        match resolve_step(state, surface, labels)? {
            ResolveState::Resolved(meta) => return Ok(Some(meta)),
            ResolveState::Aborted => return Ok(None),
            next => state = next,
        }
    }
}

/// Non-empty selections, in buffer order
fn captured_selections(surface: &dyn EditorSurface) -> Vec<Selection> {
    surface
        .selections()
        .into_iter()
        .filter(|s| !s.is_empty() && !s.text.is_empty())
        .collect()
}

/// Encrypt the first selection in place.
pub async fn encrypt(
    surface: &mut dyn EditorSurface,
    settings: &Settings,
) -> Result<(), SealError> {
    if settings.cert_path.is_empty() {
        return Err(SealError::Configuration(
            "Certificate path not configured. Please set 'cert_path' in settings.".to_string(),
        ));
    }
    if !Path::new(&settings.cert_path).exists() {
        return Err(SealError::Configuration(format!(
            "Certificate file not found: {}",
            settings.cert_path
        )));
    }

    // All non-empty selections are captured; only the first is processed
    let selections = captured_selections(surface);
    let selection = match selections.first() {
        Some(s) => s.clone(),
        None => return Err(SealError::Input("Please select text to encrypt".to_string())),
    };

    let meta = match resolve_metadata(surface, &ENCRYPT_PROMPTS)? {
        Some(meta) => meta,
        None => return Ok(()),
    };

    surface.notify_status("Encrypting...");
    debug!(namespace = %meta.namespace, name = %meta.name, "sealing selection");

    let args = vec![
        "--raw".to_string(),
        "--cert".to_string(),
        settings.cert_path.clone(),
        "--namespace".to_string(),
        meta.namespace.clone(),
        "--name".to_string(),
        meta.name.clone(),
    ];

    let output = run_tool(&settings.kubeseal_path, &args, &selection.text, settings.timeout).await?;

    if !output.success() {
        return Err(SealError::Tool {
            stderr: output.stderr,
        });
    }

    surface.replace_range(selection.begin, selection.end, output.stdout.trim());
    surface.notify_status("Text encrypted successfully");

    Ok(())
}

/// Decrypt the first selection and present the plaintext.
pub async fn decrypt(
    surface: &mut dyn EditorSurface,
    settings: &Settings,
) -> Result<(), SealError> {
    if settings.private_key_path.is_empty() {
        return Err(SealError::Configuration(
            "Private key path not configured. Please set 'private_key_path' in settings."
                .to_string(),
        ));
    }
    if !Path::new(&settings.private_key_path).exists() {
        return Err(SealError::Configuration(format!(
            "Private key file not found: {}",
            settings.private_key_path
        )));
    }

    let selections = captured_selections(surface);
    let selection = match selections.first() {
        Some(s) => s.clone(),
        None => {
            return Err(SealError::Input(
                "Please select encrypted text to decrypt".to_string(),
            ))
        }
    };

    let meta = match resolve_metadata(surface, &DECRYPT_PROMPTS)? {
        Some(meta) => meta,
        None => return Ok(()),
    };

    surface.notify_status("Decrypting...");
    debug!(namespace = %meta.namespace, name = %meta.name, "unsealing selection");

    let document = SealedSecret::wrap(selection.text.trim(), &meta.namespace, &meta.name)
        .to_yaml()
        .map_err(|e| SealError::Unexpected(e.to_string()))?;

    let args = vec![
        "--recovery-unseal".to_string(),
        "--recovery-private-key".to_string(),
        settings.private_key_path.clone(),
    ];

    let output = run_tool(&settings.kubeseal_path, &args, &document, settings.timeout).await?;

    if !output.success() {
        return Err(SealError::Tool {
            stderr: output.stderr,
        });
    }

    match settings.decrypt_output {
        DecryptOutput::Popup => {
            let markup = render_popup(&output.stdout, &meta.namespace, &meta.name);
            surface.show_overlay(&markup);
        }
        DecryptOutput::NewTab => {
            let title = format!("Decrypted Secret: {}/{}", meta.namespace, meta.name);
            surface.open_document(&title, &output.stdout, "yaml");
        }
    }
    surface.notify_status("Decryption completed - check new tab/popup");

    Ok(())
}

/// Run encrypt, surfacing any failure as a single error dialog
pub async fn run_encrypt(surface: &mut dyn EditorSurface, settings: &Settings) {
    if let Err(err) = encrypt(surface, settings).await {
        notify_failure(surface, "Encryption", err);
    }
}

/// Run decrypt, surfacing any failure as a single error dialog
pub async fn run_decrypt(surface: &mut dyn EditorSurface, settings: &Settings) {
    if let Err(err) = decrypt(surface, settings).await {
        notify_failure(surface, "Decryption", err);
    }
}

fn notify_failure(surface: &mut dyn EditorSurface, operation: &str, err: SealError) {
    match err {
        // Precondition messages already say what to fix
        SealError::Configuration(msg) | SealError::Input(msg) => surface.notify_error(&msg),
        other => surface.notify_error(&format!("{} failed: {}", operation, other)),
    }
}

/// Escape `<` and `>` so tool output cannot inject markup into the popup
fn escape_markup(content: &str) -> String {
    content.replace('<', "&lt;").replace('>', "&gt;")
}

fn render_popup(content: &str, namespace: &str, name: &str) -> String {
    format!(
        "<body>\
         <style>body {{ font-family: monospace; }} .content {{ white-space: pre-wrap; }}</style>\
         <div class=\"header\">Decrypted Secret: {}/{}</div>\
         <div class=\"content\">{}</div>\
         </body>",
        namespace,
        name,
        escape_markup(content)
    )
}
