//! sealedit - seal and unseal secret values from the command line
//!
//! Terminal host for the sealedit engine. Point it at a YAML file and a
//! selection range; it infers namespace/name from the file's metadata
//! block (prompting when absent), pipes the selection through kubeseal,
//! and writes the result back in place (encrypt) or to stdout (decrypt).

mod terminal;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use sealedit::{metadata, workflow, Settings};
use terminal::TerminalSurface;

#[derive(Parser)]
#[command(name = "sealedit")]
#[command(about = "Seal and unseal secret values in YAML files via kubeseal")]
#[command(version)]
#[command(after_help = r#"EXAMPLES:
    sealedit encrypt secret.yaml --selection 120..158
    sealedit decrypt secret.yaml --selection 120..458
    sealedit metadata secret.yaml
    sealedit settings --init

SETTINGS:
    cert_path          Sealing certificate, required for encrypt
    private_key_path   Recovery private key, required for decrypt
    kubeseal_path      kubeseal binary (default: kubeseal on PATH)
    timeout            Seconds per tool invocation (default: 30)
    decrypt_output     new_tab or popup (default: new_tab)"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt a selected span in place
    Encrypt {
        /// YAML file acting as the active buffer
        file: PathBuf,
        /// Selection as byte offsets, START..END (repeatable; only the
        /// first is processed)
        #[arg(long = "selection", value_name = "START..END")]
        selections: Vec<String>,
    },

    /// Decrypt a selected ciphertext and print the plaintext
    Decrypt {
        /// YAML file acting as the active buffer
        file: PathBuf,
        /// Selection as byte offsets, START..END
        #[arg(long = "selection", value_name = "START..END")]
        selections: Vec<String>,
    },

    /// Show the namespace/name the metadata scraper finds in a file
    Metadata {
        /// YAML file to inspect
        file: PathBuf,
    },

    /// Show effective settings and the settings file location
    Settings {
        /// Write a default settings file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        match cli.command {
            Commands::Encrypt { file, selections } => cmd_encrypt(&file, &selections).await,
            Commands::Decrypt { file, selections } => cmd_decrypt(&file, &selections).await,
            Commands::Metadata { file } => cmd_metadata(&file),
            Commands::Settings { init } => cmd_settings(init),
        }
    })
}

async fn cmd_encrypt(file: &Path, selections: &[String]) -> Result<()> {
    let settings = Settings::load()?;
    let mut surface = TerminalSurface::open(file, selections)?;

    workflow::run_encrypt(&mut surface, &settings).await;

    surface.save()
}

async fn cmd_decrypt(file: &Path, selections: &[String]) -> Result<()> {
    let settings = Settings::load()?;
    let mut surface = TerminalSurface::open(file, selections)?;

    workflow::run_decrypt(&mut surface, &settings).await;

    surface.save()
}

fn cmd_metadata(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file)?;

    match metadata::extract(&text) {
        Some(meta) => {
            println!("namespace: {}", meta.namespace);
            println!("name: {}", meta.name);
        }
        None => println!("No metadata found"),
    }

    Ok(())
}

fn cmd_settings(init: bool) -> Result<()> {
    if init {
        let path = Settings::write_default()?;
        println!("success: Wrote default settings to {}", path.display());
        return Ok(());
    }

    let settings = Settings::load()?;
    println!("Settings file: {}", Settings::path().display());
    println!();
    println!("{}", serde_json::to_string_pretty(&settings)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse() {
        let cli = Cli::try_parse_from([
            "sealedit",
            "encrypt",
            "secret.yaml",
            "--selection",
            "120..158",
        ])
        .unwrap();
        match cli.command {
            Commands::Encrypt { file, selections } => {
                assert_eq!(file, PathBuf::from("secret.yaml"));
                assert_eq!(selections, vec!["120..158"]);
            }
            _ => panic!("Expected Encrypt command"),
        }

        let cli = Cli::try_parse_from(["sealedit", "metadata", "secret.yaml"]).unwrap();
        assert!(matches!(cli.command, Commands::Metadata { .. }));

        let cli = Cli::try_parse_from(["sealedit", "settings", "--init"]).unwrap();
        match cli.command {
            Commands::Settings { init } => assert!(init),
            _ => panic!("Expected Settings command"),
        }
    }

    #[test]
    fn test_cli_repeated_selections() {
        let cli = Cli::try_parse_from([
            "sealedit",
            "encrypt",
            "secret.yaml",
            "--selection",
            "0..5",
            "--selection",
            "10..20",
        ])
        .unwrap();
        match cli.command {
            Commands::Encrypt { selections, .. } => {
                assert_eq!(selections, vec!["0..5", "10..20"]);
            }
            _ => panic!("Expected Encrypt command"),
        }
    }
}
