//! Declaration file persistence.
//!
//! A declaration file is a JSON command declaration with an optional `"form"`
//! block:
//!
//! ```json
//! {
//!   "name": "greet",
//!   "options": [{ "name": "name", "flag": "--name", "default": "world" }],
//!   "form": { "title": "Greeter" }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::{CommandSpec, FormConfig};

/// Contents of a declaration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationFile {
    /// The root command.
    #[serde(flatten)]
    pub command: CommandSpec,
    /// Form settings stored alongside the declaration.
    #[serde(default)]
    pub form: FormConfig,
}

impl DeclarationFile {
    /// Wraps a command with default form settings.
    #[must_use]
    pub fn new(command: CommandSpec) -> Self {
        Self {
            command,
            form: FormConfig::default(),
        }
    }
}

/// Loads and validates a declaration file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the declared
/// command is structurally invalid.
pub fn load_declaration(path: &Path) -> Result<DeclarationFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration file: {}", path.display()))?;

    let file: DeclarationFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse declaration file: {}", path.display()))?;

    file.command
        .validate()
        .with_context(|| format!("Invalid declaration in {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        command = %file.command.name,
        options = file.command.options.len(),
        subcommands = file.command.subcommands.len(),
        "loaded declaration"
    );
    Ok(file)
}

/// Writes a declaration file as pretty-printed JSON.
///
/// The parent directory must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be serialized or written.
pub fn save_declaration(path: &Path, file: &DeclarationFile) -> Result<()> {
    let json =
        serde_json::to_string_pretty(file).context("Failed to serialize declaration")?;

    std::fs::write(path, json)
        .with_context(|| format!("Failed to write declaration file: {}", path.display()))
}
