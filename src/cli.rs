//! CLI argument parsing using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::core::FormConfig;

/// `argform` - terminal form for a declared command
///
/// Reads a JSON command declaration, shows one input widget per option and
/// runs the command with the assembled arguments.
#[derive(Parser, Debug)]
#[command(name = "argform", version, about, long_about = None)]
pub struct Args {
    /// Path to the JSON command declaration
    pub declaration: PathBuf,

    /// Program to run (defaults to the declared command name)
    #[arg(long, value_name = "PATH", conflicts_with = "dry_run")]
    pub program: Option<PathBuf>,

    /// Print the assembled command line instead of running it
    #[arg(long)]
    pub dry_run: bool,

    /// Quit after the command completes successfully
    #[arg(long)]
    pub exit_after_run: bool,

    /// Header title
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Label of the run control
    #[arg(long, value_name = "TEXT")]
    pub run_label: Option<String>,

    /// Write diagnostics to this file (also `ARGFORM_LOG`)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Applies command line overrides to a declaration's form settings.
    #[must_use]
    pub fn apply_to(&self, mut config: FormConfig) -> FormConfig {
        if let Some(title) = &self.title {
            config.title = Some(title.clone());
        }
        if let Some(label) = &self.run_label {
            config.run_label.clone_from(label);
        }
        if self.exit_after_run {
            config.exit_after_run = true;
        }
        config
    }
}
