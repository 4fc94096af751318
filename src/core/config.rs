//! Form configuration.

use serde::{Deserialize, Serialize};

/// Default label of the trigger control.
pub const DEFAULT_RUN_LABEL: &str = "run";

/// Presentation and lifecycle settings for one form.
///
/// Can be embedded in a declaration file under a `"form"` key; command line
/// flags of the `argform` binary override file values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Header title. Falls back to the command name when `None`.
    pub title: Option<String>,
    /// Label of the trigger control.
    pub run_label: String,
    /// Quit the form after an invocation completes successfully.
    pub exit_after_run: bool,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            title: None,
            run_label: DEFAULT_RUN_LABEL.to_string(),
            exit_after_run: false,
        }
    }
}

impl FormConfig {
    /// Returns the title to display for a command named `command_name`.
    #[must_use]
    pub fn title_for<'a>(&'a self, command_name: &'a str) -> &'a str {
        self.title.as_deref().unwrap_or(command_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_run_label_and_stays_open() {
        let config = FormConfig::default();
        assert_eq!(config.run_label, "run");
        assert!(!config.exit_after_run);
        assert_eq!(config.title_for("tool"), "tool");
    }

    #[test]
    fn partial_json_keeps_defaults() -> anyhow::Result<()> {
        let config: FormConfig = serde_json::from_str(r#"{ "title": "My Tool" }"#)?;
        assert_eq!(config.title_for("tool"), "My Tool");
        assert_eq!(config.run_label, DEFAULT_RUN_LABEL);
        Ok(())
    }
}
