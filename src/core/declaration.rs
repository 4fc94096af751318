//! Command declarations: the option metadata a form is generated from.
//!
//! A [`CommandSpec`] is either written by hand, deserialized from a JSON
//! declaration file, or imported from a [`clap::Command`]. It can also be
//! exported back to a `clap::Command` so the in-process invoker parses the
//! assembled argument vector exactly as a real command line would be parsed.
//!
//! # JSON shape
//!
//! ```json
//! {
//!   "name": "greet",
//!   "options": [
//!     { "name": "count", "type": "integer", "flag": "--count", "default": 1 },
//!     { "name": "shout", "type": "flag", "flag": "--shout", "secondary_flags": ["--no-shout"] },
//!     { "name": "color", "type": { "choice": ["red", "green"] }, "flag": "--color" },
//!     { "name": "points", "flag": "--points", "arity": 3 }
//!   ]
//! }
//! ```

use std::collections::HashSet;
use std::fmt;

use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction, Command};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a declaration is structurally invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclarationError {
    /// A command or option has an empty name.
    #[error("empty name in command '{command}'")]
    EmptyName {
        /// Command containing the unnamed item.
        command: String,
    },
    /// A choice option declares no choices.
    #[error("option '{option}' of '{command}' declares no choices")]
    EmptyChoices {
        /// Owning command.
        command: String,
        /// Offending option.
        option: String,
    },
    /// A flag or count option has no flag token to emit.
    #[error("{kind} option '{option}' of '{command}' needs a flag token")]
    MissingFlag {
        /// Owning command.
        command: String,
        /// Offending option.
        option: String,
        /// Option kind ("flag" or "count").
        kind: &'static str,
    },
    /// Two options of one command share a name.
    #[error("duplicate option '{option}' in '{command}'")]
    DuplicateOption {
        /// Owning command.
        command: String,
        /// Duplicated option name.
        option: String,
    },
    /// Two sub-commands of one group share a name.
    #[error("duplicate sub-command '{subcommand}' in '{command}'")]
    DuplicateSubcommand {
        /// Owning group.
        command: String,
        /// Duplicated sub-command name.
        subcommand: String,
    },
    /// An arity value other than a positive count or `-1`.
    #[error("invalid arity {0}: expected a positive count or -1")]
    InvalidArity(i64),
}

/// Declared value type of an option.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free-form text.
    #[default]
    Text,
    /// Whole number.
    Integer,
    /// Floating point number.
    Float,
    /// One of a fixed set of values.
    Choice(Vec<String>),
    /// Repeatable flag counted as an integer (`-vvv`).
    Count,
    /// Boolean on/off flag.
    Flag,
}

/// Number of values an option accepts.
///
/// Serialized as an integer: `1` for a single value, `n` for a fixed count
/// and `-1` for an unbounded list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Arity {
    /// Exactly one value.
    #[default]
    Single,
    /// Exactly `n` values, `n > 1`.
    Fixed(usize),
    /// Any number of values.
    Unbounded,
}

impl Arity {
    /// Builds an arity from a value count, folding `1` into [`Arity::Single`].
    #[must_use]
    pub const fn exactly(n: usize) -> Self {
        if n <= 1 { Self::Single } else { Self::Fixed(n) }
    }

    /// Returns true when the option takes more than one value.
    #[must_use]
    pub const fn is_multi(&self) -> bool {
        !matches!(self, Self::Single)
    }
}

impl TryFrom<i64> for Arity {
    type Error = DeclarationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Self::Unbounded),
            1 => Ok(Self::Single),
            n if n > 1 => usize::try_from(n)
                .map(Self::Fixed)
                .map_err(|_| DeclarationError::InvalidArity(n)),
            n => Err(DeclarationError::InvalidArity(n)),
        }
    }
}

impl From<Arity> for i64 {
    fn from(arity: Arity) -> Self {
        match arity {
            Arity::Single => 1,
            Arity::Fixed(n) => i64::try_from(n).unwrap_or(i64::MAX),
            Arity::Unbounded => -1,
        }
    }
}

/// Default value of an option as written in a declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    /// Boolean default, used by flags.
    Bool(bool),
    /// Numeric default.
    Number(serde_json::Number),
    /// Textual default.
    Text(String),
}

impl DefaultValue {
    /// Returns true for defaults that should start a checkbox checked.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => n.as_f64().is_some_and(|v| v.abs() > f64::EPSILON),
            Self::Text(s) => matches!(s.as_str(), "true" | "yes" | "on" | "1"),
        }
    }

    /// Returns the default as a non-negative counter value.
    #[must_use]
    pub fn as_count(&self) -> u32 {
        match self {
            Self::Bool(b) => u32::from(*b),
            Self::Number(n) => n
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .unwrap_or(0),
            Self::Text(s) => s.trim().parse().unwrap_or(0),
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DefaultValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<bool> for DefaultValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for DefaultValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

/// One declared option of a command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Option name, shown as the row label.
    pub name: String,
    /// Declared value type.
    #[serde(default, rename = "type")]
    pub value_type: ValueType,
    /// Number of values.
    #[serde(default)]
    pub arity: Arity,
    /// Default value.
    #[serde(default)]
    pub default: Option<DefaultValue>,
    /// Help text.
    #[serde(default)]
    pub help: Option<String>,
    /// Primary flag token (`--name` or `-n`); `None` for positionals.
    #[serde(default)]
    pub flag: Option<String>,
    /// Negating flag tokens emitted when a boolean flag is off.
    #[serde(default)]
    pub secondary_flags: Vec<String>,
    /// Mask typed characters.
    #[serde(default)]
    pub hide_input: bool,
}

impl OptionSpec {
    /// Creates a single-valued text option named `name` with flag `--name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let flag = format!("--{}", name.replace('_', "-"));
        Self {
            name,
            value_type: ValueType::Text,
            arity: Arity::Single,
            default: None,
            help: None,
            flag: Some(flag),
            secondary_flags: Vec::new(),
            hide_input: false,
        }
    }

    /// Creates a positional argument (no flag token).
    #[must_use]
    pub fn positional(name: impl Into<String>) -> Self {
        Self {
            flag: None,
            ..Self::new(name)
        }
    }

    /// Sets the value type.
    #[must_use]
    pub fn with_type(mut self, value_type: ValueType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Sets the arity.
    #[must_use]
    pub fn with_arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Replaces the primary flag token.
    #[must_use]
    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.flag = Some(flag.into());
        self
    }

    /// Adds a negating flag token.
    #[must_use]
    pub fn with_secondary_flag(mut self, flag: impl Into<String>) -> Self {
        self.secondary_flags.push(flag.into());
        self
    }

    /// Masks typed characters.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hide_input = true;
        self
    }

    /// Returns true for boolean flags.
    #[must_use]
    pub const fn is_flag(&self) -> bool {
        matches!(self.value_type, ValueType::Flag)
    }

    /// Returns true for counted flags.
    #[must_use]
    pub const fn is_count(&self) -> bool {
        matches!(self.value_type, ValueType::Count)
    }

    /// Returns the fixed choice set, if this is a choice option.
    #[must_use]
    pub fn choices(&self) -> Option<&[String]> {
        match &self.value_type {
            ValueType::Choice(choices) => Some(choices),
            _ => None,
        }
    }

    /// Returns the default rendered as text, or an empty string.
    #[must_use]
    pub fn default_text(&self) -> String {
        self.default
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    /// Imports an option from a clap argument.
    ///
    /// Free-form values import as [`ValueType::Text`]; clap still validates
    /// numeric values when the assembled vector is parsed.
    #[must_use]
    pub fn from_clap(arg: &Arg) -> Self {
        let flag = arg
            .get_long()
            .map(|long| format!("--{long}"))
            .or_else(|| arg.get_short().map(|short| format!("-{short}")));

        let value_type = match arg.get_action() {
            ArgAction::SetTrue | ArgAction::SetFalse => ValueType::Flag,
            ArgAction::Count => ValueType::Count,
            _ => {
                let choices: Vec<String> = arg
                    .get_possible_values()
                    .iter()
                    .filter(|value| !value.is_hide_set())
                    .map(|value| value.get_name().to_string())
                    .collect();
                if choices.is_empty() {
                    ValueType::Text
                } else {
                    ValueType::Choice(choices)
                }
            }
        };

        let arity = match (&value_type, arg.get_num_args()) {
            (ValueType::Flag | ValueType::Count, _) | (_, None) => Arity::Single,
            (_, Some(range)) if range.max_values() == usize::MAX => Arity::Unbounded,
            (_, Some(range)) if range.min_values() == range.max_values() => {
                Arity::exactly(range.max_values())
            }
            (_, Some(_)) => Arity::Unbounded,
        };

        let default = match (&value_type, arg.get_default_values().first()) {
            (ValueType::Flag, _) | (_, None) => None,
            (_, Some(value)) => Some(DefaultValue::Text(value.to_string_lossy().into_owned())),
        };

        Self {
            name: arg.get_id().as_str().to_string(),
            value_type,
            arity,
            default,
            help: arg.get_help().map(ToString::to_string),
            flag,
            secondary_flags: Vec::new(),
            hide_input: false,
        }
    }

    /// Builds the clap arguments that parse what this option emits.
    ///
    /// A boolean flag yields one extra argument per negating token; all of
    /// them override each other so the last token on the line wins.
    #[must_use]
    pub fn to_clap_args(&self) -> Vec<Arg> {
        let mut arg = with_flag_token(Arg::new(self.name.clone()), self.flag.as_deref());
        if let Some(help) = &self.help {
            arg = arg.help(help.clone());
        }

        match &self.value_type {
            ValueType::Flag => {
                let negations: Vec<String> = (0..self.secondary_flags.len())
                    .map(|i| format!("{}-off-{i}", self.name))
                    .collect();
                let mut args = vec![
                    arg.action(ArgAction::SetTrue)
                        .overrides_with_all(negations.clone()),
                ];
                for (id, token) in negations.iter().zip(&self.secondary_flags) {
                    args.push(
                        with_flag_token(Arg::new(id.clone()), Some(token))
                            .action(ArgAction::SetTrue)
                            .hide(true)
                            .overrides_with(self.name.clone()),
                    );
                }
                args
            }
            ValueType::Count => vec![arg.action(ArgAction::Count)],
            value_type => {
                arg = match value_type {
                    ValueType::Integer => arg.value_parser(clap::value_parser!(i64)),
                    ValueType::Float => arg.value_parser(clap::value_parser!(f64)),
                    ValueType::Choice(choices) => {
                        arg.value_parser(PossibleValuesParser::new(choices.clone()))
                    }
                    _ => arg,
                };
                arg = match self.arity {
                    Arity::Single => arg.num_args(1).action(ArgAction::Set),
                    Arity::Fixed(n) => arg.num_args(n).action(ArgAction::Set),
                    Arity::Unbounded => arg.num_args(0..).action(ArgAction::Set),
                };
                if let Some(default) = &self.default {
                    arg = arg.default_value(default.to_string());
                }
                vec![arg]
            }
        }
    }
}

/// Applies a `--long` or `-s` token to a clap argument.
fn with_flag_token(arg: Arg, token: Option<&str>) -> Arg {
    let Some(token) = token else {
        return arg;
    };
    if let Some(long) = token.strip_prefix("--") {
        return arg.long(long.to_string());
    }
    let mut short = token.strip_prefix('-').unwrap_or(token).chars();
    match (short.next(), short.next()) {
        (Some(c), None) => arg.short(c),
        _ => arg.long(token.trim_start_matches('-').to_string()),
    }
}

/// A command: a leaf with options, or a group of named sub-commands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command name; the first token of the argument vector.
    pub name: String,
    /// One-line description.
    #[serde(default)]
    pub about: Option<String>,
    /// Declared options in display order.
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Sub-commands in display order. Non-empty for groups.
    #[serde(default)]
    pub subcommands: Vec<CommandSpec>,
}

impl CommandSpec {
    /// Creates an empty leaf command.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            about: None,
            options: Vec::new(),
            subcommands: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.about = Some(about.into());
        self
    }

    /// Appends an option.
    #[must_use]
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Appends a sub-command, turning this command into a group.
    #[must_use]
    pub fn with_subcommand(mut self, subcommand: CommandSpec) -> Self {
        self.subcommands.push(subcommand);
        self
    }

    /// Returns true when this command has sub-commands.
    #[must_use]
    pub fn is_group(&self) -> bool {
        !self.subcommands.is_empty()
    }

    /// Checks the declaration for structural problems, recursively.
    ///
    /// # Errors
    ///
    /// Returns the first [`DeclarationError`] found.
    pub fn validate(&self) -> Result<(), DeclarationError> {
        if self.name.trim().is_empty() {
            return Err(DeclarationError::EmptyName {
                command: self.name.clone(),
            });
        }

        let mut seen = HashSet::new();
        for option in &self.options {
            if option.name.trim().is_empty() {
                return Err(DeclarationError::EmptyName {
                    command: self.name.clone(),
                });
            }
            if !seen.insert(option.name.as_str()) {
                return Err(DeclarationError::DuplicateOption {
                    command: self.name.clone(),
                    option: option.name.clone(),
                });
            }
            if option.choices().is_some_and(<[String]>::is_empty) {
                return Err(DeclarationError::EmptyChoices {
                    command: self.name.clone(),
                    option: option.name.clone(),
                });
            }
            if let Arity::Fixed(n) = option.arity
                && n <= 1
            {
                return Err(DeclarationError::InvalidArity(
                    i64::try_from(n).unwrap_or(i64::MAX),
                ));
            }
            let kind = if option.is_flag() {
                Some("flag")
            } else if option.is_count() {
                Some("count")
            } else {
                None
            };
            if let Some(kind) = kind
                && option.flag.is_none()
            {
                return Err(DeclarationError::MissingFlag {
                    command: self.name.clone(),
                    option: option.name.clone(),
                    kind,
                });
            }
        }

        let mut seen = HashSet::new();
        for subcommand in &self.subcommands {
            if !seen.insert(subcommand.name.as_str()) {
                return Err(DeclarationError::DuplicateSubcommand {
                    command: self.name.clone(),
                    subcommand: subcommand.name.clone(),
                });
            }
            subcommand.validate()?;
        }

        Ok(())
    }

    /// Imports a declaration from a clap command, skipping help and version
    /// arguments and the generated `help` sub-command.
    #[must_use]
    pub fn from_clap(command: &Command) -> Self {
        Self {
            name: command.get_name().to_string(),
            about: command.get_about().map(ToString::to_string),
            options: command
                .get_arguments()
                .filter(|arg| {
                    !matches!(
                        arg.get_action(),
                        ArgAction::Help
                            | ArgAction::HelpShort
                            | ArgAction::HelpLong
                            | ArgAction::Version
                    )
                })
                .map(OptionSpec::from_clap)
                .collect(),
            subcommands: command
                .get_subcommands()
                .filter(|sub| sub.get_name() != "help")
                .map(Self::from_clap)
                .collect(),
        }
    }

    /// Exports the declaration as a clap command.
    #[must_use]
    pub fn to_clap(&self) -> Command {
        let mut command = Command::new(self.name.clone());
        if let Some(about) = &self.about {
            command = command.about(about.clone());
        }
        for option in &self.options {
            for arg in option.to_clap_args() {
                command = command.arg(arg);
            }
        }
        for subcommand in &self.subcommands {
            command = command.subcommand(subcommand.to_clap());
        }
        command
    }
}
