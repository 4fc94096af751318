//! Argument vectors assembled from form state.

use std::fmt;

/// A full invocation: the command path followed by expanded option tokens.
///
/// Element 0 is the root command name, in the program-name position of a
/// real command line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentVector(Vec<String>);

impl ArgumentVector {
    /// Returns the root command name.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Returns every token after the program name.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.0.get(1..).unwrap_or_default()
    }

    /// Returns all tokens.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of tokens, program name included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no token was appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<String> {
        self.0
    }
}

impl fmt::Display for ArgumentVector {
    /// Formats the vector as a copy-pasteable shell line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(&quote_token(token))?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ArgumentVector {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collects tokens for one trigger.
///
/// A builder is created when the run control fires, filled with the command
/// path and option extractions, and consumed by [`ArgumentBuilder::finish`].
/// It is never shared between triggers.
#[derive(Debug, Default)]
pub struct ArgumentBuilder {
    tokens: Vec<String>,
}

impl ArgumentBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a command or sub-command name.
    pub fn push_command(&mut self, name: &str) {
        self.tokens.push(name.to_string());
    }

    /// Appends the tokens produced by one option.
    pub fn extend<I>(&mut self, tokens: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.tokens.extend(tokens);
    }

    /// Finishes the vector.
    #[must_use]
    pub fn finish(self) -> ArgumentVector {
        ArgumentVector(self.tokens)
    }
}

/// Quotes a token for display in a shell line.
///
/// Tokens made only of safe characters are returned unchanged; anything else
/// is single-quoted with embedded single quotes escaped as `'\''`.
#[must_use]
pub fn quote_token(token: &str) -> String {
    if !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '=' | ':'))
    {
        return token.to_string();
    }
    format!("'{}'", token.replace('\'', "'\\''"))
}
