//! Terminal event mode setup.
//!
//! Enables bracketed paste, so a pasted value arrives as one event instead
//! of a burst of keys that could trigger the form, and the keyboard
//! enhancement protocol, so modified keys such as Ctrl+Left are reported
//! unambiguously.

use std::io::stdout;

use ratatui::crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use ratatui::crossterm::execute;

/// Restores the terminal event modes it enabled when dropped.
pub struct TerminalEventGuard {
    paste: bool,
    keyboard: bool,
}

impl TerminalEventGuard {
    /// Enables whichever modes the terminal supports.
    #[must_use]
    pub fn new() -> Self {
        let paste = match execute!(stdout(), EnableBracketedPaste) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "bracketed paste unavailable");
                false
            }
        };

        let keyboard = match execute!(
            stdout(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        ) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(error = %e, "keyboard enhancement unavailable");
                false
            }
        };

        tracing::debug!(paste, keyboard, "terminal event modes enabled");
        Self { paste, keyboard }
    }
}

impl Default for TerminalEventGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TerminalEventGuard {
    fn drop(&mut self) {
        if self.keyboard {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        if self.paste {
            let _ = execute!(stdout(), DisableBracketedPaste);
        }
    }
}
