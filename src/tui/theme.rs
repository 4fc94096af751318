//! Centralized theme and styling.

use ratatui::style::{Color, Modifier, Style};

/// Colors shared by every part of the form.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Accent color for focus and titles.
    pub accent: Color,
    /// Success color.
    pub success: Color,
    /// Warning color.
    pub warning: Color,
    /// Error color.
    pub error: Color,
    /// Secondary text color.
    pub muted: Color,
    /// Border color.
    pub border: Color,
    /// Background of editable fields.
    pub field_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: Color::White,
            accent: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            muted: Color::DarkGray,
            border: Color::Gray,
            field_bg: Color::Rgb(40, 40, 40),
        }
    }
}

impl Theme {
    /// Style for the header and panel titles.
    #[must_use]
    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for normal text.
    #[must_use]
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg)
    }

    /// Style for secondary text such as help and key hints.
    #[must_use]
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for success messages.
    #[must_use]
    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success)
    }

    /// Style for warning messages.
    #[must_use]
    pub fn warning_style(&self) -> Style {
        Style::default().fg(self.warning)
    }

    /// Style for error messages.
    #[must_use]
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error)
    }

    /// Style for borders.
    #[must_use]
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Style for the focused row label and highlighted items.
    #[must_use]
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for editable field content.
    #[must_use]
    pub fn field_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.field_bg)
    }

    /// Style for the text cursor inside a focused field.
    #[must_use]
    pub fn cursor_style(&self) -> Style {
        Style::default().add_modifier(Modifier::REVERSED)
    }

    /// Style for the trigger control when focused.
    #[must_use]
    pub fn button_focus_style(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for scrollbar thumb.
    #[must_use]
    pub fn scrollbar_thumb_style(&self) -> Style {
        Style::default().fg(self.accent)
    }

    /// Style for scrollbar track.
    #[must_use]
    pub fn scrollbar_track_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    /// Style for placeholder text in empty fields.
    #[must_use]
    pub fn placeholder_style(&self) -> Style {
        Style::default()
            .fg(Color::Gray)
            .bg(self.field_bg)
            .add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_highlight_are_bold_accent() {
        let theme = Theme::default();
        for style in [theme.header_style(), theme.highlight_style()] {
            assert_eq!(style.fg, Some(Color::Cyan));
            assert!(style.add_modifier.contains(Modifier::BOLD));
        }
    }

    #[test]
    fn message_styles_use_their_colors() {
        let theme = Theme::default();
        assert_eq!(theme.success_style().fg, Some(theme.success));
        assert_eq!(theme.warning_style().fg, Some(theme.warning));
        assert_eq!(theme.error_style().fg, Some(theme.error));
        assert_eq!(theme.muted_style().fg, Some(theme.muted));
    }

    #[test]
    fn fields_have_a_background() {
        let theme = Theme::default();
        assert_eq!(theme.field_style().bg, Some(theme.field_bg));
        assert_eq!(theme.placeholder_style().bg, Some(theme.field_bg));
    }

    #[test]
    fn custom_colors_flow_into_styles() {
        let theme = Theme {
            accent: Color::Magenta,
            error: Color::LightRed,
            ..Theme::default()
        };
        assert_eq!(theme.header_style().fg, Some(Color::Magenta));
        assert_eq!(theme.button_focus_style().bg, Some(Color::Magenta));
        assert_eq!(theme.error_style().fg, Some(Color::LightRed));
    }
}
