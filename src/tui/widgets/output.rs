//! Invocation output panel.
//!
//! Shows the command lines the form assembled, the output of each
//! invocation and its exit status in one scrollable, bordered panel.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{
        Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};
use unicode_width::UnicodeWidthChar;

use crate::tui::Theme;

/// Lines kept in the output buffer; older lines are dropped first.
pub const MAX_OUTPUT_LINES: usize = 2000;

/// Origin of an output line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    /// Standard output of the invoked command.
    #[default]
    Stdout,
    /// Standard error of the invoked command.
    Stderr,
    /// Successful completion.
    Success,
    /// Recoverable problem.
    Warning,
    /// Failure.
    Error,
    /// Echo of an assembled command line.
    Command,
}

/// One line of the output panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLine {
    /// Text as displayed, prefix included.
    pub text: String,
    /// Styling category.
    pub kind: OutputKind,
}

impl OutputLine {
    fn with_prefix(prefix: &str, text: impl Into<String>, kind: OutputKind) -> Self {
        Self {
            text: format!("{prefix}{}", text.into()),
            kind,
        }
    }

    /// Line from the command's standard output.
    #[must_use]
    pub fn stdout(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Stdout,
        }
    }

    /// Line from the command's standard error.
    #[must_use]
    pub fn stderr(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: OutputKind::Stderr,
        }
    }

    /// Success message.
    #[must_use]
    pub fn success(text: impl Into<String>) -> Self {
        Self::with_prefix("+ ", text, OutputKind::Success)
    }

    /// Warning message.
    #[must_use]
    pub fn warning(text: impl Into<String>) -> Self {
        Self::with_prefix("! ", text, OutputKind::Warning)
    }

    /// Error message.
    #[must_use]
    pub fn error(text: impl Into<String>) -> Self {
        Self::with_prefix("✗ ", text, OutputKind::Error)
    }

    /// Echoed command line.
    #[must_use]
    pub fn command(text: impl Into<String>) -> Self {
        Self::with_prefix("> ", text, OutputKind::Command)
    }

    fn style(&self, theme: &Theme) -> Style {
        match self.kind {
            OutputKind::Stdout => theme.normal_style(),
            OutputKind::Stderr | OutputKind::Warning => theme.warning_style(),
            OutputKind::Success => theme.success_style(),
            OutputKind::Error => theme.error_style(),
            OutputKind::Command => theme.highlight_style(),
        }
    }
}

/// Splits `text` into rows at most `width` cells wide.
///
/// Always yields at least one row, so empty lines keep their place.
fn wrap_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![String::new()];
    }

    let mut rows = Vec::new();
    let mut row = String::new();
    let mut row_width = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if row_width + w > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            row_width = 0;
        }
        row.push(ch);
        row_width += w;
    }
    rows.push(row);
    rows
}

/// Number of terminal rows `lines` take at `content_width` after wrapping.
#[must_use]
pub fn wrapped_row_count(lines: &[OutputLine], content_width: usize) -> usize {
    if content_width == 0 {
        return lines.len();
    }
    lines
        .iter()
        .map(|line| wrap_to_width(&line.text, content_width).len())
        .sum()
}

/// Scrollable view over the output buffer.
pub struct OutputPanel<'a> {
    lines: &'a [OutputLine],
    offset: usize,
    title: &'a str,
    theme: &'a Theme,
    truncated: bool,
}

impl<'a> OutputPanel<'a> {
    /// Creates a panel scrolled to row `offset`.
    #[must_use]
    pub const fn new(
        lines: &'a [OutputLine],
        offset: usize,
        title: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            lines,
            offset,
            title,
            theme,
            truncated: false,
        }
    }

    /// Marks the buffer as having dropped its oldest lines.
    #[must_use]
    pub const fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }
}

impl Widget for OutputPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let visible = inner.height as usize;
        // One column on the right is reserved for the scrollbar.
        let content_width = inner.width.saturating_sub(1) as usize;

        let rows: Vec<(String, Style)> = self
            .lines
            .iter()
            .flat_map(|line| {
                let style = line.style(self.theme);
                wrap_to_width(&line.text, content_width)
                    .into_iter()
                    .map(move |row| (row, style))
            })
            .collect();
        let total = rows.len();

        let mut title = self.title.to_string();
        if self.truncated {
            title.push_str(" [truncated]");
        }
        if total > visible {
            let last = (self.offset + visible).min(total);
            title.push_str(&format!(" ({}-{last}/{total})", self.offset + 1));
        }

        Block::default()
            .title(Line::from(Span::styled(title, self.theme.header_style())))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .render(area, buf);

        let shown: Vec<Line> = rows
            .into_iter()
            .skip(self.offset)
            .take(visible)
            .map(|(text, style)| Line::from(Span::styled(text, style)))
            .collect();
        Paragraph::new(shown).render(inner, buf);

        if total > visible {
            let mut state = ScrollbarState::new(total)
                .position(self.offset)
                .viewport_content_length(visible);
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("▲"))
                .end_symbol(Some("▼"))
                .track_symbol(Some("│"))
                .thumb_symbol("█")
                .track_style(self.theme.scrollbar_track_style())
                .thumb_style(self.theme.scrollbar_thumb_style())
                .render(inner, buf, &mut state);
        }
    }
}
