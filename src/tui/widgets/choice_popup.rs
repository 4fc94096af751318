//! Dropdown choice popup.
//!
//! Drawn over the form below an open dropdown, listing every choice with the
//! highlighted one marked.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::tui::Theme;

/// Maximum number of choice rows shown at once.
pub const MAX_CHOICE_POPUP_ROWS: usize = 8;

/// Popup listing the choices of one dropdown.
pub struct ChoicePopup<'a> {
    choices: &'a [String],
    highlighted: usize,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> ChoicePopup<'a> {
    /// Creates a popup over `choices`.
    ///
    /// `selected` is the committed choice, `highlighted` the one under the
    /// cursor.
    #[must_use]
    pub const fn new(
        choices: &'a [String],
        highlighted: usize,
        selected: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            choices,
            highlighted,
            selected,
            theme,
        }
    }

    /// Returns (width, height) in cells, borders included.
    #[must_use]
    pub fn preferred_size(&self) -> (u16, u16) {
        if self.choices.is_empty() {
            return (0, 0);
        }
        let widest = self
            .choices
            .iter()
            .map(|c| c.width())
            .max()
            .unwrap_or(0);
        // "> " marker, "  *" selection mark, borders.
        let width = u16::try_from(widest + 7).unwrap_or(u16::MAX).min(60);
        let rows = self.choices.len().min(MAX_CHOICE_POPUP_ROWS);
        let height = u16::try_from(rows + 2).unwrap_or(u16::MAX);
        (width, height)
    }

    /// Index of the first visible choice, keeping the highlight in view.
    fn first_visible(&self, rows: usize) -> usize {
        if rows == 0 {
            return 0;
        }
        self.highlighted.saturating_sub(rows - 1)
    }
}

impl Widget for ChoicePopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.choices.is_empty() {
            return;
        }

        Clear.render(area, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = inner.height as usize;
        let first = self.first_visible(rows);
        let items: Vec<ListItem> = self
            .choices
            .iter()
            .enumerate()
            .skip(first)
            .take(rows)
            .map(|(i, choice)| {
                let style = if i == self.highlighted {
                    self.theme.highlight_style()
                } else {
                    self.theme.normal_style()
                };
                let marker = if i == self.highlighted { "> " } else { "  " };
                let mark = if i == self.selected { " *" } else { "" };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(choice.as_str(), style),
                    Span::styled(mark, self.theme.muted_style()),
                ]))
            })
            .collect();

        Widget::render(List::new(items), inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use ratatui::{Terminal, backend::TestBackend};

    fn choices(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("choice{i}")).collect()
    }

    #[test]
    fn size_fits_widest_choice() {
        let theme = Theme::default();
        let items = vec!["a".to_string(), "longest".to_string()];
        let popup = ChoicePopup::new(&items, 0, 0, &theme);
        assert_eq!(popup.preferred_size(), (14, 4));
    }

    #[test]
    fn height_is_capped() {
        let theme = Theme::default();
        let items = choices(20);
        let popup = ChoicePopup::new(&items, 0, 0, &theme);
        let max_rows = u16::try_from(MAX_CHOICE_POPUP_ROWS).unwrap_or(0);
        assert_eq!(popup.preferred_size().1, max_rows + 2);
    }

    #[test]
    fn empty_popup_has_no_size() {
        let theme = Theme::default();
        let popup = ChoicePopup::new(&[], 0, 0, &theme);
        assert_eq!(popup.preferred_size(), (0, 0));
    }

    #[test]
    fn renders_highlight_marker_and_scrolls_to_it() -> Result<()> {
        let theme = Theme::default();
        let items = choices(10);
        let mut terminal = Terminal::new(TestBackend::new(20, 5))?;
        terminal.draw(|frame| {
            let popup = ChoicePopup::new(&items, 9, 1, &theme);
            frame.render_widget(popup, frame.area());
        })?;

        let buffer = terminal.backend().buffer();
        let rows: Vec<String> = (0..5)
            .map(|y| (0..20).map(|x| buffer[(x, y)].symbol()).collect())
            .collect();
        assert!(rows[3].contains("> choice9"));
        assert!(rows[1].contains("choice7"));
        Ok(())
    }
}
