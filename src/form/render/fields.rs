//! Option rows and widget drawing.

use std::ops::Range;

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use crate::form::state::Row;
use crate::form::widget::{Checkbox, Dropdown, EditableList, FormWidget, Stepper, TextField};
use crate::form::{Form, first_visible_row};
use crate::tui::Theme;

/// Widest label column, marker included.
const MAX_LABEL_WIDTH: usize = 28;

/// Widest text field.
const MAX_FIELD_WIDTH: u16 = 48;

impl Form {
    /// Height of the row at focus position `position`.
    pub(super) fn row_height(&self, position: usize) -> u16 {
        self.binding(self.row_at(position))
            .map_or(1, |b| b.widget().height())
    }

    /// Draws the rows at `positions` into `area`, scrolled so the focused row
    /// is visible when it is among them.
    ///
    /// Returns the widget area of the focused row when it was drawn.
    pub(super) fn render_rows(
        &self,
        frame: &mut Frame,
        area: Rect,
        positions: Range<usize>,
    ) -> Option<Rect> {
        if area.height == 0 || positions.is_empty() {
            return None;
        }

        let label_width = positions
            .clone()
            .filter_map(|p| self.binding(self.row_at(p)))
            .map(|b| b.label().width())
            .max()
            .unwrap_or(0)
            .saturating_add(3)
            .min(MAX_LABEL_WIDTH);
        let label_width = u16::try_from(label_width)
            .unwrap_or(0)
            .min(area.width / 2);

        let heights: Vec<u16> = positions.clone().map(|p| self.row_height(p)).collect();
        let first = if positions.contains(&self.focus) {
            first_visible_row(&heights, self.focus - positions.start, area.height)
        } else {
            0
        };

        let mut focused_area = None;
        let mut y = area.y;
        let bottom = area.y + area.height;
        for (offset, position) in positions.clone().enumerate().skip(first) {
            if y >= bottom {
                break;
            }
            let height = heights[offset].min(bottom - y);
            let row_area = Rect::new(area.x, y, area.width, height);
            let widget_area = Rect::new(
                area.x + label_width,
                y,
                area.width.saturating_sub(label_width),
                height,
            );
            let focused = position == self.focus;
            self.render_row(frame, row_area, widget_area, position, focused);
            if focused {
                focused_area = Some(widget_area);
            }
            y += height;
        }
        focused_area
    }

    fn render_row(
        &self,
        frame: &mut Frame,
        row_area: Rect,
        widget_area: Rect,
        position: usize,
        focused: bool,
    ) {
        let row = self.row_at(position);
        let marker = if focused { "▸ " } else { "  " };
        let label_style = if focused {
            self.theme.highlight_style()
        } else {
            self.theme.normal_style()
        };

        if row == Row::Run {
            self.render_run_control(frame, widget_area, focused);
            frame.render_widget(
                Paragraph::new(Span::styled(marker, label_style)),
                Rect::new(row_area.x, row_area.y, 2.min(row_area.width), 1),
            );
            return;
        }

        let Some(binding) = self.binding(row) else {
            return;
        };
        let label = Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(binding.label(), label_style),
        ]);
        frame.render_widget(
            Paragraph::new(label),
            Rect::new(row_area.x, row_area.y, row_area.width, 1),
        );
        render_widget(frame, binding.widget(), widget_area, focused, &self.theme);
    }

    fn render_run_control(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (text, style) = if self.is_running() {
            (
                format!("[ {}… ]", self.config.run_label),
                self.theme.muted_style(),
            )
        } else if focused {
            (
                format!("[ {} ]", self.config.run_label),
                self.theme.button_focus_style(),
            )
        } else {
            (
                format!("[ {} ]", self.config.run_label),
                self.theme.highlight_style(),
            )
        };
        frame.render_widget(Paragraph::new(Span::styled(text, style)), area);
    }
}

/// Draws one widget into `area`.
pub(super) fn render_widget(
    frame: &mut Frame,
    widget: &FormWidget,
    area: Rect,
    focused: bool,
    theme: &Theme,
) {
    match widget {
        FormWidget::Text(field) | FormWidget::Masked(field) => {
            render_text(frame, field, area, focused, theme);
        }
        FormWidget::Checkbox(checkbox) => render_checkbox(frame, *checkbox, area, focused, theme),
        FormWidget::Dropdown(dropdown) => render_dropdown(frame, dropdown, area, focused, theme),
        FormWidget::Stepper(stepper) => render_stepper(frame, *stepper, area, focused, theme),
        FormWidget::List(list) => render_list(frame, list, area, focused, theme),
    }
}

fn value_style(focused: bool, theme: &Theme) -> Style {
    if focused {
        theme.highlight_style()
    } else {
        theme.normal_style()
    }
}

fn render_text(frame: &mut Frame, field: &TextField, area: Rect, focused: bool, theme: &Theme) {
    let mut textarea = field.textarea().clone();
    textarea.set_style(theme.field_style());
    textarea.set_cursor_line_style(Style::default());
    textarea.set_cursor_style(if focused {
        theme.cursor_style()
    } else {
        theme.field_style()
    });
    let area = Rect::new(area.x, area.y, area.width.min(MAX_FIELD_WIDTH), 1);
    frame.render_widget(&textarea, area);
}

fn render_checkbox(frame: &mut Frame, checkbox: Checkbox, area: Rect, focused: bool, theme: &Theme) {
    let mark = if checkbox.checked { "[x]" } else { "[ ]" };
    frame.render_widget(
        Paragraph::new(Span::styled(mark, value_style(focused, theme))),
        area,
    );
}

fn render_dropdown(frame: &mut Frame, dropdown: &Dropdown, area: Rect, focused: bool, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled("‹ ", theme.muted_style()),
        Span::styled(dropdown.selected(), value_style(focused, theme)),
        Span::styled(" › ▾", theme.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_stepper(frame: &mut Frame, stepper: Stepper, area: Rect, focused: bool, theme: &Theme) {
    let line = Line::from(vec![
        Span::styled("− ", theme.muted_style()),
        Span::styled(stepper.value().to_string(), value_style(focused, theme)),
        Span::styled(" +", theme.muted_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_list(frame: &mut Frame, list: &EditableList, area: Rect, focused: bool, theme: &Theme) {
    if list.entries().is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "(no entries; Insert adds one)",
                theme.placeholder_style(),
            )),
            Rect::new(area.x, area.y, area.width, 1.min(area.height)),
        );
        return;
    }

    // Entries scroll so the selected one stays on screen.
    let heights = vec![1; list.entries().len()];
    let first = first_visible_row(&heights, list.selected(), area.height);
    let index_width = list.entries().len().to_string().len();
    let lines: Vec<Line> = list
        .entries()
        .iter()
        .enumerate()
        .skip(first)
        .take(area.height as usize)
        .map(|(i, entry)| {
            let selected = focused && i == list.selected();
            let entry_style = if selected {
                theme.field_style().patch(theme.highlight_style())
            } else {
                theme.field_style()
            };
            let mut spans = vec![
                Span::styled(
                    format!("{:>index_width$} ", i + 1),
                    theme.muted_style(),
                ),
                Span::styled(entry.as_str(), entry_style),
            ];
            if selected {
                spans.push(Span::styled(" ", theme.cursor_style()));
            }
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), area);
}
