//! Rendering methods for the form.
//!
//! The screen is, top to bottom: header, group-level rows and tab bar (for
//! groups), the active panel's rows and run control, the focused row's help,
//! the output panel and key hints. An open dropdown draws its choice popup
//! last, over everything else.

mod fields;

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Tabs},
};

use super::Form;
use super::state::Row;
use super::widget::FormWidget;
use crate::tui::widgets::{ChoicePopup, OutputPanel};

impl Form {
    /// Renders the form using the layout cached by `update_layout`.
    pub fn render(&self, frame: &mut Frame) {
        let layout = self.layout.form;
        let root_rows = self.root.bindings.len();

        self.render_header(frame, layout.header);

        let focused_area = if self.tabs.is_empty() {
            self.render_rows(frame, layout.fields, 0..self.row_count())
        } else {
            let root = self.render_rows(frame, layout.root_fields, 0..root_rows);
            self.render_tab_bar(frame, layout.tabs);
            let panel = self.render_rows(frame, layout.fields, root_rows..self.row_count());
            root.or(panel)
        };

        self.render_help(frame, layout.help);
        self.render_output(frame, layout.output);
        self.render_footer(frame, layout.footer);

        if let Some(anchor) = focused_area {
            self.render_choice_popup(frame, anchor);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(" {} ", self.title()),
            self.theme.header_style(),
        )];
        if let Some(about) = &self.about {
            spans.push(Span::styled(about.as_str(), self.theme.muted_style()));
        }
        if self.is_running() {
            spans.push(Span::styled("  running…", self.theme.warning_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let titles = self.tabs.iter().map(|tab| tab.title.as_str());
        let tabs = Tabs::new(titles)
            .select(self.active_tab)
            .style(self.theme.muted_style())
            .highlight_style(self.theme.highlight_style())
            .divider("│");
        frame.render_widget(tabs, area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let row = self.focused_row();
        let text = match self.binding(row) {
            Some(binding) => binding
                .help()
                .or(binding.option().flag.as_deref())
                .unwrap_or_default()
                .to_string(),
            None => self
                .tabs
                .get(self.active_tab)
                .and_then(|tab| tab.about.clone())
                .unwrap_or_else(|| format!("Run {}", self.command_path())),
        };
        frame.render_widget(
            Paragraph::new(Span::styled(format!(" {text}"), self.theme.muted_style())),
            area,
        );
    }

    /// Root name followed by the active tab's path.
    fn command_path(&self) -> String {
        match self.tabs.get(self.active_tab) {
            Some(tab) => format!("{} {}", self.command_name, tab.title),
            None => self.command_name.clone(),
        }
    }

    fn render_output(&self, frame: &mut Frame, area: Rect) {
        let panel = OutputPanel::new(
            &self.output.lines,
            self.output.scroll.offset,
            "Output",
            &self.theme,
        )
        .truncated(self.output.truncated);
        frame.render_widget(panel, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let mut hints: Vec<(&str, &str)> = vec![("Tab/↑↓", "move")];
        match self.binding(self.focused_row()).map(|b| b.widget()) {
            Some(FormWidget::Checkbox(_)) => hints.push(("Space", "toggle")),
            Some(FormWidget::Dropdown(_)) => hints.push(("Enter", "choose")),
            Some(FormWidget::Stepper(_)) => hints.push(("←→", "adjust")),
            Some(FormWidget::List(list)) if list.is_growable() => {
                hints.push(("Ins/Del", "entries"));
            }
            _ => {}
        }
        if self.tabs.len() > 1 {
            hints.push(("Ctrl+←→", "tab"));
        }
        hints.push(("Ctrl+R", "run"));
        hints.push(("PgUp/PgDn", "output"));
        hints.push(("Ctrl+C", "quit"));

        let mut spans = Vec::with_capacity(hints.len() * 3);
        for (key, action) in hints {
            spans.push(Span::styled(format!(" {key}"), self.theme.highlight_style()));
            spans.push(Span::styled(format!(" {action} "), self.theme.muted_style()));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Draws the open dropdown's choices below `anchor`, or above it when
    /// there is no room below.
    fn render_choice_popup(&self, frame: &mut Frame, anchor: Rect) {
        let row = self.focused_row();
        if row == Row::Run {
            return;
        }
        let Some(FormWidget::Dropdown(dropdown)) = self.binding(row).map(|b| b.widget()) else {
            return;
        };
        let Some(highlighted) = dropdown.highlighted() else {
            return;
        };

        let popup = ChoicePopup::new(
            dropdown.choices(),
            highlighted,
            dropdown.selected_index(),
            &self.theme,
        );
        let (width, height) = popup.preferred_size();
        let screen = frame.area();
        let width = width.min(screen.width.saturating_sub(anchor.x));
        let below = anchor.y + 1;
        let y = if below + height <= screen.y + screen.height {
            below
        } else {
            anchor.y.saturating_sub(height)
        };
        let height = height.min(screen.height.saturating_sub(y));
        frame.render_widget(popup, Rect::new(anchor.x, y, width, height));
    }
}
