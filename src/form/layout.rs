//! Layout calculation for the form screen.
//!
//! [`calculate_form_layout`] is used both by `Form::update_layout` for
//! scroll arithmetic and by rendering, so the two always agree.

use ratatui::layout::{Constraint, Layout, Rect};

/// Share of the screen height given to the output panel, in percent.
const OUTPUT_HEIGHT_PERCENT: u16 = 35;

/// Smallest output panel height, borders included.
const MIN_OUTPUT_HEIGHT: u16 = 5;

/// Screen areas of the form.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormLayout {
    /// Title line.
    pub header: Rect,
    /// Group-level option rows; zero height for leaf commands.
    pub root_fields: Rect,
    /// Tab bar; zero height for leaf commands.
    pub tabs: Rect,
    /// Option rows of the active panel plus its trigger control.
    pub fields: Rect,
    /// Help text of the focused row.
    pub help: Rect,
    /// Output panel.
    pub output: Rect,
    /// Key hints.
    pub footer: Rect,
    /// Rows inside the output panel borders.
    pub output_visible_height: usize,
    /// Columns inside the output panel, scrollbar excluded.
    pub output_content_width: usize,
}

/// Splits `area` for a form with `root_rows` group-level rows.
///
/// `root_rows` is ignored without tabs: a leaf command's options all go to
/// `fields`. Group rows are capped at a quarter of the screen.
#[must_use]
pub fn calculate_form_layout(area: Rect, root_rows: u16, has_tabs: bool) -> FormLayout {
    let (root_height, tabs_height) = if has_tabs {
        (root_rows.min(area.height / 4), 1)
    } else {
        (0, 0)
    };
    let output_height =
        u16::try_from(u32::from(area.height) * u32::from(OUTPUT_HEIGHT_PERCENT) / 100)
            .unwrap_or(u16::MAX)
            .max(MIN_OUTPUT_HEIGHT);

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(root_height),
        Constraint::Length(tabs_height),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(output_height),
        Constraint::Length(1),
    ])
    .split(area);

    let output = chunks[5];
    FormLayout {
        header: chunks[0],
        root_fields: chunks[1],
        tabs: chunks[2],
        fields: chunks[3],
        help: chunks[4],
        output,
        footer: chunks[6],
        output_visible_height: output.height.saturating_sub(2) as usize,
        output_content_width: output.width.saturating_sub(3) as usize,
    }
}

/// Index of the first row to draw so that row `focus` is fully visible.
///
/// `heights` holds the height of every row in order; rows are dropped from
/// the top until the focused row fits in `available` lines.
#[must_use]
pub fn first_visible_row(heights: &[u16], focus: usize, available: u16) -> usize {
    let focus = focus.min(heights.len().saturating_sub(1));
    let mut start = 0;
    let mut used: u32 = heights
        .iter()
        .take(focus + 1)
        .map(|h| u32::from(*h))
        .sum();
    while start < focus && used > u32::from(available) {
        used -= u32::from(heights[start]);
        start += 1;
    }
    start
}
