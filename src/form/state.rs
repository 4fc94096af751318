//! Form state structures.

use crate::core::{InvocationOutput, InvocationStatus};
use crate::tui::widgets::OutputLine;

use super::layout::FormLayout;

/// Events sent from a running invocation to the form.
#[derive(Debug, Clone)]
pub enum InvocationEvent {
    /// A line of command output.
    Output(InvocationOutput),
    /// The invocation finished.
    Finished(InvocationStatus),
    /// The invocation could not run.
    Failed(String),
}

/// Whether an invocation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    /// Ready to trigger.
    #[default]
    Idle,
    /// Waiting for the current invocation to finish.
    Running,
}

/// What a focus position points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Row {
    /// Option row of the root command.
    Root(usize),
    /// Option row of the active tab.
    Tab(usize),
    /// The trigger control.
    Run,
}

/// Output buffer and its scroll position.
#[derive(Debug, Default)]
pub struct OutputState {
    /// Buffered lines, oldest first.
    pub lines: Vec<OutputLine>,
    /// Scroll position.
    pub scroll: ScrollState,
    /// Whether old lines have been dropped.
    pub truncated: bool,
}

/// Cached layout, recalculated once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutState {
    /// The current form layout.
    pub form: FormLayout,
}

impl LayoutState {
    /// Rows visible inside the output panel.
    #[must_use]
    pub const fn output_visible_height(&self) -> usize {
        self.form.output_visible_height
    }

    /// Columns available to output text.
    #[must_use]
    pub const fn output_content_width(&self) -> usize {
        self.form.output_content_width
    }
}

/// Scroll position of a panel that follows new content while at the bottom.
#[derive(Debug, Clone)]
pub struct ScrollState {
    /// Index of the first visible row.
    pub offset: usize,
    /// Follow new content.
    pub follow: bool,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            follow: true,
        }
    }
}

impl ScrollState {
    fn max_offset(content_len: usize, visible: usize) -> usize {
        content_len.saturating_sub(visible)
    }

    /// Moves up `rows`, leaving follow mode.
    pub fn up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
        self.follow = false;
    }

    /// Moves down `rows`; reaching the bottom re-enters follow mode.
    pub fn down(&mut self, rows: usize, content_len: usize, visible: usize) {
        let max = Self::max_offset(content_len, visible);
        self.offset = (self.offset + rows).min(max);
        self.follow = self.offset >= max;
    }

    /// Jumps to the first row.
    pub fn top(&mut self) {
        self.offset = 0;
        self.follow = false;
    }

    /// Jumps to the last page and follows new content.
    pub fn bottom(&mut self, content_len: usize, visible: usize) {
        self.offset = Self::max_offset(content_len, visible);
        self.follow = true;
    }

    /// Keeps the last page in view while following.
    pub fn follow_content(&mut self, content_len: usize, visible: usize) {
        if self.follow {
            self.offset = Self::max_offset(content_len, visible);
        }
    }
}
