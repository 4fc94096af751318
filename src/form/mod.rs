//! The generated form.
//!
//! [`Form`] owns the panels built from a command declaration, the focus
//! position, the output buffer and the channel a running invocation reports
//! through. Submodules:
//! - `widget` - widget archetypes and their key handling
//! - `mapper` - option to widget mapping and token extraction
//! - `panel` - segments and tabs built from a command tree
//! - `events` - key, paste and invocation event handling
//! - `render` - drawing
//!
//! ## Lifecycle
//!
//! The form is idle until the run control fires. A trigger assembles a fresh
//! argument vector from the root segment and the active tab, echoes it to
//! the output panel and hands it to the [`Invoker`] on a tokio task. Output
//! and the exit status come back as [`InvocationEvent`]s, drained by
//! [`Form::process_events`] once per tick. Triggers while running are
//! rejected.

mod events;
mod layout;
pub mod mapper;
pub mod panel;
mod render;
pub mod state;
pub mod widget;

#[cfg(test)]
mod tests;

pub use layout::{FormLayout, calculate_form_layout, first_visible_row};
pub use mapper::{WidgetBinding, map_option};
pub use panel::{Segment, Tab, build_tabs};
pub use state::{InvocationEvent, Row, RunState};
pub use widget::{FormWidget, KeyOutcome, WidgetKind};

use std::sync::Arc;

use ratatui::layout::Rect;
use tokio::sync::{mpsc, watch};

use crate::core::{ArgumentBuilder, ArgumentVector, CommandSpec, FormConfig, Invoker};
use crate::tui::Theme;
use crate::tui::widgets::{MAX_OUTPUT_LINES, OutputLine, wrapped_row_count};

use self::state::{LayoutState, OutputState};

/// Channel buffer size for invocation events.
const EVENT_CHANNEL_SIZE: usize = 1000;

/// A form generated from one command declaration.
pub struct Form {
    /// Root command name.
    pub(crate) command_name: String,
    /// Root command description.
    pub(crate) about: Option<String>,
    /// Presentation settings.
    pub(crate) config: FormConfig,
    /// Theme for styling.
    pub(crate) theme: Theme,
    /// Root command options; shown above the tabs for groups.
    pub(crate) root: Segment,
    /// One tab per leaf sub-command; empty for leaf commands.
    pub(crate) tabs: Vec<Tab>,
    /// Index of the active tab.
    pub(crate) active_tab: usize,
    /// Focus position over root rows, tab rows and the run control.
    pub(crate) focus: usize,
    /// Output buffer.
    pub(crate) output: OutputState,
    /// Layout of the last frame.
    pub(crate) layout: LayoutState,

    invoker: Arc<dyn Invoker>,
    run_state: RunState,
    should_quit: bool,
    event_rx: mpsc::Receiver<InvocationEvent>,
    event_tx: mpsc::Sender<InvocationEvent>,
    shutdown_tx: watch::Sender<bool>,
}

impl Form {
    /// Builds the form for `command`.
    #[must_use]
    pub fn new(command: &CommandSpec, invoker: Arc<dyn Invoker>, config: FormConfig) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_SIZE);
        let (shutdown_tx, _shutdown_rx) = watch::channel(false);
        let tabs = build_tabs(command);

        tracing::info!(
            command = %command.name,
            tabs = tabs.len(),
            invoker = invoker.name(),
            "form built"
        );

        Self {
            command_name: command.name.clone(),
            about: command.about.clone(),
            config,
            theme: Theme::default(),
            root: Segment::from_command(command),
            tabs,
            active_tab: 0,
            focus: 0,
            output: OutputState::default(),
            layout: LayoutState::default(),
            invoker,
            run_state: RunState::Idle,
            should_quit: false,
            event_rx,
            event_tx,
            shutdown_tx,
        }
    }

    /// Returns true once the user asked to quit.
    #[must_use]
    pub const fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Returns true while an invocation is in flight.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.run_state == RunState::Running
    }

    /// Title shown in the header.
    #[must_use]
    pub fn title(&self) -> &str {
        self.config.title_for(&self.command_name)
    }

    /// Returns the tabs; empty for a leaf command.
    #[must_use]
    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    /// Returns the active tab index.
    #[must_use]
    pub const fn active_tab(&self) -> usize {
        self.active_tab
    }

    /// Returns the buffered output lines.
    #[must_use]
    pub fn output_lines(&self) -> &[OutputLine] {
        &self.output.lines
    }

    /// Number of focusable rows: option rows plus the run control.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.root.bindings.len() + self.tab_row_count() + 1
    }

    fn tab_row_count(&self) -> usize {
        self.tabs.get(self.active_tab).map_or(0, Tab::row_count)
    }

    /// Resolves a focus position.
    #[must_use]
    pub fn row_at(&self, position: usize) -> Row {
        let root = self.root.bindings.len();
        if position < root {
            Row::Root(position)
        } else if position < root + self.tab_row_count() {
            Row::Tab(position - root)
        } else {
            Row::Run
        }
    }

    /// The focused row.
    #[must_use]
    pub fn focused_row(&self) -> Row {
        self.row_at(self.focus)
    }

    /// Returns the binding of an option row.
    #[must_use]
    pub fn binding(&self, row: Row) -> Option<&WidgetBinding> {
        match row {
            Row::Root(i) => self.root.bindings.get(i),
            Row::Tab(i) => self.tabs.get(self.active_tab)?.binding(i),
            Row::Run => None,
        }
    }

    /// Returns the binding of an option row for editing.
    pub fn binding_mut(&mut self, row: Row) -> Option<&mut WidgetBinding> {
        match row {
            Row::Root(i) => self.root.bindings.get_mut(i),
            Row::Tab(i) => self.tabs.get_mut(self.active_tab)?.binding_mut(i),
            Row::Run => None,
        }
    }

    /// Looks up a binding of the root command or the active tab by option name.
    #[must_use]
    pub fn binding_by_name(&self, name: &str) -> Option<&WidgetBinding> {
        self.root
            .bindings
            .iter()
            .chain(self.tabs.get(self.active_tab).into_iter().flat_map(Tab::bindings))
            .find(|b| b.label() == name)
    }

    /// Moves focus to the row of the option named `name`.
    ///
    /// Returns false when no such option is visible.
    pub fn focus_option(&mut self, name: &str) -> bool {
        let position = (0..self.row_count())
            .find(|&p| self.binding(self.row_at(p)).is_some_and(|b| b.label() == name));
        if let Some(position) = position {
            self.focus = position;
        }
        position.is_some()
    }

    /// Assembles the argument vector from the current widget state.
    ///
    /// The root command comes first, then each segment of the active tab.
    /// Reading widgets never changes them, so calling this twice without
    /// edits yields equal vectors.
    #[must_use]
    pub fn argument_vector(&self) -> ArgumentVector {
        let mut builder = ArgumentBuilder::new();
        self.root.extend_args(&mut builder);
        if let Some(tab) = self.tabs.get(self.active_tab) {
            for segment in &tab.segments {
                segment.extend_args(&mut builder);
            }
        }
        builder.finish()
    }

    /// Switches to tab `index`, keeping focus on root rows if it was there.
    pub fn select_tab(&mut self, index: usize) {
        if index >= self.tabs.len() || index == self.active_tab {
            return;
        }
        let on_root = matches!(self.focused_row(), Row::Root(_));
        self.active_tab = index;
        if !on_root {
            self.focus = self.root.bindings.len();
        }
        tracing::debug!(tab = %self.tabs[index].title, "tab selected");
    }

    /// Gets a shutdown receiver for an invocation.
    #[must_use]
    pub fn shutdown_receiver(&self) -> watch::Receiver<bool> {
        self.shutdown_tx.subscribe()
    }

    /// Signals running invocations to stop.
    pub fn trigger_shutdown(&self) {
        self.shutdown_tx.send_modify(|v| *v = true);
    }

    /// Clears the shutdown signal before a new invocation.
    ///
    /// `send_modify` updates the value even with no receivers subscribed.
    fn reset_shutdown(&self) {
        self.shutdown_tx.send_modify(|v| *v = false);
    }

    /// Stops any invocation and marks the form for exit.
    pub fn quit(&mut self) {
        self.trigger_shutdown();
        self.should_quit = true;
    }

    /// Recalculates the cached layout for `area`.
    pub fn update_layout(&mut self, area: Rect) {
        let root_rows: usize = self
            .root
            .bindings
            .iter()
            .map(|b| usize::from(b.widget().height()))
            .sum();
        let root_rows = u16::try_from(root_rows).unwrap_or(u16::MAX);
        self.layout.form = calculate_form_layout(area, root_rows, !self.tabs.is_empty());
    }

    /// Appends a line to the output buffer, dropping the oldest beyond
    /// [`MAX_OUTPUT_LINES`].
    pub(crate) fn push_output(&mut self, line: OutputLine) {
        self.output.lines.push(line);
        if self.output.lines.len() > MAX_OUTPUT_LINES {
            let excess = self.output.lines.len() - MAX_OUTPUT_LINES;
            self.output.lines.drain(0..excess);
            self.output.scroll.offset = self.output.scroll.offset.saturating_sub(excess);
            self.output.truncated = true;
        }
        let rows = self.output_row_count();
        self.output
            .scroll
            .follow_content(rows, self.layout.output_visible_height());
    }

    fn output_row_count(&self) -> usize {
        wrapped_row_count(&self.output.lines, self.layout.output_content_width())
    }
}
