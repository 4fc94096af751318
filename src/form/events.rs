//! Key, paste and invocation event handling.

use chrono::Local;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use super::state::{InvocationEvent, Row, RunState};
use super::widget::{FormWidget, KeyOutcome};
use super::Form;
use crate::core::{ArgumentVector, InvocationOutput, InvocationStatus};
use crate::tui::widgets::OutputLine;

/// Rows moved by PageUp/PageDown in the output panel.
const SCROLL_PAGE_SIZE: usize = 10;

/// Channel buffer size for one invocation's output lines.
const OUTPUT_CHANNEL_SIZE: usize = 256;

impl Form {
    /// Handles pasted text from bracketed paste mode.
    ///
    /// Text goes into the focused text field or list entry as one line;
    /// newlines and other control characters are dropped.
    pub fn handle_paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let row = self.focused_row();
        let Some(binding) = self.binding_mut(row) else {
            return;
        };
        if !binding.widget_mut().insert_text(text) {
            tracing::debug!(option = binding.label(), "paste ignored");
        }
    }

    /// Handles a key event.
    pub fn handle_key(&mut self, key: KeyEvent) {
        tracing::debug!(code = ?key.code, modifiers = ?key.modifiers, "key");

        let row = self.focused_row();

        // An open dropdown popup takes every key.
        if let Some(binding) = self.binding_mut(row)
            && binding.widget().is_modal()
        {
            binding.widget_mut().handle_key(key);
            return;
        }

        if self.handle_global_key(key) {
            return;
        }

        if row == Row::Run {
            match key.code {
                KeyCode::Enter | KeyCode::Char(' ') => {
                    self.trigger();
                }
                KeyCode::Tab | KeyCode::Down => self.focus_next(),
                KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
                _ => {}
            }
            return;
        }

        let Some(binding) = self.binding_mut(row) else {
            return;
        };
        let widget = binding.widget_mut();

        // Tab walks list entries like Down before leaving the list.
        let routed = match (key.code, &*widget) {
            (KeyCode::Tab, FormWidget::List(_)) => KeyEvent::new(KeyCode::Down, KeyModifiers::NONE),
            (KeyCode::BackTab, FormWidget::List(_)) => {
                KeyEvent::new(KeyCode::Up, KeyModifiers::NONE)
            }
            _ => key,
        };
        if widget.handle_key(routed) == KeyOutcome::Consumed {
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            _ => {}
        }
    }

    /// Keys that work on every row. Returns true when handled.
    fn handle_global_key(&mut self, key: KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c' | 'q') if ctrl => self.quit(),
            KeyCode::Char('r') if ctrl => {
                self.trigger();
            }
            KeyCode::Right if ctrl => self.select_tab(self.active_tab + 1),
            KeyCode::Left if ctrl => {
                if let Some(prev) = self.active_tab.checked_sub(1) {
                    self.select_tab(prev);
                }
            }
            KeyCode::Up if ctrl => self.output.scroll.up(1),
            KeyCode::Down if ctrl => self.scroll_output_down(1),
            KeyCode::Home if ctrl => self.output.scroll.top(),
            KeyCode::End if ctrl => {
                let rows = self.output_row_count();
                self.output
                    .scroll
                    .bottom(rows, self.layout.output_visible_height());
            }
            KeyCode::PageUp => self.output.scroll.up(SCROLL_PAGE_SIZE),
            KeyCode::PageDown => self.scroll_output_down(SCROLL_PAGE_SIZE),
            _ => return false,
        }
        true
    }

    fn scroll_output_down(&mut self, rows: usize) {
        let content = self.output_row_count();
        self.output
            .scroll
            .down(rows, content, self.layout.output_visible_height());
    }

    /// Moves focus to the next row, stopping at the run control.
    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1).min(self.row_count() - 1);
    }

    /// Moves focus to the previous row, stopping at the first.
    pub fn focus_prev(&mut self) {
        self.focus = self.focus.saturating_sub(1);
    }

    /// Fires the run control.
    ///
    /// Assembles the argument vector, echoes it to the output panel and
    /// starts the invocation on a tokio task. Returns the vector, or `None`
    /// when an invocation is already running.
    pub fn trigger(&mut self) -> Option<ArgumentVector> {
        if self.is_running() {
            tracing::warn!("trigger rejected while running");
            self.push_output(OutputLine::warning(
                "Command still running; wait for it to finish",
            ));
            return None;
        }

        let argv = self.argument_vector();
        tracing::info!(argv = %argv, invoker = self.invoker.name(), "triggering invocation");
        let stamp = Local::now().format("%H:%M:%S");
        self.push_output(OutputLine::command(format!("[{stamp}] {argv}")));

        self.reset_shutdown();
        self.run_state = RunState::Running;
        self.spawn_invocation(argv.clone());
        Some(argv)
    }

    fn spawn_invocation(&self, argv: ArgumentVector) {
        let invoker = self.invoker.clone();
        let tx = self.event_tx.clone();
        let shutdown_rx = self.shutdown_receiver();

        tokio::spawn(async move {
            let (output_tx, mut output_rx) = mpsc::channel::<InvocationOutput>(OUTPUT_CHANNEL_SIZE);
            let forward_tx = tx.clone();
            let forwarder = tokio::spawn(async move {
                while let Some(line) = output_rx.recv().await {
                    if forward_tx.send(InvocationEvent::Output(line)).await.is_err() {
                        break;
                    }
                }
            });

            let result = invoker.invoke(&argv, output_tx, shutdown_rx).await;
            // All output is forwarded before the final status.
            let _ = forwarder.await;

            let event = match result {
                Ok(status) => InvocationEvent::Finished(status),
                Err(e) => InvocationEvent::Failed(format!("{e:#}")),
            };
            let _ = tx.send(event).await;
        });
    }

    /// Drains pending invocation events.
    pub fn process_events(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                InvocationEvent::Output(InvocationOutput::Stdout(text)) => {
                    self.push_output(OutputLine::stdout(text));
                }
                InvocationEvent::Output(InvocationOutput::Stderr(text)) => {
                    self.push_output(OutputLine::stderr(text));
                }
                InvocationEvent::Finished(status) => self.finish(status),
                InvocationEvent::Failed(message) => {
                    tracing::warn!(error = %message, "invocation failed to run");
                    self.push_output(OutputLine::error(message));
                    self.run_state = RunState::Idle;
                }
            }
        }
    }

    fn finish(&mut self, status: InvocationStatus) {
        self.run_state = RunState::Idle;
        match status {
            InvocationStatus::Success => {
                tracing::info!("invocation succeeded");
                self.push_output(OutputLine::success("Completed"));
                if self.config.exit_after_run {
                    tracing::info!("exiting after successful run");
                    self.quit();
                }
            }
            InvocationStatus::Failed(code) => {
                tracing::warn!(?code, "invocation failed");
                let message = code.map_or_else(
                    || "Terminated by signal".to_string(),
                    |code| format!("Exited with status {code}"),
                );
                self.push_output(OutputLine::error(message));
            }
            InvocationStatus::Cancelled => {
                tracing::info!("invocation cancelled");
                self.push_output(OutputLine::warning("Cancelled"));
            }
        }
    }
}
