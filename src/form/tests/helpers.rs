//! Shared test utilities for the form module.
//!
//! - `greet_command` / `git_command` - declarations covering every widget
//! - `create_test_form` - a form that echoes instead of running
//! - `RecordingInvoker` / `BlockingInvoker` - invokers with scripted outcomes
//! - `render_form_to_terminal` - draws a form on a `TestBackend`
//! - key event helpers (`char_key`, `key`, `ctrl_key`, `type_text`)

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use async_trait::async_trait;
use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use tokio::sync::{mpsc, watch};

use crate::core::{
    ArgumentVector, Arity, CommandSpec, EchoInvoker, FormConfig, InvocationOutput,
    InvocationStatus, Invoker, OptionSpec, ValueType,
};
use crate::form::Form;

/// Creates a [`KeyEvent`] for a character key with no modifiers.
pub fn char_key(c: char) -> KeyEvent {
    KeyEvent {
        code: KeyCode::Char(c),
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Creates a [`KeyEvent`] for `code` with no modifiers.
pub fn key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Creates a [`KeyEvent`] for `code` with Ctrl held.
pub fn ctrl_key(code: KeyCode) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::CONTROL,
        kind: KeyEventKind::Press,
        state: KeyEventState::NONE,
    }
}

/// Types `text` into the focused widget one key at a time.
pub fn type_text(form: &mut Form, text: &str) {
    for c in text.chars() {
        form.handle_key(char_key(c));
    }
}

/// A leaf command with one option of every widget archetype.
pub fn greet_command() -> CommandSpec {
    CommandSpec::new("greet")
        .with_about("Print a greeting")
        .with_option(
            OptionSpec::new("name")
                .with_default("world")
                .with_help("Who to greet"),
        )
        .with_option(
            OptionSpec::new("count")
                .with_type(ValueType::Integer)
                .with_default(1_i64),
        )
        .with_option(
            OptionSpec::new("shout")
                .with_type(ValueType::Flag)
                .with_secondary_flag("--no-shout"),
        )
        .with_option(OptionSpec::new("verbose").with_type(ValueType::Count))
        .with_option(
            OptionSpec::new("mode")
                .with_type(ValueType::Choice(vec![
                    "plain".to_string(),
                    "fancy".to_string(),
                    "loud".to_string(),
                ]))
                .with_default("plain"),
        )
        .with_option(OptionSpec::new("points").with_arity(Arity::Fixed(3)))
        .with_option(OptionSpec::new("tags").with_arity(Arity::Unbounded))
        .with_option(OptionSpec::new("password").hidden())
}

/// A group with a root option, a leaf and a nested group.
pub fn git_command() -> CommandSpec {
    CommandSpec::new("git")
        .with_option(OptionSpec::new("dir").with_default("."))
        .with_subcommand(
            CommandSpec::new("status")
                .with_about("Show the working tree status")
                .with_option(
                    OptionSpec::new("short")
                        .with_flag("-s")
                        .with_type(ValueType::Flag),
                ),
        )
        .with_subcommand(
            CommandSpec::new("remote")
                .with_option(
                    OptionSpec::new("verbose")
                        .with_flag("-v")
                        .with_type(ValueType::Flag)
                        .with_default(true),
                )
                .with_subcommand(
                    CommandSpec::new("add")
                        .with_about("Add a remote")
                        .with_option(OptionSpec::positional("name").with_default("origin")),
                ),
        )
}

/// Creates a form for `command` that echoes its argument vector.
pub fn create_test_form(command: &CommandSpec) -> Form {
    Form::new(command, Arc::new(EchoInvoker), FormConfig::default())
}

/// Renders the form to a [`TestBackend`] of the given size.
pub fn render_form_to_terminal(
    form: &mut Form,
    width: u16,
    height: u16,
) -> Result<Terminal<TestBackend>> {
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend)?;
    form.update_layout(ratatui::layout::Rect::new(0, 0, width, height));
    terminal.draw(|frame| form.render(frame))?;
    Ok(terminal)
}

/// Returns each buffer row as plain text.
pub fn buffer_rows(terminal: &Terminal<TestBackend>) -> Vec<String> {
    let buffer = terminal.backend().buffer();
    (0..buffer.area.height)
        .map(|y| {
            (0..buffer.area.width)
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}

/// Returns true when any buffer row contains `needle`.
pub fn screen_contains(terminal: &Terminal<TestBackend>, needle: &str) -> bool {
    buffer_rows(terminal).iter().any(|row| row.contains(needle))
}

/// Returns the texts of the form's output lines.
pub fn output_texts(form: &Form) -> Vec<String> {
    form.output_lines().iter().map(|l| l.text.clone()).collect()
}

/// Drains events until the running invocation finishes.
pub async fn run_until_idle(form: &mut Form) -> Result<()> {
    for _ in 0..500 {
        form.process_events();
        if !form.is_running() {
            return Ok(());
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    bail!("invocation did not finish")
}

/// Records every vector it is given and answers with scripted output.
pub struct RecordingInvoker {
    pub calls: Mutex<Vec<ArgumentVector>>,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
    pub result: Result<InvocationStatus, String>,
}

impl RecordingInvoker {
    pub fn new(status: InvocationStatus) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            stdout: Vec::new(),
            stderr: Vec::new(),
            result: Ok(status),
        }
    }

    pub fn failing_to_start(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            ..Self::new(InvocationStatus::Success)
        }
    }

    pub fn with_stdout(mut self, line: &str) -> Self {
        self.stdout.push(line.to_string());
        self
    }

    pub fn with_stderr(mut self, line: &str) -> Self {
        self.stderr.push(line.to_string());
        self
    }

    pub fn calls(&self) -> Vec<ArgumentVector> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Invoker for RecordingInvoker {
    async fn invoke(
        &self,
        argv: &ArgumentVector,
        output_tx: mpsc::Sender<InvocationOutput>,
        _shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus> {
        self.calls.lock().unwrap().push(argv.clone());
        for line in &self.stdout {
            output_tx
                .send(InvocationOutput::Stdout(line.clone()))
                .await?;
        }
        for line in &self.stderr {
            output_tx
                .send(InvocationOutput::Stderr(line.clone()))
                .await?;
        }
        match &self.result {
            Ok(status) => Ok(*status),
            Err(message) => bail!("{message}"),
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Runs until the form signals shutdown, then reports cancellation.
pub struct BlockingInvoker;

#[async_trait]
impl Invoker for BlockingInvoker {
    async fn invoke(
        &self,
        _argv: &ArgumentVector,
        _output_tx: mpsc::Sender<InvocationOutput>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus> {
        loop {
            let stopped = *shutdown_rx.borrow_and_update();
            if stopped || shutdown_rx.changed().await.is_err() {
                break;
            }
        }
        Ok(InvocationStatus::Cancelled)
    }

    fn name(&self) -> &str {
        "blocking"
    }
}
