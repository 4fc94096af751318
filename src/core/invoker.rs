//! Invocation of the underlying command with an assembled argument vector.
//!
//! The form never interprets a command's own errors: it hands the vector to
//! an [`Invoker`] and displays whatever comes back. Three implementations
//! are provided:
//!
//! - [`ClapInvoker`] parses the vector in-process with a `clap::Command` and
//!   runs a handler on the matches. Usage errors, help and version output are
//!   reported as output lines; the process is never exited.
//! - [`ProcessInvoker`] spawns a program with the vector's arguments and
//!   streams its stdout and stderr.
//! - [`EchoInvoker`] prints the shell-quoted vector without running anything.

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::ArgMatches;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::{mpsc, watch};

use crate::core::args::ArgumentVector;

/// A line produced by an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationOutput {
    /// Line written to standard output.
    Stdout(String),
    /// Line written to standard error.
    Stderr(String),
}

/// Outcome of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationStatus {
    /// Completed with exit code 0.
    Success,
    /// Completed with a non-zero exit code, or terminated by a signal (`None`).
    Failed(Option<i32>),
    /// Killed because the form shut down.
    Cancelled,
}

impl InvocationStatus {
    /// Returns true for [`InvocationStatus::Success`].
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    fn from_code(code: Option<i32>) -> Self {
        match code {
            Some(0) => Self::Success,
            other => Self::Failed(other),
        }
    }
}

/// Runs a command with an argument vector.
///
/// Implementations stream output through `output_tx` and must stop early
/// when `shutdown_rx` turns `true`.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Invokes the command.
    ///
    /// # Errors
    ///
    /// Returns an error only when the command could not be started at all;
    /// a command that runs and fails reports [`InvocationStatus::Failed`].
    async fn invoke(
        &self,
        argv: &ArgumentVector,
        output_tx: mpsc::Sender<InvocationOutput>,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus>;

    /// Returns a short display name.
    fn name(&self) -> &str;
}

/// Prints the vector instead of running it.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoInvoker;

#[async_trait]
impl Invoker for EchoInvoker {
    async fn invoke(
        &self,
        argv: &ArgumentVector,
        output_tx: mpsc::Sender<InvocationOutput>,
        _shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus> {
        let _ = output_tx
            .send(InvocationOutput::Stdout(argv.to_string()))
            .await;
        Ok(InvocationStatus::Success)
    }

    fn name(&self) -> &str {
        "dry run"
    }
}

/// Handler run on successfully parsed matches; its text is shown as stdout.
pub type MatchesHandler = dyn Fn(&ArgMatches) -> Result<String> + Send + Sync;

/// Parses the vector with clap and runs a handler in-process.
#[derive(Clone)]
pub struct ClapInvoker {
    command: clap::Command,
    handler: Arc<MatchesHandler>,
}

impl ClapInvoker {
    /// Creates an invoker for `command` that calls `handler` on success.
    pub fn new<F>(command: clap::Command, handler: F) -> Self
    where
        F: Fn(&ArgMatches) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            command,
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for ClapInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClapInvoker")
            .field("command", &self.command.get_name())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Invoker for ClapInvoker {
    async fn invoke(
        &self,
        argv: &ArgumentVector,
        output_tx: mpsc::Sender<InvocationOutput>,
        _shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus> {
        match self.command.clone().try_get_matches_from(argv.as_slice()) {
            Ok(matches) => match (self.handler)(&matches) {
                Ok(text) => {
                    send_lines(&output_tx, &text, InvocationOutput::Stdout).await;
                    Ok(InvocationStatus::Success)
                }
                Err(e) => {
                    send_lines(&output_tx, &format!("{e:#}"), InvocationOutput::Stderr).await;
                    Ok(InvocationStatus::Failed(Some(1)))
                }
            },
            Err(err) => {
                // Help and version requests arrive as errors with exit code 0.
                let rendered = err.render().to_string();
                if err.use_stderr() {
                    send_lines(&output_tx, &rendered, InvocationOutput::Stderr).await;
                } else {
                    send_lines(&output_tx, &rendered, InvocationOutput::Stdout).await;
                }
                Ok(InvocationStatus::from_code(Some(err.exit_code())))
            }
        }
    }

    fn name(&self) -> &str {
        self.command.get_name()
    }
}

async fn send_lines(
    tx: &mpsc::Sender<InvocationOutput>,
    text: &str,
    wrap: fn(String) -> InvocationOutput,
) {
    for line in text.trim_end().lines() {
        let _ = tx.send(wrap(line.to_string())).await;
    }
}

/// Spawns an external program with the vector's arguments.
///
/// The vector's program name is replaced by the configured program path;
/// only `argv[1..]` is passed.
#[derive(Debug, Clone)]
pub struct ProcessInvoker {
    program: PathBuf,
    display_name: String,
}

impl ProcessInvoker {
    /// Creates an invoker for `program`.
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        let program = program.into();
        let display_name = program.display().to_string();
        Self {
            program,
            display_name,
        }
    }

    /// Returns the program path.
    #[must_use]
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }
}

#[async_trait]
impl Invoker for ProcessInvoker {
    async fn invoke(
        &self,
        argv: &ArgumentVector,
        output_tx: mpsc::Sender<InvocationOutput>,
        mut shutdown_rx: watch::Receiver<bool>,
    ) -> Result<InvocationStatus> {
        let mut cmd = Command::new(&self.program);
        cmd.args(argv.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // The child must not outlive the form, even when the form is killed.
        #[cfg(target_os = "linux")]
        unsafe {
            cmd.pre_exec(|| {
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGKILL) == -1 {
                    return Err(std::io::Error::last_os_error());
                }
                Ok(())
            });
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to spawn {}", self.display_name))?;
        let stdout = child.stdout.take().context("Failed to capture stdout")?;
        let stderr = child.stderr.take().context("Failed to capture stderr")?;

        let tx_stdout = output_tx.clone();
        let stdout_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx_stdout.send(InvocationOutput::Stdout(line)).await;
            }
        });
        let tx_stderr = output_tx;
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                let _ = tx_stderr.send(InvocationOutput::Stderr(line)).await;
            }
        });

        let status = tokio::select! {
            result = child.wait() => {
                result.with_context(|| format!("Failed to wait for {}", self.display_name))?
            }
            () = wait_for_shutdown(&mut shutdown_rx) => {
                let _ = child.kill().await;
                stdout_handle.abort();
                stderr_handle.abort();
                return Ok(InvocationStatus::Cancelled);
            }
        };

        let _ = stdout_handle.await;
        let _ = stderr_handle.await;

        Ok(InvocationStatus::from_code(status.code()))
    }

    fn name(&self) -> &str {
        &self.display_name
    }
}

/// Resolves once the shutdown flag is `true` or its sender is gone.
async fn wait_for_shutdown(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow() {
            return;
        }
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::args::ArgumentBuilder;
    use clap::{Arg, ArgAction};

    fn argv(tokens: &[&str]) -> ArgumentVector {
        let mut builder = ArgumentBuilder::new();
        builder.extend(tokens.iter().map(|t| (*t).to_string()));
        builder.finish()
    }

    fn drain(mut rx: mpsc::Receiver<InvocationOutput>) -> Vec<InvocationOutput> {
        let mut lines = Vec::new();
        while let Ok(line) = rx.try_recv() {
            lines.push(line);
        }
        lines
    }

    fn greet_invoker() -> ClapInvoker {
        let command = clap::Command::new("greet")
            .version("1.0")
            .arg(Arg::new("name").long("name").default_value("world"))
            .arg(Arg::new("shout").long("shout").action(ArgAction::SetTrue));
        ClapInvoker::new(command, |matches| {
            let name = matches
                .get_one::<String>("name")
                .cloned()
                .unwrap_or_default();
            if name == "nobody" {
                anyhow::bail!("refusing to greet nobody");
            }
            let greeting = format!("hello {name}");
            Ok(if matches.get_flag("shout") {
                greeting.to_uppercase()
            } else {
                greeting
            })
        })
    }

    #[tokio::test]
    async fn echo_prints_quoted_vector() -> Result<()> {
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = EchoInvoker
            .invoke(&argv(&["tool", "--name", "a b"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Success);
        assert_eq!(
            drain(rx),
            vec![InvocationOutput::Stdout("tool --name 'a b'".into())]
        );
        Ok(())
    }

    #[tokio::test]
    async fn clap_invoker_runs_handler() -> Result<()> {
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = greet_invoker()
            .invoke(&argv(&["greet", "--name", "bob", "--shout"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Success);
        assert_eq!(drain(rx), vec![InvocationOutput::Stdout("HELLO BOB".into())]);
        Ok(())
    }

    #[tokio::test]
    async fn clap_invoker_reports_usage_errors_without_exiting() -> Result<()> {
        let (tx, rx) = mpsc::channel(64);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = greet_invoker()
            .invoke(&argv(&["greet", "--bogus"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Failed(Some(2)));
        let lines = drain(rx);
        assert!(!lines.is_empty());
        assert!(
            lines
                .iter()
                .all(|line| matches!(line, InvocationOutput::Stderr(_)))
        );
        Ok(())
    }

    #[tokio::test]
    async fn clap_invoker_treats_version_as_success() -> Result<()> {
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = greet_invoker()
            .invoke(&argv(&["greet", "--version"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Success);
        assert_eq!(drain(rx), vec![InvocationOutput::Stdout("greet 1.0".into())]);
        Ok(())
    }

    #[tokio::test]
    async fn clap_invoker_reports_handler_errors() -> Result<()> {
        let (tx, rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = greet_invoker()
            .invoke(&argv(&["greet", "--name", "nobody"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Failed(Some(1)));
        assert_eq!(
            drain(rx),
            vec![InvocationOutput::Stderr("refusing to greet nobody".into())]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_invoker_streams_output_and_exit_code() -> Result<()> {
        let (tx, rx) = mpsc::channel(64);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let status = ProcessInvoker::new("sh")
            .invoke(
                &argv(&["ignored", "-c", "echo out; echo err >&2; exit 3"]),
                tx,
                shutdown_rx,
            )
            .await?;

        assert_eq!(status, InvocationStatus::Failed(Some(3)));
        let lines = drain(rx);
        assert!(lines.contains(&InvocationOutput::Stdout("out".into())));
        assert!(lines.contains(&InvocationOutput::Stderr("err".into())));
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn process_invoker_is_cancelled_by_shutdown() -> Result<()> {
        let (tx, _rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(true);

        let status = ProcessInvoker::new("sh")
            .invoke(&argv(&["ignored", "-c", "sleep 5"]), tx, shutdown_rx)
            .await?;

        assert_eq!(status, InvocationStatus::Cancelled);
        Ok(())
    }

    #[tokio::test]
    async fn process_invoker_fails_for_missing_program() {
        let (tx, _rx) = mpsc::channel(8);
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);

        let result = ProcessInvoker::new("/nonexistent/argform-test-program")
            .invoke(&argv(&["x"]), tx, shutdown_rx)
            .await;

        assert!(result.is_err());
    }
}
