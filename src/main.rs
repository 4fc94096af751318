//! `argform` - terminal form for a declared command
//!
//! Entry point for the application.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::crossterm::event::{self, Event, KeyEventKind};

use argform::cli::Args;
use argform::core::{EchoInvoker, Invoker, ProcessInvoker};
use argform::form::Form;
use argform::fs::load_declaration;
use argform::logging::{init_logging, log_file_path};
use argform::tui::TerminalEventGuard;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(path) = log_file_path(args.log_file.as_deref()) {
        init_logging(&path)?;
    }

    // Declaration errors are reported before the terminal is taken over.
    let declaration = load_declaration(&args.declaration)?;
    let config = args.apply_to(declaration.form);

    let invoker: Arc<dyn Invoker> = if args.dry_run {
        Arc::new(EchoInvoker)
    } else {
        let program = args
            .program
            .clone()
            .unwrap_or_else(|| PathBuf::from(&declaration.command.name));
        Arc::new(ProcessInvoker::new(program))
    };
    let mut form = Form::new(&declaration.command, invoker, config);

    let mut terminal = ratatui::init();
    let result = run_form(&mut terminal, &mut form);
    ratatui::restore();

    // Stop a child that is still running.
    form.trigger_shutdown();
    tracing::info!("form closed");

    result?;
    Ok(())
}

fn run_form(terminal: &mut ratatui::DefaultTerminal, form: &mut Form) -> std::io::Result<()> {
    // Must come after ratatui::init, which resets terminal flags.
    let _event_guard = TerminalEventGuard::new();

    loop {
        // Layout is computed from the same area the frame renders into.
        terminal.draw(|frame| {
            form.update_layout(frame.area());
            form.render(frame);
        })?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => form.handle_key(key),
                Event::Paste(text) => form.handle_paste(&text),
                _ => {}
            }
        }

        form.process_events();

        if form.should_quit() {
            break;
        }
    }

    Ok(())
}
