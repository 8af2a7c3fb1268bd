//! Interactive launcher loop.

use super::common::{CliContext, state_badge};
use crate::update::{UpdateCoordinator, ViewModel};
use crate::utils::progress::Spinner;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::io::BufRead;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// Check for updates, then download or launch on demand.
#[derive(Args, Debug, Default)]
pub struct RunCommand {}

/// One line of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Action,
    Quit,
    Unknown,
}

fn parse_input(line: &str) -> Input {
    match line.trim().to_ascii_lowercase().as_str() {
        "" | "y" | "yes" => Input::Action,
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Unknown,
    }
}

impl RunCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let services = context.services()?;
        let (coordinator, mut updates) = UpdateCoordinator::spawn(services);
        let mut input = spawn_stdin_reader();
        let mut input_open = true;
        let mut spinner: Option<Spinner> = None;

        let mut view = Arc::clone(&updates.borrow_and_update());
        render(&view, &mut spinner, context.show_progress);

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    view = Arc::clone(&updates.borrow_and_update());
                    render(&view, &mut spinner, context.show_progress);
                    if !input_open && !view.state.is_transient() {
                        break;
                    }
                }
                line = input.recv(), if input_open => match line.as_deref().map(parse_input) {
                    Some(Input::Action) if view.action_enabled => coordinator.primary_action(),
                    Some(Input::Action) => debug!("Ignoring input while {}", view.state),
                    Some(Input::Quit) => break,
                    Some(Input::Unknown) => {
                        println!("Press Enter to continue or q to quit.");
                    }
                    None => {
                        input_open = false;
                        if !view.state.is_transient() {
                            break;
                        }
                    }
                },
            }
        }

        if let Some(spinner) = spinner.take() {
            spinner.finish();
        }
        Ok(())
    }
}

/// Read stdin lines on a plain thread so a pending read never holds up exit.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<String> {
    let (sender, receiver) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if sender.send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

fn render(view: &ViewModel, spinner: &mut Option<Spinner>, show_progress: bool) {
    if view.state.is_transient() {
        match spinner {
            Some(active) => active.set_message(view.message.clone()),
            None => {
                let started = Spinner::start(show_progress, view.message.clone());
                if started.is_hidden() {
                    println!("{} {}", state_badge(view), view.message);
                }
                *spinner = Some(started);
            }
        }
        return;
    }

    if let Some(active) = spinner.take() {
        active.finish();
    }

    println!("{} {}", state_badge(view), view.message);
    println!("    {}", view.version_line().dimmed());
    println!(
        "    Press Enter to {} or q to quit.",
        format!("\"{}\"", view.action_label).bold()
    );
}
