//! Command-line front-end.
//!
//! The CLI is the presentation layer for the update state machine: it renders
//! each published snapshot and forwards one signal, "primary action", back to
//! the coordinator.
//!
//! # Commands
//!
//! - `run` (default): interactive loop; Enter performs the shown action, `q` quits
//! - `status`: evaluate once and print the resulting state
//! - `paths`: print where the client and its version record live
//!
//! # Global Options
//!
//! Every setting has an environment variable fallback:
//!
//! ```bash
//! jarlaunch --base-dir ~/games/woodlanders status
//! JARLAUNCH_JAVA=/opt/jdk-21/bin/java jarlaunch
//! jarlaunch --feed-url http://localhost:8080/latest status --json
//! ```

mod common;
mod paths;
mod run;
mod status;

use crate::config::{LauncherConfig, expand_path};
use crate::constants::{DEFAULT_ASSET_NAME, DEFAULT_FEED_URL, DEFAULT_JAVA_COMMAND};
use anyhow::Result;
use clap::{Parser, Subcommand};
use reqwest::Url;
use tracing_subscriber::EnvFilter;

pub use common::CliContext;

/// Keeps the Woodlanders client up to date and starts it.
#[derive(Parser, Debug)]
#[command(
    name = "jarlaunch",
    about = "Keep the Woodlanders client up to date and launch it",
    version,
    long_about = "jarlaunch checks the Woodlanders release feed, downloads and verifies new client builds, and starts the cached client with the local Java runtime."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Show debug output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only show errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Release feed returning the latest release document
    #[arg(long, global = true, env = "JARLAUNCH_FEED_URL", default_value = DEFAULT_FEED_URL)]
    feed_url: Url,

    /// Release asset to install
    #[arg(long, global = true, env = "JARLAUNCH_ASSET_NAME", default_value = DEFAULT_ASSET_NAME)]
    asset_name: String,

    /// Directory holding the client and its version record
    #[arg(long, global = true, env = "JARLAUNCH_HOME")]
    base_dir: Option<String>,

    /// Java runtime used to start the client
    #[arg(long, global = true, env = "JARLAUNCH_JAVA", default_value = DEFAULT_JAVA_COMMAND)]
    java: String,

    /// Disable spinners
    #[arg(long, global = true)]
    no_progress: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check for updates, then download or launch interactively (default)
    Run(run::RunCommand),

    /// Check once and print the resulting state
    Status(status::StatusCommand),

    /// Print the launcher's file locations
    Paths(paths::PathsCommand),
}

impl Cli {
    /// Run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_level());
        let context = self.build_context();

        match self.command {
            None => run::RunCommand::default().execute(&context).await,
            Some(Commands::Run(cmd)) => cmd.execute(&context).await,
            Some(Commands::Status(cmd)) => cmd.execute(&context).await,
            Some(Commands::Paths(cmd)) => cmd.execute(&context),
        }
    }

    fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }

    /// Collect parsed flags into the settings the commands share.
    pub fn build_context(&self) -> CliContext {
        CliContext {
            config: LauncherConfig {
                feed_url: self.feed_url.clone(),
                asset_name: self.asset_name.clone(),
                base_dir: self.base_dir.as_deref().map(expand_path),
                java: self.java.clone(),
            },
            show_progress: !self.no_progress && !self.quiet,
        }
    }
}

/// Install the stderr log subscriber. `RUST_LOG` overrides `level`.
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jarlaunch={level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
