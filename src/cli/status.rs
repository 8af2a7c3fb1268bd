use super::common::{CliContext, state_badge};
use crate::update::UpdateCoordinator;
use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;

/// Evaluate once and print the resulting state.
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Print the snapshot as JSON
    #[arg(long)]
    json: bool,
}

impl StatusCommand {
    pub async fn execute(self, context: &CliContext) -> Result<()> {
        let services = context.services()?;
        let (_coordinator, mut updates) = UpdateCoordinator::spawn(services);

        let view = updates
            .wait_for(|view| !view.state.is_transient())
            .await
            .map(|view| Arc::clone(&view))
            .context("Update worker stopped before finishing the check")?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(view.as_ref())?);
        } else {
            println!("{} {}", state_badge(&view), view.message);
            println!("{}", view.version_line());
        }
        Ok(())
    }
}
