use super::common::CliContext;
use anyhow::Result;
use clap::Args;
use colored::Colorize;

/// Print the launcher's file locations.
#[derive(Args, Debug)]
pub struct PathsCommand {}

impl PathsCommand {
    pub fn execute(self, context: &CliContext) -> Result<()> {
        let paths = context.paths()?;
        println!("{:<10} {}", "base".bold(), paths.base_dir().display());
        println!("{:<10} {}", "client".bold(), paths.artifact_path().display());
        println!("{:<10} {}", "metadata".bold(), paths.metadata_path().display());
        Ok(())
    }
}
