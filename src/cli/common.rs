use crate::config::{LauncherConfig, LauncherPaths};
use crate::process::{ProcessEnv, ProcessSupervisor};
use crate::update::{
    ArtifactDownloader, GithubReleaseResolver, Services, VersionStore, ViewModel, http_client,
};
use crate::utils::platform::{PlatformProfile, platform_profile};
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct CliContext {
    pub config: LauncherConfig,
    pub show_progress: bool,
}

/// Production collaborators for the coordinator.
pub type LauncherServices = Services<GithubReleaseResolver, ArtifactDownloader, ProcessSupervisor>;

impl CliContext {
    pub fn profile(&self) -> PlatformProfile {
        platform_profile()
    }

    pub fn paths(&self) -> Result<LauncherPaths> {
        LauncherPaths::resolve(&self.config, &self.profile())
            .context("Failed to determine the launcher directory")
    }

    /// Wire the resolver, downloader and supervisor to the configured paths.
    pub fn services(&self) -> Result<LauncherServices> {
        let profile = self.profile();
        let paths = self.paths()?;
        let client = http_client().context("Failed to initialise HTTP client")?;

        Ok(Services {
            releases: GithubReleaseResolver::new(
                client.clone(),
                self.config.feed_url.clone(),
                paths.asset_name(),
            ),
            installer: ArtifactDownloader::new(client, paths.clone()),
            launcher: ProcessSupervisor::new(
                paths.clone(),
                profile,
                ProcessEnv::from_current(),
                self.config.java.clone(),
            ),
            store: VersionStore::new(paths.metadata_path()),
            artifact_path: paths.artifact_path(),
        })
    }
}

/// State tag colored by severity.
pub fn state_badge(view: &ViewModel) -> ColoredString {
    use crate::update::UpdateState;

    let tag = format!("[{}]", view.state);
    match view.state {
        UpdateState::ReadyToLaunch => tag.green().bold(),
        UpdateState::NeedsUpdate | UpdateState::OfflineReady => tag.yellow().bold(),
        UpdateState::Blocked | UpdateState::Error => tag.red().bold(),
        UpdateState::Checking | UpdateState::Updating | UpdateState::Launching => tag.cyan(),
    }
}
