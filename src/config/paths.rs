use crate::constants::METADATA_FILE_NAME;
use crate::core::{LauncherError, Result};
use crate::utils::platform::PlatformProfile;
use std::path::{Path, PathBuf};

use super::LauncherConfig;

/// Filesystem layout of the launcher's single working directory.
///
/// The installed artifact, its version record and in-flight download staging
/// files all live directly in `base_dir`, so staging and install share a
/// filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherPaths {
    base_dir: PathBuf,
    asset_name: String,
}

impl LauncherPaths {
    pub fn new(base_dir: impl Into<PathBuf>, asset_name: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            asset_name: asset_name.into(),
        }
    }

    /// Resolve the layout for a configuration, using the platform default
    /// directory when none was configured.
    ///
    /// # Errors
    ///
    /// Returns [`LauncherError::BaseDirUnavailable`] when no directory was
    /// configured and the platform default cannot be determined.
    pub fn resolve(config: &LauncherConfig, profile: &PlatformProfile) -> Result<Self> {
        let base_dir = match &config.base_dir {
            Some(dir) => dir.clone(),
            None => profile.default_base_dir().ok_or(LauncherError::BaseDirUnavailable)?,
        };
        Ok(Self::new(base_dir, config.asset_name.clone()))
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    /// Where the installed client lives.
    pub fn artifact_path(&self) -> PathBuf {
        self.base_dir.join(&self.asset_name)
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.base_dir.join(METADATA_FILE_NAME)
    }
}
