use crate::config::LauncherPaths;
use crate::update::verification::Sha256Hasher;
use crate::update::{Services, VersionMetadata, VersionStore};
use chrono::Utc;
use tempfile::TempDir;

/// A throwaway launcher directory.
///
/// The directory is deleted when the environment is dropped.
pub struct TestEnvironment {
    _temp: TempDir,
    paths: LauncherPaths,
}

impl Default for TestEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TestEnvironment {
    /// # Panics
    ///
    /// Panics if a temporary directory cannot be created.
    pub fn new() -> Self {
        Self::with_asset_name(crate::constants::DEFAULT_ASSET_NAME)
    }

    /// # Panics
    ///
    /// Panics if a temporary directory cannot be created.
    pub fn with_asset_name(asset_name: &str) -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let paths = LauncherPaths::new(temp.path().join("woodlanders"), asset_name);
        Self { _temp: temp, paths }
    }

    pub fn paths(&self) -> LauncherPaths {
        self.paths.clone()
    }

    pub fn store(&self) -> VersionStore {
        VersionStore::new(self.paths.metadata_path())
    }

    /// Wire collaborators to this directory.
    pub fn services<R, I, L>(&self, releases: R, installer: I, launcher: L) -> Services<R, I, L> {
        Services {
            releases,
            installer,
            launcher,
            store: self.store(),
            artifact_path: self.paths.artifact_path(),
        }
    }

    /// # Panics
    ///
    /// Panics if the artifact cannot be written.
    pub fn write_artifact(&self, content: &[u8]) {
        std::fs::create_dir_all(self.paths.base_dir()).expect("create base dir");
        std::fs::write(self.paths.artifact_path(), content).expect("write artifact");
    }

    /// Install `content` as `version`, with a matching version record.
    ///
    /// # Panics
    ///
    /// Panics if either file cannot be written.
    pub async fn install(&self, version: &str, content: &[u8]) -> VersionMetadata {
        self.write_artifact(content);
        let metadata = VersionMetadata {
            version: version.to_string(),
            sha256: Sha256Hasher::digest_bytes(content),
            downloaded_at: Utc::now(),
            asset_size: content.len() as u64,
        };
        self.store().write(&metadata).await.expect("write metadata");
        metadata
    }

    /// # Panics
    ///
    /// Panics if the artifact cannot be read.
    pub fn artifact_content(&self) -> Vec<u8> {
        std::fs::read(self.paths.artifact_path()).expect("read artifact")
    }

    /// Files left in the base directory with a `.tmp` extension.
    pub fn staging_files(&self) -> Vec<std::path::PathBuf> {
        let Ok(entries) = std::fs::read_dir(self.paths.base_dir()) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "tmp"))
            .collect()
    }
}
