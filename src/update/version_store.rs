//! Persisted record of the installed client.
//!
//! The record is a small JSON document next to the artifact:
//!
//! ```json
//! {
//!   "version": "v1.4.2",
//!   "sha256": "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08",
//!   "downloaded_at": "2025-03-01T12:00:00Z",
//!   "asset_size": 1048576
//! }
//! ```
//!
//! It is rewritten only after a verified download has been moved into place.
//! A missing or unreadable record means "installed version unknown", never an
//! error, so the update state can always be evaluated.

use crate::core::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, warn};

/// What is currently installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMetadata {
    /// Release tag the artifact was downloaded from
    pub version: String,
    /// Lowercase hex SHA-256 of the installed artifact
    pub sha256: String,
    /// When the download completed
    pub downloaded_at: DateTime<Utc>,
    /// Size of the installed artifact in bytes
    pub asset_size: u64,
}

/// Reads and writes [`VersionMetadata`] at a fixed path.
#[derive(Debug, Clone)]
pub struct VersionStore {
    path: PathBuf,
}

impl VersionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the record, treating every failure as "nothing installed".
    ///
    /// A missing file is silent; an unreadable or malformed file is logged.
    pub async fn read(&self) -> Option<VersionMetadata> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No version metadata at {}", self.path.display());
                return None;
            }
            Err(e) => {
                warn!("Failed to read version metadata {}: {e}", self.path.display());
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(
                    "Ignoring malformed version metadata {}: {e}",
                    self.path.display()
                );
                None
            }
        }
    }

    /// Overwrite the record, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the file cannot be written.
    pub async fn write(&self, metadata: &VersionMetadata) -> Result<()> {
        let content = serde_json::to_string_pretty(metadata)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        fs::write(&self.path, content).await?;
        debug!("Wrote version metadata for {} to {}", metadata.version, self.path.display());
        Ok(())
    }
}
