//! Keeping the cached client current.
//!
//! This module contains everything between "is there a newer client?" and
//! "the newer client is installed":
//!
//! - [`release`]: resolve the latest release from the feed
//! - [`download`]: stream, verify and install a release asset
//! - [`verification`]: SHA-256 hashing
//! - [`version_store`]: the persisted record of what is installed
//! - [`state`]: update states and view-model snapshots
//! - [`coordinator`]: the state machine and its background worker
//!
//! # Install sequence
//!
//! 1. The asset streams into a staging file in the launcher directory.
//! 2. Size and digest are checked against what the release advertises.
//! 3. The staging file is renamed onto the artifact path.
//! 4. The version record is rewritten.
//!
//! An interruption between steps 3 and 4 leaves a new artifact with a stale
//! record; the next evaluation then reports the install as out of date and
//! offers the update again.

pub mod coordinator;
pub mod download;
pub mod release;
pub mod state;
pub mod verification;
pub mod version_store;

pub use coordinator::{Services, UpdateCoordinator, evaluate};
pub use download::{ArtifactDownloader, ArtifactInstaller, DownloadOutcome};
pub use release::{GithubReleaseResolver, ReleaseInfo, ReleaseSource};
pub use state::{UpdateState, ViewModel};
pub use version_store::{VersionMetadata, VersionStore};

use crate::constants::{CONNECT_TIMEOUT, user_agent};
use crate::core::{LauncherError, Result};
use reqwest::Client;

/// HTTP client shared by the resolver and the downloader.
///
/// Sends the launcher's user agent, follows redirects (release assets are
/// served from a CDN behind a redirect) and bounds connection setup. Per
/// request timeouts are applied by the callers.
///
/// # Errors
///
/// Fails only if the TLS backend cannot be initialised.
pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(user_agent())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| LauncherError::network("building the HTTP client", e))
}
