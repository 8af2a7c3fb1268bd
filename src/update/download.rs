//! Integrity-checked download and installation of the client artifact.
//!
//! A download streams into a `<asset>-*.tmp` file inside the base directory
//! while the bytes are hashed. The staged file is only moved onto the
//! artifact path once the size and expected digest (when one is known) have
//! been verified, so a failed or corrupt download never replaces a working
//! install. Whatever happens, the staging file is removed.

use crate::config::LauncherPaths;
use crate::constants::DOWNLOAD_TIMEOUT;
use crate::core::{LauncherError, Result};
use crate::update::release::ReleaseInfo;
use crate::update::verification::{IncrementalDigest, Sha256Hasher};
use crate::utils::fs::{InstallMethod, discard_staged_file, install_staged_file_blocking};
use futures::StreamExt;
use reqwest::{Client, Url};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Result of a completed install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Installed artifact location
    pub file_path: PathBuf,
    /// Digest recomputed from the installed file
    pub sha256: String,
    /// Size of the installed file
    pub size: u64,
}

/// Something that can fetch a release and put it in place.
pub trait ArtifactInstaller: Send + Sync + 'static {
    fn install(&self, release: &ReleaseInfo) -> impl Future<Output = Result<DownloadOutcome>> + Send;
}

/// Downloads release assets over HTTP into the launcher directory.
pub struct ArtifactDownloader {
    client: Client,
    paths: LauncherPaths,
    timeout: Duration,
    expected_sha256: Option<String>,
}

impl ArtifactDownloader {
    pub fn new(client: Client, paths: LauncherPaths) -> Self {
        Self {
            client,
            paths,
            timeout: DOWNLOAD_TIMEOUT,
            expected_sha256: None,
        }
    }

    /// Overall limit for streaming one asset.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Require this digest instead of consulting the release's checksum file.
    #[must_use]
    pub fn with_expected_sha256(mut self, expected: Option<String>) -> Self {
        self.expected_sha256 = expected;
        self
    }

    /// Download, verify and install `release`.
    ///
    /// # Errors
    ///
    /// Fails on transport errors, non-success statuses, timeouts, size or
    /// checksum mismatches, and filesystem errors. On failure the previously
    /// installed artifact is left in place.
    pub async fn download(&self, release: &ReleaseInfo) -> Result<DownloadOutcome> {
        let base_dir = self.paths.base_dir();
        tokio::fs::create_dir_all(base_dir).await?;

        let (file, staged) = tempfile::Builder::new()
            .prefix(&format!("{}-", self.paths.asset_name()))
            .suffix(".tmp")
            .tempfile_in(base_dir)?
            .into_parts();
        debug!("Staging {} in {}", release.download_url, staged.display());

        match self.stage_and_install(release, tokio::fs::File::from_std(file), staged).await {
            Ok(outcome) => {
                info!(
                    "Installed {} ({} bytes, sha256 {})",
                    release.tag, outcome.size, outcome.sha256
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!("Download of {} failed: {e}", release.tag);
                Err(e)
            }
        }
    }

    async fn stage_and_install(
        &self,
        release: &ReleaseInfo,
        file: tokio::fs::File,
        staged: TempPath,
    ) -> Result<DownloadOutcome> {
        let verified = match self.stream_and_verify(release, file).await {
            Ok(streamed) => streamed,
            Err(e) => {
                discard_staged_file(staged);
                return Err(e);
            }
        };

        let target = self.paths.artifact_path();
        let method = install_staged_file_blocking(staged, target.clone()).await?;
        if method == InstallMethod::Copy {
            warn!("Installed {} with a non-atomic copy", target.display());
        }

        let sha256 = Sha256Hasher::digest_file(&target).await?;
        let size = tokio::fs::metadata(&target).await?.len();
        debug!("Streamed digest {verified}, installed digest {sha256}");

        Ok(DownloadOutcome {
            file_path: target,
            sha256,
            size,
        })
    }

    /// Stream the asset into `file`, then check size and digest.
    ///
    /// Returns the digest of the streamed bytes.
    async fn stream_and_verify(&self, release: &ReleaseInfo, mut file: tokio::fs::File) -> Result<String> {
        let url = release.download_url.as_str().to_string();
        let digest = tokio::time::timeout(self.timeout, self.stream_to(&release.download_url, &mut file))
            .await
            .map_err(|_| LauncherError::Timeout {
                url,
                seconds: self.timeout.as_secs(),
            })??;
        drop(file);

        let received = digest.bytes();
        if release.asset_size > 0 && received != release.asset_size {
            return Err(LauncherError::SizeMismatch {
                expected: release.asset_size,
                actual: received,
            });
        }

        let actual = digest.finish();
        if let Some(expected) = self.expected_digest(release).await? {
            Sha256Hasher::verify(&actual, &expected)?;
        }
        Ok(actual)
    }

    async fn stream_to(&self, url: &Url, file: &mut tokio::fs::File) -> Result<IncrementalDigest> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| LauncherError::network("requesting the client download", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LauncherError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut digest = IncrementalDigest::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| LauncherError::network("downloading the client", e))?;
            digest.update(&chunk);
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        file.sync_all().await?;
        Ok(digest)
    }

    /// Injected digest first, else the first token of the release's checksum
    /// file. An unavailable checksum file skips verification.
    async fn expected_digest(&self, release: &ReleaseInfo) -> Result<Option<String>> {
        if let Some(expected) = &self.expected_sha256 {
            return Ok(Some(expected.clone()));
        }
        let Some(checksum_url) = &release.checksum_url else {
            return Ok(None);
        };

        debug!("Fetching checksum from {checksum_url}");
        let response = self
            .client
            .get(checksum_url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LauncherError::network("fetching the release checksum", e))?;

        if !response.status().is_success() {
            warn!(
                "Checksum file {checksum_url} returned HTTP {}; skipping verification",
                response.status()
            );
            return Ok(None);
        }

        let content = response
            .text()
            .await
            .map_err(|e| LauncherError::network("reading the release checksum", e))?;
        Ok(content.split_whitespace().next().map(str::to_lowercase))
    }
}

impl ArtifactInstaller for ArtifactDownloader {
    fn install(&self, release: &ReleaseInfo) -> impl Future<Output = Result<DownloadOutcome>> + Send {
        self.download(release)
    }
}
