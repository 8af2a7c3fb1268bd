//! In-memory stand-ins for the coordinator's collaborators.

use crate::config::LauncherPaths;
use crate::core::{LauncherError, Result};
use crate::process::{LaunchedProcess, Launcher};
use crate::update::verification::Sha256Hasher;
use crate::update::{ArtifactInstaller, DownloadOutcome, ReleaseInfo, ReleaseSource};
use reqwest::Url;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::Semaphore;

/// A release with the given tag pointing at a placeholder URL.
///
/// # Panics
///
/// Never in practice; the URL is a literal.
pub fn release(tag: &str) -> ReleaseInfo {
    ReleaseInfo {
        tag: tag.to_string(),
        download_url: Url::parse(&format!("https://example.com/{tag}/woodlanders-client.jar"))
            .expect("valid url"),
        asset_size: 0,
        checksum_url: None,
    }
}

/// Release source returning a configurable answer and counting calls.
#[derive(Clone, Default)]
pub struct FakeReleaseSource {
    release: Arc<Mutex<Option<ReleaseInfo>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeReleaseSource {
    /// A feed that is unreachable.
    pub fn offline() -> Self {
        Self::default()
    }

    pub fn with_release(release: ReleaseInfo) -> Self {
        let source = Self::default();
        source.set(Some(release));
        source
    }

    /// Change what later calls return.
    pub fn set(&self, release: Option<ReleaseInfo>) {
        *self.release.lock().unwrap_or_else(PoisonError::into_inner) = release;
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReleaseSource for FakeReleaseSource {
    fn fetch_latest(&self) -> impl Future<Output = Option<ReleaseInfo>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let release = self.release.lock().unwrap_or_else(PoisonError::into_inner).clone();
        async move { release }
    }
}

/// Installer that writes fixed bytes to the artifact path, or fails.
#[derive(Clone)]
pub struct FakeInstaller {
    paths: LauncherPaths,
    content: Vec<u8>,
    failure: Option<String>,
    gate: Option<Arc<Semaphore>>,
    calls: Arc<AtomicUsize>,
}

impl FakeInstaller {
    pub fn succeeding(paths: LauncherPaths, content: Vec<u8>) -> Self {
        Self {
            paths,
            content,
            failure: None,
            gate: None,
            calls: Arc::default(),
        }
    }

    pub fn failing(paths: LauncherPaths, reason: &str) -> Self {
        Self {
            failure: Some(reason.to_string()),
            ..Self::succeeding(paths, Vec::new())
        }
    }

    /// Block each install until a permit is added to the returned semaphore.
    #[must_use]
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn run(&self) -> Result<DownloadOutcome> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.map_err(|_| LauncherError::WorkerUnavailable)?.forget();
        }
        if let Some(reason) = &self.failure {
            return Err(LauncherError::Io(std::io::Error::other(reason.clone())));
        }

        tokio::fs::create_dir_all(self.paths.base_dir()).await?;
        let file_path = self.paths.artifact_path();
        tokio::fs::write(&file_path, &self.content).await?;
        Ok(DownloadOutcome {
            file_path,
            sha256: Sha256Hasher::digest_bytes(&self.content),
            size: self.content.len() as u64,
        })
    }
}

impl ArtifactInstaller for FakeInstaller {
    fn install(&self, _release: &ReleaseInfo) -> impl Future<Output = Result<DownloadOutcome>> + Send {
        self.run()
    }
}

/// Launcher that starts a short-lived no-op process, or fails.
#[derive(Clone, Default)]
pub struct FakeLauncher {
    fail: bool,
    gate: Option<Arc<Semaphore>>,
    calls: Arc<AtomicUsize>,
}

impl FakeLauncher {
    pub fn succeeding() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Block each launch until a permit is added to the returned semaphore.
    #[must_use]
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(Arc::clone(&gate));
        (self, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn run(&self) -> Result<LaunchedProcess> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.acquire().await.map_err(|_| LauncherError::WorkerUnavailable)?.forget();
        }
        self.start()
    }

    fn start(&self) -> Result<LaunchedProcess> {
        if self.fail {
            return Err(LauncherError::ArtifactNotFound {
                path: "woodlanders-client.jar".into(),
            });
        }

        let mut command = if cfg!(windows) {
            let mut command = std::process::Command::new("cmd");
            command.args(["/C", "exit", "0"]);
            command
        } else {
            std::process::Command::new("true")
        };
        let child = command.spawn().map_err(|source| LauncherError::Spawn {
            command: command.get_program().to_string_lossy().into_owned(),
            source,
        })?;
        Ok(LaunchedProcess::from(child))
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self) -> impl Future<Output = Result<LaunchedProcess>> + Send {
        self.run()
    }
}
