//! The update state machine.
//!
//! [`UpdateCoordinator`] owns the published [`ViewModel`] and a single
//! background worker. The worker consumes [`Job`]s strictly one at a time in
//! submission order, so release checks, downloads and launches never overlap
//! on the artifact or its version record.
//!
//! # Publication
//!
//! Snapshots are published through a `tokio::sync::watch` channel holding an
//! `Arc<ViewModel>`: readers always see the latest complete snapshot and are
//! woken when it changes. The foreground publishes the transient state for an
//! action (`Checking`, `Updating`, `Launching`) before queueing the job; the
//! worker publishes the job's outcome.
//!
//! # Transition table
//!
//! | Current state                | Primary action                      |
//! |------------------------------|-------------------------------------|
//! | `ReadyToLaunch`, `OfflineReady` | launch the installed client      |
//! | `NeedsUpdate`                | download the known release          |
//! | `Blocked`, `Error`           | re-run the evaluation               |
//! | `Checking`, `Updating`, `Launching` | ignored                      |
//!
//! # Examples
//!
//! ```rust,no_run
//! use jarlaunch::update::coordinator::UpdateCoordinator;
//! # use jarlaunch::update::coordinator::Services;
//! # async fn example(services: Services<
//! #     jarlaunch::update::release::GithubReleaseResolver,
//! #     jarlaunch::update::download::ArtifactDownloader,
//! #     jarlaunch::process::ProcessSupervisor,
//! # >) {
//! let (coordinator, mut updates) = UpdateCoordinator::spawn(services);
//! while updates.changed().await.is_ok() {
//!     let view = updates.borrow_and_update().clone();
//!     println!("{}: {}", view.state, view.message);
//!     if !view.state.is_transient() {
//!         break;
//!     }
//! }
//! coordinator.primary_action();
//! # }
//! ```

use crate::core::LauncherError;
use crate::process::Launcher;
use crate::update::download::ArtifactInstaller;
use crate::update::release::{ReleaseInfo, ReleaseSource};
use crate::update::state::{UpdateState, VERSION_CACHED, VERSION_MISSING, ViewModel};
use crate::update::version_store::{VersionMetadata, VersionStore};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Collaborators the worker drives.
pub struct Services<R, I, L> {
    pub releases: R,
    pub installer: I,
    pub launcher: L,
    pub store: VersionStore,
    pub artifact_path: PathBuf,
}

/// Work queued for the background worker.
#[derive(Debug, Clone)]
enum Job {
    Evaluate,
    Download(ReleaseInfo),
    Launch,
}

type KnownRelease = Arc<Mutex<Option<ReleaseInfo>>>;

/// Handle to the running state machine.
///
/// Dropping every handle closes the job queue; the worker exits once the job
/// in flight (if any) finishes.
#[derive(Clone)]
pub struct UpdateCoordinator {
    jobs: mpsc::UnboundedSender<Job>,
    view: Arc<watch::Sender<Arc<ViewModel>>>,
    known_release: KnownRelease,
}

impl UpdateCoordinator {
    /// Start the worker, publish `Checking` and queue the first evaluation.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R, I, L>(services: Services<R, I, L>) -> (Self, watch::Receiver<Arc<ViewModel>>)
    where
        R: ReleaseSource,
        I: ArtifactInstaller,
        L: Launcher,
    {
        let (view, receiver) = watch::channel(Arc::new(ViewModel::checking()));
        let view = Arc::new(view);
        let (jobs, queue) = mpsc::unbounded_channel();
        let known_release = KnownRelease::default();

        tokio::spawn(run_worker(
            Arc::new(services),
            queue,
            Arc::clone(&view),
            Arc::clone(&known_release),
        ));

        let coordinator = Self {
            jobs,
            view,
            known_release,
        };
        coordinator.dispatch(Job::Evaluate);
        (coordinator, receiver)
    }

    /// Latest published snapshot.
    pub fn current(&self) -> Arc<ViewModel> {
        Arc::clone(&self.view.borrow())
    }

    /// Another receiver for snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<Arc<ViewModel>> {
        self.view.subscribe()
    }

    /// Publish `Checking` and queue a fresh evaluation.
    ///
    /// Ignored while a job is in flight, so a running download or launch
    /// keeps its transient state until it completes.
    pub fn refresh(&self) {
        let accepted = self.view.send_if_modified(|current| {
            if current.state.is_transient() {
                debug!("Ignoring refresh while {}", current.state);
                return false;
            }
            *current = Arc::new(ViewModel::checking());
            true
        });

        if accepted {
            self.dispatch(Job::Evaluate);
        }
    }

    /// Perform the single user action for the current state.
    ///
    /// The state check and the transient-state publication happen under the
    /// channel's write lock, so two concurrent calls cannot both dispatch.
    pub fn primary_action(&self) {
        let mut job = None;
        self.view.send_if_modified(|current| {
            let local = current.local_version.clone();
            let remote = current.remote_version.clone();
            let next = match current.state {
                UpdateState::ReadyToLaunch | UpdateState::OfflineReady => {
                    job = Some(Job::Launch);
                    ViewModel::launching(local, remote)
                }
                UpdateState::NeedsUpdate => match self.known_release() {
                    Some(release) => {
                        let next = ViewModel::updating(local, &release.tag);
                        job = Some(Job::Download(release));
                        next
                    }
                    None => {
                        warn!("Download requested but no release is known");
                        ViewModel::error(
                            "Release metadata unavailable. Please retry the check.",
                            local,
                            remote,
                        )
                    }
                },
                UpdateState::Blocked | UpdateState::Error => {
                    job = Some(Job::Evaluate);
                    ViewModel::checking()
                }
                UpdateState::Checking | UpdateState::Updating | UpdateState::Launching => {
                    debug!("Ignoring action while {}", current.state);
                    return false;
                }
            };
            *current = Arc::new(next);
            true
        });

        if let Some(job) = job {
            self.dispatch(job);
        }
    }

    fn known_release(&self) -> Option<ReleaseInfo> {
        self.known_release.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn dispatch(&self, job: Job) {
        if self.jobs.send(job).is_err() {
            error!("Background worker is gone; cannot run job");
            let current = self.current();
            self.view.send_replace(Arc::new(ViewModel::error(
                LauncherError::WorkerUnavailable.to_string(),
                current.local_version.clone(),
                current.remote_version.clone(),
            )));
        }
    }
}

/// Decide the state from what is installed and what the feed offers.
///
/// `local` and `artifact_exists` are independent: a version record without
/// an artifact, or an artifact without a record, are both tolerated.
pub fn evaluate(
    local: Option<&VersionMetadata>,
    artifact_exists: bool,
    latest: Option<&ReleaseInfo>,
) -> ViewModel {
    let Some(release) = latest else {
        if artifact_exists {
            let local = local.map_or(VERSION_CACHED, |meta| meta.version.as_str());
            return ViewModel::offline_ready(local);
        }
        return ViewModel::blocked();
    };

    let remote = release.tag.as_str();
    let local_version = match local {
        Some(meta) => meta.version.as_str(),
        None if artifact_exists => VERSION_CACHED,
        None => VERSION_MISSING,
    };

    let up_to_date = artifact_exists && local.is_some_and(|meta| meta.version == remote);
    if up_to_date {
        ViewModel::ready_to_launch(
            format!("Latest version {remote} is ready."),
            local_version,
            remote,
        )
    } else {
        ViewModel::needs_update(artifact_exists, local_version, remote)
    }
}

async fn run_worker<R, I, L>(
    services: Arc<Services<R, I, L>>,
    mut queue: mpsc::UnboundedReceiver<Job>,
    view: Arc<watch::Sender<Arc<ViewModel>>>,
    known_release: KnownRelease,
) where
    R: ReleaseSource,
    I: ArtifactInstaller,
    L: Launcher,
{
    debug!("Update worker started");
    while let Some(job) = queue.recv().await {
        let before = Arc::clone(&view.borrow());
        debug!("Running {job:?}");

        let task = tokio::spawn(run_job(
            Arc::clone(&services),
            job,
            Arc::clone(&before),
            Arc::clone(&known_release),
        ));

        let next = match task.await {
            Ok(next) => next,
            Err(e) => {
                error!("Background task failed: {e}");
                ViewModel::error(
                    format!("Unexpected failure: {e}"),
                    before.local_version.clone(),
                    before.remote_version.clone(),
                )
            }
        };
        view.send_replace(Arc::new(next));
    }
    debug!("Update worker stopped");
}

async fn run_job<R, I, L>(
    services: Arc<Services<R, I, L>>,
    job: Job,
    before: Arc<ViewModel>,
    known_release: KnownRelease,
) -> ViewModel
where
    R: ReleaseSource,
    I: ArtifactInstaller,
    L: Launcher,
{
    match job {
        Job::Evaluate => {
            let local = services.store.read().await;
            let artifact_exists = tokio::fs::try_exists(&services.artifact_path)
                .await
                .unwrap_or(false);
            let latest = services.releases.fetch_latest().await;

            let next = evaluate(local.as_ref(), artifact_exists, latest.as_ref());
            *known_release.lock().unwrap_or_else(PoisonError::into_inner) = latest;
            info!("State: {} ({})", next.state, next.version_line());
            next
        }
        Job::Download(release) => match install(&services, &release).await {
            Ok(metadata) => ViewModel::ready_to_launch(
                format!("Updated to {}.", release.tag),
                metadata.version,
                release.tag,
            ),
            Err(e) => {
                error!("Download failed: {e}");
                ViewModel::error(
                    format!("Download failed: {e}"),
                    before.local_version.clone(),
                    release.tag,
                )
            }
        },
        Job::Launch => match services.launcher.launch().await {
            Ok(process) => {
                info!("Client running with PID {}", process.pid);
                let local = services
                    .store
                    .read()
                    .await
                    .map_or_else(|| before.local_version.clone(), |meta| meta.version);
                ViewModel::ready_to_launch(
                    "Client launched. Use this window for updates.",
                    local,
                    before.remote_version.clone(),
                )
            }
            Err(e) => {
                error!("Launch failed: {e}");
                ViewModel::error(
                    format!("Launch failed: {e}"),
                    before.local_version.clone(),
                    before.remote_version.clone(),
                )
            }
        },
    }
}

/// Download, then record the new install. The artifact is in place before
/// the record is written.
async fn install<R, I, L>(
    services: &Services<R, I, L>,
    release: &ReleaseInfo,
) -> crate::core::Result<VersionMetadata>
where
    I: ArtifactInstaller,
{
    let outcome = services.installer.install(release).await?;
    let metadata = VersionMetadata {
        version: release.tag.clone(),
        sha256: outcome.sha256,
        downloaded_at: Utc::now(),
        asset_size: outcome.size,
    };
    services.store.write(&metadata).await?;
    Ok(metadata)
}
