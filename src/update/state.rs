//! Update states and the view-model snapshots published for them.

use crate::constants::PRODUCT_NAME;
use serde::Serialize;
use std::fmt;

/// Local version shown before anything has been evaluated.
pub const VERSION_NOT_AVAILABLE: &str = "n/a";
/// Local version shown when the artifact exists without a version record.
pub const VERSION_CACHED: &str = "cached";
/// Local version shown when nothing is installed.
pub const VERSION_MISSING: &str = "missing";
/// Remote version shown when the feed could not be used.
pub const VERSION_UNKNOWN: &str = "unknown";

/// Phase of the update workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateState {
    Checking,
    ReadyToLaunch,
    NeedsUpdate,
    OfflineReady,
    Blocked,
    Updating,
    Launching,
    Error,
}

impl UpdateState {
    /// Whether work is in flight in this state.
    #[must_use]
    pub const fn is_transient(self) -> bool {
        matches!(self, Self::Checking | Self::Updating | Self::Launching)
    }

    /// Whether the primary action may be invoked.
    #[must_use]
    pub const fn action_enabled(self) -> bool {
        !self.is_transient()
    }
}

impl fmt::Display for UpdateState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Checking => "checking",
            Self::ReadyToLaunch => "ready",
            Self::NeedsUpdate => "needs update",
            Self::OfflineReady => "offline",
            Self::Blocked => "blocked",
            Self::Updating => "updating",
            Self::Launching => "launching",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// Immutable snapshot of what the front-end should show.
///
/// Snapshots are never edited; every transition builds a new one through the
/// named constructors, which keep `action_enabled` consistent with `state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub state: UpdateState,
    pub action_label: String,
    pub action_enabled: bool,
    pub message: String,
    pub local_version: String,
    pub remote_version: String,
}

impl ViewModel {
    fn new(
        state: UpdateState,
        action_label: impl Into<String>,
        message: impl Into<String>,
        local_version: impl Into<String>,
        remote_version: impl Into<String>,
    ) -> Self {
        Self {
            state,
            action_label: action_label.into(),
            action_enabled: state.action_enabled(),
            message: message.into(),
            local_version: local_version.into(),
            remote_version: remote_version.into(),
        }
    }

    /// Initial snapshot, and the one shown while re-checking.
    pub fn checking() -> Self {
        Self::new(
            UpdateState::Checking,
            "Checking…",
            format!("Contacting {PRODUCT_NAME} release service…"),
            VERSION_NOT_AVAILABLE,
            VERSION_NOT_AVAILABLE,
        )
    }

    pub fn offline_ready(local: impl Into<String>) -> Self {
        Self::new(
            UpdateState::OfflineReady,
            "Launch Offline",
            "Offline mode: using cached client.",
            local,
            VERSION_UNKNOWN,
        )
    }

    pub fn blocked() -> Self {
        Self::new(
            UpdateState::Blocked,
            "Retry",
            "Unable to reach GitHub. Connect to the internet and retry.",
            VERSION_MISSING,
            VERSION_UNKNOWN,
        )
    }

    pub fn ready_to_launch(
        message: impl Into<String>,
        local: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        Self::new(
            UpdateState::ReadyToLaunch,
            format!("Launch {PRODUCT_NAME}"),
            message,
            local,
            remote,
        )
    }

    /// `artifact_present` selects between "Update to" and "Download" wording.
    pub fn needs_update(artifact_present: bool, local: impl Into<String>, remote: &str) -> Self {
        let (label, message) = if artifact_present {
            (format!("Update to {remote}"), "A newer build is available.")
        } else {
            (format!("Download {remote}"), "Download required before first launch.")
        };
        Self::new(UpdateState::NeedsUpdate, label, message, local, remote)
    }

    pub fn updating(local: impl Into<String>, remote: &str) -> Self {
        Self::new(
            UpdateState::Updating,
            "Downloading…",
            format!("Downloading {remote}…"),
            local,
            remote,
        )
    }

    pub fn launching(local: impl Into<String>, remote: impl Into<String>) -> Self {
        Self::new(
            UpdateState::Launching,
            "Launching…",
            format!("Starting {PRODUCT_NAME} client…"),
            local,
            remote,
        )
    }

    pub fn error(
        message: impl Into<String>,
        local: impl Into<String>,
        remote: impl Into<String>,
    ) -> Self {
        Self::new(UpdateState::Error, "Retry", message, local, remote)
    }

    /// `Local: <local> | Remote: <remote>`
    #[must_use]
    pub fn version_line(&self) -> String {
        format!("Local: {} | Remote: {}", self.local_version, self.remote_version)
    }
}
