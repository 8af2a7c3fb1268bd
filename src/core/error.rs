//! Error handling for the launcher.
//!
//! The error system follows two rules:
//! 1. **Strongly-typed errors** ([`LauncherError`]) inside the library so the
//!    coordinator can turn any failure into a readable status message.
//! 2. **User-friendly reporting** ([`ErrorContext`]) for the few failures that
//!    abort the command-line front-end itself.
//!
//! Transient network problems never reach this module as errors: the release
//! resolver reports them as "no release available" and the state machine
//! moves to an offline state instead.
//!
//! # Examples
//!
//! ```rust,no_run
//! use jarlaunch::core::{LauncherError, user_friendly_error};
//!
//! let err = anyhow::Error::from(LauncherError::WorkerUnavailable);
//! user_friendly_error(err).display();
//! ```

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias used by every fallible library operation.
pub type Result<T> = std::result::Result<T, LauncherError>;

/// The main error type for launcher operations.
///
/// Every variant renders as a complete sentence fragment so it can be placed
/// directly after a prefix such as `"Download failed: "` in a status message.
#[derive(Error, Debug)]
pub enum LauncherError {
    /// The server answered with a non-success status code.
    #[error("request to {url} failed with HTTP status {status}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// The request could not be sent or the body could not be read.
    #[error("network error while {operation}: {source}")]
    Network {
        /// What the launcher was doing when the transport failed
        operation: String,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// Streaming the asset exceeded the overall download timeout.
    #[error("download of {url} timed out after {seconds}s")]
    Timeout {
        /// Asset URL
        url: String,
        /// Configured timeout in seconds
        seconds: u64,
    },

    /// Downloaded bytes do not hash to the expected digest.
    #[error("checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Digest the release advertised
        expected: String,
        /// Digest of the received bytes
        actual: String,
    },

    /// Downloaded byte count differs from the advertised asset size.
    #[error("size mismatch: release advertised {expected} bytes but {actual} were received")]
    SizeMismatch {
        /// Size listed in the release feed
        expected: u64,
        /// Bytes actually received
        actual: u64,
    },

    /// The installed client is not on disk.
    #[error("client artifact not found at {}", path.display())]
    ArtifactNotFound {
        /// Expected artifact location
        path: PathBuf,
    },

    /// The configured Java runtime could not be resolved.
    #[error("Java runtime '{command}' not found on PATH")]
    JavaNotFound {
        /// Command name or path as configured
        command: String,
    },

    /// The operating system refused to start the client process.
    #[error("failed to start '{command}': {source}")]
    Spawn {
        /// Program that was being started
        command: String,
        /// Error reported by the OS
        #[source]
        source: std::io::Error,
    },

    /// The version record could not be serialized.
    #[error("failed to serialize version metadata: {0}")]
    Metadata(#[from] serde_json::Error),

    /// Neither a base directory was configured nor a home directory found.
    #[error("unable to determine the launcher directory; set --base-dir or JARLAUNCH_HOME")]
    BaseDirUnavailable,

    /// The background worker has stopped and cannot accept work.
    #[error("background worker is not running")]
    WorkerUnavailable,

    /// Any other filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LauncherError {
    /// Wrap a transport error with a description of the operation.
    pub fn network(operation: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            operation: operation.into(),
            source,
        }
    }

    /// Whether this error indicates the downloaded content failed verification.
    #[must_use]
    pub const fn is_integrity_failure(&self) -> bool {
        matches!(self, Self::ChecksumMismatch { .. } | Self::SizeMismatch { .. })
    }
}

/// An error with an optional suggestion and details, printed by the CLI.
#[derive(Debug)]
pub struct ErrorContext {
    /// Primary error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context around an error message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            suggestion: None,
            details: None,
        }
    }

    /// Attach a suggestion for resolving the error.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach additional details.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

/// Convert any error into an [`ErrorContext`] with a matching suggestion.
///
/// Known [`LauncherError`] variants and common I/O failures get tailored
/// suggestions; everything else is reported with its full `anyhow` chain.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(launcher_error) = error.downcast_ref::<LauncherError>() {
        return launcher_error_context(launcher_error, &error);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(format!("{error:#}"))
                    .with_suggestion("Check that the launcher directory is writable by your user")
                    .with_details("The launcher stores the client and its version record in a single directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(format!("{error:#}"))
                    .with_suggestion("Check that the path exists or pass a different --base-dir");
            }
            _ => {}
        }
    }

    ErrorContext::new(format!("{error:#}"))
}

fn launcher_error_context(launcher_error: &LauncherError, error: &anyhow::Error) -> ErrorContext {
    let context = ErrorContext::new(format!("{error:#}"));
    match launcher_error {
        LauncherError::JavaNotFound { .. } => context
            .with_suggestion("Install a Java runtime or point --java / JARLAUNCH_JAVA at one")
            .with_details("The client is a Java archive and is started with `java -jar`"),
        LauncherError::ArtifactNotFound { .. } => context
            .with_suggestion("Run `jarlaunch` while online so the client can be downloaded"),
        LauncherError::WorkerUnavailable => context
            .with_details("The background worker stopped unexpectedly; restart the launcher"),
        LauncherError::ChecksumMismatch { .. } | LauncherError::SizeMismatch { .. } => context
            .with_suggestion("Retry the download; if the problem persists the release may be corrupt"),
        _ => context,
    }
}
