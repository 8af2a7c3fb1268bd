//! Launcher configuration.
//!
//! There is no configuration file. Every setting comes from a command-line
//! flag or its environment variable fallback (see [`crate::cli`]) and is
//! gathered into a [`LauncherConfig`]. The filesystem layout derived from it
//! lives in [`LauncherPaths`].
//!
//! | Setting      | Flag           | Environment            | Default                         |
//! |--------------|----------------|------------------------|---------------------------------|
//! | Release feed | `--feed-url`   | `JARLAUNCH_FEED_URL`   | GitHub "latest release" API     |
//! | Asset name   | `--asset-name` | `JARLAUNCH_ASSET_NAME` | `woodlanders-client.jar`        |
//! | Base dir     | `--base-dir`   | `JARLAUNCH_HOME`       | platform default (see below)    |
//! | Java         | `--java`       | `JARLAUNCH_JAVA`       | `java` on `PATH`                |
//!
//! The default base directory is `~/.config/woodlanders` on Unix-like systems
//! and `%LOCALAPPDATA%\woodlanders` on Windows.

mod paths;

pub use paths::LauncherPaths;

use crate::constants::{DEFAULT_ASSET_NAME, DEFAULT_FEED_URL, DEFAULT_JAVA_COMMAND};
use reqwest::Url;
use std::path::PathBuf;

/// Settings for one launcher session.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    /// Endpoint returning the latest release document
    pub feed_url: Url,
    /// Preferred release asset name, also the installed file name
    pub asset_name: String,
    /// Explicit base directory; `None` uses the platform default
    pub base_dir: Option<PathBuf>,
    /// Java runtime command or path
    pub java: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            asset_name: DEFAULT_ASSET_NAME.to_string(),
            base_dir: None,
            java: DEFAULT_JAVA_COMMAND.to_string(),
        }
    }
}

fn default_feed_url() -> Url {
    match Url::parse(DEFAULT_FEED_URL) {
        Ok(url) => url,
        Err(e) => unreachable!("DEFAULT_FEED_URL is a valid URL: {e}"),
    }
}

/// Expand a leading `~` and environment variables in a user-supplied path.
///
/// Falls back to the input unchanged when expansion fails (for example an
/// undefined variable), leaving the filesystem to report a clearer error.
#[must_use]
pub fn expand_path(raw: &str) -> PathBuf {
    match shellexpand::full(raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(raw).as_ref()),
    }
}
