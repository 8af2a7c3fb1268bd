//! Platform detection and per-platform launch conventions.
//!
//! The launcher branches on the operating system in exactly two places: the
//! extra JVM flags needed to start the client, and the default directory the
//! client is cached in. Both are captured once at startup in a
//! [`PlatformProfile`] and handed to the components that need them, instead of
//! re-checking the OS ad hoc.
//!
//! # Platform Support Matrix
//!
//! | Family  | Launch flags            | Audio socket probe | Base directory              |
//! |---------|-------------------------|--------------------|-----------------------------|
//! | macOS   | `-XstartOnFirstThread`  | no                 | `~/.config/woodlanders`     |
//! | Linux   | none                    | yes                | `~/.config/woodlanders`     |
//! | Windows | none                    | no                 | `%LOCALAPPDATA%\woodlanders` |
//!
//! # Examples
//!
//! ```rust,no_run
//! use jarlaunch::utils::platform::platform_profile;
//!
//! let profile = platform_profile();
//! println!("Launching with flags {:?}", profile.launch_flags);
//! ```

use crate::constants::APP_DIR_NAME;
use std::path::PathBuf;

/// Coarse operating-system family the launcher distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformFamily {
    /// Apple macOS
    MacOs,
    /// Microsoft Windows
    Windows,
    /// Linux and other Unix-like systems with a freedesktop runtime directory
    Linux,
    /// Anything else
    Other,
}

/// Launch and path conventions for one platform family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    /// Detected family
    pub family: PlatformFamily,
    /// JVM flags placed before `-jar`
    pub launch_flags: Vec<String>,
    /// Whether to look for a PulseAudio socket before launching
    pub probe_audio_socket: bool,
}

impl PlatformProfile {
    /// Default directory holding the artifact, version record, and staging files.
    ///
    /// Returns `None` when the home or local data directory cannot be
    /// determined, which is the only environment failure the launcher treats
    /// as fatal.
    #[must_use]
    pub fn default_base_dir(&self) -> Option<PathBuf> {
        match self.family {
            PlatformFamily::Windows => dirs::data_local_dir().map(|dir| dir.join(APP_DIR_NAME)),
            _ => dirs::home_dir().map(|home| home.join(".config").join(APP_DIR_NAME)),
        }
    }
}

/// Compute the profile for the platform this binary was compiled for.
#[must_use]
pub fn platform_profile() -> PlatformProfile {
    profile_for(std::env::consts::OS)
}

/// Compute the profile for an OS name as reported by `std::env::consts::OS`.
#[must_use]
pub fn profile_for(os: &str) -> PlatformProfile {
    let family = match os {
        "macos" | "ios" => PlatformFamily::MacOs,
        "windows" => PlatformFamily::Windows,
        "linux" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => PlatformFamily::Linux,
        _ => PlatformFamily::Other,
    };

    // GLFW needs the first thread on macOS; other platforms reject the flag.
    let launch_flags = match family {
        PlatformFamily::MacOs => vec!["-XstartOnFirstThread".to_string()],
        _ => Vec::new(),
    };

    PlatformProfile {
        family,
        launch_flags,
        probe_audio_socket: family == PlatformFamily::Linux,
    }
}
