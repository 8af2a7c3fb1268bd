//! Utility modules shared across the launcher.
//!
//! - [`fs`]: installing staged downloads with an atomic rename
//! - [`platform`]: per-platform launch flags and default directories
//! - [`progress`]: spinner for transient states

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{InstallMethod, discard_staged_file, install_staged_file, install_staged_file_blocking};
pub use platform::{PlatformFamily, PlatformProfile, platform_profile};
