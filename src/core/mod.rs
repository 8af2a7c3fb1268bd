//! Core types shared by every part of the launcher.
//!
//! Currently this is the error taxonomy: [`LauncherError`] for library code
//! and [`ErrorContext`] / [`user_friendly_error`] for the command-line layer.

pub mod error;

pub use error::{ErrorContext, LauncherError, Result, user_friendly_error};
