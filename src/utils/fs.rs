//! File system helpers for installing staged downloads.
//!
//! Downloads are written to a temporary file in the same directory as their
//! final destination and then moved into place. Keeping both on the same
//! filesystem lets the move be a single atomic rename; when the filesystem
//! refuses that (network shares, some FUSE mounts) the helpers fall back to a
//! copy-replace and accept a short window where the destination is absent.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::{PathPersistError, TempPath};
use tracing::{debug, warn};

/// How a staged file ended up at its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Single atomic rename
    Rename,
    /// Remove-then-copy fallback
    Copy,
}

/// Move a staged temporary file onto `target`, replacing any existing file.
///
/// The temporary file is always gone when this returns: it either became
/// `target` or was deleted (deletion failures are logged, not returned).
///
/// # Errors
///
/// Returns the I/O error of the rename, or of the copy fallback when the
/// rename is not supported across the two paths.
pub fn install_staged_file(staged: TempPath, target: &Path) -> io::Result<InstallMethod> {
    match staged.persist(target) {
        Ok(()) => Ok(InstallMethod::Rename),
        Err(PathPersistError { error, path }) if rename_unsupported(&error) => {
            debug!(
                "Atomic rename to {} not supported ({error}), falling back to copy-replace",
                target.display()
            );
            let result = replace_by_copy(&path, target);
            discard_staged_file(path);
            result.map(|()| InstallMethod::Copy)
        }
        Err(PathPersistError { error, path }) => {
            discard_staged_file(path);
            Err(error)
        }
    }
}

/// [`install_staged_file`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`install_staged_file`], plus an error when the blocking task
/// could not be joined.
pub async fn install_staged_file_blocking(
    staged: TempPath,
    target: PathBuf,
) -> io::Result<InstallMethod> {
    tokio::task::spawn_blocking(move || install_staged_file(staged, &target))
        .await
        .map_err(io::Error::other)?
}

/// Best-effort deletion of a staged file; failures are only logged.
pub fn discard_staged_file(staged: TempPath) {
    let shown = staged.display().to_string();
    match staged.close() {
        Ok(()) => debug!("Removed temporary file {shown}"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to delete temporary file {shown}: {e}"),
    }
}

fn rename_unsupported(error: &io::Error) -> bool {
    matches!(error.kind(), io::ErrorKind::CrossesDevices | io::ErrorKind::Unsupported)
}

fn replace_by_copy(source: &Path, target: &Path) -> io::Result<()> {
    match std::fs::remove_file(target) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }
    std::fs::copy(source, target)?;
    Ok(())
}
