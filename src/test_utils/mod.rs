//! Test utilities for the launcher.
//!
//! Available to the crate's own unit tests and, through the `test-utils`
//! feature, to the integration suite.
//!
//! - [`TestEnvironment`]: a temporary launcher directory with helpers to seed
//!   an installed artifact and version record
//! - [`fakes`]: in-memory release source, installer and launcher
//!
//! # Example
//!
//! ```rust,no_run
//! use jarlaunch::test_utils::{FakeInstaller, FakeLauncher, FakeReleaseSource, TestEnvironment, release};
//! use jarlaunch::update::UpdateCoordinator;
//!
//! # async fn example() {
//! let env = TestEnvironment::new();
//! let (coordinator, updates) = UpdateCoordinator::spawn(env.services(
//!     FakeReleaseSource::with_release(release("v1")),
//!     FakeInstaller::succeeding(env.paths(), b"jar".to_vec()),
//!     FakeLauncher::succeeding(),
//! ));
//! # }
//! ```

pub mod environment;
pub mod fakes;

pub use environment::TestEnvironment;
pub use fakes::{FakeInstaller, FakeLauncher, FakeReleaseSource, release};

use crate::update::ViewModel;
use std::sync::{Arc, Once};
use std::time::Duration;
use tokio::sync::watch;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=jarlaunch=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// Wait until a published snapshot satisfies `predicate`.
///
/// # Panics
///
/// Panics if nothing matches within five seconds or the coordinator is gone.
pub async fn wait_until(
    updates: &mut watch::Receiver<Arc<ViewModel>>,
    predicate: impl FnMut(&Arc<ViewModel>) -> bool,
) -> Arc<ViewModel> {
    let waited = tokio::time::timeout(Duration::from_secs(5), async {
        updates.wait_for(predicate).await.map(|view| Arc::clone(&view))
    })
    .await;
    match waited {
        Ok(Ok(view)) => view,
        Ok(Err(_)) => panic!("coordinator stopped publishing"),
        Err(_) => panic!("timed out waiting for snapshot; last was {:?}", *updates.borrow()),
    }
}

/// Wait for the first snapshot whose state is not transient.
pub async fn wait_until_settled(updates: &mut watch::Receiver<Arc<ViewModel>>) -> Arc<ViewModel> {
    wait_until(updates, |view| !view.state.is_transient()).await
}
