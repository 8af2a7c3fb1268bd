//! jarlaunch - self-updating launcher for the Woodlanders Java client
//!
//! The launcher keeps a single cached copy of the client archive current
//! against a GitHub release feed and starts it with the local Java runtime.
//!
//! # Architecture Overview
//!
//! One state machine ([`update::UpdateCoordinator`]) decides what the user can
//! do next and drives three operations on a single background worker:
//!
//! - release resolution ([`update::release`]): what is the latest build?
//! - verified download ([`update::download`]): stream, check and install it
//! - process supervision ([`process`]): start the installed client
//!
//! What is installed is recorded in a small JSON file
//! ([`update::version_store`]) next to the artifact. The front-end
//! ([`cli`]) only renders [`update::ViewModel`] snapshots and forwards the
//! one "primary action".
//!
//! # States
//!
//! | State           | Meaning                                   | Action       |
//! |-----------------|-------------------------------------------|--------------|
//! | `Checking`      | contacting the release feed               | none         |
//! | `ReadyToLaunch` | installed build matches the latest        | launch       |
//! | `NeedsUpdate`   | nothing installed, or a newer build exists | download    |
//! | `OfflineReady`  | feed unreachable, a cached build exists   | launch       |
//! | `Blocked`       | feed unreachable, nothing installed       | retry        |
//! | `Updating`      | downloading                               | none         |
//! | `Launching`     | starting the client                       | none         |
//! | `Error`         | the last download or launch failed        | retry        |
//!
//! # Modules
//!
//! - [`cli`]: command-line front-end
//! - [`config`]: settings and the directory layout
//! - [`constants`]: timeouts, file names and defaults
//! - [`core`]: error types
//! - [`process`]: launching the client
//! - [`update`]: release resolution, download, and the state machine
//! - [`utils`]: filesystem, platform, and progress helpers
//! - `test_utils`: test fixtures (feature `test-utils`)

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod process;
pub mod update;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
