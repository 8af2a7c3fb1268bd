//! Integration test suite for jarlaunch
//!
//! End-to-end tests against a local HTTP server (`wiremock`) and the built
//! binary (`assert_cmd`). No test touches the network beyond localhost.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **release_feed**: release resolution against a mock feed
//! - **download**: streaming, verification and installation of assets
//! - **coordinator**: state machine transitions with fake collaborators
//! - **cli**: the `jarlaunch` binary

mod coordinator;
mod download;
mod release_feed;
