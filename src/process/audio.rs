//! PulseAudio socket discovery for the launched client.
//!
//! Desktop sessions usually export `PULSE_SERVER` or at least
//! `XDG_RUNTIME_DIR`, but launchers started from some desktop entries or
//! `sudo -u` shells lose them and the client comes up silent. Before launch we
//! look for the socket in the usual places and, if one exists, hand it to the
//! child explicitly.

use super::ProcessEnv;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Outcome of probing for an audio server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSocket {
    /// `PULSE_SERVER` is already set to something usable; leave it alone.
    Inherited(String),
    /// A socket was found; the child gets `PULSE_SERVER=unix:<path>`.
    Discovered(PathBuf),
    /// Nothing usable; launch without audio configuration.
    Unavailable,
}

impl AudioSocket {
    /// Value to export as `PULSE_SERVER` for the child, if any.
    pub fn pulse_server(&self) -> Option<String> {
        match self {
            Self::Discovered(path) => Some(format!("unix:{}", path.display())),
            Self::Inherited(_) | Self::Unavailable => None,
        }
    }
}

/// Well-known socket locations in probe order.
pub fn candidate_sockets(env: &ProcessEnv) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(runtime) = env.get("PULSE_RUNTIME_PATH") {
        candidates.push(PathBuf::from(runtime).join("native"));
    }
    if let Some(runtime) = env.get("XDG_RUNTIME_DIR") {
        candidates.push(PathBuf::from(runtime).join("pulse").join("native"));
    }
    if let Some(uid) = env.get("UID").filter(|uid| uid.parse::<u32>().is_ok()) {
        candidates.push(PathBuf::from(format!("/run/user/{uid}/pulse/native")));
    }
    candidates
}

/// Find a usable PulseAudio server for the child process.
///
/// An inherited `PULSE_SERVER` wins when it names a network server or an
/// existing unix socket. Otherwise the first existing candidate socket is
/// used. A missing socket is only logged.
pub fn probe_pulse_socket(env: &ProcessEnv) -> AudioSocket {
    if let Some(server) = env.get("PULSE_SERVER") {
        match server.strip_prefix("unix:") {
            None => {
                debug!("Using inherited PULSE_SERVER={server}");
                return AudioSocket::Inherited(server.to_string());
            }
            Some(path) if PathBuf::from(path).exists() => {
                debug!("Using inherited PULSE_SERVER={server}");
                return AudioSocket::Inherited(server.to_string());
            }
            Some(path) => {
                warn!("PULSE_SERVER points at missing socket {path}; probing for another");
            }
        }
    }

    for candidate in candidate_sockets(env) {
        if candidate.exists() {
            debug!("Found PulseAudio socket at {}", candidate.display());
            return AudioSocket::Discovered(candidate);
        }
        debug!("No PulseAudio socket at {}", candidate.display());
    }

    warn!("No PulseAudio socket found; the client may start without sound");
    AudioSocket::Unavailable
}
