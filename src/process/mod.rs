//! Starting the installed client.
//!
//! [`ProcessSupervisor`] turns the installed artifact into a running Java
//! process: it checks the artifact exists, resolves the Java runtime,
//! applies the platform's launch flags and audio configuration, and spawns
//! the child with inherited stdio. The child is not waited on.

pub mod audio;

use crate::config::LauncherPaths;
use crate::core::{LauncherError, Result};
use crate::utils::platform::PlatformProfile;
use audio::{AudioSocket, probe_pulse_socket};
use std::collections::HashMap;
use std::future::Future;
use std::process::{Child, Command, Stdio};
use tracing::{debug, info};

/// Snapshot of the environment variables the launcher consults.
///
/// Taken once at startup so launches behave consistently and tests can
/// supply their own values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessEnv {
    vars: HashMap<String, String>,
}

impl ProcessEnv {
    /// Capture the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_current() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value of `key`, treating empty values as unset.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str).filter(|value| !value.is_empty())
    }
}

/// A started client process.
#[derive(Debug)]
pub struct LaunchedProcess {
    pub pid: u32,
    pub child: Child,
}

impl From<Child> for LaunchedProcess {
    fn from(child: Child) -> Self {
        Self {
            pid: child.id(),
            child,
        }
    }
}

/// Something that can start the installed client.
pub trait Launcher: Send + Sync + 'static {
    fn launch(&self) -> impl Future<Output = Result<LaunchedProcess>> + Send;
}

/// Launches the client with the configured Java runtime.
#[derive(Debug, Clone)]
pub struct ProcessSupervisor {
    paths: LauncherPaths,
    profile: PlatformProfile,
    env: ProcessEnv,
    java: String,
}

impl ProcessSupervisor {
    pub fn new(
        paths: LauncherPaths,
        profile: PlatformProfile,
        env: ProcessEnv,
        java: impl Into<String>,
    ) -> Self {
        Self {
            paths,
            profile,
            env,
            java: java.into(),
        }
    }

    /// Assemble `<java> [flags] -jar <artifact>` without starting it.
    ///
    /// # Errors
    ///
    /// [`LauncherError::ArtifactNotFound`] when nothing is installed, checked
    /// before anything else; [`LauncherError::JavaNotFound`] when the runtime
    /// cannot be resolved.
    pub fn build_command(&self) -> Result<Command> {
        let artifact = self.paths.artifact_path();
        if !artifact.is_file() {
            return Err(LauncherError::ArtifactNotFound { path: artifact });
        }

        let java = which::which(&self.java).map_err(|e| {
            debug!("Failed to resolve {}: {e}", self.java);
            LauncherError::JavaNotFound {
                command: self.java.clone(),
            }
        })?;

        let mut command = Command::new(java);
        command
            .args(&self.profile.launch_flags)
            .arg("-jar")
            .arg(&artifact)
            .current_dir(self.paths.base_dir())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if self.profile.probe_audio_socket {
            let socket = probe_pulse_socket(&self.env);
            if let Some(server) = socket.pulse_server() {
                info!("Setting PULSE_SERVER={server} for the client");
                command.env("PULSE_SERVER", server);
            } else if let AudioSocket::Inherited(server) = &socket {
                debug!("Client inherits PULSE_SERVER={server}");
            }
        }

        Ok(command)
    }

    /// Start the client and return immediately.
    ///
    /// # Errors
    ///
    /// Everything [`build_command`](Self::build_command) reports, plus
    /// [`LauncherError::Spawn`] when the OS refuses to start the process.
    pub fn launch_now(&self) -> Result<LaunchedProcess> {
        let mut command = self.build_command()?;
        info!("Executing command: {}", describe(&command));
        info!("Working directory: {}", self.paths.base_dir().display());

        let child = command.spawn().map_err(|source| LauncherError::Spawn {
            command: command.get_program().to_string_lossy().into_owned(),
            source,
        })?;
        let process = LaunchedProcess::from(child);
        info!("Client process started with PID: {}", process.pid);
        Ok(process)
    }
}

impl Launcher for ProcessSupervisor {
    fn launch(&self) -> impl Future<Output = Result<LaunchedProcess>> + Send {
        let supervisor = self.clone();
        async move {
            tokio::task::spawn_blocking(move || supervisor.launch_now())
                .await
                .map_err(std::io::Error::other)?
        }
    }
}

fn describe(command: &Command) -> String {
    std::iter::once(command.get_program())
        .chain(command.get_args())
        .map(|part| part.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}
