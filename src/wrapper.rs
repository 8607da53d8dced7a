//! The build-step wrapper
//!
//! [`InvocationWrapper::run`] performs the whole sequence:
//!
//! 1. resolve the feedstock root
//! 2. check that the docker daemon answers
//! 3. resolve the uid to run as
//! 4. create `build_artifacts`
//! 5. pick interactive or detached mode
//! 6. run the container and wait for it
//! 7. check the done canary
//!
//! Every step is fail-fast. Nothing is retried.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::{BuildConfig, ARTIFACTS_DIR};
use crate::error::{Result, WrapperError};
use crate::identity::{resolve_host_identity, HostIdentity, IdentitySource};
use crate::invocation::{DockerInvocation, InteractiveMode};
use crate::runtime::{CommandLine, ContainerRuntime};

/// Outcome of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub feedstock_root: PathBuf,
    pub artifacts_dir: PathBuf,
    pub identity: HostIdentity,
    pub invocation: DockerInvocation,
    pub command: Vec<String>,
    pub done_canary: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// What a run would do, without doing it
#[derive(Debug, Clone, Serialize)]
pub struct RunPlan {
    pub feedstock_root: PathBuf,
    pub artifacts_dir: PathBuf,
    pub identity: HostIdentity,
    pub invocation: DockerInvocation,
    /// Shell rendering of the container command, environment included
    pub command: String,
    pub done_canary: PathBuf,
}

pub struct InvocationWrapper<'a> {
    config: BuildConfig,
    runtime: &'a dyn ContainerRuntime,
}

impl<'a> InvocationWrapper<'a> {
    pub fn new(config: BuildConfig, runtime: &'a dyn ContainerRuntime) -> Self {
        Self { config, runtime }
    }

    /// Run the build step end to end
    pub fn run(&self) -> Result<RunReport> {
        let started_at = Utc::now();

        let root = self.resolve_project_root()?;
        tracing::info!("feedstock root: {}", root.display());

        self.check_runtime()?;
        let identity = self.resolve_host_identity()?;
        let artifacts_dir = self.ensure_artifacts_dir(&root)?;
        let mode = self.select_interactive();

        let invocation = DockerInvocation::new(&self.config, &root, identity.uid, mode);
        let command = invocation.command_line().argv();
        self.launch(&invocation)?;
        self.verify_sentinel()?;

        Ok(RunReport {
            feedstock_root: root,
            artifacts_dir,
            identity,
            invocation,
            command,
            done_canary: self.config.done_canary.clone(),
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Resolve everything that needs no daemon and no writes.
    ///
    /// Uses the local uid; the docker-machine query is skipped.
    pub fn plan(&self) -> Result<RunPlan> {
        let root = self.resolve_project_root()?;
        let identity = HostIdentity {
            uid: self.runtime.host_uid(),
            source: IdentitySource::Local,
        };
        let mode = self.select_interactive();
        let invocation = DockerInvocation::new(&self.config, &root, identity.uid, mode);

        Ok(RunPlan {
            artifacts_dir: root.join(ARTIFACTS_DIR),
            feedstock_root: root,
            identity,
            command: invocation.command_line().to_string(),
            invocation,
            done_canary: self.config.done_canary.clone(),
        })
    }

    /// Absolute feedstock root: the configured one, or two levels above the
    /// directory holding this executable.
    pub fn resolve_project_root(&self) -> Result<PathBuf> {
        match &self.config.feedstock_root {
            Some(root) => fs::canonicalize(root).map_err(|e| {
                WrapperError::PathResolution(format!("{}: {}", root.display(), e))
            }),
            None => {
                let exe = std::env::current_exe().map_err(|e| {
                    WrapperError::PathResolution(format!("cannot locate executable: {}", e))
                })?;
                root_from_executable(&exe)
            }
        }
    }

    /// `docker info`; any failure means the daemon is unreachable
    pub fn check_runtime(&self) -> Result<()> {
        let cmd = CommandLine::new(&self.config.docker_bin).arg("info");
        let code = self.runtime.run(&cmd).map_err(|e| {
            WrapperError::RuntimeUnavailable(format!("{}: {}", self.config.docker_bin, e))
        })?;
        if code != 0 {
            return Err(WrapperError::RuntimeUnavailable(format!(
                "`{} info` exited with status {}",
                self.config.docker_bin, code
            )));
        }
        Ok(())
    }

    pub fn resolve_host_identity(&self) -> Result<HostIdentity> {
        resolve_host_identity(self.runtime, &self.config.machine_bin)
    }

    /// Create `<root>/build_artifacts` if it does not exist yet
    pub fn ensure_artifacts_dir(&self, root: &Path) -> Result<PathBuf> {
        let dir = root.join(ARTIFACTS_DIR);
        tracing::info!("+ mkdir -p {}", dir.display());
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Interactive unless a CI marker is set
    pub fn select_interactive(&self) -> InteractiveMode {
        InteractiveMode::select(&self.config)
    }

    /// Run the container and block until it exits
    pub fn launch(&self, invocation: &DockerInvocation) -> Result<()> {
        let code = self.runtime.run(&invocation.command_line()).map_err(|e| {
            WrapperError::RuntimeUnavailable(format!("{}: {}", invocation.docker_bin, e))
        })?;
        if code != 0 {
            tracing::error!("container build step failed with status {}", code);
            return Err(WrapperError::ContainerExecution { code });
        }
        Ok(())
    }

    /// The build script writes the done canary as its last act
    pub fn verify_sentinel(&self) -> Result<()> {
        let path = &self.config.done_canary;
        tracing::info!("+ test -f {}", path.display());
        if !path.is_file() {
            return Err(WrapperError::IncompleteBuild { path: path.clone() });
        }
        Ok(())
    }
}

/// `<root>/<provider dir>/<executable>` layout, as used by `ci_support/` and `.scripts/`
fn root_from_executable(exe: &Path) -> Result<PathBuf> {
    let exe = fs::canonicalize(exe)
        .map_err(|e| WrapperError::PathResolution(format!("{}: {}", exe.display(), e)))?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            WrapperError::PathResolution(format!(
                "{} has no enclosing feedstock directory",
                exe.display()
            ))
        })
}
