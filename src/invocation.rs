//! Assembly of the `docker run` command for the build step

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::{BuildConfig, CONTAINER_FEEDSTOCK_ROOT};
use crate::runtime::CommandLine;

/// Names forwarded into the container with `-e`, in this order
pub const FORWARDED_ENV: [&str; 5] = [
    "TEST_START_INDEX",
    "TEST_COUNT",
    "HOST_USER_ID",
    "CI",
    "UPLOAD_PACKAGES",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractiveMode {
    /// Keep stdin open, and allocate a TTY when stdin is a terminal
    Interactive { tty: bool },
    /// No stdin, no TTY
    Detached,
}

impl InteractiveMode {
    /// Interactive only when no CI marker is set on the host
    pub fn select(config: &BuildConfig) -> Self {
        Self::select_with_tty(config, std::io::stdin().is_terminal())
    }

    pub fn select_with_tty(config: &BuildConfig, stdin_is_tty: bool) -> Self {
        if config.ci_marker_set() {
            InteractiveMode::Detached
        } else {
            InteractiveMode::Interactive { tty: stdin_is_tty }
        }
    }

    fn flags(&self) -> &'static [&'static str] {
        match self {
            InteractiveMode::Interactive { tty: true } => &["-i", "-t"],
            InteractiveMode::Interactive { tty: false } => &["-i"],
            InteractiveMode::Detached => &[],
        }
    }
}

/// A fully resolved container invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DockerInvocation {
    pub docker_bin: String,
    pub image: String,
    pub feedstock_root: PathBuf,
    pub mode: InteractiveMode,
    /// Values for the set names of [`FORWARDED_ENV`], same order
    pub env: Vec<(String, String)>,
    pub script: String,
}

impl DockerInvocation {
    pub fn new(
        config: &BuildConfig,
        feedstock_root: &Path,
        host_uid: u32,
        mode: InteractiveMode,
    ) -> Self {
        let values = [
            config.test_start_index.clone(),
            config.test_count.clone(),
            Some(host_uid.to_string()),
            Some(config.forwarded_ci().to_string()),
            Some(config.upload_packages.clone()),
        ];
        // Unset names stay unset: `-e NAME` then forwards nothing.
        let env = FORWARDED_ENV
            .iter()
            .zip(values)
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
            .collect();

        Self {
            docker_bin: config.docker_bin.clone(),
            image: config.image.clone(),
            feedstock_root: feedstock_root.to_path_buf(),
            mode,
            env,
            script: config.container_build_script(),
        }
    }

    /// Volume spec mounting the feedstock root read-write
    pub fn volume(&self) -> String {
        format!("{}:{}:rw,z", self.feedstock_root.display(), CONTAINER_FEEDSTOCK_ROOT)
    }

    pub fn command_line(&self) -> CommandLine {
        let mut cmd = CommandLine::new(&self.docker_bin)
            .arg("run")
            .args(self.mode.flags().iter().copied())
            .arg("--rm")
            .args(["-v".to_string(), self.volume()]);
        for name in FORWARDED_ENV {
            cmd = cmd.args(["-e", name]);
        }
        cmd = cmd.args([self.image.as_str(), "bash", self.script.as_str()]);
        for (name, value) in &self.env {
            cmd = cmd.env(name, value);
        }
        cmd
    }
}
