//! Build configuration
//!
//! Everything the wrapper reads from its environment is collected here once,
//! at startup. The rest of the crate only ever sees a `BuildConfig`.

use std::path::PathBuf;

use crate::cli::Args;

/// Mount point of the feedstock root inside the container
pub const CONTAINER_FEEDSTOCK_ROOT: &str = "/home/conda/feedstock_root";

/// Build script run inside the container, relative to the feedstock root
pub const BUILD_STEPS_SCRIPT: &str = "buildscripts/incremental/build_steps.sh";

/// Artifacts directory name under the feedstock root
pub const ARTIFACTS_DIR: &str = "build_artifacts";

/// Value forwarded as `CI` when no marker was given
pub const DEFAULT_CI_MARKER: &str = "true";

/// Value forwarded as `UPLOAD_PACKAGES` when none was given
pub const DEFAULT_UPLOAD_PACKAGES: &str = "True";

/// Immutable configuration for a single wrapper run
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Image reference passed to `docker run` as-is
    pub image: String,
    /// Sentinel the build script writes on success
    pub done_canary: PathBuf,
    /// Explicit feedstock root; `None` derives it from the executable location
    pub feedstock_root: Option<PathBuf>,
    /// Host-side CI marker. Empty counts as unset.
    pub ci: Option<String>,
    pub test_start_index: Option<String>,
    pub test_count: Option<String>,
    /// Defaults to `True`
    pub upload_packages: String,
    /// Docker client executable
    pub docker_bin: String,
    /// docker-machine helper executable
    pub machine_bin: String,
}

impl BuildConfig {
    /// Create a configuration with defaults for everything but the required inputs
    pub fn new(image: impl Into<String>, done_canary: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            done_canary: done_canary.into(),
            feedstock_root: None,
            ci: None,
            test_start_index: None,
            test_count: None,
            upload_packages: DEFAULT_UPLOAD_PACKAGES.to_string(),
            docker_bin: "docker".to_string(),
            machine_bin: "docker-machine".to_string(),
        }
    }

    pub fn with_feedstock_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.feedstock_root = Some(root.into());
        self
    }

    pub fn with_ci(mut self, marker: impl Into<String>) -> Self {
        self.ci = Some(marker.into());
        self
    }

    /// True when a non-empty CI marker was given on the host
    pub fn ci_marker_set(&self) -> bool {
        self.ci.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// CI marker value forwarded into the container
    pub fn forwarded_ci(&self) -> &str {
        match self.ci.as_deref() {
            Some(v) if !v.is_empty() => v,
            _ => DEFAULT_CI_MARKER,
        }
    }

    /// In-container path of the build script
    pub fn container_build_script(&self) -> String {
        format!("{}/{}", CONTAINER_FEEDSTOCK_ROOT, BUILD_STEPS_SCRIPT)
    }
}

impl From<Args> for BuildConfig {
    fn from(args: Args) -> Self {
        Self {
            image: args.image,
            done_canary: args.done_canary,
            feedstock_root: args.feedstock_root,
            ci: args.ci,
            test_start_index: args.test_start_index,
            test_count: args.test_count,
            upload_packages: args
                .upload_packages
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_UPLOAD_PACKAGES.to_string()),
            docker_bin: args.docker_bin,
            machine_bin: args.machine_bin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BuildConfig::new("myimage", "/tmp/done");
        assert_eq!(config.upload_packages, "True");
        assert!(!config.ci_marker_set());
        assert_eq!(config.forwarded_ci(), "true");
        assert_eq!(
            config.container_build_script(),
            "/home/conda/feedstock_root/buildscripts/incremental/build_steps.sh"
        );
    }

    #[test]
    fn test_empty_ci_counts_as_unset() {
        let config = BuildConfig::new("myimage", "/tmp/done").with_ci("");
        assert!(!config.ci_marker_set());
        assert_eq!(config.forwarded_ci(), "true");
    }

    #[test]
    fn test_ci_marker_forwarded_verbatim() {
        let config = BuildConfig::new("myimage", "/tmp/done").with_ci("azure");
        assert!(config.ci_marker_set());
        assert_eq!(config.forwarded_ci(), "azure");
    }

    #[test]
    fn test_from_args_defaults_upload_flag() {
        use clap::Parser;
        let args = Args::try_parse_from([
            "smithy-run",
            "--image",
            "img",
            "--done-canary",
            "/tmp/done",
            "--upload-packages",
            "",
        ])
        .unwrap();
        let config = BuildConfig::from(args);
        assert_eq!(config.upload_packages, "True");
        assert_eq!(config.image, "img");
    }
}
