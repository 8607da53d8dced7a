//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "smithy-run")]
#[command(
    author,
    version,
    about = "Run a feedstock build step inside a docker container",
    long_about = None
)]
pub struct Args {
    /// Container image to run the build in
    #[arg(long, env = "DOCKER_IMAGE")]
    pub image: String,

    /// File the build script writes when it finishes; checked after the container exits
    #[arg(long, env = "DONE_CANARY", value_name = "PATH")]
    pub done_canary: PathBuf,

    /// Feedstock root to mount (default: two levels above this executable)
    #[arg(long, env = "FEEDSTOCK_ROOT", value_name = "DIR")]
    pub feedstock_root: Option<PathBuf>,

    /// CI marker; when unset the container is attached interactively
    #[arg(long, env = "CI", value_name = "VALUE")]
    pub ci: Option<String>,

    /// First test to run inside the container
    #[arg(long, env = "TEST_START_INDEX", value_name = "VALUE")]
    pub test_start_index: Option<String>,

    /// Number of tests to run inside the container
    #[arg(long, env = "TEST_COUNT", value_name = "VALUE")]
    pub test_count: Option<String>,

    /// Whether the build script should upload packages
    #[arg(long, env = "UPLOAD_PACKAGES", value_name = "VALUE")]
    pub upload_packages: Option<String>,

    /// Docker client executable
    #[arg(long = "docker", env = "DOCKER_BIN", default_value = "docker", value_name = "BIN")]
    pub docker_bin: String,

    /// docker-machine helper executable
    #[arg(
        long = "docker-machine",
        env = "DOCKER_MACHINE_BIN",
        default_value = "docker-machine",
        value_name = "BIN"
    )]
    pub machine_bin: String,

    /// Show the docker command that would run without touching the daemon or the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Output the run report as JSON
    #[arg(long)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
