//! Error types for smithy-run

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WrapperError {
    #[error("Cannot resolve feedstock root: {0}")]
    PathResolution(String),

    #[error("Container runtime unavailable: {0}")]
    RuntimeUnavailable(String),

    #[error("Cannot resolve host user id: {0}")]
    IdentityResolution(String),

    #[error("Container build step exited with status {code}")]
    ContainerExecution { code: i32 },

    #[error("Build did not complete: done canary {} is missing", path.display())]
    IncompleteBuild { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WrapperError {
    /// Process exit code for this error.
    ///
    /// A failed container step hands its own status through so CI sees the
    /// same code the build script produced.
    pub fn exit_code(&self) -> i32 {
        match self {
            WrapperError::ContainerExecution { code } if *code != 0 => *code,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, WrapperError>;
