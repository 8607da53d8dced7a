//! smithy-run - run a conda-smithy feedstock build step inside docker
//!
//! The wrapper mounts the feedstock into a container, runs the feedstock's
//! build script there as the uid that owns the mount, and afterwards checks
//! that the script left its done canary behind.
//!
//! # Example
//!
//! ```no_run
//! use smithy_run::{BuildConfig, InvocationWrapper, ProcessRuntime};
//!
//! let config = BuildConfig::new("condaforge/linux-anvil", "/tmp/done")
//!     .with_feedstock_root(".");
//! let report = InvocationWrapper::new(config, &ProcessRuntime).run().unwrap();
//! println!("ran as uid {}", report.identity.uid);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod identity;
pub mod invocation;
pub mod output;
pub mod runtime;
pub mod wrapper;

#[cfg(test)]
pub(crate) mod testing;

pub use config::BuildConfig;
pub use error::{Result, WrapperError};
pub use identity::{HostIdentity, IdentitySource};
pub use invocation::{DockerInvocation, InteractiveMode};
pub use output::{format_output, Outcome, OutputFormat};
pub use runtime::{CommandLine, ContainerRuntime, ProcessRuntime};
pub use wrapper::{InvocationWrapper, RunPlan, RunReport};
