//! Run-as identity resolution
//!
//! The build inside the container must run with the uid that owns the mounted
//! feedstock. Normally that is the local user. When the docker daemon lives in
//! a docker-machine VM, the mount belongs to the VM's user instead, so the uid
//! is read from inside the active machine.

use serde::Serialize;

use crate::error::{Result, WrapperError};
use crate::runtime::{CommandLine, ContainerRuntime};

/// Where the host uid came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentitySource {
    Local,
    DockerMachine { machine: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostIdentity {
    pub uid: u32,
    pub source: IdentitySource,
}

/// Resolve the uid the container should run as
pub fn resolve_host_identity(
    runtime: &dyn ContainerRuntime,
    machine_bin: &str,
) -> Result<HostIdentity> {
    let local = HostIdentity {
        uid: runtime.host_uid(),
        source: IdentitySource::Local,
    };

    let Some(helper) = runtime.locate(machine_bin) else {
        tracing::debug!("{} not found, using local uid {}", machine_bin, local.uid);
        return Ok(local);
    };
    let helper = helper.to_string_lossy().to_string();

    let active = match runtime.output(&CommandLine::new(&helper).arg("active")) {
        Ok(out) if out.success() => out.stdout_trimmed(),
        _ => {
            tracing::debug!("no active docker machine, using local uid {}", local.uid);
            return Ok(local);
        }
    };
    if active.is_empty() {
        return Ok(local);
    }

    let query = CommandLine::new(&helper).args(["ssh", active.as_str(), "id", "-u"]);
    let out = runtime.output(&query).map_err(|e| {
        WrapperError::IdentityResolution(format!("{} ssh {} failed: {}", helper, active, e))
    })?;
    if !out.success() {
        return Err(WrapperError::IdentityResolution(format!(
            "`id -u` on machine '{}' exited with status {}: {}",
            active,
            out.status_code,
            out.stderr_trimmed()
        )));
    }

    let reported = out.stdout_trimmed();
    let uid = reported.parse::<u32>().map_err(|_| {
        WrapperError::IdentityResolution(format!(
            "machine '{}' reported a non-numeric uid: {:?}",
            active, reported
        ))
    })?;

    tracing::info!("using uid {} from docker machine '{}'", uid, active);
    Ok(HostIdentity {
        uid,
        source: IdentitySource::DockerMachine { machine: active },
    })
}
