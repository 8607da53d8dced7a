//! Human-readable output formatting

use crate::identity::{HostIdentity, IdentitySource};
use crate::invocation::InteractiveMode;
use crate::output::formatter::Outcome;

pub fn format_human(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Completed(report) => {
            let elapsed = report.finished_at - report.started_at;
            format!(
                "Build step completed\n\
                 --------------------\n\
                 Feedstock:  {}\n\
                 Artifacts:  {}\n\
                 Image:      {}\n\
                 Run as:     {}\n\
                 Mode:       {}\n\
                 Canary:     {}\n\
                 Duration:   {}s",
                report.feedstock_root.display(),
                report.artifacts_dir.display(),
                report.invocation.image,
                describe_identity(&report.identity),
                describe_mode(&report.invocation.mode),
                report.done_canary.display(),
                elapsed.num_seconds()
            )
        }
        Outcome::Planned(plan) => {
            format!(
                "Dry run - nothing executed\n\
                 --------------------------\n\
                 Feedstock:  {}\n\
                 Artifacts:  {} (would be created)\n\
                 Run as:     {}\n\
                 Mode:       {}\n\
                 Canary:     {}\n\n\
                 {}",
                plan.feedstock_root.display(),
                plan.artifacts_dir.display(),
                describe_identity(&plan.identity),
                describe_mode(&plan.invocation.mode),
                plan.done_canary.display(),
                plan.command
            )
        }
    }
}

fn describe_identity(identity: &HostIdentity) -> String {
    match &identity.source {
        IdentitySource::Local => format!("uid {} (local)", identity.uid),
        IdentitySource::DockerMachine { machine } => {
            format!("uid {} (docker-machine '{}')", identity.uid, machine)
        }
    }
}

fn describe_mode(mode: &InteractiveMode) -> &'static str {
    match mode {
        InteractiveMode::Interactive { tty: true } => "interactive (tty)",
        InteractiveMode::Interactive { tty: false } => "interactive",
        InteractiveMode::Detached => "detached",
    }
}
