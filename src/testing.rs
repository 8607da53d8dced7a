//! Test doubles shared by the unit tests

use std::cell::RefCell;
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;

use crate::runtime::{CommandLine, CommandOutput, ContainerRuntime};

#[derive(Debug, Clone)]
enum Reply {
    Exit { code: i32, stdout: String },
    SpawnError,
}

/// Scripted [`ContainerRuntime`] that records every command it is given.
///
/// Replies are matched by prefix against the space-joined argv, in the order
/// they were registered. Unmatched commands exit 0 with no output.
#[derive(Debug, Default)]
pub struct FakeRuntime {
    uid: u32,
    programs: HashSet<String>,
    replies: Vec<(String, Reply)>,
    creates: Vec<(String, PathBuf)>,
    calls: RefCell<Vec<CommandLine>>,
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            uid: 1000,
            ..Self::default()
        }
    }

    pub fn with_uid(mut self, uid: u32) -> Self {
        self.uid = uid;
        self
    }

    /// Make `locate` find this program
    pub fn with_program(mut self, name: &str) -> Self {
        self.programs.insert(name.to_string());
        self
    }

    pub fn respond(mut self, prefix: &str, code: i32, stdout: &str) -> Self {
        self.replies.push((
            prefix.to_string(),
            Reply::Exit {
                code,
                stdout: stdout.to_string(),
            },
        ));
        self
    }

    pub fn fail_spawn(mut self, prefix: &str) -> Self {
        self.replies.push((prefix.to_string(), Reply::SpawnError));
        self
    }

    /// Write `path` whenever a matching command exits 0
    pub fn creates(mut self, prefix: &str, path: impl Into<PathBuf>) -> Self {
        self.creates.push((prefix.to_string(), path.into()));
        self
    }

    pub fn calls(&self) -> Vec<CommandLine> {
        self.calls.borrow().clone()
    }

    /// Space-joined argv of every recorded call
    pub fn call_lines(&self) -> Vec<String> {
        self.calls().iter().map(|c| c.argv().join(" ")).collect()
    }

    fn dispatch(&self, cmd: &CommandLine) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(cmd.clone());
        let line = cmd.argv().join(" ");

        let reply = self
            .replies
            .iter()
            .find(|(prefix, _)| line.starts_with(prefix.as_str()))
            .map(|(_, reply)| reply.clone())
            .unwrap_or(Reply::Exit {
                code: 0,
                stdout: String::new(),
            });

        match reply {
            Reply::SpawnError => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{}: not found", cmd.program),
            )),
            Reply::Exit { code, stdout } => {
                if code == 0 {
                    for (prefix, path) in &self.creates {
                        if line.starts_with(prefix.as_str()) {
                            std::fs::write(path, b"done")?;
                        }
                    }
                }
                Ok(CommandOutput {
                    status_code: code,
                    stdout: stdout.into_bytes(),
                    stderr: Vec::new(),
                })
            }
        }
    }
}

impl ContainerRuntime for FakeRuntime {
    fn run(&self, cmd: &CommandLine) -> io::Result<i32> {
        self.dispatch(cmd).map(|out| out.status_code)
    }

    fn output(&self, cmd: &CommandLine) -> io::Result<CommandOutput> {
        self.dispatch(cmd)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        self.programs.contains(program).then(|| PathBuf::from(program))
    }

    fn host_uid(&self) -> u32 {
        self.uid
    }
}
