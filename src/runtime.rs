//! External command execution
//!
//! All contact with the outside world (the docker client, the docker-machine
//! helper, the host uid) goes through [`ContainerRuntime`], so the wrapper can
//! be driven by a fake in tests.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde::Serialize;

/// A program, its arguments, and extra environment for the child
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl CommandLine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Full argv, program first
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
        cmd
    }
}

impl fmt::Display for CommandLine {
    /// Shell-like rendering, environment assignments first
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut words: Vec<String> = self
            .env
            .iter()
            .map(|(k, v)| format!("{}={}", k, shell_quote(v)))
            .collect();
        words.extend(self.argv().iter().map(|w| shell_quote(w)));
        write!(f, "{}", words.join(" "))
    }
}

fn shell_quote(word: &str) -> String {
    let plain = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,@%+".contains(c));
    if plain {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', r"'\''"))
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }

    pub fn stdout_trimmed(&self) -> String {
        String::from_utf8_lossy(&self.stdout).trim().to_string()
    }

    pub fn stderr_trimmed(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}

/// Runs external commands on behalf of the wrapper
pub trait ContainerRuntime {
    /// Run to completion and return the exit code.
    ///
    /// stdin and stderr are inherited; the child's stdout goes to our stderr
    /// so that our own stdout carries only the report.
    fn run(&self, cmd: &CommandLine) -> io::Result<i32>;

    /// Run with captured stdout/stderr
    fn output(&self, cmd: &CommandLine) -> io::Result<CommandOutput>;

    /// Find an executable, like the shell's `hash`
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Numeric uid of the current host user
    fn host_uid(&self) -> u32;
}

/// [`ContainerRuntime`] backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRuntime;

impl ContainerRuntime for ProcessRuntime {
    fn run(&self, cmd: &CommandLine) -> io::Result<i32> {
        tracing::info!("+ {}", cmd);
        let status = cmd
            .to_command()
            .stdout(Stdio::from(io::stderr()))
            .status()?;
        Ok(status.code().unwrap_or(if status.success() { 0 } else { 1 }))
    }

    fn output(&self, cmd: &CommandLine) -> io::Result<CommandOutput> {
        tracing::info!("+ {}", cmd);
        let output = cmd.to_command().stdin(Stdio::null()).output()?;
        let status_code = output
            .status
            .code()
            .unwrap_or(if output.status.success() { 0 } else { 1 });
        Ok(CommandOutput {
            status_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        if Path::new(program).components().count() > 1 {
            let path = PathBuf::from(program);
            return path.is_file().then_some(path);
        }
        which::which(program).ok()
    }

    #[cfg(unix)]
    fn host_uid(&self) -> u32 {
        // SAFETY: getuid has no preconditions and cannot fail.
        unsafe { libc::getuid() }
    }

    #[cfg(not(unix))]
    fn host_uid(&self) -> u32 {
        0
    }
}
