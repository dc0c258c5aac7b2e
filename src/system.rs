// src/system.rs

//! External process execution with privilege elevation
//!
//! Every package-manager interaction goes through [`CommandRunner`], so the
//! rest of the crate can be exercised against a recording fake.

use crate::error::{Error, Result};
use std::fmt;
use std::process::{Command, Stdio};
use tracing::debug;

/// How commands that need root are elevated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Privilege {
    /// Already running as root
    Root,
    /// Prefix with `sudo`
    Sudo,
    /// Wrap in `su -c`
    Su,
}

impl Privilege {
    /// Work out how to run commands as root on this host
    pub fn detect() -> Result<Self> {
        // SAFETY: geteuid has no preconditions and cannot fail
        if unsafe { libc::geteuid() } == 0 {
            return Ok(Self::Root);
        }
        if which::which("sudo").is_ok() {
            return Ok(Self::Sudo);
        }
        if which::which("su").is_ok() {
            return Ok(Self::Su);
        }
        Err(Error::Privilege(
            "this installer needs the ability to run commands as root; unable to find either \"sudo\" or \"su\"".to_string(),
        ))
    }
}

/// A process to run: program, arguments and whether it needs root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
    pub elevated: bool,
}

impl CommandLine {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            elevated: false,
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

    /// Mark the command as requiring root
    pub fn elevated(mut self) -> Self {
        self.elevated = true;
        self
    }

    /// Quoted shell spelling of the command
    pub fn to_shell(&self) -> Result<String> {
        let words = std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str));
        shlex::try_join(words)
            .map_err(|e| Error::Configuration(format!("cannot quote command {}: {}", self.program, e)))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_shell() {
            Ok(line) => f.write_str(&line),
            Err(_) => write!(f, "{} {}", self.program, self.args.join(" ")),
        }
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }
}

pub trait CommandRunner {
    /// Run a command to completion and capture its output
    ///
    /// Always executes, including in dry-run mode; reserved for queries that
    /// leave the host unchanged. A non-zero exit is reported through
    /// `CommandOutput::success`, not as an error.
    fn capture(&self, cmd: &CommandLine) -> Result<CommandOutput>;

    /// Run a command that changes the host, streaming its output
    ///
    /// A non-zero exit is `Error::CommandFailed`.
    fn run(&self, cmd: &CommandLine) -> Result<()>;
}

/// Runs commands on the local host
pub struct SystemRunner {
    privilege: Privilege,
    dry_run: bool,
}

impl SystemRunner {
    pub fn new(privilege: Privilege, dry_run: bool) -> Self {
        Self { privilege, dry_run }
    }

    fn build(&self, cmd: &CommandLine) -> Result<Command> {
        if !cmd.elevated || self.privilege == Privilege::Root {
            let mut command = Command::new(&cmd.program);
            command.args(&cmd.args);
            return Ok(command);
        }

        let command = match self.privilege {
            Privilege::Sudo => {
                let mut command = Command::new("sudo");
                command.arg(&cmd.program).args(&cmd.args);
                command
            }
            Privilege::Su | Privilege::Root => {
                let mut command = Command::new("su");
                command.arg("-c").arg(cmd.to_shell()?);
                command
            }
        };
        Ok(command)
    }
}

impl CommandRunner for SystemRunner {
    fn capture(&self, cmd: &CommandLine) -> Result<CommandOutput> {
        debug!("Querying: {}", cmd);

        let output = self
            .build(cmd)?
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .output()?;

        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    fn run(&self, cmd: &CommandLine) -> Result<()> {
        if self.dry_run {
            println!("+ {}", cmd);
            return Ok(());
        }

        debug!("Running: {}", cmd);
        let status = self.build(cmd)?.status()?;
        if !status.success() {
            return Err(Error::CommandFailed {
                command: cmd.to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}
