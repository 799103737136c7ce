//! External command plumbing shared by the pipeline stages.
//!
//! Every stage runs commands the same way: a prepared environment replaces
//! the inherited one, calls block until the child exits, and a non-zero exit
//! status is fatal. Stderr always flows through to the operator so compiler
//! and pkg-config diagnostics stay readable.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::{Command, Stdio};

use crate::error::HarnessError;

/// A fully-described external command invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    program: OsString,
    args: Vec<OsString>,
}

impl Invocation {
    /// Start describing an invocation of `program`.
    #[must_use]
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    #[must_use]
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Human-readable rendering for progress lines and diagnostics.
    #[must_use]
    pub fn render(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(format!("{:?}", self.program.to_string_lossy()));
        for arg in &self.args {
            parts.push(format!("{:?}", arg.to_string_lossy()));
        }
        parts.join(" ")
    }

    /// Run with inherited stdio; blocks until the child exits.
    pub fn run(&self, env: &BTreeMap<OsString, OsString>) -> Result<(), HarnessError> {
        let status = self.command(env).status()?;
        if !status.success() {
            return Err(HarnessError::CommandFailed {
                command: self.render(),
                status,
            });
        }
        Ok(())
    }

    /// Run capturing stdout; stderr stays inherited.
    pub fn capture_stdout(
        &self,
        env: &BTreeMap<OsString, OsString>,
    ) -> Result<Vec<u8>, HarnessError> {
        let output = self.command(env).stderr(Stdio::inherit()).output()?;
        if !output.status.success() {
            return Err(HarnessError::CommandFailed {
                command: self.render(),
                status: output.status,
            });
        }
        Ok(output.stdout)
    }

    /// Run capturing stdout and decode it as strict UTF-8.
    pub fn capture_text(&self, env: &BTreeMap<OsString, OsString>) -> Result<String, HarnessError> {
        let bytes = self.capture_stdout(env)?;
        String::from_utf8(bytes).map_err(|_| HarnessError::BadEncoding {
            command: self.render(),
        })
    }

    fn command(&self, env: &BTreeMap<OsString, OsString>) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).env_clear().envs(env);
        command
    }
}
