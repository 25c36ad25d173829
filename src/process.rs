//! Running external tools.
//!
//! The pipeline never spawns processes directly; it goes through a
//! [`ToolRunner`]. [`SystemRunner`] is the real implementation on top of
//! `tokio::process`. Tests substitute a runner that records command lines
//! and fabricates the files a real tool would write.

use std::future::Future;
use std::process::Stdio;

use tokio::io::AsyncWrite;
use tokio::process::{Child, ChildStdin, Command};
use tracing::debug;

use crate::command::CommandLine;
use crate::error::{PdfBindError, Result};

/// What the child's standard input is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    /// Nothing to read.
    Null,
    /// A pipe the caller writes to via [`ToolProcess::take_stdin`].
    Piped,
}

/// A started tool process.
pub trait ToolProcess: Send {
    /// Writer connected to the child's standard input.
    type Stdin: AsyncWrite + Unpin + Send;

    /// Take the stdin pipe. Returns `None` unless spawned with
    /// [`StdinMode::Piped`], and on every call after the first.
    fn take_stdin(&mut self) -> Option<Self::Stdin>;

    /// Wait for the process to exit and return its exit status.
    ///
    /// A process killed by a signal reports `-1`.
    fn wait(self) -> impl Future<Output = Result<i32>> + Send;
}

/// Something that can start tool processes.
pub trait ToolRunner {
    /// The process handle type.
    type Process: ToolProcess;

    /// Start `command` without a shell.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::CommandFailed`] if the process cannot be
    /// started.
    fn spawn(&self, command: &CommandLine, stdin: StdinMode) -> Result<Self::Process>;
}

/// Runs tools as real child processes.
///
/// Standard output and error are inherited. Children are killed if their
/// handle is dropped before they exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    type Process = SystemProcess;

    fn spawn(&self, command: &CommandLine, stdin: StdinMode) -> Result<SystemProcess> {
        debug!(%command, "Spawning process");

        let stdin = match stdin {
            StdinMode::Null => Stdio::null(),
            StdinMode::Piped => Stdio::piped(),
        };

        let child = Command::new(command.program())
            .args(command.arg_values())
            .stdin(stdin)
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| PdfBindError::spawn_failed(command.program(), err))?;

        Ok(SystemProcess {
            child,
            program: command.program().to_string(),
        })
    }
}

/// A child process started by [`SystemRunner`].
#[derive(Debug)]
pub struct SystemProcess {
    child: Child,
    program: String,
}

impl ToolProcess for SystemProcess {
    type Stdin = ChildStdin;

    fn take_stdin(&mut self) -> Option<ChildStdin> {
        self.child.stdin.take()
    }

    async fn wait(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|err| PdfBindError::spawn_failed(&self.program, err))?;
        debug!(program = %self.program, %status, "Process exited");
        Ok(status.code().unwrap_or(-1))
    }
}
