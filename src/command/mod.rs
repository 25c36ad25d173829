//! Command lines for the external tools.
//!
//! Builders in this module are pure: they turn descriptors and
//! [`FeatureOptions`] into a [`CommandLine`] without touching the file system
//! or spawning anything.
//!
//! A command line is executed without a shell, one token per process
//! argument. Its rendered form (program and arguments joined by spaces, with
//! paths and URLs in double quotes where the renderer expects them) is what
//! is logged and what is checked against [`CMD_MAX_LEN`].

pub mod merger;
pub mod options;
pub mod renderer;

use std::fmt;

use crate::error::{CommandError, PdfBindError, Result};

pub use options::FeatureOptions;
pub use renderer::RenderRequest;

/// Maximum length of a rendered command line, in characters.
pub const CMD_MAX_LEN: usize = 8192;

/// One argument of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    value: String,
    quoted: bool,
}

impl Arg {
    /// A bare argument.
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: false,
        }
    }

    /// An argument shown in double quotes when rendered.
    pub fn quoted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            quoted: true,
        }
    }

    /// The raw value passed to the process.
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.quoted {
            write!(f, "\"{}\"", self.value)
        } else {
            f.write_str(&self.value)
        }
    }
}

/// A complete, length-checked invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<Arg>,
}

impl CommandLine {
    /// Assemble a command line, rejecting it if the rendered form is longer
    /// than [`CMD_MAX_LEN`].
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::CommandFailed`] with
    /// [`CommandError::TooLong`].
    pub fn new(program: impl Into<String>, args: Vec<Arg>) -> Result<Self> {
        let command = Self {
            program: program.into(),
            args,
        };

        let len = command.rendered_len();
        if len > CMD_MAX_LEN {
            return Err(PdfBindError::CommandFailed {
                program: command.program,
                source: CommandError::TooLong {
                    len,
                    max: CMD_MAX_LEN,
                },
            });
        }

        Ok(command)
    }

    /// Executable name or path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments in order.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Argument values in order, as passed to the process.
    pub fn arg_values(&self) -> impl Iterator<Item = &str> {
        self.args.iter().map(Arg::value)
    }

    fn rendered_len(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
