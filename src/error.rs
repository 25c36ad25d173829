//! Error types for pdfbind.
//!
//! Every failure in the assembly pipeline is fatal: errors are propagated as
//! [`PdfBindError`] values up to the orchestrator, which cleans up whatever
//! temporary artifacts exist and hands the error to `main` for a single
//! diagnostic line and the matching process exit code.
//!
//! # Error Categories
//!
//! - **Input Errors**: missing instruction file, incomplete job or segment
//!   records, malformed numbers
//! - **Resource Errors**: temp files, file I/O, memory reservation
//! - **Tool Errors**: renderer or merger exited with a non-zero status, or
//!   could not be started at all
//! - **Contract Errors**: a command was requested without the data it needs

use std::io;
use std::path::PathBuf;

/// Result type alias for pdfbind operations.
pub type Result<T> = std::result::Result<T, PdfBindError>;

/// The record an instruction-file error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Record {
    /// The job header block.
    Job,
    /// A body segment block (0-based index).
    Segment(usize),
}

impl std::fmt::Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Job => write!(f, "initial segment"),
            Self::Segment(index) => write!(f, "segment {}", index + 1),
        }
    }
}

/// Why an external command could not be executed.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// The rendered command line exceeds the maximum length.
    #[error("command line is {len} characters, limit is {max}")]
    TooLong {
        /// Length of the rendered command line.
        len: usize,
        /// Maximum permitted length.
        max: usize,
    },

    /// The process could not be spawned.
    #[error("{0}")]
    Spawn(#[source] io::Error),
}

/// Main error type for pdfbind operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfBindError {
    /// Invalid invocation: missing or unreadable instruction file, bad flags.
    #[error("Invalid argument: {message}")]
    Argument {
        /// What is wrong with the invocation.
        message: String,
    },

    /// Storage for the job could not be reserved.
    #[error("Failed to allocate memory for {what}")]
    AllocationFailure {
        /// What the storage was for.
        what: String,
    },

    /// An internal precondition was violated.
    #[error("{context} encountered an unexpected missing value ({what})")]
    ContractViolation {
        /// Operation that detected the violation.
        context: &'static str,
        /// The missing value.
        what: &'static str,
    },

    /// A temporary file could not be acquired.
    #[error("Failed to acquire a temporary file: {reason}")]
    TempFile {
        /// Reason for the failure.
        reason: String,
    },

    /// The HTML renderer exited with a non-zero status.
    #[error("{program} exited with status {status}")]
    RendererFailed {
        /// Renderer executable.
        program: String,
        /// Exit status reported by the process.
        status: i32,
    },

    /// An external command could not be executed.
    #[error("Failed to execute {program} ({source})")]
    CommandFailed {
        /// Executable that was being run.
        program: String,
        /// Underlying cause.
        #[source]
        source: CommandError,
    },

    /// A required field is missing from a job or segment record.
    #[error("Failed to read {record}: missing {field}")]
    BadSegment {
        /// Which record was incomplete.
        record: Record,
        /// Name of the first missing key.
        field: &'static str,
    },

    /// A file could not be opened, read or written.
    #[error("Failed to use file: {}\n  Reason: {source}", path.display())]
    BadFile {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Text could not be converted or formatted.
    #[error("Failed to convert string: {message}")]
    StringOp {
        /// Details about the conversion.
        message: String,
    },

    /// The PDF merger exited with a non-zero status.
    #[error("{program} exited with status {status}")]
    MergerFailed {
        /// Merger executable.
        program: String,
        /// Exit status reported by the process.
        status: i32,
    },

    /// A rendered PDF or its outline dump could not be read.
    #[error("Failed to read PDF: {}\n  Reason: {reason}", path.display())]
    PdfRead {
        /// Path of the PDF.
        path: PathBuf,
        /// Reason for the failure.
        reason: String,
    },

    /// Generic I/O error without a known path.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

impl PdfBindError {
    /// Create an Argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument {
            message: message.into(),
        }
    }

    /// Create a ContractViolation error.
    pub fn contract(context: &'static str, what: &'static str) -> Self {
        Self::ContractViolation { context, what }
    }

    /// Create a TempFile error.
    pub fn temp_file(reason: impl Into<String>) -> Self {
        Self::TempFile {
            reason: reason.into(),
        }
    }

    /// Create a BadFile error.
    pub fn bad_file(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::BadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a BadSegment error.
    pub fn bad_segment(record: Record, field: &'static str) -> Self {
        Self::BadSegment { record, field }
    }

    /// Create a StringOp error.
    pub fn string_op(message: impl Into<String>) -> Self {
        Self::StringOp {
            message: message.into(),
        }
    }

    /// Create a PdfRead error.
    pub fn pdf_read(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::PdfRead {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a CommandFailed error for a process that could not be spawned.
    pub fn spawn_failed(program: impl Into<String>, source: io::Error) -> Self {
        Self::CommandFailed {
            program: program.into(),
            source: CommandError::Spawn(source),
        }
    }

    /// Check if this error indicates a defect rather than bad input or a tool
    /// failure.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::ContractViolation { .. })
    }

    /// Get the exit code for this error.
    ///
    /// Codes are stable: scripts driving pdfbind rely on them.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Argument { .. } => 1,
            Self::AllocationFailure { .. } => 2,
            Self::ContractViolation { .. } => 3,
            Self::TempFile { .. } => 4,
            Self::RendererFailed { .. } => 5,
            Self::CommandFailed { .. } => 6,
            Self::BadSegment { .. } => 7,
            Self::BadFile { .. } => 8,
            Self::StringOp { .. } => 9,
            Self::MergerFailed { .. } => 10,
            Self::PdfRead { .. } => 11,
            Self::Io { .. } => 8,
        }
    }
}

impl From<anyhow::Error> for PdfBindError {
    fn from(err: anyhow::Error) -> Self {
        Self::argument(err.to_string())
    }
}
