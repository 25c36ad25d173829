//! User-facing diagnostics.
//!
//! [`Diagnostics`] is the single context object for everything pdfbind tells
//! the user: it is built once in `main` from the [`Config`], passed by
//! reference to every stage, and flushed when the run ends. Console output
//! honours the verbosity; when a log file is configured every message is also
//! appended to it with a level tag.
//!
//! # Examples
//!
//! ```
//! use pdfbind::output::{Diagnostics, Verbosity};
//!
//! let diagnostics = Diagnostics::new(Verbosity::Normal);
//! diagnostics.info("Converting segment 1 of 3");
//! diagnostics.success("Document assembled");
//! diagnostics.debug("Not shown at normal verbosity");
//! ```

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::artifacts::ARTIFACT_PREFIX;
use crate::config::{Config, LogDestination};
use crate::error::{PdfBindError, Result};

/// How much output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    /// Progress and results.
    #[default]
    Normal,
    /// Additional detail per stage.
    Verbose,
    /// Everything, including command lines.
    Debug,
}

/// Level of a single message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl MessageLevel {
    fn tag(self) -> &'static str {
        match self {
            Self::Error => "[ERROR] ",
            Self::Warning => "[WARN ] ",
            Self::Info | Self::Success => "[INFO ] ",
            Self::Debug => "[DEBUG] ",
        }
    }
}

/// Diagnostics context with configurable verbosity and an optional log file.
#[derive(Debug)]
pub struct Diagnostics {
    verbosity: Verbosity,
    colored: bool,
    log: Option<Mutex<BufWriter<File>>>,
}

impl Diagnostics {
    /// Create a console-only context.
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            colored: Self::should_use_color(),
            log: None,
        }
    }

    /// Create a context from configuration, opening the log file if one is
    /// configured.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the log file cannot be created.
    pub fn from_config(config: &Config) -> Result<Self> {
        // JSON output owns stdout
        let verbosity = if config.should_print() {
            config.verbosity
        } else {
            Verbosity::Quiet
        };
        let mut diagnostics = Self::new(verbosity);

        let path = match &config.log {
            LogDestination::None => None,
            LogDestination::File(path) => Some(path.clone()),
            LogDestination::Directory(dir) => Some(log_file_name(dir, ARTIFACT_PREFIX)),
        };

        if let Some(path) = path {
            diagnostics = diagnostics.with_log_file(&path)?;
        }

        Ok(diagnostics)
    }

    /// Create a quiet context (only errors).
    pub fn quiet() -> Self {
        Self::new(Verbosity::Quiet)
    }

    /// Also append every message to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the file cannot be opened.
    pub fn with_log_file(mut self, path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|err| PdfBindError::bad_file(path, err))?;
        self.log = Some(Mutex::new(BufWriter::new(file)));
        Ok(self)
    }

    /// Detect if colored output should be used.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message. Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        self.emit(MessageLevel::Info, message, self.should_print());
    }

    /// Print a success message. Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        self.emit(MessageLevel::Success, message, self.should_print());
    }

    /// Print a warning message. Always displayed.
    pub fn warning(&self, message: &str) {
        self.emit(MessageLevel::Warning, message, true);
    }

    /// Print an error message. Always displayed.
    pub fn error(&self, message: &str) {
        self.emit(MessageLevel::Error, message, true);
    }

    /// Print a verbose message. Only displayed in verbose and debug mode.
    pub fn debug(&self, message: &str) {
        self.emit(MessageLevel::Debug, message, self.is_verbose());
    }

    /// Print a section header. Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if self.should_print() {
            println!("\n{title}");
        }
        self.log_line(MessageLevel::Info, title);
    }

    /// Print a labelled detail. Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.is_verbose() {
            println!("  {label}: {value}");
        }
        self.log_line(MessageLevel::Debug, &format!("{label}: {value}"));
    }

    /// Print a progress step such as `[2/5] Converting ...`.
    pub fn step(&self, current: usize, total: usize, message: &str) {
        self.info(&format!("  [{current}/{total}] {message}"));
    }

    /// Print a blank line. Suppressed in quiet mode.
    pub fn blank_line(&self) {
        if self.should_print() {
            println!();
        }
    }

    /// Check if non-error output should be shown.
    pub fn should_print(&self) -> bool {
        self.verbosity > Verbosity::Quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbosity >= Verbosity::Verbose
    }

    /// Configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Flush the log file, if any.
    pub fn flush(&self) {
        if let Some(log) = &self.log
            && let Ok(mut writer) = log.lock()
        {
            writer.flush().ok();
        }
    }

    fn emit(&self, level: MessageLevel, message: &str, to_console: bool) {
        if to_console {
            self.print_message(level, message);
        }
        self.log_line(level, message);
    }

    fn log_line(&self, level: MessageLevel, message: &str) {
        if level == MessageLevel::Debug && self.verbosity < Verbosity::Debug {
            return;
        }
        if let Some(log) = &self.log
            && let Ok(mut writer) = log.lock()
        {
            writeln!(writer, "{}{}", level.tag(), message.trim_start()).ok();
        }
    }

    /// Print a message with level-appropriate formatting.
    fn print_message(&self, level: MessageLevel, message: &str) {
        let (prefix, color_code) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"), // Green
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"), // Yellow
            MessageLevel::Error => ("✗ ", "\x1b[31m"),   // Red
            MessageLevel::Debug => ("→ ", "\x1b[36m"),   // Cyan
        };

        let reset = "\x1b[0m";
        let line = if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}{reset}")
        } else {
            format!("{prefix}{message}")
        };

        match level {
            MessageLevel::Warning | MessageLevel::Error => eprintln!("{line}"),
            _ => println!("{line}"),
        }
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Verbosity::Normal)
    }
}

impl Drop for Diagnostics {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Log file name in `dir`: `<prefix>_YYYYMMDDTHHMMSS.<pid>.txt`.
pub fn log_file_name(dir: &Path, prefix: &str) -> PathBuf {
    let stamp = chrono::Local::now().format("%Y%m%dT%H%M%S");
    dir.join(format!("{prefix}_{stamp}.{}.txt", std::process::id()))
}
