//! Configuration module for pdfbind.
//!
//! This module holds the validated runtime configuration produced from the
//! command line. It handles:
//! - Resolution of the external tool executables
//! - Verbosity and log destination
//! - Validation of argument combinations

use anyhow::{Result, bail};
use std::path::{Path, PathBuf};

use crate::output::Verbosity;

/// Default HTML-to-PDF renderer executable.
pub const DEFAULT_RENDERER: &str = "wkhtmltopdf";

/// Default PDF merge/stamp executable.
pub const DEFAULT_MERGER: &str = "pdftk";

/// Executables used for the external stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// HTML-to-PDF renderer.
    pub renderer: String,
    /// PDF concatenation and watermark tool.
    pub merger: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            renderer: DEFAULT_RENDERER.to_string(),
            merger: DEFAULT_MERGER.to_string(),
        }
    }
}

/// Where the diagnostics log file goes, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LogDestination {
    /// Console only.
    #[default]
    None,
    /// Append to this exact file.
    File(PathBuf),
    /// Create a timestamped file in this directory.
    Directory(PathBuf),
}

/// Validated configuration for a pdfbind run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Instruction file describing the job.
    pub instructions: PathBuf,

    /// External tool executables.
    pub tools: ToolPaths,

    /// Directory under which the per-run artifact directory is created.
    pub temp_dir: PathBuf,

    /// Leave temporary artifacts on disk after the run.
    pub keep_temp_files: bool,

    /// Parse and plan only; spawn nothing.
    pub dry_run: bool,

    /// Print the run summary as JSON on stdout.
    pub json: bool,

    /// Console verbosity.
    pub verbosity: Verbosity,

    /// Optional log file.
    pub log: LogDestination,
}

impl Config {
    /// Create a configuration with defaults for everything except the
    /// instruction file.
    pub fn new(instructions: impl Into<PathBuf>) -> Self {
        Self {
            instructions: instructions.into(),
            tools: ToolPaths::default(),
            temp_dir: PathBuf::from("."),
            keep_temp_files: false,
            dry_run: false,
            json: false,
            verbosity: Verbosity::Normal,
            log: LogDestination::None,
        }
    }

    /// Returns the instruction file path.
    pub fn instructions(&self) -> &Path {
        &self.instructions
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The instruction path is empty
    /// - A tool executable name is empty
    /// - The temp directory does not exist
    pub fn validate(&self) -> Result<()> {
        if self.instructions.as_os_str().is_empty() {
            bail!("No instruction file specified");
        }

        if self.tools.renderer.trim().is_empty() {
            bail!("Renderer executable cannot be empty");
        }

        if self.tools.merger.trim().is_empty() {
            bail!("Merger executable cannot be empty");
        }

        if !self.temp_dir.is_dir() {
            bail!(
                "Temporary directory does not exist: {}",
                self.temp_dir.display()
            );
        }

        if let LogDestination::Directory(dir) = &self.log
            && !dir.is_dir()
        {
            bail!("Log directory does not exist: {}", dir.display());
        }

        Ok(())
    }

    /// Check if progress output should be displayed.
    pub fn should_print(&self) -> bool {
        self.verbosity > Verbosity::Quiet && !self.json
    }
}
