//! CLI argument parsing for pdfbind.
//!
//! This module defines the command-line interface structure using `clap`
//! and turns it into a validated [`Config`].
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::cli::Cli;
//! use clap::Parser;
//!
//! let cli = Cli::parse();
//! println!("Assembling {}", cli.instructions.display());
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::config::{Config, DEFAULT_MERGER, DEFAULT_RENDERER, LogDestination, ToolPaths};
use crate::error::{PdfBindError, Result};
use crate::output::Verbosity;

/// Assemble a sequence of HTML documents into a single PDF.
///
/// pdfbind reads an instruction file describing a cover page, body
/// segments, running headers and footers, a table of contents and an
/// optional watermark, renders each part with an HTML-to-PDF tool and
/// merges the results into the target document.
#[derive(Parser, Debug)]
#[command(name = "pdfbind")]
#[command(version)]
#[command(about = "Assemble HTML documents into a single PDF", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Instruction file describing the job
    ///
    /// A line-oriented file of `key = value` records: one job block
    /// followed by one block per segment, each terminated by `end`.
    #[arg(required = true, value_name = "INSTRUCTIONS")]
    pub instructions: PathBuf,

    /// HTML-to-PDF renderer executable
    #[arg(long, value_name = "EXE", env = "PDFBIND_RENDERER", default_value = DEFAULT_RENDERER)]
    pub renderer: String,

    /// PDF merge and watermark executable
    #[arg(long, value_name = "EXE", env = "PDFBIND_MERGER", default_value = DEFAULT_MERGER)]
    pub merger: String,

    /// Directory in which temporary files are created
    #[arg(long, value_name = "DIR", env = "PDFBIND_TEMP_DIR", default_value = ".")]
    pub temp_dir: PathBuf,

    /// Leave intermediate files on disk after the run
    ///
    /// Useful for inspecting the segment PDFs, outline dumps and
    /// header/footer snippets the renderer was given.
    #[arg(long)]
    pub keep_temp_files: bool,

    /// Dry run - parse the instructions and show the planned commands
    ///
    /// No external tool is started and no output file is created.
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show details for each stage
    #[arg(short, long)]
    pub verbose: bool,

    /// Debug output - also show every command line
    #[arg(long, conflicts_with = "quiet")]
    pub debug: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print a JSON summary of the run on stdout
    #[arg(long)]
    pub json: bool,

    /// Append diagnostics to this file
    #[arg(long, value_name = "FILE", conflicts_with = "log_dir")]
    pub log_file: Option<PathBuf>,

    /// Write diagnostics to a timestamped file in this directory
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::Argument`] if the flags are inconsistent or
    /// the instruction file does not exist.
    pub fn to_config(&self) -> Result<Config> {
        let verbosity = if self.quiet {
            Verbosity::Quiet
        } else if self.debug {
            Verbosity::Debug
        } else if self.verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        let log = match (&self.log_file, &self.log_dir) {
            (Some(file), _) => LogDestination::File(file.clone()),
            (None, Some(dir)) => LogDestination::Directory(dir.clone()),
            (None, None) => LogDestination::None,
        };

        let config = Config {
            instructions: self.instructions.clone(),
            tools: ToolPaths {
                renderer: self.renderer.clone(),
                merger: self.merger.clone(),
            },
            temp_dir: self.temp_dir.clone(),
            keep_temp_files: self.keep_temp_files,
            dry_run: self.dry_run,
            json: self.json,
            verbosity,
            log,
        };

        config.validate().map_err(|e| {
            PdfBindError::argument(format!("Configuration validation failed: {e}"))
        })?;

        if !config.instructions.is_file() {
            return Err(PdfBindError::argument(format!(
                "Instruction file not found: {}",
                config.instructions.display()
            )));
        }

        Ok(config)
    }
}
