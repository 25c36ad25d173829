//! Final merge and watermark stamping.
//!
//! The merger concatenates cover, TOC and body segments in that order. With
//! a watermark, the concatenation goes to an intermediate artifact which is
//! then stamped onto the target and removed.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::artifacts::{ArtifactId, ArtifactKind, ArtifactManager};
use crate::command::{CommandLine, merger};
use crate::error::{PdfBindError, Result};
use crate::output::Diagnostics;
use crate::process::{StdinMode, ToolProcess, ToolRunner};

/// Inputs of the final merge.
#[derive(Debug, Clone, Default)]
pub struct MergePlan {
    /// Cover page PDF.
    pub cover: Option<ArtifactId>,
    /// Table of contents PDF.
    pub toc: Option<ArtifactId>,
    /// Body segment PDFs in order.
    pub segments: Vec<ArtifactId>,
    /// Watermark PDF.
    pub watermark: Option<ArtifactId>,
    /// Output file.
    pub target: PathBuf,
}

impl MergePlan {
    /// Cover, TOC and segments in merge order.
    pub fn inputs(&self) -> impl Iterator<Item = ArtifactId> + '_ {
        self.cover
            .iter()
            .chain(self.toc.iter())
            .chain(self.segments.iter())
            .copied()
    }
}

/// Runs the merger.
#[derive(Debug)]
pub struct MergeDriver<'a, R> {
    runner: &'a R,
    program: &'a str,
    diagnostics: &'a Diagnostics,
}

impl<'a, R: ToolRunner> MergeDriver<'a, R> {
    /// Create a driver running `program` through `runner`.
    pub fn new(runner: &'a R, program: &'a str, diagnostics: &'a Diagnostics) -> Self {
        Self {
            runner,
            program,
            diagnostics,
        }
    }

    /// Produce `plan.target`.
    ///
    /// # Errors
    ///
    /// - [`PdfBindError::MergerFailed`] if a merger run exits non-zero
    /// - [`PdfBindError::CommandFailed`] if the merger cannot be started or
    ///   a command is too long
    /// - [`PdfBindError::TempFile`] if the intermediate artifact cannot be
    ///   allocated
    pub async fn merge(&self, artifacts: &mut ArtifactManager, plan: &MergePlan) -> Result<()> {
        let inputs: Vec<PathBuf> = plan.inputs().map(|id| artifacts.path(id)).collect();
        let inputs = inputs.iter().map(PathBuf::as_path);

        let Some(watermark) = plan.watermark else {
            let command = merger::concatenate(self.program, inputs, &plan.target)?;
            return self.run(&command).await;
        };

        let intermediate = artifacts.allocate(ArtifactKind::Pdf)?;
        let intermediate_path = artifacts.path(intermediate);

        let command = merger::concatenate(self.program, inputs, &intermediate_path)?;
        self.run(&command).await?;

        info!(watermark = %watermark, "Stamping watermark");
        let command = merger::stamp(
            self.program,
            &intermediate_path,
            &artifacts.path(watermark),
            &plan.target,
        )?;
        self.run(&command).await?;

        artifacts.remove(intermediate);
        Ok(())
    }

    async fn run(&self, command: &CommandLine) -> Result<()> {
        debug!(%command, "Starting merger");
        self.diagnostics.detail("Command", &command.to_string());

        let status = self.runner.spawn(command, StdinMode::Null)?.wait().await?;
        if status != 0 {
            return Err(PdfBindError::MergerFailed {
                program: self.program.to_string(),
                status,
            });
        }
        Ok(())
    }
}

/// Create the parent directory of `target` if it does not exist.
///
/// # Errors
///
/// Returns [`PdfBindError::BadFile`] if the directory cannot be created.
pub fn ensure_parent_dir(target: &Path) -> Result<()> {
    if let Some(parent) = target.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|err| PdfBindError::bad_file(parent, err))?;
    }
    Ok(())
}
