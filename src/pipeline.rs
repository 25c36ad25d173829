//! The assembly pipeline.
//!
//! ```text
//! ParseJob -> ConvertCover? -> OpenToc
//!   -> for each segment { ParseSegment -> Convert -> ReadOutline -> AppendToc }
//!   -> CloseToc -> ConvertWatermark? -> Merge -> Cleanup
//! ```
//!
//! [`Pipeline::run`] owns the [`ArtifactManager`] for the whole run. On
//! success every artifact has been removed explicitly by the stage that last
//! used it; on failure whatever is still live is removed before the error is
//! returned.

use std::collections::TryReserveError;
use std::io::BufRead;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{debug, info};

use crate::artifacts::{ArtifactId, ArtifactManager};
use crate::command::FeatureOptions;
use crate::config::Config;
use crate::convert::Converter;
use crate::error::{PdfBindError, Result};
use crate::io::PdfReader;
use crate::job::{InstructionReader, JobDescriptor, TocMode};
use crate::merge::{MergeDriver, MergePlan, ensure_parent_dir};
use crate::output::Diagnostics;
use crate::process::{SystemRunner, ToolRunner};
use crate::toc::{TocAssembler, TocEntry, TocOutput, TocWriter, read_outline};

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// The assembled PDF.
    pub target: PathBuf,
    /// Number of body segments.
    pub segments: usize,
    /// Pages in the body segments.
    pub body_pages: u64,
    /// Whether a cover page was rendered.
    pub cover: bool,
    /// Whether the table of contents was rendered.
    pub toc_shown: bool,
    /// Table of contents entries, rendered or not.
    pub toc: Vec<TocEntry>,
    /// Whether a watermark was applied.
    pub watermark: bool,
}

/// One body segment as planned by a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct PlannedSegment {
    /// Full source URL.
    pub source: String,
    /// Page size.
    pub size: String,
    /// Orientation.
    pub orientation: String,
    /// Renderer features.
    pub options: String,
}

/// What a run would do.
#[derive(Debug, Clone, Serialize)]
pub struct DryRunPlan {
    /// Output file.
    pub target: PathBuf,
    /// Cover source URL, if a cover is rendered.
    pub cover: Option<String>,
    /// Whether the table of contents is rendered.
    pub toc_shown: bool,
    /// Watermark source URL.
    pub watermark: Option<String>,
    /// Body segments in order.
    pub segments: Vec<PlannedSegment>,
}

/// Outcome of [`run`].
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Outcome {
    /// The document was assembled.
    Assembled(RunSummary),
    /// Dry run: nothing was executed.
    Planned(DryRunPlan),
}

/// Run the job described by `config` with the system's tools.
///
/// # Errors
///
/// Any [`PdfBindError`] raised by a stage.
pub async fn run(config: &Config, diagnostics: &Diagnostics) -> Result<Outcome> {
    let pipeline = Pipeline::new(&SystemRunner, config, diagnostics);
    if config.dry_run {
        pipeline.plan().map(Outcome::Planned)
    } else {
        pipeline.run().await.map(Outcome::Assembled)
    }
}

/// Sequences the stages of one run.
#[derive(Debug)]
pub struct Pipeline<'a, R> {
    runner: &'a R,
    config: &'a Config,
    diagnostics: &'a Diagnostics,
    reader: PdfReader,
}

impl<'a, R: ToolRunner> Pipeline<'a, R> {
    /// Create a pipeline that starts tools through `runner`.
    pub fn new(runner: &'a R, config: &'a Config, diagnostics: &'a Diagnostics) -> Self {
        Self {
            runner,
            config,
            diagnostics,
            reader: PdfReader::new(),
        }
    }

    /// Assemble the document.
    ///
    /// # Errors
    ///
    /// Any [`PdfBindError`] raised by a stage. No artifacts are left behind
    /// either way.
    pub async fn run(&self) -> Result<RunSummary> {
        let mut artifacts =
            ArtifactManager::new(&self.config.temp_dir, self.config.keep_temp_files)?;

        match self.execute(&mut artifacts).await {
            Ok(summary) => {
                artifacts.finish();
                Ok(summary)
            }
            Err(err) => {
                let removed = artifacts.remove_all();
                debug!(removed, error = %err, "Removed artifacts after failure");
                Err(err)
            }
        }
    }

    /// Parse the instructions and describe the run without starting any tool.
    ///
    /// # Errors
    ///
    /// Parse errors, as for [`run`](Self::run).
    pub fn plan(&self) -> Result<DryRunPlan> {
        let mut artifacts = ArtifactManager::new(&self.config.temp_dir, false)?;
        let mut instructions = InstructionReader::open(&self.config.instructions)?;
        let job = instructions.read_job(&mut artifacts)?;

        let options = FeatureOptions::BODY.derive_header_footer(&job);
        let mut segments = Vec::new();
        reserve_segments(&mut segments, job.segments)?;
        for index in 0..job.segments {
            let segment = instructions.read_segment(index)?;
            segments.push(PlannedSegment {
                source: job.source_url(&segment.source),
                size: segment.size,
                orientation: segment.orientation,
                options: format!("{options:?}"),
            });
        }

        artifacts.remove_all();
        artifacts.finish();

        Ok(DryRunPlan {
            target: PathBuf::from(&job.target_path),
            cover: job
                .cover
                .descriptor()
                .map(|cover| job.source_url(&cover.source)),
            toc_shown: job.toc_mode == TocMode::Show,
            watermark: job.watermark_url.as_deref().map(|url| job.source_url(url)),
            segments,
        })
    }

    async fn execute(&self, artifacts: &mut ArtifactManager) -> Result<RunSummary> {
        info!(instructions = %self.config.instructions.display(), "Parsing job");
        let mut instructions = InstructionReader::open(&self.config.instructions)?;
        let job = instructions.read_job(artifacts)?;
        self.diagnostics.detail("Segments", &job.segments.to_string());
        self.diagnostics.detail("Target", &job.target_path);

        let summary = self.assemble(artifacts, &mut instructions, &job).await?;

        for id in &job.html_artifacts {
            artifacts.remove(*id);
        }
        Ok(summary)
    }

    async fn assemble<B: BufRead>(
        &self,
        artifacts: &mut ArtifactManager,
        instructions: &mut InstructionReader<B>,
        job: &JobDescriptor,
    ) -> Result<RunSummary> {
        let mut segments: Vec<ArtifactId> = Vec::new();
        reserve_segments(&mut segments, job.segments)?;

        let converter = Converter::new(
            self.runner,
            &self.config.tools.renderer,
            job,
            self.diagnostics,
        );

        info!("Converting cover page");
        let cover = converter.convert_cover(artifacts).await?;
        if cover.is_some() {
            self.diagnostics.info("Converted cover page");
        }

        let (toc_render, output) = match job.toc_mode {
            TocMode::Show => {
                let mut pending = converter.start_toc(artifacts)?;
                let stdin = pending.take_stdin().ok_or(PdfBindError::contract(
                    "table of contents",
                    "renderer standard input",
                ))?;
                (Some(pending), TocOutput::Renderer(stdin))
            }
            TocMode::Hide => (None, TocOutput::discard()),
        };
        let mut toc = TocWriter::start(
            output,
            job.font_family.as_deref(),
            job.font_size.as_deref(),
        )
        .await?;
        let mut assembler = TocAssembler::new();

        let options = FeatureOptions::BODY.derive_header_footer(job);
        for index in 0..job.segments {
            let segment = instructions.read_segment(index)?;
            self.diagnostics.step(
                index + 1,
                job.segments,
                &format!("Converting {}", segment.source),
            );

            let conversion = converter
                .convert(artifacts, &segment, assembler.running_total(), options)
                .await?;
            segments.push(conversion.pdf);

            let outline = conversion.outline.ok_or(PdfBindError::contract(
                "segment conversion",
                "outline dump",
            ))?;
            let items = read_outline(&artifacts.path(outline)).await?;
            let pages = self.reader.page_count(&artifacts.path(conversion.pdf)).await?;

            for entry in assembler.append_segment(items, pages) {
                toc.entry(entry).await?;
            }
            artifacts.remove(outline);
            debug!(index, pages, total = assembler.running_total(), "Segment converted");
        }

        info!("Closing table of contents");
        toc.finish().await?;
        let toc_pdf = match toc_render {
            Some(pending) => Some(pending.finish().await?.pdf),
            None => None,
        };

        info!("Converting watermark");
        let watermark = converter.convert_watermark(artifacts).await?;

        let target = PathBuf::from(&job.target_path);
        ensure_parent_dir(&target)?;

        let plan = MergePlan {
            cover,
            toc: toc_pdf,
            segments,
            watermark,
            target,
        };
        info!(target = %plan.target.display(), "Merging");
        self.diagnostics.info(&format!("Merging into {}", plan.target.display()));
        MergeDriver::new(self.runner, &self.config.tools.merger, self.diagnostics)
            .merge(artifacts, &plan)
            .await?;

        for id in plan.inputs().chain(plan.watermark) {
            artifacts.remove(id);
        }

        Ok(RunSummary {
            target: plan.target,
            segments: plan.segments.len(),
            body_pages: assembler.running_total(),
            cover: plan.cover.is_some(),
            toc_shown: plan.toc.is_some(),
            toc: assembler.entries().to_vec(),
            watermark: plan.watermark.is_some(),
        })
    }
}

fn reserve_segments<T>(segments: &mut Vec<T>, count: usize) -> Result<()> {
    segments
        .try_reserve_exact(count)
        .map_err(|err: TryReserveError| PdfBindError::AllocationFailure {
            what: format!("{count} segments ({err})"),
        })
}
