//! Segment conversion.
//!
//! A [`Converter`] turns one page source (a body segment, the cover, the
//! watermark or the table of contents) into a PDF artifact by running the
//! renderer. [`Converter::start`] returns as soon as the renderer is running;
//! [`PendingConversion::finish`] waits for it. [`Converter::convert`] does
//! both.

use tracing::debug;

use crate::artifacts::{ArtifactId, ArtifactKind, ArtifactManager};
use crate::command::{FeatureOptions, RenderRequest};
use crate::error::{PdfBindError, Result};
use crate::job::{JobDescriptor, Margins, SegmentDescriptor};
use crate::output::Diagnostics;
use crate::process::{StdinMode, ToolProcess, ToolRunner};

/// Source the renderer reads from standard input.
pub const STDIN_SOURCE: &str = "-";

/// Artifacts produced by one conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    /// The rendered PDF.
    pub pdf: ArtifactId,
    /// The outline dump, when DUMP_OUTLINE was requested.
    pub outline: Option<ArtifactId>,
}

/// A renderer that has been started but not yet waited for.
///
/// Consumed by [`finish`](Self::finish), so it can be waited for only once.
#[derive(Debug)]
#[must_use = "a started conversion must be finished"]
pub struct PendingConversion<P> {
    process: P,
    program: String,
    conversion: Conversion,
}

impl<P: ToolProcess> PendingConversion<P> {
    /// Artifacts the renderer is writing.
    pub fn conversion(&self) -> Conversion {
        self.conversion
    }

    /// Take the renderer's stdin pipe, if it was started with one.
    pub fn take_stdin(&mut self) -> Option<P::Stdin> {
        self.process.take_stdin()
    }

    /// Wait for the renderer.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::RendererFailed`] on a non-zero exit status.
    pub async fn finish(self) -> Result<Conversion> {
        let status = self.process.wait().await?;
        if status != 0 {
            return Err(PdfBindError::RendererFailed {
                program: self.program,
                status,
            });
        }
        Ok(self.conversion)
    }
}

/// Page geometry and source for one renderer run.
struct Page<'a> {
    source: String,
    size: Option<&'a str>,
    orientation: Option<&'a str>,
    margins: &'a Margins,
}

/// Drives the renderer for one job.
#[derive(Debug)]
pub struct Converter<'a, R> {
    runner: &'a R,
    program: &'a str,
    job: &'a JobDescriptor,
    diagnostics: &'a Diagnostics,
}

impl<'a, R: ToolRunner> Converter<'a, R> {
    /// Create a converter running `program` through `runner`.
    pub fn new(
        runner: &'a R,
        program: &'a str,
        job: &'a JobDescriptor,
        diagnostics: &'a Diagnostics,
    ) -> Self {
        Self {
            runner,
            program,
            job,
            diagnostics,
        }
    }

    /// Start converting a segment.
    ///
    /// The PDF artifact (and the outline artifact, for DUMP_OUTLINE) is
    /// allocated before the renderer starts.
    ///
    /// # Errors
    ///
    /// Returns an error if an artifact cannot be allocated, the command
    /// cannot be built or the renderer cannot be started.
    pub fn start(
        &self,
        artifacts: &mut ArtifactManager,
        segment: &SegmentDescriptor,
        page_offset: u64,
        options: FeatureOptions,
    ) -> Result<PendingConversion<R::Process>> {
        let page = Page {
            source: self.job.source_url(&segment.source),
            size: Some(segment.size.as_str()),
            orientation: Some(segment.orientation.as_str()),
            margins: &self.job.margins,
        };
        self.launch(artifacts, page, page_offset, options, StdinMode::Null)
    }

    /// Convert a segment and wait for the renderer.
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start), plus [`PdfBindError::RendererFailed`].
    pub async fn convert(
        &self,
        artifacts: &mut ArtifactManager,
        segment: &SegmentDescriptor,
        page_offset: u64,
        options: FeatureOptions,
    ) -> Result<Conversion> {
        self.start(artifacts, segment, page_offset, options)?
            .finish()
            .await
    }

    /// Convert the cover page, if the job describes a complete one.
    ///
    /// # Errors
    ///
    /// As [`convert`](Self::convert).
    pub async fn convert_cover(
        &self,
        artifacts: &mut ArtifactManager,
    ) -> Result<Option<ArtifactId>> {
        let Some(cover) = self.job.cover.descriptor() else {
            return Ok(None);
        };

        let options = FeatureOptions::COVER_PAGE.derive_header_footer(self.job);
        let conversion = self.convert(artifacts, &cover, 0, options).await?;
        Ok(Some(conversion.pdf))
    }

    /// Convert the watermark page, if the job names one.
    ///
    /// The watermark uses the cover's page size, no margins and the `cover`
    /// token.
    ///
    /// # Errors
    ///
    /// As [`convert`](Self::convert).
    pub async fn convert_watermark(
        &self,
        artifacts: &mut ArtifactManager,
    ) -> Result<Option<ArtifactId>> {
        let Some(watermark) = &self.job.watermark_url else {
            return Ok(None);
        };

        let margins = Margins::zero();
        let page = Page {
            source: self.job.source_url(watermark),
            size: self.job.cover.size.as_deref(),
            orientation: self.job.cover.orientation.as_deref(),
            margins: &margins,
        };
        let options = self.cover_geometry(FeatureOptions::WATERMARK);
        let conversion = self
            .launch(artifacts, page, 0, options, StdinMode::Null)?
            .finish()
            .await?;
        Ok(Some(conversion.pdf))
    }

    /// Start the renderer for the table of contents, reading its HTML from
    /// standard input.
    ///
    /// # Errors
    ///
    /// As [`start`](Self::start).
    pub fn start_toc(
        &self,
        artifacts: &mut ArtifactManager,
    ) -> Result<PendingConversion<R::Process>> {
        let page = Page {
            source: STDIN_SOURCE.to_string(),
            size: self.job.cover.size.as_deref(),
            orientation: self.job.cover.orientation.as_deref(),
            margins: &self.job.margins,
        };
        let options = self.cover_geometry(FeatureOptions::TOC_PAGE);
        self.launch(artifacts, page, 0, options, StdinMode::Piped)
    }

    /// Drop SIZE and ORIENTATION when the cover does not define them.
    fn cover_geometry(&self, mut options: FeatureOptions) -> FeatureOptions {
        if self.job.cover.size.is_none() {
            options.remove(FeatureOptions::SIZE);
        }
        if self.job.cover.orientation.is_none() {
            options.remove(FeatureOptions::ORIENTATION);
        }
        options
    }

    fn launch(
        &self,
        artifacts: &mut ArtifactManager,
        page: Page<'_>,
        page_offset: u64,
        options: FeatureOptions,
        stdin: StdinMode,
    ) -> Result<PendingConversion<R::Process>> {
        let outline = if options.contains(FeatureOptions::DUMP_OUTLINE) {
            Some(artifacts.allocate(ArtifactKind::Outline)?)
        } else {
            None
        };
        let pdf = artifacts.allocate(ArtifactKind::Pdf)?;

        let resolved = self.job.resolve_header_footer(options);
        let header = resolved.header.map(|id| artifacts.path(id));
        let footer = resolved.footer.map(|id| artifacts.path(id));
        let target = artifacts.path(pdf);
        let outline_path = outline.map(|id| artifacts.path(id));

        let command = RenderRequest {
            program: self.program,
            options,
            source: page.source,
            target: &target,
            outline: outline_path.as_deref(),
            footer: footer.as_deref(),
            header: header.as_deref(),
            page_offset,
            orientation: page.orientation,
            size: page.size,
            margins: page.margins,
        }
        .build()?;

        debug!(%command, "Starting renderer");
        self.diagnostics.detail("Command", &command.to_string());
        let process = self.runner.spawn(&command, stdin)?;

        Ok(PendingConversion {
            process,
            program: self.program.to_string(),
            conversion: Conversion { pdf, outline },
        })
    }
}
