//! Instruction file parser.
//!
//! An instruction file is a sequence of record blocks. Each block is a run of
//! `key = value` lines terminated by a line reading `end` (or by the end of
//! the file). The first block describes the job, every following block one
//! body segment:
//!
//! ```text
//! ; job
//! iSegments   = 2
//! sBaseURL    = http://reports.local/render?
//! sTargetPath = out/report.pdf
//! sHeaderHTML = <div class="header">Quarterly report</div>
//! end
//! sSegmentURL = doc=1
//! sSize       = A4
//! sOrientation = Portrait
//! end
//! ```
//!
//! Lines whose first non-blank character is `;` are comments. Keys and values
//! are trimmed. Unknown keys are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::artifacts::{ArtifactId, ArtifactKind, ArtifactManager};
use crate::error::{PdfBindError, Record, Result};
use crate::job::{HeaderFooterMode, JobDescriptor, SegmentDescriptor, TocMode};

/// One meaningful line of a record block.
#[derive(Debug, PartialEq, Eq)]
enum Line<'a> {
    /// `key = value`, both trimmed.
    Entry(&'a str, &'a str),
    /// The `end` terminator.
    End,
    /// Comment, blank or stray text.
    Skip,
}

fn classify(line: &str) -> Line<'_> {
    let content = line.trim_start();
    if content.starts_with(';') {
        return Line::Skip;
    }

    match line.split_once('=') {
        Some((key, value)) => Line::Entry(key.trim(), value.trim()),
        None if line.trim() == "end" => Line::End,
        None => Line::Skip,
    }
}

/// Sequential reader over the blocks of an instruction file.
#[derive(Debug)]
pub struct InstructionReader<R> {
    reader: R,
    name: PathBuf,
    buf: String,
}

impl InstructionReader<BufReader<File>> {
    /// Open an instruction file.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the file cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|err| PdfBindError::bad_file(path, err))?;
        Ok(Self::new(BufReader::new(file), path))
    }
}

impl<R: BufRead> InstructionReader<R> {
    /// Wrap a buffered reader. `name` is used in error messages.
    pub fn new(reader: R, name: impl Into<PathBuf>) -> Self {
        Self {
            reader,
            name: name.into(),
            buf: String::new(),
        }
    }

    /// Read the next raw line, without its line terminator.
    fn next_line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        let read = self
            .reader
            .read_line(&mut self.buf)
            .map_err(|err| PdfBindError::bad_file(&self.name, err))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.trim_end_matches(['\n', '\r'])))
    }

    /// Read the job block.
    ///
    /// Header and footer HTML values are written to fresh artifacts allocated
    /// from `artifacts`; their ids are recorded in the descriptor.
    ///
    /// # Errors
    ///
    /// - [`PdfBindError::StringOp`] if `iSegments` is not an unsigned integer
    /// - [`PdfBindError::BadSegment`] if `iSegments`, `sBaseURL` or
    ///   `sTargetPath` is missing
    /// - [`PdfBindError::TempFile`] / [`PdfBindError::BadFile`] if an HTML
    ///   artifact cannot be created or written
    pub fn read_job(&mut self, artifacts: &mut ArtifactManager) -> Result<JobDescriptor> {
        let mut job = JobDescriptor::default();
        let mut segments = None;
        let mut base_url = None;
        let mut target_path = None;

        while let Some(line) = self.next_line()? {
            let (key, value) = match classify(line) {
                Line::Entry(key, value) => (key, value),
                Line::End => break,
                Line::Skip => continue,
            };
            let text = || Some(value.to_string());

            match key {
                "iSegments" => {
                    segments = Some(value.parse::<usize>().map_err(|err| {
                        PdfBindError::string_op(format!("iSegments \"{value}\": {err}"))
                    })?);
                }
                "sBaseURL" => base_url = text(),
                "sTargetPath" => target_path = text(),
                "sCoverPageURL" => job.cover.source = text(),
                "sSize" => job.cover.size = text(),
                "sOrientation" => job.cover.orientation = text(),
                "sSession" => job.session = text(),
                "sTopMargin" => job.margins.top = text(),
                "sBottomMargin" => job.margins.bottom = text(),
                "sLeftMargin" => job.margins.left = text(),
                "sRightMargin" => job.margins.right = text(),
                "sHeaderMargin" => job.margins.header_spacing = text(),
                "sFooterMargin" => job.margins.footer_spacing = text(),
                "sTableOfContentsOptions" => {
                    if let Some(mode) = TocMode::from_option_text(value) {
                        job.toc_mode = mode;
                    }
                }
                "sHeaderFooterOptions" => {
                    if let Some(mode) = HeaderFooterMode::from_option_text(value) {
                        job.header_footer_mode = mode;
                    }
                }
                "sWatermarkURL" => job.watermark_url = text(),
                "sDocFontSize" => job.font_size = text(),
                "sDocFontFamily" => job.font_family = text(),
                "sHeaderHTML" => {
                    job.header_html = Some(write_html(artifacts, &mut job, value)?);
                }
                "sFooterHTML" => {
                    job.footer_html = Some(write_html(artifacts, &mut job, value)?);
                }
                "sFirstHeaderHTML" => {
                    job.first_header_html = Some(write_html(artifacts, &mut job, value)?);
                }
                "sFirstFooterHTML" => {
                    job.first_footer_html = Some(write_html(artifacts, &mut job, value)?);
                }
                other => debug!(key = other, "Ignoring unknown job key"),
            }
        }

        job.segments =
            segments.ok_or_else(|| PdfBindError::bad_segment(Record::Job, "iSegments"))?;
        job.base_url =
            base_url.ok_or_else(|| PdfBindError::bad_segment(Record::Job, "sBaseURL"))?;
        job.target_path =
            target_path.ok_or_else(|| PdfBindError::bad_segment(Record::Job, "sTargetPath"))?;

        Ok(job)
    }

    /// Read the block of body segment `index` (0-based).
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadSegment`] naming the first of
    /// `sSegmentURL`, `sSize`, `sOrientation` that is missing.
    pub fn read_segment(&mut self, index: usize) -> Result<SegmentDescriptor> {
        let mut source = None;
        let mut size = None;
        let mut orientation = None;

        while let Some(line) = self.next_line()? {
            match classify(line) {
                Line::Entry("sSegmentURL", value) => source = Some(value.to_string()),
                Line::Entry("sSize", value) => size = Some(value.to_string()),
                Line::Entry("sOrientation", value) => orientation = Some(value.to_string()),
                Line::Entry(key, _) => debug!(key, index, "Ignoring unknown segment key"),
                Line::End => break,
                Line::Skip => {}
            }
        }

        let record = Record::Segment(index);
        Ok(SegmentDescriptor {
            source: source.ok_or_else(|| PdfBindError::bad_segment(record, "sSegmentURL"))?,
            size: size.ok_or_else(|| PdfBindError::bad_segment(record, "sSize"))?,
            orientation: orientation
                .ok_or_else(|| PdfBindError::bad_segment(record, "sOrientation"))?,
        })
    }
}

/// Write one line of header/footer HTML to a new artifact.
fn write_html(
    artifacts: &mut ArtifactManager,
    job: &mut JobDescriptor,
    html: &str,
) -> Result<ArtifactId> {
    let id = artifacts.allocate(ArtifactKind::Html)?;
    job.html_artifacts.push(id);

    let path = artifacts.path(id);
    std::fs::write(&path, html).map_err(|err| PdfBindError::bad_file(path, err))?;
    Ok(id)
}
