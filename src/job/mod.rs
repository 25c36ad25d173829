//! In-memory description of an assembly job.
//!
//! A [`JobDescriptor`] is produced once by the [`parser`] from the header
//! block of an instruction file and stays immutable for the rest of the run.
//! Body segments are described by short-lived [`SegmentDescriptor`]s read one
//! block at a time.

pub mod parser;

use serde::Serialize;

use crate::artifacts::ArtifactId;
use crate::command::FeatureOptions;

pub use parser::InstructionReader;

/// One body segment: the source fragment and its page geometry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentDescriptor {
    /// Query/path fragment appended to the job's base URL.
    pub source: String,
    /// Page size passed to the renderer (`-s`).
    pub size: String,
    /// Page orientation passed to the renderer (`-O`).
    pub orientation: String,
}

/// Cover page settings. Every field is individually optional; the cover is
/// only rendered when all three are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoverPage {
    /// Query/path fragment of the cover page.
    pub source: Option<String>,
    /// Page size of the cover, also used for the TOC and watermark.
    pub size: Option<String>,
    /// Orientation of the cover, also used for the TOC and watermark.
    pub orientation: Option<String>,
}

impl CoverPage {
    /// The cover as a segment, if it is complete.
    pub fn descriptor(&self) -> Option<SegmentDescriptor> {
        Some(SegmentDescriptor {
            source: self.source.clone()?,
            size: self.size.clone()?,
            orientation: self.orientation.clone()?,
        })
    }
}

/// Page margins and header/footer spacing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Margins {
    /// Top margin (`-T`).
    pub top: Option<String>,
    /// Bottom margin (`-B`).
    pub bottom: Option<String>,
    /// Left margin (`-L`).
    pub left: Option<String>,
    /// Right margin (`-R`).
    pub right: Option<String>,
    /// Space between header and content.
    pub header_spacing: Option<String>,
    /// Space between footer and content.
    pub footer_spacing: Option<String>,
}

impl Margins {
    /// All six values set to `0`, as used for the watermark page.
    pub fn zero() -> Self {
        let zero = || Some("0".to_string());
        Self {
            top: zero(),
            bottom: zero(),
            left: zero(),
            right: zero(),
            header_spacing: zero(),
            footer_spacing: zero(),
        }
    }
}

/// Whether running headers and footers are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum HeaderFooterMode {
    /// Same header/footer on every page.
    #[default]
    Show,
    /// No header/footer.
    Hide,
    /// The cover page uses the first-page variants.
    SpecialFirstPage,
}

impl HeaderFooterMode {
    /// Map instruction-file text to a mode. Unknown text yields `None`.
    pub fn from_option_text(text: &str) -> Option<Self> {
        match text {
            "Show" => Some(Self::Show),
            "Don't show" => Some(Self::Hide),
            "Show w/first page special" => Some(Self::SpecialFirstPage),
            _ => None,
        }
    }

    /// Whether any header/footer is printed at all.
    pub fn is_shown(self) -> bool {
        !matches!(self, Self::Hide)
    }
}

/// Whether the table of contents is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum TocMode {
    /// Render the TOC after the cover.
    #[default]
    Show,
    /// Assemble but discard the TOC.
    Hide,
}

impl TocMode {
    /// Map instruction-file text to a mode. Unknown text yields `None`.
    pub fn from_option_text(text: &str) -> Option<Self> {
        match text {
            "Show" => Some(Self::Show),
            "Don't show" => Some(Self::Hide),
            _ => None,
        }
    }
}

/// Header and footer artifacts resolved for one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeaderFooter {
    /// Header HTML artifact.
    pub header: Option<ArtifactId>,
    /// Footer HTML artifact.
    pub footer: Option<ArtifactId>,
}

/// The whole-document configuration read from the job block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDescriptor {
    /// Number of body segments that follow the job block.
    pub segments: usize,
    /// Prefix of every source URL.
    pub base_url: String,
    /// Where the final PDF is written.
    pub target_path: String,
    /// Session token appended to every source URL.
    pub session: Option<String>,
    /// Cover page settings.
    pub cover: CoverPage,
    /// Page margins.
    pub margins: Margins,
    /// TOC display mode.
    pub toc_mode: TocMode,
    /// Header/footer display mode.
    pub header_footer_mode: HeaderFooterMode,
    /// Watermark source fragment.
    pub watermark_url: Option<String>,
    /// TOC font size.
    pub font_size: Option<String>,
    /// TOC font family.
    pub font_family: Option<String>,
    /// Header HTML for body pages.
    pub header_html: Option<ArtifactId>,
    /// Footer HTML for body pages.
    pub footer_html: Option<ArtifactId>,
    /// Header HTML for the first page.
    pub first_header_html: Option<ArtifactId>,
    /// Footer HTML for the first page.
    pub first_footer_html: Option<ArtifactId>,
    /// Every HTML artifact written while parsing, including overwritten ones.
    pub html_artifacts: Vec<ArtifactId>,
}

impl JobDescriptor {
    /// `&SESSION_OVERRIDE=<token>`, or empty without a session.
    pub fn session_suffix(&self) -> String {
        match &self.session {
            Some(token) => format!("&SESSION_OVERRIDE={token}"),
            None => String::new(),
        }
    }

    /// Full renderer source for a fragment: base URL, fragment and session
    /// suffix.
    pub fn source_url(&self, fragment: &str) -> String {
        format!("{}{}{}", self.base_url, fragment, self.session_suffix())
    }

    /// Pick the header/footer artifacts for a conversion with `options`.
    ///
    /// The first-page variants are used only when FIRST_PAGE is requested
    /// and the mode is [`HeaderFooterMode::SpecialFirstPage`].
    pub fn resolve_header_footer(&self, options: FeatureOptions) -> HeaderFooter {
        if options.contains(FeatureOptions::FIRST_PAGE)
            && self.header_footer_mode == HeaderFooterMode::SpecialFirstPage
        {
            HeaderFooter {
                header: self.first_header_html,
                footer: self.first_footer_html,
            }
        } else {
            HeaderFooter {
                header: self.header_html,
                footer: self.footer_html,
            }
        }
    }
}
