//! Renderer (HTML to PDF) command lines.
//!
//! ```text
//! <renderer> --disable-smart-shrinking [--no-outline] [--dump-outline <path>]
//!     [--footer-html "<path>"] [--page-offset <n>] [-O <o>] [-s <s>]
//!     [--header-html "<path>"] [-B <b> -L <l> -R <r> -T <t>
//!     --footer-spacing <f> --header-spacing <h>] [cover] "<source>" <target>
//! ```

use std::path::Path;

use crate::command::{Arg, CommandLine, FeatureOptions};
use crate::error::{PdfBindError, Result};
use crate::job::Margins;

const CONTEXT: &str = "renderer command";

/// Everything one renderer invocation may need. Which fields are used is
/// decided by `options`; a field required by a requested option must be set.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    /// Renderer executable.
    pub program: &'a str,
    /// Requested features.
    pub options: FeatureOptions,
    /// Source URL, or `-` for standard input.
    pub source: String,
    /// Output PDF.
    pub target: &'a Path,
    /// Outline dump file, for DUMP_OUTLINE.
    pub outline: Option<&'a Path>,
    /// Footer HTML, for FOOTER.
    pub footer: Option<&'a Path>,
    /// Header HTML, for HEADER.
    pub header: Option<&'a Path>,
    /// Page number offset, for PAGE_OFFSET.
    pub page_offset: u64,
    /// Orientation, for ORIENTATION.
    pub orientation: Option<&'a str>,
    /// Page size, for SIZE.
    pub size: Option<&'a str>,
    /// Margins, for MARGINS.
    pub margins: &'a Margins,
}

impl RenderRequest<'_> {
    /// Build the command line.
    ///
    /// # Errors
    ///
    /// - [`PdfBindError::ContractViolation`] if a requested option lacks its
    ///   data
    /// - [`PdfBindError::CommandFailed`] if the command is too long
    pub fn build(&self) -> Result<CommandLine> {
        let options = self.options;
        let mut args = vec![Arg::plain("--disable-smart-shrinking")];

        if options.contains(FeatureOptions::NO_OUTLINE) {
            args.push(Arg::plain("--no-outline"));
        }

        if options.contains(FeatureOptions::DUMP_OUTLINE) {
            let outline = require(self.outline, "outline path")?;
            args.push(Arg::plain("--dump-outline"));
            args.push(Arg::plain(outline.to_string_lossy()));
        }

        if options.contains(FeatureOptions::FOOTER) {
            let footer = require(self.footer, "footer HTML")?;
            args.push(Arg::plain("--footer-html"));
            args.push(Arg::quoted(footer.to_string_lossy()));
        }

        if options.contains(FeatureOptions::PAGE_OFFSET) {
            args.push(Arg::plain("--page-offset"));
            args.push(Arg::plain(self.page_offset.to_string()));
        }

        if options.contains(FeatureOptions::ORIENTATION) {
            args.push(Arg::plain("-O"));
            args.push(Arg::plain(require(self.orientation, "orientation")?));
        }

        if options.contains(FeatureOptions::SIZE) {
            args.push(Arg::plain("-s"));
            args.push(Arg::plain(require(self.size, "page size")?));
        }

        if options.contains(FeatureOptions::HEADER) {
            let header = require(self.header, "header HTML")?;
            args.push(Arg::plain("--header-html"));
            args.push(Arg::quoted(header.to_string_lossy()));
        }

        if options.contains(FeatureOptions::MARGINS) {
            let m = self.margins;
            let margins = [
                ("-B", m.bottom.as_deref(), "bottom margin"),
                ("-L", m.left.as_deref(), "left margin"),
                ("-R", m.right.as_deref(), "right margin"),
                ("-T", m.top.as_deref(), "top margin"),
                ("--footer-spacing", m.footer_spacing.as_deref(), "footer spacing"),
                ("--header-spacing", m.header_spacing.as_deref(), "header spacing"),
            ];
            for (flag, value, what) in margins {
                let value = require(value, what)?;
                args.push(Arg::plain(flag));
                args.push(Arg::plain(value));
            }
        }

        if options.contains(FeatureOptions::COVER) {
            args.push(Arg::plain("cover"));
        }

        args.push(Arg::quoted(self.source.as_str()));
        args.push(Arg::plain(self.target.to_string_lossy()));

        CommandLine::new(self.program, args)
    }
}

fn require<T>(value: Option<T>, what: &'static str) -> Result<T> {
    value.ok_or(PdfBindError::ContractViolation {
        context: CONTEXT,
        what,
    })
}
