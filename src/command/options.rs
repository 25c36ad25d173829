//! Renderer feature options.

use bitflags::bitflags;

use crate::job::JobDescriptor;

bitflags! {
    /// Optional renderer capabilities requested for one conversion.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FeatureOptions: u16 {
        /// Emit the `cover` token before the source.
        const COVER = 1 << 0;
        /// Suppress the PDF outline.
        const NO_OUTLINE = 1 << 1;
        /// Dump the outline as XML.
        const DUMP_OUTLINE = 1 << 2;
        /// Footer HTML.
        const FOOTER = 1 << 3;
        /// Page number offset.
        const PAGE_OFFSET = 1 << 4;
        /// Page orientation.
        const ORIENTATION = 1 << 5;
        /// Page size.
        const SIZE = 1 << 6;
        /// Header HTML.
        const HEADER = 1 << 7;
        /// All six margins.
        const MARGINS = 1 << 8;
        /// This conversion renders the first page of the document.
        const FIRST_PAGE = 1 << 9;
    }
}

impl FeatureOptions {
    /// A body segment.
    pub const BODY: Self = Self::NO_OUTLINE
        .union(Self::DUMP_OUTLINE)
        .union(Self::PAGE_OFFSET)
        .union(Self::ORIENTATION)
        .union(Self::SIZE)
        .union(Self::MARGINS);

    /// The table of contents.
    pub const TOC_PAGE: Self = Self::NO_OUTLINE
        .union(Self::SIZE)
        .union(Self::ORIENTATION)
        .union(Self::MARGINS);

    /// The cover page.
    pub const COVER_PAGE: Self = Self::NO_OUTLINE
        .union(Self::ORIENTATION)
        .union(Self::SIZE)
        .union(Self::MARGINS)
        .union(Self::FIRST_PAGE);

    /// The watermark page.
    pub const WATERMARK: Self = Self::COVER.union(Self::MARGINS).union(Self::SIZE);

    /// Add HEADER and FOOTER according to the job's header/footer mode.
    ///
    /// Nothing is added when headers and footers are hidden. Otherwise each
    /// bit is set only if the artifact resolved for these options exists.
    pub fn derive_header_footer(self, job: &JobDescriptor) -> Self {
        if !job.header_footer_mode.is_shown() {
            return self;
        }

        let resolved = job.resolve_header_footer(self);
        let mut options = self;
        options.set(Self::HEADER, resolved.header.is_some());
        options.set(Self::FOOTER, resolved.footer.is_some());
        options
    }
}
