//! Table of contents assembly.
//!
//! Segments are converted one after another. After each one, its outline
//! dump is folded into the [`TocAssembler`], which turns segment-local page
//! numbers into document page numbers using the running page total, and the
//! resulting entries are streamed into a [`TocWriter`].

pub mod document;
pub mod outline;

use serde::Serialize;

pub use document::{TocOutput, TocWriter};
pub use outline::{OutlineItem, parse_outline, read_outline};

/// One line of the table of contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading text.
    pub title: String,
    /// Page number in the assembled body.
    pub page: u64,
}

/// Running page total and the entries collected so far.
#[derive(Debug, Default)]
pub struct TocAssembler {
    running_total: u64,
    entries: Vec<TocEntry>,
}

impl TocAssembler {
    /// Create an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages of all segments appended so far. This is the page offset of the
    /// next segment.
    pub fn running_total(&self) -> u64 {
        self.running_total
    }

    /// All entries in order.
    pub fn entries(&self) -> &[TocEntry] {
        &self.entries
    }

    /// Fold in one segment's outline and advance the total by `pages`.
    ///
    /// Items whose absolute page equals the total before this segment mark
    /// the outline root and are dropped. Returns the entries added.
    pub fn append_segment(
        &mut self,
        items: impl IntoIterator<Item = OutlineItem>,
        pages: u64,
    ) -> &[TocEntry] {
        let base = self.running_total;
        let first = self.entries.len();

        self.entries.extend(items.into_iter().filter_map(|item| {
            let page = base + item.page;
            (page != base).then_some(TocEntry {
                title: item.title,
                page,
            })
        }));

        self.running_total += pages;
        &self.entries[first..]
    }
}
