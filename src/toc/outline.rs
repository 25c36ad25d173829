//! Reading the renderer's outline dumps.
//!
//! `--dump-outline` writes nested `<item>` elements, one per heading, in
//! document order:
//!
//! ```xml
//! <outline xmlns="http://wkhtmltopdf.org/outline">
//!   <item title="" page="0">
//!     <item title="Introduction" page="1" link="__WKANCHOR_0"/>
//!   </item>
//! </outline>
//! ```

use std::path::Path;

use crate::error::{PdfBindError, Result};

/// One heading from an outline dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    /// Heading text.
    pub title: String,
    /// Page within the segment.
    pub page: u64,
}

/// Parse an outline dump.
///
/// Items without a numeric `page` attribute are skipped. An empty document
/// has no items.
///
/// # Errors
///
/// Returns the XML parse error for malformed input.
pub fn parse_outline(xml: &str) -> std::result::Result<Vec<OutlineItem>, roxmltree::Error> {
    if xml.trim().is_empty() {
        return Ok(Vec::new());
    }

    let doc = roxmltree::Document::parse(xml)?;
    let items = doc
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name() == "item")
        .filter_map(|node| {
            let page = node.attribute("page")?.trim().parse::<u64>().ok()?;
            Some(OutlineItem {
                title: node.attribute("title").unwrap_or_default().to_string(),
                page,
            })
        })
        .collect();

    Ok(items)
}

/// Read and parse the outline dump at `path`.
///
/// # Errors
///
/// - [`PdfBindError::BadFile`] if the file cannot be read
/// - [`PdfBindError::PdfRead`] if it is not a well-formed outline
pub async fn read_outline(path: &Path) -> Result<Vec<OutlineItem>> {
    let xml = tokio::fs::read_to_string(path)
        .await
        .map_err(|err| PdfBindError::bad_file(path, err))?;

    parse_outline(&xml).map_err(|err| PdfBindError::pdf_read(path, format!("outline: {err}")))
}
