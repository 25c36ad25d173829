//! pdfbind - Assemble HTML documents into a single PDF.
//!
//! An instruction file describes a job: a base URL, a target path, an
//! optional cover page and watermark, running headers and footers, a table
//! of contents mode and a list of body segments. pdfbind renders each part
//! with an HTML-to-PDF tool (`wkhtmltopdf` by default), builds the table of
//! contents from the outline of every rendered segment, and merges the
//! pieces with a PDF toolkit (`pdftk` by default).
//!
//! # Examples
//!
//! ```no_run
//! use pdfbind::config::Config;
//! use pdfbind::output::Diagnostics;
//! use pdfbind::pipeline::{self, Outcome};
//!
//! # async fn example() -> pdfbind::Result<()> {
//! let config = Config::new("report.h2p");
//! let diagnostics = Diagnostics::from_config(&config)?;
//!
//! if let Outcome::Assembled(summary) = pipeline::run(&config, &diagnostics).await? {
//!     println!("Wrote {} ({} body pages)", summary.target.display(), summary.body_pages);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Individual Components
//!
//! ```
//! use pdfbind::toc::{OutlineItem, TocAssembler};
//!
//! let mut toc = TocAssembler::new();
//! toc.append_segment([OutlineItem { title: "Intro".into(), page: 1 }], 4);
//! toc.append_segment([OutlineItem { title: "Usage".into(), page: 2 }], 3);
//!
//! assert_eq!(toc.entries()[1].page, 6);
//! assert_eq!(toc.running_total(), 7);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifacts;
pub mod cli;
pub mod command;
pub mod config;
pub mod convert;
pub mod error;
pub mod io;
pub mod job;
pub mod merge;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod toc;

// Re-export commonly used types
pub use config::Config;
pub use error::*;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
