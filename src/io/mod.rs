//! PDF inspection.
//!
//! The renderer and merger produce and consume PDFs; the only thing pdfbind
//! itself needs to know about a rendered PDF is how many pages it has, so
//! the running page total can be advanced.

pub mod reader;

pub use reader::PdfReader;
