//! The table of contents as an HTML document.
//!
//! The document is written incrementally: [`TocWriter::start`] before the
//! first segment, one [`TocWriter::entry`] per heading as segments finish,
//! and [`TocWriter::finish`] at the end. The destination is either the
//! renderer's standard input or a sink when the TOC is not shown.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncWrite, AsyncWriteExt, Sink};

use crate::error::{PdfBindError, Result};
use crate::toc::TocEntry;

/// Where the TOC document goes.
#[derive(Debug)]
pub enum TocOutput<S> {
    /// Standard input of the TOC renderer.
    Renderer(S),
    /// Nowhere.
    Discard(Sink),
}

impl<S> TocOutput<S> {
    /// A destination that drops everything.
    pub fn discard() -> Self {
        Self::Discard(tokio::io::sink())
    }
}

impl<S: AsyncWrite + Unpin> AsyncWrite for TocOutput<S> {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        match self.get_mut() {
            Self::Renderer(inner) => Pin::new(inner).poll_write(cx, buf),
            Self::Discard(sink) => Pin::new(sink).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Renderer(inner) => Pin::new(inner).poll_flush(cx),
            Self::Discard(sink) => Pin::new(sink).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Self::Renderer(inner) => Pin::new(inner).poll_shutdown(cx),
            Self::Discard(sink) => Pin::new(sink).poll_shutdown(cx),
        }
    }
}

/// Streams the TOC document into a writer.
#[derive(Debug)]
pub struct TocWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> TocWriter<W> {
    /// Write the document preamble.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the destination rejects the write.
    pub async fn start(
        writer: W,
        font_family: Option<&str>,
        font_size: Option<&str>,
    ) -> Result<Self> {
        let mut toc = Self { writer };

        let mut style = String::new();
        if let Some(family) = font_family {
            style.push_str(&format!("font-family: {};", css_value(family)));
        }
        if let Some(size) = font_size {
            style.push_str(&format!(" font-size: {};", css_size(size)));
        }

        let preamble = format!(
            "<!DOCTYPE html>\n\
             <html>\n<head>\n<meta charset=\"utf-8\">\n<title>Table of Contents</title>\n\
             <style>\n\
             body {{ {} }}\n\
             table.toc {{ width: 100%; border-collapse: collapse; }}\n\
             td.page {{ text-align: right; }}\n\
             </style>\n</head>\n<body>\n<h1>Table of Contents</h1>\n<table class=\"toc\">\n",
            style.trim()
        );
        toc.write(&preamble).await?;
        Ok(toc)
    }

    /// Write one entry.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the destination rejects the write.
    pub async fn entry(&mut self, entry: &TocEntry) -> Result<()> {
        let line = format!(
            "<tr><td class=\"title\">{}</td><td class=\"page\">{}</td></tr>\n",
            escape_html(&entry.title),
            entry.page
        );
        self.write(&line).await
    }

    /// Write the trailer and close the destination.
    ///
    /// # Errors
    ///
    /// Returns [`PdfBindError::BadFile`] if the destination rejects the write.
    pub async fn finish(mut self) -> Result<W> {
        self.write("</table>\n</body>\n</html>\n").await?;
        self.writer.shutdown().await.map_err(stream_error)?;
        Ok(self.writer)
    }

    async fn write(&mut self, text: &str) -> Result<()> {
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(stream_error)
    }
}

fn stream_error(err: io::Error) -> PdfBindError {
    PdfBindError::bad_file("<table of contents stream>", err)
}

/// Escape text for use in HTML content.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Keep a CSS value from closing its declaration or the style element.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>'))
        .collect()
}

/// A bare number is taken as points.
fn css_size(size: &str) -> String {
    let size = css_value(size);
    if !size.is_empty() && size.chars().all(|c| c.is_ascii_digit() || c == '.') {
        format!("{size}pt")
    } else {
        size
    }
}
