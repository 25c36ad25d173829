//! pdfbind - Assemble HTML documents into a single PDF.
//!
//! Reads an instruction file, renders the cover, body segments, table of
//! contents and watermark with an HTML-to-PDF tool and merges them.

use clap::Parser;
use std::io;
use std::process;
use tracing_subscriber::EnvFilter;

use pdfbind::cli::Cli;
use pdfbind::config::Config;
use pdfbind::error::PdfBindError;
use pdfbind::output::{Diagnostics, Verbosity};
use pdfbind::pipeline::{self, DryRunPlan, Outcome, RunSummary};

#[tokio::main]
async fn main() {
    // Usage errors exit with the argument error code rather than clap's 2
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            err.print().ok();
            process::exit(code);
        }
    };

    let config = cli.to_config().unwrap_or_else(|err| exit_with(&err));
    init_tracing(&config);

    let diagnostics = Diagnostics::from_config(&config).unwrap_or_else(|err| exit_with(&err));

    if let Err(err) = run(&config, &diagnostics).await {
        diagnostics.error(&format!("Error: {err}"));
        diagnostics.flush();
        process::exit(err.exit_code());
    }
}

/// Main application logic.
async fn run(config: &Config, diagnostics: &Diagnostics) -> Result<(), PdfBindError> {
    if diagnostics.should_print() {
        diagnostics.section(&format!("{} v{}", pdfbind::NAME, pdfbind::VERSION));
        diagnostics.blank_line();
    }
    diagnostics.info(&format!(
        "Reading instructions from {}",
        config.instructions().display()
    ));

    let outcome = pipeline::run(config, diagnostics).await?;

    if config.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|err| PdfBindError::string_op(format!("JSON summary: {err}")))?;
        println!("{json}");
        return Ok(());
    }

    match &outcome {
        Outcome::Assembled(summary) => report_summary(diagnostics, summary),
        Outcome::Planned(plan) => report_plan(diagnostics, plan),
    }
    Ok(())
}

fn report_summary(diagnostics: &Diagnostics, summary: &RunSummary) {
    diagnostics.blank_line();
    diagnostics.success(&format!(
        "Created {} from {} segment(s), {} body page(s)",
        summary.target.display(),
        summary.segments,
        summary.body_pages
    ));

    if diagnostics.is_verbose() {
        diagnostics.section("Summary");
        diagnostics.detail("Cover", yes_no(summary.cover));
        diagnostics.detail("Table of contents", yes_no(summary.toc_shown));
        diagnostics.detail("Watermark", yes_no(summary.watermark));
        for entry in &summary.toc {
            diagnostics.detail(&entry.title, &entry.page.to_string());
        }
    }
}

fn report_plan(diagnostics: &Diagnostics, plan: &DryRunPlan) {
    diagnostics.section("Dry run - no tool was started");
    diagnostics.info(&format!("  Target: {}", plan.target.display()));
    if let Some(cover) = &plan.cover {
        diagnostics.info(&format!("  Cover: {cover}"));
    }
    diagnostics.info(&format!("  Table of contents: {}", yes_no(plan.toc_shown)));
    if let Some(watermark) = &plan.watermark {
        diagnostics.info(&format!("  Watermark: {watermark}"));
    }
    for (index, segment) in plan.segments.iter().enumerate() {
        diagnostics.info(&format!(
            "  [{}/{}] {} ({}, {}) {}",
            index + 1,
            plan.segments.len(),
            segment.source,
            segment.size,
            segment.orientation,
            segment.options
        ));
    }
    diagnostics.blank_line();
    diagnostics.success("Dry run completed successfully");
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Install the tracing subscriber. `RUST_LOG` wins over the verbosity flags.
fn init_tracing(config: &Config) {
    let filter = match config.verbosity {
        Verbosity::Quiet => "error",
        Verbosity::Normal => "warn",
        Verbosity::Verbose => "info",
        Verbosity::Debug => "debug",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn exit_with(err: &PdfBindError) -> ! {
    eprintln!("Error: {err}");
    process::exit(err.exit_code())
}
