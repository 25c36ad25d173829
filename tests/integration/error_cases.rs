//! Failures at every stage leave nothing behind and map to stable exit codes.

use pdfbind::error::{PdfBindError, Record};

use crate::common::{FakeRunner, Instructions, Workspace, assemble};

#[tokio::test]
async fn test_renderer_failure_cleans_up() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 3)
            .set("sHeaderHTML", "<b>running</b>")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new().failing_renderer("doc=2", 1);

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::RendererFailed { status: 1, .. }));
    assert_eq!(err.exit_code(), 5);
    // Nothing is attempted after the failing segment
    assert!(
        runner
            .command_strings()
            .iter()
            .all(|command| !command.contains("doc=3"))
    );
    assert!(runner.merger_commands().is_empty());
    assert!(!ws.target().exists());
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());
}

#[tokio::test]
async fn test_merger_failure_cleans_up() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .set("sWatermarkURL", "stamp=draft")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new().failing_merger(2);

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::MergerFailed { status: 2, .. }));
    assert_eq!(err.exit_code(), 10);
    assert_eq!(runner.merger_commands().len(), 1, "stamping is not attempted");
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());
}

#[tokio::test]
async fn test_missing_job_field() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .unset("sTargetPath")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(
        err,
        PdfBindError::BadSegment {
            record: Record::Job,
            field: "sTargetPath"
        }
    ));
    assert_eq!(err.exit_code(), 7);
    assert!(runner.commands().is_empty());
    assert!(ws.leftovers().is_empty());
}

#[tokio::test]
async fn test_incomplete_segment_record() {
    let ws = Workspace::new();
    let mut text = Instructions::new(&ws.target(), 2)
        .set("sHeaderHTML", "<b>running</b>")
        .text();
    // Drop the orientation of the second segment
    let last = text.rfind("sOrientation = Portrait\n").unwrap();
    text.replace_range(last..last + "sOrientation = Portrait\n".len(), "");
    let config = ws.config(&text);
    let runner = FakeRunner::new();

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(
        err,
        PdfBindError::BadSegment {
            record: Record::Segment(1),
            field: "sOrientation"
        }
    ));
    assert!(err.to_string().contains("segment 2"));
    assert_eq!(runner.renderer_commands().len(), 2, "TOC and first segment");
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());
}

#[tokio::test]
async fn test_non_numeric_segment_count() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .unset("iSegments")
            .set("iSegments", "three")
            .text()
            .as_str(),
    );

    let err = assemble(&FakeRunner::new(), &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::StringOp { .. }));
    assert_eq!(err.exit_code(), 9);
}

#[tokio::test]
async fn test_unreservable_segment_count() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .unset("iSegments")
            .set("iSegments", &usize::MAX.to_string())
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::AllocationFailure { .. }));
    assert_eq!(err.exit_code(), 2);
    assert!(runner.commands().is_empty());
}

#[tokio::test]
async fn test_missing_margins_violate_contract() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .unset("sHeaderMargin")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(
        err,
        PdfBindError::ContractViolation {
            what: "header spacing",
            ..
        }
    ));
    assert!(err.is_internal());
    assert_eq!(err.exit_code(), 3);
    assert!(runner.commands().is_empty());
    assert!(ws.leftovers().is_empty());
}

#[tokio::test]
async fn test_malformed_outline() {
    let ws = Workspace::new();
    let config = ws.config(&Instructions::new(&ws.target(), 1).text());
    let runner = FakeRunner::new().with_raw_outline("doc=1", "<outline><item page=\"1\">");

    let err = assemble(&runner, &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::PdfRead { .. }));
    assert_eq!(err.exit_code(), 11);
    assert!(ws.leftovers().is_empty());
}

#[tokio::test]
async fn test_missing_instruction_file() {
    let ws = Workspace::new();
    let mut config = ws.config("");
    config.instructions = ws.dir.path().join("absent.h2p");

    let err = assemble(&FakeRunner::new(), &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::BadFile { .. }));
    assert_eq!(err.exit_code(), 8);
    assert!(err.to_string().contains("absent.h2p"));
}

#[tokio::test]
async fn test_unusable_temp_dir() {
    let ws = Workspace::new();
    let mut config = ws.config(&Instructions::new(&ws.target(), 1).text());
    config.temp_dir = ws.dir.path().join("no").join("such").join("dir");

    let err = assemble(&FakeRunner::new(), &config).await.unwrap_err();

    assert!(matches!(err, PdfBindError::TempFile { .. }));
    assert_eq!(err.exit_code(), 4);
}
