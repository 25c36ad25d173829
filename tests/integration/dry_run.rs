//! Dry runs parse the instructions without starting any tool.

use pdfbind::output::Diagnostics;
use pdfbind::pipeline::{Outcome, Pipeline};

use crate::common::{FakeRunner, Instructions, Workspace};

#[tokio::test]
async fn test_plan_starts_nothing() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .cover("cover=1")
            .set("sWatermarkURL", "stamp=draft")
            .set("sSession", "s1")
            .set("sHeaderHTML", "<b>running</b>")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();
    let diagnostics = Diagnostics::quiet();

    let plan = Pipeline::new(&runner, &config, &diagnostics).plan().unwrap();

    assert!(runner.commands().is_empty());
    assert!(!ws.target().exists());
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());

    assert_eq!(plan.target, ws.target());
    assert_eq!(
        plan.cover.as_deref(),
        Some("http://reports.local/render?cover=1&SESSION_OVERRIDE=s1")
    );
    assert_eq!(
        plan.watermark.as_deref(),
        Some("http://reports.local/render?stamp=draft&SESSION_OVERRIDE=s1")
    );
    assert!(plan.toc_shown);
    assert_eq!(plan.segments.len(), 2);
    assert_eq!(
        plan.segments[1].source,
        "http://reports.local/render?doc=2&SESSION_OVERRIDE=s1"
    );
    assert_eq!(plan.segments[0].size, "A4");
    assert!(plan.segments[0].options.contains("HEADER"));
}

#[tokio::test]
async fn test_plan_reports_parse_errors() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .unset("sBaseURL")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();
    let diagnostics = Diagnostics::quiet();

    let err = Pipeline::new(&runner, &config, &diagnostics)
        .plan()
        .unwrap_err();
    assert_eq!(err.exit_code(), 7);
    assert!(ws.leftovers().is_empty());
}

#[test]
fn test_outcome_json() {
    let ws = Workspace::new();
    let config = ws.config(&Instructions::new(&ws.target(), 1).text());
    let runner = FakeRunner::new();
    let diagnostics = Diagnostics::quiet();

    let plan = Pipeline::new(&runner, &config, &diagnostics).plan().unwrap();
    let json = serde_json::to_value(Outcome::Planned(plan)).unwrap();

    assert_eq!(json["mode"], "planned");
    assert_eq!(json["segments"][0]["orientation"], "Portrait");
    assert_eq!(json["toc_shown"], true);
}
