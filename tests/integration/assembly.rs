//! End-to-end assembly with a scripted renderer and merger.

use std::path::Path;

use crate::common::{FakeRunner, Instructions, Workspace, assemble, page_count};

fn arg_after<'a>(values: &'a [&'a str], flag: &str) -> Option<&'a str> {
    let at = values.iter().position(|value| *value == flag)?;
    values.get(at + 1).copied()
}

#[tokio::test]
async fn test_segments_are_offset_and_merged_in_order() {
    let ws = Workspace::new();
    let config = ws.config(&Instructions::new(&ws.target(), 3).text());
    let runner = FakeRunner::new()
        .with_pages("doc=1", 2)
        .with_pages("doc=2", 3)
        .with_pages("doc=3", 4);

    let summary = assemble(&runner, &config).await.unwrap();

    let renders = runner.renderer_commands();
    assert_eq!(renders.len(), 4, "table of contents plus three segments");

    // The TOC renderer is started first and reads standard input
    let toc: Vec<&str> = renders[0].arg_values().collect();
    assert_eq!(toc[toc.len() - 2], "-");
    assert!(!toc.contains(&"--page-offset"));

    let offsets: Vec<String> = renders[1..]
        .iter()
        .map(|command| {
            let values: Vec<&str> = command.arg_values().collect();
            arg_after(&values, "--page-offset").unwrap().to_string()
        })
        .collect();
    assert_eq!(offsets, ["0", "2", "5"]);

    let merges = runner.merger_commands();
    assert_eq!(merges.len(), 1);
    let values: Vec<&str> = merges[0].arg_values().collect();
    assert_eq!(values.len(), 4 + 3);
    assert_eq!(&values[4..6], ["cat", "output"]);
    assert_eq!(Path::new(values[6]), ws.target());

    assert_eq!(page_count(&ws.target()), 1 + 2 + 3 + 4);
    assert_eq!(summary.segments, 3);
    assert_eq!(summary.body_pages, 9);
    assert!(summary.toc_shown);
    assert!(!summary.cover);
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());
}

#[tokio::test]
async fn test_body_segment_command_line() {
    let ws = Workspace::new();
    let config = ws.config(&Instructions::new(&ws.target(), 1).text());
    let runner = FakeRunner::new();

    assemble(&runner, &config).await.unwrap();

    let segment = runner.renderer_commands()[1].clone();
    let values: Vec<&str> = segment.arg_values().collect();
    let flags: Vec<&str> = values
        .iter()
        .copied()
        .filter(|value| value.starts_with('-') && *value != "-")
        .collect();
    assert_eq!(
        flags,
        [
            "--disable-smart-shrinking",
            "--no-outline",
            "--dump-outline",
            "--page-offset",
            "-O",
            "-s",
            "-B",
            "-L",
            "-R",
            "-T",
            "--footer-spacing",
            "--header-spacing",
        ]
    );
    assert_eq!(arg_after(&values, "-O"), Some("Portrait"));
    assert_eq!(arg_after(&values, "-s"), Some("A4"));
    assert_eq!(values[values.len() - 2], "http://reports.local/render?doc=1");
    assert!(
        segment
            .to_string()
            .contains(" \"http://reports.local/render?doc=1\" ")
    );
}

#[tokio::test]
async fn test_toc_entries_use_running_total() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .set("sDocFontFamily", "Georgia")
            .set("sDocFontSize", "11")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new()
        .with_pages("doc=1", 5)
        .with_outline("doc=1", &[("Ch1", 3)])
        .with_pages("doc=2", 2)
        .with_outline("doc=2", &[("Ch2", 1), ("Ch3", 2)]);

    let summary = assemble(&runner, &config).await.unwrap();

    let entries: Vec<(&str, u64)> = summary
        .toc
        .iter()
        .map(|entry| (entry.title.as_str(), entry.page))
        .collect();
    assert_eq!(entries, [("Ch1", 3), ("Ch2", 6), ("Ch3", 7)]);

    let html = runner.toc_input();
    assert!(html.contains("Georgia"));
    assert!(html.contains("11pt"));
    let ch1 = html.find("Ch1").unwrap();
    let ch3 = html.find("Ch3").unwrap();
    assert!(ch1 < ch3);
    assert!(html.trim_end().ends_with("</html>"));
}

#[tokio::test]
async fn test_hidden_toc_is_not_rendered() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .set("sTableOfContentsOptions", "Don't show")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new().with_outline("doc=2", &[("Only", 1)]);

    let summary = assemble(&runner, &config).await.unwrap();

    let renders = runner.renderer_commands();
    assert_eq!(renders.len(), 2);
    assert!(renders.iter().all(|command| !command.arg_values().any(|v| v == "-")));
    assert!(runner.toc_input().is_empty());

    let merger_cmds = runner.merger_commands();
    let merge: Vec<&str> = merger_cmds[0].arg_values().collect();
    assert_eq!(merge.len(), 2 + 3);

    assert!(!summary.toc_shown);
    assert_eq!(summary.toc.len(), 1);
    assert_eq!(summary.toc[0].page, 2);
    assert_eq!(page_count(&ws.target()), 2);
}

#[tokio::test]
async fn test_cover_and_watermark() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .cover("cover=1")
            .set("sWatermarkURL", "stamp=draft")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new().with_pages("doc=1", 3);

    let summary = assemble(&runner, &config).await.unwrap();

    let renders = runner.renderer_commands();
    assert_eq!(renders.len(), 4, "cover, TOC, segment and watermark");

    let cover: Vec<&str> = renders[0].arg_values().collect();
    assert!(cover.contains(&"http://reports.local/render?cover=1"));
    assert_eq!(arg_after(&cover, "-O"), Some("Landscape"));
    assert_eq!(arg_after(&cover, "-s"), Some("Letter"));
    assert!(!cover.contains(&"--page-offset"));
    assert!(!cover.contains(&"cover"));

    // The TOC takes the cover's geometry
    let toc: Vec<&str> = renders[1].arg_values().collect();
    assert_eq!(arg_after(&toc, "-s"), Some("Letter"));

    let watermark: Vec<&str> = renders[3].arg_values().collect();
    assert!(watermark.contains(&"cover"));
    assert_eq!(arg_after(&watermark, "-B"), Some("0"));
    assert_eq!(arg_after(&watermark, "-s"), Some("Letter"));
    assert!(!watermark.contains(&"-O"));
    assert!(!watermark.contains(&"--dump-outline"));

    let merges = runner.merger_commands();
    assert_eq!(merges.len(), 2);
    let concatenate: Vec<&str> = merges[0].arg_values().collect();
    let intermediate = concatenate[concatenate.len() - 1];
    assert!(Path::new(intermediate).starts_with(ws.temp_dir()));

    let stamp: Vec<&str> = merges[1].arg_values().collect();
    assert_eq!(stamp[0], intermediate);
    assert_eq!(stamp[1], "background");
    assert_eq!(Path::new(stamp[4]), ws.target());

    assert_eq!(page_count(&ws.target()), 1 + 1 + 3);
    assert!(summary.cover);
    assert!(summary.watermark);
    assert!(ws.leftovers().is_empty(), "{:?}", ws.leftovers());
}

#[tokio::test]
async fn test_incomplete_cover_is_skipped() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .set("sCoverPageURL", "cover=1")
            .set("sSize", "Letter")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    let summary = assemble(&runner, &config).await.unwrap();

    assert!(!summary.cover);
    assert!(
        runner
            .command_strings()
            .iter()
            .all(|command| !command.contains("cover=1"))
    );
    // Without an orientation on the cover the TOC gets no -O either
    let renderer_cmds = runner.renderer_commands();
    let toc: Vec<&str> = renderer_cmds[0].arg_values().collect();
    assert!(!toc.contains(&"-O"));
    assert_eq!(arg_after(&toc, "-s"), Some("Letter"));
}

#[tokio::test]
async fn test_session_is_appended_to_every_source() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .cover("cover=1")
            .set("sSession", "abc123")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    assemble(&runner, &config).await.unwrap();

    let sources: Vec<String> = runner
        .renderer_commands()
        .iter()
        .map(|command| {
            let values: Vec<&str> = command.arg_values().collect();
            values[values.len() - 2].to_string()
        })
        .filter(|source| source != "-")
        .collect();
    assert_eq!(
        sources,
        [
            "http://reports.local/render?cover=1&SESSION_OVERRIDE=abc123",
            "http://reports.local/render?doc=1&SESSION_OVERRIDE=abc123",
            "http://reports.local/render?doc=2&SESSION_OVERRIDE=abc123",
        ]
    );
}

#[tokio::test]
async fn test_first_page_header_on_cover_only() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .cover("cover=1")
            .set("sHeaderFooterOptions", "Show w/first page special")
            .set("sHeaderHTML", "<b>running</b>")
            .set("sFirstHeaderHTML", "<b>first</b>")
            .set("sFooterHTML", "<i>page</i>")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    assemble(&runner, &config).await.unwrap();

    let renders = runner.renderer_commands();
    let cover: Vec<&str> = renders[0].arg_values().collect();
    let segment: Vec<&str> = renders[2].arg_values().collect();

    let cover_header = arg_after(&cover, "--header-html").unwrap();
    let body_header = arg_after(&segment, "--header-html").unwrap();
    assert_ne!(cover_header, body_header);
    assert!(arg_after(&segment, "--footer-html").is_some());
    // No first-page footer was given
    assert!(arg_after(&cover, "--footer-html").is_none());

    assert!(renders[0].to_string().contains(&format!("\"{cover_header}\"")));
    assert!(ws.leftovers().is_empty());
}

#[tokio::test]
async fn test_hidden_header_footer() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 1)
            .set("sHeaderFooterOptions", "Don't show")
            .set("sHeaderHTML", "<b>running</b>")
            .text()
            .as_str(),
    );
    let runner = FakeRunner::new();

    assemble(&runner, &config).await.unwrap();

    assert!(
        runner
            .command_strings()
            .iter()
            .all(|command| !command.contains("--header-html"))
    );
}

#[tokio::test]
async fn test_repeated_runs_issue_the_same_commands() {
    let ws = Workspace::new();
    let config = ws.config(
        Instructions::new(&ws.target(), 2)
            .cover("cover=1")
            .set("sWatermarkURL", "stamp=draft")
            .set("sHeaderHTML", "<b>running</b>")
            .text()
            .as_str(),
    );

    // Artifact directories differ per run; file names within them do not
    let normalized = |runner: &FakeRunner| -> Vec<Vec<String>> {
        runner
            .commands()
            .iter()
            .map(|command| {
                command
                    .arg_values()
                    .map(|value| {
                        let path = Path::new(value);
                        match path.file_name() {
                            Some(name) if path.starts_with(ws.temp_dir()) => {
                                name.to_string_lossy().into_owned()
                            }
                            _ => value.to_string(),
                        }
                    })
                    .collect()
            })
            .collect()
    };

    let first = FakeRunner::new().with_pages("doc=2", 4);
    assemble(&first, &config).await.unwrap();
    let second = FakeRunner::new().with_pages("doc=2", 4);
    assemble(&second, &config).await.unwrap();

    assert_eq!(normalized(&first), normalized(&second));
    assert!(ws.leftovers().is_empty());
}

#[tokio::test]
async fn test_keep_temp_files() {
    let ws = Workspace::new();
    let mut config = ws.config(&Instructions::new(&ws.target(), 2).text());
    config.keep_temp_files = true;
    let runner = FakeRunner::new();

    assemble(&runner, &config).await.unwrap();

    let leftovers = ws.leftovers();
    assert_eq!(leftovers.len(), 1, "one artifact directory");
    let kept: Vec<_> = std::fs::read_dir(&leftovers[0])
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(kept.iter().any(|name| name.ends_with(".pdf")));
    assert!(kept.iter().any(|name| name.ends_with(".xml")));
}
