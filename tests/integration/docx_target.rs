//! Merges into DOCX output.

use std::sync::atomic::AtomicBool;

use docx_rs::{DocumentChild, read_docx};

use doccat::config::MergeOptions;
use doccat::format::OutputFormat;
use doccat::merge::Merger;
use doccat::merge::docx::paragraph_texts;

use crate::common::*;

fn docx_merger() -> Merger {
    Merger::new(MergeOptions::new(OutputFormat::Docx))
}

#[test]
fn test_mixed_inputs_into_docx() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "a.pdf", 3),
        write_image(dir.path(), "b.jpg", 40, 30),
        write_docx(dir.path(), "c.docx", &["First", "Second"]),
    ];
    let output = dir.path().join("out.docx");

    let report = docx_merger()
        .merge_to_file(&items(&inputs), &output, &AtomicBool::new(false), |_| {})
        .unwrap();

    let units: Vec<usize> = report.statistics.inputs.iter().map(|s| s.units).collect();
    assert_eq!(units, vec![3, 1, 2]);
    assert_eq!(report.statistics.total_units, 6);
    assert_eq!(report.statistics.unit_label(), "body elements");

    let docx = read_docx(&std::fs::read(&output).unwrap()).unwrap();
    assert_eq!(docx.document.children.len(), 6);
    assert!(
        docx.document
            .children
            .iter()
            .all(|child| matches!(child, DocumentChild::Paragraph(_)))
    );

    let texts = paragraph_texts(&docx);
    for n in 1..=3 {
        assert!(texts[n - 1].contains(&format!("a page {n}")), "{texts:?}");
    }
    assert_eq!(texts[4], "First");
    assert_eq!(texts[5], "Second");
}

#[test]
fn test_docx_sources_are_appended_verbatim() {
    let dir = scratch();
    let inputs = vec![
        write_docx(dir.path(), "one.docx", &["alpha", "beta", "gamma"]),
        write_docx(dir.path(), "two.docx", &["delta"]),
    ];

    let merged = docx_merger().merge(&items(&inputs), |_| {}).unwrap();
    let docx = read_docx(&merged.bytes).unwrap();

    assert_eq!(merged.statistics.total_units, 4);
    assert_eq!(paragraph_texts(&docx), vec!["alpha", "beta", "gamma", "delta"]);
}

#[test]
fn test_xml_becomes_one_paragraph_per_element() {
    let dir = scratch();
    let xml = write_xml(
        dir.path(),
        "config.xml",
        "<config><server>primary</server><ports><port>80</port><port>443</port></ports></config>",
    );

    let merged = docx_merger().merge(&items(&[xml]), |_| {}).unwrap();
    let docx = read_docx(&merged.bytes).unwrap();

    assert_eq!(
        paragraph_texts(&docx),
        vec!["config", "server: primary", "ports", "port: 80", "port: 443"]
    );
}

#[test]
fn test_each_image_is_one_element() {
    let dir = scratch();
    let inputs = vec![
        write_image(dir.path(), "a.png", 8, 8),
        write_image(dir.path(), "b.bmp", 16, 4),
        write_image(dir.path(), "c.gif", 5, 5),
    ];

    let merged = docx_merger().merge(&items(&inputs), |_| {}).unwrap();
    assert_eq!(merged.statistics.total_units, 3);
    assert_eq!(read_docx(&merged.bytes).unwrap().document.children.len(), 3);
}
