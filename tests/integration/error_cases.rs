//! Failure handling: nothing is written unless the whole merge succeeds.

use std::sync::atomic::AtomicBool;

use rstest::rstest;

use doccat::config::{Config, MergeOptions};
use doccat::error::DocCatError;
use doccat::format::OutputFormat;
use doccat::merge::{Merger, merge_documents};
use doccat::session::{InputItem, InputList};

use crate::common::*;

#[rstest]
#[case(OutputFormat::Pdf, "out.pdf")]
#[case(OutputFormat::Docx, "out.docx")]
fn test_failure_midway_names_input_and_writes_nothing(
    #[case] target: OutputFormat,
    #[case] output_name: &str,
) {
    let dir = scratch();
    let inputs = vec![
        write_xml(dir.path(), "1.xml", "<one/>"),
        write_pdf(dir.path(), "2.pdf", 1),
        write_bytes(dir.path(), "3.pdf", b"this is not a pdf"),
        write_xml(dir.path(), "4.xml", "<four/>"),
        write_xml(dir.path(), "5.xml", "<five/>"),
    ];
    let before = dir_entries(dir.path());
    let output = dir.path().join(output_name);

    let mut percents = Vec::new();
    let err = Merger::new(MergeOptions::new(target))
        .merge_to_file(&items(&inputs), &output, &AtomicBool::new(false), |p| {
            percents.push(p.percent)
        })
        .unwrap_err();

    assert!(matches!(err, DocCatError::SourceRead { .. }), "{err:?}");
    assert_eq!(err.path(), Some(&inputs[2]));
    assert!(err.to_string().contains("3.pdf"));
    assert_eq!(percents, vec![20, 40]);
    assert!(!output.exists());
    assert_eq!(dir_entries(dir.path()), before);
}

#[test]
fn test_failure_leaves_existing_destination_untouched() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "good.pdf", 1),
        write_bytes(dir.path(), "bad.png", b"\x89PNG truncated"),
    ];
    let output = write_bytes(dir.path(), "out.pdf", b"previous contents");

    let err = Merger::new(MergeOptions::new(OutputFormat::Pdf))
        .merge_to_file(&items(&inputs), &output, &AtomicBool::new(false), |_| {})
        .unwrap_err();

    assert_eq!(err.path(), Some(&inputs[1]));
    assert_eq!(std::fs::read(&output).unwrap(), b"previous contents");
}

#[test]
fn test_empty_selection_writes_nothing() {
    let dir = scratch();
    let output = dir.path().join("out.pdf");

    let mut called = false;
    let err = Merger::new(MergeOptions::new(OutputFormat::Pdf))
        .merge_to_file(&[], &output, &AtomicBool::new(false), |_| called = true)
        .unwrap_err();

    assert!(matches!(err, DocCatError::EmptySelection));
    assert!(!called);
    assert!(dir_entries(dir.path()).is_empty());
}

#[rstest]
#[case("notes.txt")]
#[case("archive.tar.gz")]
#[case("README")]
fn test_unsupported_input_extensions(#[case] name: &str) {
    let mut list = InputList::new();
    assert!(matches!(
        list.add(name),
        Err(DocCatError::UnsupportedFormat { .. })
    ));
    assert!(list.is_empty());
    assert!(InputItem::new(name).is_err());
}

#[rstest]
#[case("out.txt")]
#[case("out.odt")]
#[case("out")]
fn test_unsupported_output_extensions(#[case] output: &str) {
    let err = Config::new(vec!["a.pdf".into()], output).unwrap_err();
    assert!(matches!(err, DocCatError::UnsupportedFormat { .. }));
}

#[test]
fn test_uppercase_extensions_are_accepted() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "UPPER.PDF", 1),
        write_xml(dir.path(), "Data.XML", "<a/>"),
    ];

    let merged = Merger::new(MergeOptions::new(OutputFormat::Pdf))
        .merge(&items(&inputs), |_| {})
        .unwrap();
    assert_eq!(merged.statistics.total_units, 2);
}

#[test]
fn test_corrupt_docx_is_a_source_error() {
    let dir = scratch();
    let docx = write_bytes(dir.path(), "fake.docx", b"PK\x03\x04 not really a zip");

    let err = Merger::new(MergeOptions::new(OutputFormat::Docx))
        .merge(&items(&[docx.clone()]), |_| {})
        .unwrap_err();
    assert!(matches!(err, DocCatError::SourceRead { ref path, .. } if *path == docx));
}

#[tokio::test]
async fn test_merge_documents_rejects_output_among_inputs() {
    let dir = scratch();
    let input = write_pdf(dir.path(), "same.pdf", 1);
    let config = Config::new(vec![input.clone()], &input).unwrap();

    assert!(matches!(
        merge_documents(&config).await,
        Err(DocCatError::InvalidConfig { .. })
    ));
}
