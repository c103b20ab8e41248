//! Merges into PDF output.

use std::sync::atomic::AtomicBool;

use docx_rs::{Hyperlink, HyperlinkType, Paragraph, Run};
use lopdf::Document;

use doccat::config::{Config, MergeOptions};
use doccat::format::OutputFormat;
use doccat::merge::{MetadataManager, Merger, merge_documents};

use crate::common::*;

fn pdf_merger() -> Merger {
    Merger::new(MergeOptions::new(OutputFormat::Pdf))
}

#[test]
fn test_mixed_inputs_into_pdf() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "a.pdf", 3),
        write_image(dir.path(), "b.jpg", 64, 48),
        write_docx(dir.path(), "c.docx", &["Closing remarks", "Thanks"]),
    ];
    let output = dir.path().join("out.pdf");

    let mut percents = Vec::new();
    let report = pdf_merger()
        .merge_to_file(&items(&inputs), &output, &AtomicBool::new(false), |p| {
            percents.push(p.percent)
        })
        .unwrap();

    assert_eq!(percents, vec![33, 67, 100]);
    assert_eq!(report.statistics.total_units, 5);
    let units: Vec<usize> = report.statistics.inputs.iter().map(|s| s.units).collect();
    assert_eq!(units, vec![3, 1, 1]);

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 5);

    for n in 1..=3 {
        assert!(page_text(&doc, n).contains(&format!("a page {n}")));
    }
    assert!(page_has_image(&doc, 4));
    let widths = page_widths(&doc);
    assert_eq!(&widths[..4], &[201.0, 202.0, 203.0, 64.0]);

    let closing = page_text(&doc, 5);
    assert!(closing.contains("Closing remarks"));
    assert!(closing.contains("Thanks"));
}

#[test]
fn test_single_pdf_round_trip() {
    let dir = scratch();
    let input = write_pdf(dir.path(), "only.pdf", 4);
    let output = dir.path().join("copy.pdf");

    pdf_merger()
        .merge_to_file(&items(&[input.clone()]), &output, &AtomicBool::new(false), |_| {})
        .unwrap();

    let source = Document::load(&input).unwrap();
    let copy = Document::load(&output).unwrap();
    assert_eq!(copy.get_pages().len(), source.get_pages().len());
    assert_eq!(page_widths(&copy), page_widths(&source));
    for n in 1..=4 {
        assert_eq!(page_text(&copy, n), page_text(&source, n));
    }
}

#[test]
fn test_page_count_is_sum_of_contributions() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "x.pdf", 2),
        write_xml(dir.path(), "tree.xml", "<root><a>1</a><b>2</b></root>"),
        write_pdf(dir.path(), "y.pdf", 1),
        write_image(dir.path(), "scan.png", 10, 20),
    ];

    let merged = pdf_merger().merge(&items(&inputs), |_| {}).unwrap();
    let doc = Document::load_mem(&merged.bytes).unwrap();

    assert_eq!(doc.get_pages().len(), 2 + 1 + 1 + 1);
    assert_eq!(merged.statistics.total_units, 5);
    assert!(page_text(&doc, 3).contains("a: 1"));
    assert!(page_text(&doc, 4).contains("y page 1"));
    assert!(page_has_image(&doc, 5));
}

#[test]
fn test_large_xml_spans_several_pages() {
    let dir = scratch();
    let body: String = (0..100).map(|i| format!("<item>{i}</item>")).collect();
    let xml = write_xml(dir.path(), "big.xml", &format!("<list>{body}</list>"));

    let merged = pdf_merger().merge(&items(&[xml]), |_| {}).unwrap();
    let doc = Document::load_mem(&merged.bytes).unwrap();

    // 101 lines at 46 lines per Letter page.
    assert_eq!(doc.get_pages().len(), 3);
    assert!(page_text(&doc, 1).contains("list"));
    assert!(page_text(&doc, 3).contains("item: 99"));
}

#[test]
fn test_empty_docx_still_produces_a_page() {
    let dir = scratch();
    let docx = write_docx(dir.path(), "blank.docx", &[]);

    let merged = pdf_merger().merge(&items(&[docx]), |_| {}).unwrap();
    let doc = Document::load_mem(&merged.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_docx_text_keeps_hyperlinks_and_typographic_punctuation() {
    let dir = scratch();
    let linked = Paragraph::new()
        .add_run(Run::new().add_text("See "))
        .add_hyperlink(
            Hyperlink::new("docs", HyperlinkType::Anchor).add_run(Run::new().add_text("the docs")),
        )
        .add_run(Run::new().add_text(" now"));
    let quoted = Paragraph::new().add_run(
        Run::new().add_text("Don\u{2019}t \u{201c}quote\u{201d} \u{2013} \u{20ac}5"),
    );
    let docx = write_docx_paragraphs(dir.path(), "styled.docx", vec![linked, quoted]);

    let merged = pdf_merger().merge(&items(&[docx]), |_| {}).unwrap();
    let doc = Document::load_mem(&merged.bytes).unwrap();
    let text = page_text(&doc, 1);

    assert!(text.contains("See the docs now"), "{text:?}");
    assert!(!text.contains('?'), "{text:?}");
}

#[tokio::test]
async fn test_merge_documents_writes_metadata() {
    let dir = scratch();
    let inputs = vec![write_pdf(dir.path(), "a.pdf", 1), write_pdf(dir.path(), "b.pdf", 1)];
    let mut config = Config::new(inputs, dir.path().join("bundle.pdf")).unwrap();
    config.options.metadata.title = Some("Quarterly bundle".to_string());
    config.options.metadata.author = Some("Zoë".to_string());

    let report = merge_documents(&config).await.unwrap();
    assert_eq!(report.statistics.files_merged, 2);

    let doc = Document::load(&config.output).unwrap();
    let manager = MetadataManager::new();
    let metadata = manager.get_metadata(&doc);
    assert_eq!(metadata.title.as_deref(), Some("Quarterly bundle"));
    assert_eq!(metadata.author.as_deref(), Some("Zoë"));
    assert!(manager.get_field(&doc, "Producer").unwrap().starts_with("doccat"));
}

#[tokio::test]
async fn test_existing_destination_is_replaced() {
    let dir = scratch();
    let input = write_pdf(dir.path(), "a.pdf", 2);
    let output = write_bytes(dir.path(), "out.pdf", b"stale");

    let config = Config::new(vec![input], &output).unwrap();
    merge_documents(&config).await.unwrap();

    let doc = Document::load(&output).unwrap();
    assert_eq!(doc.get_pages().len(), 2);
    assert_eq!(dir_entries(dir.path()), vec!["a.pdf", "out.pdf"]);
}
