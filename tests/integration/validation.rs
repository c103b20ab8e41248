//! Pre-flight validation of real fixtures.

use doccat::config::{Config, OverwriteMode};
use doccat::error::DocCatError;
use doccat::format::{ImageKind, InputFormat};
use doccat::utils::resolve_inputs;
use doccat::validation::Validator;

use crate::common::*;

#[tokio::test]
async fn test_validation_counts_units_per_format() {
    let dir = scratch();
    let inputs = vec![
        write_pdf(dir.path(), "a.pdf", 3),
        write_image(dir.path(), "b.jpeg", 12, 12),
        write_docx(dir.path(), "c.docx", &["one", "two"]),
        write_xml(dir.path(), "d.xml", "<a><b/></a>"),
    ];

    let summary = Validator::new().validate_files(&inputs).await.unwrap();
    let found: Vec<(InputFormat, Option<usize>)> = summary
        .results
        .iter()
        .map(|r| (r.format, r.units))
        .collect();

    assert_eq!(
        found,
        vec![
            (InputFormat::Pdf, Some(3)),
            (InputFormat::Image(ImageKind::Jpeg), Some(1)),
            (InputFormat::Docx, Some(2)),
            (InputFormat::Xml, Some(2)),
        ]
    );
    assert_eq!(summary.files_validated, 4);

    let json = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["results"][1]["format"]["kind"], "image");
    assert_eq!(json["filesValidated"], 4);
}

#[tokio::test]
async fn test_dry_run_validation_writes_nothing() {
    let dir = scratch();
    let inputs = vec![write_pdf(dir.path(), "a.pdf", 1)];
    let before = dir_entries(dir.path());

    let mut config = Config::new(inputs, dir.path().join("out.pdf")).unwrap();
    config.dry_run = true;
    Validator::new().validate_config(&config).await.unwrap();

    assert_eq!(dir_entries(dir.path()), before);
}

#[tokio::test]
async fn test_no_clobber_refuses_existing_output() {
    let dir = scratch();
    let inputs = vec![write_pdf(dir.path(), "a.pdf", 1)];
    let output = write_bytes(dir.path(), "out.pdf", b"keep me");

    let mut config = Config::new(inputs, &output).unwrap();
    config.overwrite_mode = OverwriteMode::NoClobber;

    assert!(matches!(
        Validator::new().validate_config(&config).await,
        Err(DocCatError::OutputExists { .. })
    ));
}

#[tokio::test]
async fn test_resolved_directory_inputs_validate() {
    let dir = scratch();
    let sub = dir.path().join("bundle");
    std::fs::create_dir(&sub).unwrap();
    write_xml(&sub, "2.xml", "<b/>");
    write_pdf(&sub, "1.pdf", 2);
    write_bytes(&sub, "ignored.txt", b"skip");

    let inputs = resolve_inputs(&[sub.clone()]).unwrap();
    assert_eq!(inputs, vec![sub.join("1.pdf"), sub.join("2.xml")]);

    let summary = Validator::new().validate_files(&inputs).await.unwrap();
    assert_eq!(summary.files_validated, 2);
}
