//! Fixtures for the integration tests.
//!
//! Every input is generated at test time inside a scratch directory, so the
//! suite needs no binary fixtures checked into the repository.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use docx_rs::{Docx, Paragraph, Run};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};
use tempfile::TempDir;

use doccat::session::InputItem;

/// Scratch directory for one test.
pub fn scratch() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Write a PDF with `pages` pages.
///
/// Page `n` (1-based) reads `"{stem} page {n}"` and is `200 + n` points wide,
/// so both text and geometry identify it after a merge.
pub fn write_pdf(dir: &Path, name: &str, pages: usize) -> PathBuf {
    let stem = name.trim_end_matches(".pdf");
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content = format!("BT /F1 12 Tf 20 100 Td ({stem} page {n}) Tj ET");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), (200 + n as i64).into(), 300.into()],
            "Resources" => dictionary! {
                "Font" => dictionary! { "F1" => font_id },
            },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let path = dir.join(name);
    doc.save(&path).expect("Failed to save PDF fixture");
    path
}

/// Write a gradient image; the format follows the extension of `name`.
pub fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let image = image::RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let path = dir.join(name);
    image.save(&path).expect("Failed to save image fixture");
    path
}

/// Write a DOCX with one paragraph per entry.
pub fn write_docx(dir: &Path, name: &str, paragraphs: &[&str]) -> PathBuf {
    let paragraphs: Vec<Paragraph> = paragraphs
        .iter()
        .map(|text| Paragraph::new().add_run(Run::new().add_text(*text)))
        .collect();
    write_docx_paragraphs(dir, name, paragraphs)
}

/// Write a DOCX built from ready-made paragraphs.
pub fn write_docx_paragraphs(dir: &Path, name: &str, paragraphs: Vec<Paragraph>) -> PathBuf {
    let docx = paragraphs
        .into_iter()
        .fold(Docx::new(), |docx, paragraph| docx.add_paragraph(paragraph));
    let path = dir.join(name);
    let file = std::fs::File::create(&path).expect("Failed to create DOCX fixture");
    docx.build().pack(file).expect("Failed to pack DOCX fixture");
    path
}

/// Write an XML file.
pub fn write_xml(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write XML fixture");
    path
}

/// Write arbitrary bytes, e.g. a corrupt input.
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Input items for `paths`, in order.
pub fn items(paths: &[PathBuf]) -> Vec<InputItem> {
    paths
        .iter()
        .map(|path| InputItem::new(path).expect("Unsupported fixture extension"))
        .collect()
}

/// Names of all entries in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Width of each page's MediaBox, in page order.
pub fn page_widths(doc: &Document) -> Vec<f32> {
    doc.get_pages()
        .values()
        .map(|id| {
            let page = doc.get_dictionary(*id).unwrap();
            let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_float().unwrap()
        })
        .collect()
}

/// Extracted text of page `n` (1-based).
pub fn page_text(doc: &Document, n: u32) -> String {
    doc.extract_text(&[n]).unwrap_or_default()
}

/// Whether page `n` (1-based) draws an image XObject.
pub fn page_has_image(doc: &Document, n: u32) -> bool {
    let pages = doc.get_pages();
    let Some(id) = pages.get(&n) else {
        return false;
    };
    let page = doc.get_dictionary(*id).unwrap();
    let Ok(resources) = page.get(b"Resources").and_then(Object::as_dict) else {
        return false;
    };
    resources.has(b"XObject")
}
