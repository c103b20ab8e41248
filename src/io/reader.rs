//! Source loading.
//!
//! Every input is loaded into one [`SourceDocument`] variant, decided by
//! its detected [`InputFormat`]. Loading is synchronous: the merge pipeline
//! already runs on a blocking worker, so the reader never touches the async
//! runtime.
//!
//! Any failure here (unreadable file, corrupt PDF, undecodable image,
//! broken DOCX package, malformed XML) becomes
//! [`DocCatError::SourceRead`] naming the offending path.
//!
//! # Examples
//!
//! ```no_run
//! use doccat::io::SourceReader;
//! use doccat::session::InputItem;
//!
//! # fn example() -> doccat::Result<()> {
//! let reader = SourceReader::new();
//! let loaded = reader.load(&InputItem::new("scan.png")?)?;
//! println!("{} loaded in {:?}", loaded.path.display(), loaded.load_time);
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::RgbImage;
use lopdf::Document;

use crate::error::{DocCatError, Result};
use crate::format::{ImageKind, InputFormat};
use crate::session::InputItem;
use crate::xml::XmlElement;

/// A decoded input, one variant per input format.
#[derive(Debug)]
pub enum SourceDocument {
    /// Parsed PDF.
    Pdf(Document),
    /// Raster image normalized to 8-bit RGB.
    Image(RgbImage),
    /// Parsed DOCX package.
    Docx(Box<docx_rs::Docx>),
    /// Root of an XML element tree.
    Xml(XmlElement),
}

impl SourceDocument {
    /// Format label of the variant.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf(_) => "PDF",
            Self::Image(_) => "Image",
            Self::Docx(_) => "DOCX",
            Self::Xml(_) => "XML",
        }
    }
}

/// A loaded input with load statistics.
#[derive(Debug)]
pub struct LoadedSource {
    /// The decoded document.
    pub document: SourceDocument,

    /// Path to the source file.
    pub path: PathBuf,

    /// Time taken to read and decode the file.
    pub load_time: Duration,

    /// File size in bytes.
    pub file_size: u64,
}

/// Loads inputs from disk.
#[derive(Debug, Clone, Default)]
pub struct SourceReader;

impl SourceReader {
    /// Create a new reader.
    pub fn new() -> Self {
        Self
    }

    /// Read and decode one input.
    ///
    /// # Errors
    ///
    /// Returns [`DocCatError::SourceRead`] if the file cannot be read or
    /// decoded, including encrypted PDFs.
    pub fn load(&self, item: &InputItem) -> Result<LoadedSource> {
        let start = Instant::now();
        let path = item.path.as_path();

        let bytes = std::fs::read(path).map_err(|e| DocCatError::source_read(path, e))?;
        let file_size = bytes.len() as u64;

        let document = match item.format {
            InputFormat::Pdf => SourceDocument::Pdf(load_pdf(path, &bytes)?),
            InputFormat::Image(kind) => SourceDocument::Image(load_image(path, &bytes, kind)?),
            InputFormat::Docx => SourceDocument::Docx(Box::new(load_docx(path, &bytes)?)),
            InputFormat::Xml => SourceDocument::Xml(load_xml(path, &bytes)?),
        };

        let load_time = start.elapsed();
        tracing::debug!(
            path = %path.display(),
            kind = document.label(),
            bytes = file_size,
            ?load_time,
            "loaded source"
        );

        Ok(LoadedSource {
            document,
            path: item.path.clone(),
            load_time,
            file_size,
        })
    }
}

fn load_pdf(path: &Path, bytes: &[u8]) -> Result<Document> {
    let doc = Document::load_mem(bytes).map_err(|e| DocCatError::source_read(path, e))?;
    if doc.is_encrypted() {
        return Err(DocCatError::source_read(
            path,
            "PDF is encrypted; decrypt it before merging",
        ));
    }
    Ok(doc)
}

fn load_image(path: &Path, bytes: &[u8], kind: ImageKind) -> Result<RgbImage> {
    // Content sniffing first; the extension is only a fallback hint.
    let decoded = image::load_from_memory(bytes)
        .or_else(|_| image::load_from_memory_with_format(bytes, kind.image_format()))
        .map_err(|e| DocCatError::source_read(path, e))?;
    Ok(decoded.to_rgb8())
}

fn load_docx(path: &Path, bytes: &[u8]) -> Result<docx_rs::Docx> {
    docx_rs::read_docx(bytes).map_err(|e| DocCatError::source_read(path, e))
}

fn load_xml(path: &Path, bytes: &[u8]) -> Result<XmlElement> {
    let source = std::str::from_utf8(bytes).map_err(|e| DocCatError::source_read(path, e))?;
    XmlElement::parse(source).map_err(|e| DocCatError::source_read(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, bytes: &[u8]) -> InputItem {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        InputItem::new(path).unwrap()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut buffer = std::io::Cursor::new(Vec::new());
        img.write_to(&mut buffer, image::ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_load_image_normalizes_to_rgb() {
        let dir = TempDir::new().unwrap();
        let item = write(&dir, "pixel.png", &png_bytes(4, 3));

        let loaded = SourceReader::new().load(&item).unwrap();
        match loaded.document {
            SourceDocument::Image(img) => {
                assert_eq!(img.dimensions(), (4, 3));
                assert_eq!(img.get_pixel(0, 0).0, [10, 20, 30]);
            }
            other => panic!("expected image, got {}", other.label()),
        }
        assert!(loaded.file_size > 0);
    }

    #[test]
    fn test_image_with_wrong_extension_is_sniffed() {
        let dir = TempDir::new().unwrap();
        let item = write(&dir, "actually_png.jpg", &png_bytes(2, 2));
        let loaded = SourceReader::new().load(&item).unwrap();
        assert!(matches!(loaded.document, SourceDocument::Image(_)));
    }

    #[test]
    fn test_load_xml() {
        let dir = TempDir::new().unwrap();
        let item = write(&dir, "tree.xml", b"<root><leaf>x</leaf></root>");
        let loaded = SourceReader::new().load(&item).unwrap();
        match loaded.document {
            SourceDocument::Xml(root) => assert_eq!(root.element_count(), 2),
            other => panic!("expected xml, got {}", other.label()),
        }
    }

    #[test]
    fn test_deeply_nested_xml_is_a_source_error() {
        let dir = TempDir::new().unwrap();
        let depth = crate::xml::MAX_DEPTH * 10;
        let body = format!("{}{}", "<n>".repeat(depth), "</n>".repeat(depth));
        let item = write(&dir, "deep.xml", body.as_bytes());

        let err = SourceReader::new().load(&item).unwrap_err();
        assert!(matches!(err, DocCatError::SourceRead { .. }));
        assert_eq!(err.path(), Some(&item.path));
        assert!(err.to_string().contains("nested deeper"));
    }

    #[test]
    fn test_corrupt_inputs_name_their_path() {
        let dir = TempDir::new().unwrap();
        let reader = SourceReader::new();

        for name in ["bad.pdf", "bad.png", "bad.docx", "bad.xml"] {
            let item = write(&dir, name, b"this is not a valid document <");
            let err = reader.load(&item).unwrap_err();
            assert!(
                matches!(err, DocCatError::SourceRead { .. }),
                "{name}: {err:?}"
            );
            assert_eq!(err.path(), Some(&item.path));
        }
    }

    #[test]
    fn test_missing_file() {
        let item = InputItem::new("/nonexistent/doccat/missing.pdf").unwrap();
        let err = SourceReader::new().load(&item).unwrap_err();
        assert!(matches!(err, DocCatError::SourceRead { .. }));
    }
}
