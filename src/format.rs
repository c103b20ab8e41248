//! Input and output format detection.
//!
//! Formats are a closed set of variants looked up from the file extension,
//! case-insensitively. Anything outside the set is rejected with
//! [`DocCatError::UnsupportedFormat`] at the point a path is added, so the
//! merge pipeline can assume every input it sees is supported.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::{DocCatError, Result};

/// Raster image container formats accepted as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageKind {
    /// `.jpg` / `.jpeg`
    Jpeg,
    /// `.png`
    Png,
    /// `.bmp`
    Bmp,
    /// `.gif`
    Gif,
    /// `.tif` / `.tiff`
    Tiff,
}

impl ImageKind {
    /// Codec hint for the image decoder.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Gif => image::ImageFormat::Gif,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }
}

/// Format of a single input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "image")]
pub enum InputFormat {
    /// Portable Document Format.
    Pdf,
    /// Raster image.
    Image(ImageKind),
    /// Office Open XML word processing document.
    Docx,
    /// Generic XML document.
    Xml,
}

impl InputFormat {
    /// Look up a format from a bare extension (without the dot).
    pub fn from_extension(extension: &str) -> Option<Self> {
        let format = match extension.to_ascii_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" => Self::Image(ImageKind::Jpeg),
            "png" => Self::Image(ImageKind::Png),
            "bmp" => Self::Image(ImageKind::Bmp),
            "gif" => Self::Image(ImageKind::Gif),
            "tif" | "tiff" => Self::Image(ImageKind::Tiff),
            "docx" => Self::Docx,
            "xml" => Self::Xml,
            _ => return None,
        };
        Some(format)
    }

    /// Detect the format of a path from its extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocCatError::UnsupportedFormat`] when the extension is
    /// missing or not recognized.
    ///
    /// # Examples
    ///
    /// ```
    /// use doccat::format::{ImageKind, InputFormat};
    ///
    /// assert_eq!(InputFormat::from_path("scan.JPG").unwrap(), InputFormat::Image(ImageKind::Jpeg));
    /// assert!(InputFormat::from_path("notes.txt").is_err());
    /// ```
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| DocCatError::unsupported_format(path))
    }

    /// Check whether a path carries a supported input extension.
    pub fn is_supported(path: impl AsRef<Path>) -> bool {
        Self::from_path(path).is_ok()
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Image(_) => "Image",
            Self::Docx => "DOCX",
            Self::Xml => "XML",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Format of the merged output document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Page-sequence output.
    Pdf,
    /// Paragraph/body-element output.
    Docx,
}

impl OutputFormat {
    /// Infer the output format from the destination's extension.
    ///
    /// # Errors
    ///
    /// Any extension other than `.pdf` or `.docx` is rejected.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| DocCatError::unsupported_format(path))
    }

    /// Canonical file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }

    /// Name of the unit this format is built from.
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Pdf => "page",
            Self::Docx => "body element",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = DocCatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            _ => Err(DocCatError::invalid_config(format!(
                "Invalid output format: {s}. Must be one of: pdf, docx"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        })
    }
}
