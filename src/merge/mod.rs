//! Document merging operations.
//!
//! This module provides the merge pipeline:
//! - Per-format builders for PDF and DOCX output
//! - Format dispatch from loaded sources to builders
//! - Ordered, per-input progress reporting
//! - Cooperative cancellation between inputs
//! - A background task wrapper for event-loop callers
//!
//! # Examples
//!
//! ```no_run
//! use doccat::config::Config;
//! use doccat::merge;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(
//!     vec![PathBuf::from("cover.pdf"), PathBuf::from("photo.jpg")],
//!     "bundle.pdf",
//! )?;
//!
//! let report = merge::merge_documents(&config).await?;
//! println!("Created {} page document", report.statistics.total_units);
//! # Ok(())
//! # }
//! ```

pub mod docx;
pub mod merger;
pub mod metadata;
pub mod pdf;
pub mod task;

pub use docx::DocxBuilder;
pub use merger::{InputSummary, MergeProgress, MergeReport, MergeStatistics, MergedDocument, Merger};
pub use metadata::MetadataManager;
pub use pdf::PdfBuilder;
pub use task::{CancelHandle, MergeTask};

use crate::config::{Config, MergeOptions};
use crate::error::Result;
use crate::format::OutputFormat;
use crate::io::SourceDocument;
use crate::session::InputList;
use crate::xml::XmlElement;

/// Per-format adapters of an output builder.
///
/// Each method appends one source's contribution to the output and returns
/// the number of output units (pages or body elements) it produced.
pub trait DocumentBuilder {
    /// Append a PDF source.
    fn append_pdf(&mut self, source: lopdf::Document) -> Result<usize>;

    /// Append a decoded raster image.
    fn append_image(&mut self, image: image::RgbImage) -> Result<usize>;

    /// Append a DOCX source.
    fn append_docx(&mut self, source: docx_rs::Docx) -> Result<usize>;

    /// Append an XML element tree.
    fn append_xml(&mut self, root: &XmlElement) -> Result<usize>;

    /// Units appended so far.
    fn unit_count(&self) -> usize;

    /// Dispatch a loaded source to the matching adapter.
    fn append(&mut self, source: SourceDocument) -> Result<usize> {
        match source {
            SourceDocument::Pdf(doc) => self.append_pdf(doc),
            SourceDocument::Image(image) => self.append_image(image),
            SourceDocument::Docx(docx) => self.append_docx(*docx),
            SourceDocument::Xml(root) => self.append_xml(&root),
        }
    }
}

/// The builder for one merge run.
pub enum OutputBuilder {
    /// Page-sequence output.
    Pdf(PdfBuilder),
    /// Body-element output.
    Docx(DocxBuilder),
}

impl OutputBuilder {
    /// Empty builder for `options.target`.
    pub fn new(options: &MergeOptions) -> Self {
        match options.target {
            OutputFormat::Pdf => Self::Pdf(PdfBuilder::new(options)),
            OutputFormat::Docx => Self::Docx(DocxBuilder::new(options)),
        }
    }

    /// Borrow the builder through its adapter trait.
    pub fn adapters(&mut self) -> &mut dyn DocumentBuilder {
        match self {
            Self::Pdf(builder) => builder,
            Self::Docx(builder) => builder,
        }
    }

    /// Serialize the finished document.
    pub fn finish(self) -> Result<Vec<u8>> {
        match self {
            Self::Pdf(builder) => builder.finish(),
            Self::Docx(builder) => builder.finish(),
        }
    }
}

/// Merge the files named by a configuration into its output path.
///
/// Convenience function that builds an input list from [`Config::inputs`],
/// runs the merge on a background worker and waits for it, discarding
/// progress updates.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or any merge step fails.
pub async fn merge_documents(config: &Config) -> Result<MergeReport> {
    config.validate()?;

    let mut list = InputList::new();
    list.add_all(config.inputs())?;
    let snapshot = list.begin_merge()?;

    let merger = Merger::new(config.options.clone());
    let result = MergeTask::spawn(merger, snapshot, config.output.clone())
        .wait()
        .await;

    list.finish_merge(result.is_ok());
    result
}
