//! Input validation for doccat.
//!
//! This module provides pre-flight checks run before a merge starts:
//! - File existence and accessibility checks
//! - Supported-format detection
//! - An optional probe that decodes each input and counts its units
//! - Output path validation
//!
//! The merge pipeline performs its own checks as it goes; validating first
//! lets the CLI report every problem before any work is done, and powers
//! `--dry-run`.
//!
//! # Examples
//!
//! ```no_run
//! use doccat::validation::Validator;
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let validator = Validator::new();
//! let result = validator.validate_file(Path::new("scan.png")).await?;
//! println!("{} is a valid {} file", result.path.display(), result.format);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::{Config, OverwriteMode};
use crate::error::{DocCatError, Result};
use crate::format::InputFormat;
use crate::io::{OutputWriter, SourceDocument, SourceReader};
use crate::merge::docx::paragraph_texts;
use crate::session::InputItem;
use crate::utils::format_file_size;

/// Result of validating a single input.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// Path to the validated file.
    pub path: PathBuf,

    /// Detected input format.
    pub format: InputFormat,

    /// Size of the file in bytes.
    pub file_size: u64,

    /// Units found by the probe: pages for PDF, paragraphs for DOCX,
    /// elements for XML, one for an image. `None` when not probed.
    pub units: Option<usize>,
}

impl ValidationResult {
    /// Human-readable description of the probed contents.
    pub fn describe_units(&self) -> Option<String> {
        let units = self.units?;
        let noun = match self.format {
            InputFormat::Pdf => "page",
            InputFormat::Image(_) => "image",
            InputFormat::Docx => "paragraph",
            InputFormat::Xml => "element",
        };
        let plural = if units == 1 { "" } else { "s" };
        Some(format!("{units} {noun}{plural}"))
    }
}

/// Summary of validation results for multiple files.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Individual validation results for each file, in input order.
    pub results: Vec<ValidationResult>,

    /// Total file size in bytes.
    pub total_size: u64,

    /// Number of files that passed validation.
    pub files_validated: usize,
}

impl ValidationSummary {
    /// Create a summary from validation results.
    pub fn from_results(results: Vec<ValidationResult>) -> Self {
        let total_size = results.iter().map(|r| r.file_size).sum();
        let files_validated = results.len();

        Self {
            results,
            total_size,
            files_validated,
        }
    }

    /// Format the total file size as a human-readable string.
    pub fn format_total_size(&self) -> String {
        format_file_size(self.total_size)
    }
}

/// Validator for inputs and output paths.
#[derive(Debug, Clone)]
pub struct Validator {
    /// Whether to decode each input.
    probe: bool,
    reader: SourceReader,
    writer: OutputWriter,
}

impl Validator {
    /// Create a validator that decodes every input.
    pub fn new() -> Self {
        Self {
            probe: true,
            reader: SourceReader::new(),
            writer: OutputWriter::new(),
        }
    }

    /// Create a validator that only checks the file system and extension.
    pub fn shallow() -> Self {
        Self {
            probe: false,
            ..Self::new()
        }
    }

    /// Validate a single input file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - File does not exist or is not a regular file
    /// - File is not accessible
    /// - File is empty
    /// - The extension is not a supported input format
    /// - Probing is enabled and the file cannot be decoded
    pub async fn validate_file(&self, path: &Path) -> Result<ValidationResult> {
        if !path.exists() {
            return Err(DocCatError::file_not_found(path));
        }

        if !path.is_file() {
            return Err(DocCatError::NotAFile {
                path: path.to_path_buf(),
            });
        }

        let metadata =
            tokio::fs::metadata(path)
                .await
                .map_err(|e| DocCatError::FileNotAccessible {
                    path: path.to_path_buf(),
                    source: e,
                })?;

        let item = InputItem::new(path)?;

        if metadata.len() == 0 {
            return Err(DocCatError::source_read(path, "File is empty"));
        }

        let units = if self.probe {
            Some(self.probe_units(item.clone()).await?)
        } else {
            None
        };

        Ok(ValidationResult {
            path: item.path,
            format: item.format,
            file_size: metadata.len(),
            units,
        })
    }

    /// Decode an input on a blocking thread and count its units.
    async fn probe_units(&self, item: InputItem) -> Result<usize> {
        let reader = self.reader.clone();
        let loaded = tokio::task::spawn_blocking(move || reader.load(&item))
            .await
            .map_err(|e| DocCatError::other(format!("Validation worker failed: {e}")))??;

        Ok(match &loaded.document {
            SourceDocument::Pdf(doc) => doc.get_pages().len(),
            SourceDocument::Image(_) => 1,
            SourceDocument::Docx(docx) => paragraph_texts(docx).len(),
            SourceDocument::Xml(root) => root.element_count(),
        })
    }

    /// Validate multiple inputs in order.
    ///
    /// # Errors
    ///
    /// Returns [`DocCatError::EmptySelection`] for an empty list, otherwise
    /// the first failure encountered.
    pub async fn validate_files(&self, paths: &[PathBuf]) -> Result<ValidationSummary> {
        if paths.is_empty() {
            return Err(DocCatError::EmptySelection);
        }

        let mut results = Vec::with_capacity(paths.len());
        for path in paths {
            let result = self.validate_file(path).await?;
            tracing::debug!(
                path = %path.display(),
                format = %result.format,
                units = ?result.units,
                "validated input"
            );
            results.push(result);
        }

        Ok(ValidationSummary::from_results(results))
    }

    /// Validate the output path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Output file exists and `NoClobber` is set
    /// - Output path is a directory
    /// - Output directory doesn't exist or is not writable
    pub async fn validate_output(&self, config: &Config) -> Result<()> {
        let output_path = &config.output;

        if self.writer.exists(output_path).await {
            if output_path.is_dir() {
                return Err(DocCatError::invalid_config(format!(
                    "Output path is a directory: {}",
                    output_path.display()
                )));
            }
            // Prompt is resolved by the caller before the merge starts.
            if config.overwrite_mode == OverwriteMode::NoClobber {
                return Err(DocCatError::output_exists(output_path));
            }

            let output = output_path.canonicalize().ok();
            let clash = config
                .inputs()
                .iter()
                .any(|input| input.canonicalize().ok() == output);
            if clash {
                return Err(DocCatError::invalid_config(format!(
                    "Output file cannot be the same as an input file: {}",
                    output_path.display()
                )));
            }
        }

        self.writer.can_write(output_path).await
    }

    /// Validate the complete configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation check fails.
    pub async fn validate_config(&self, config: &Config) -> Result<ValidationSummary> {
        config.validate()?;
        let summary = self.validate_files(config.inputs()).await?;
        self.validate_output(config).await?;
        Ok(summary)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
