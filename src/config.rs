//! Configuration module for doccat.
//!
//! This module holds the validated, normalized configuration that drives a
//! merge. The CLI builds a [`Config`] from its arguments; library callers
//! usually only need [`MergeOptions`], which carries everything the
//! pipeline itself looks at:
//! - Target format
//! - PDF compression and metadata
//! - Page geometry for rendered text
//! - Display width of images in DOCX output

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{DocCatError, Result};
use crate::format::OutputFormat;
use crate::render::LayoutOptions;

/// Default display width of an image placed in DOCX output, in inches.
pub const DEFAULT_IMAGE_WIDTH_INCHES: f32 = 6.0;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - content streams are written as produced.
    None,
    /// Compress every stream.
    #[default]
    Standard,
    /// Compress every stream and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = DocCatError;

    /// Parse compression level from "none", "standard" or "maximum".
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(DocCatError::invalid_config(format!(
                "Invalid compression level: {s}. Must be one of: none, standard, maximum"
            ))),
        }
    }
}

/// Paper size used when drawing text onto PDF pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageSize {
    /// 8.5 x 11 inches.
    #[default]
    Letter,
    /// 210 x 297 mm.
    A4,
}

impl PageSize {
    /// Layout options for this paper size.
    pub fn layout(self) -> LayoutOptions {
        match self {
            Self::Letter => LayoutOptions::letter(),
            Self::A4 => LayoutOptions::a4(),
        }
    }
}

impl FromStr for PageSize {
    type Err = DocCatError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "letter" => Ok(Self::Letter),
            "a4" => Ok(Self::A4),
            _ => Err(DocCatError::invalid_config(format!(
                "Invalid page size: {s}. Must be one of: letter, a4"
            ))),
        }
    }
}

/// Document information written to PDF output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Document title.
    pub title: Option<String>,
    /// Document author.
    pub author: Option<String>,
    /// Document subject.
    pub subject: Option<String>,
    /// Document keywords (comma-separated).
    pub keywords: Option<String>,
}

impl Metadata {
    /// Check if any metadata fields are set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.subject.is_none()
            && self.keywords.is_none()
    }

    /// Create metadata from optional strings, trimming whitespace.
    ///
    /// Whitespace-only values are treated as absent.
    pub fn new(
        title: Option<String>,
        author: Option<String>,
        subject: Option<String>,
        keywords: Option<String>,
    ) -> Self {
        let clean = |opt: Option<String>| {
            opt.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        Self {
            title: clean(title),
            author: clean(author),
            subject: clean(subject),
            keywords: clean(keywords),
        }
    }
}

/// Output file overwrite behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Prompt the user before overwriting (default).
    #[default]
    Prompt,
    /// Always overwrite without prompting.
    Force,
    /// Never overwrite, error if file exists.
    NoClobber,
}

/// Settings consumed by the merge pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOptions {
    /// Format of the merged document.
    pub target: OutputFormat,
    /// Stream compression for PDF output.
    pub compression: CompressionLevel,
    /// Info dictionary entries for PDF output.
    pub metadata: Metadata,
    /// Page geometry for text drawn onto PDF pages.
    pub layout: LayoutOptions,
    /// Display width of images in DOCX output, in inches.
    pub image_width: f32,
}

impl MergeOptions {
    /// Defaults for the given target format.
    pub fn new(target: OutputFormat) -> Self {
        Self {
            target,
            compression: CompressionLevel::default(),
            metadata: Metadata::default(),
            layout: LayoutOptions::default(),
            image_width: DEFAULT_IMAGE_WIDTH_INCHES,
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if !(self.image_width.is_finite() && self.image_width > 0.0) {
            return Err(DocCatError::invalid_config(format!(
                "Image width must be a positive number of inches, got {}",
                self.image_width
            )));
        }
        Ok(())
    }
}

/// Complete configuration for a merge run.
///
/// This structure contains all settings needed to perform a merge,
/// derived and validated from CLI arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input file paths (in merge order).
    pub inputs: Vec<PathBuf>,

    /// Output file path.
    pub output: PathBuf,

    /// Dry run mode - validate without creating output.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,

    /// Print the final report as JSON.
    pub json: bool,

    /// File overwrite behavior.
    pub overwrite_mode: OverwriteMode,

    /// Pipeline settings.
    pub options: MergeOptions,
}

impl Config {
    /// Configuration with defaults, the target inferred from `output`.
    pub fn new(inputs: Vec<PathBuf>, output: impl Into<PathBuf>) -> Result<Self> {
        let output = output.into();
        let target = OutputFormat::from_path(&output)?;
        Ok(Self {
            inputs,
            output,
            dry_run: false,
            verbose: false,
            quiet: false,
            json: false,
            overwrite_mode: OverwriteMode::default(),
            options: MergeOptions::new(target),
        })
    }

    /// Returns a reference to inputs.
    pub fn inputs(&self) -> &[PathBuf] {
        self.inputs.as_ref()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The output extension does not match the target format
    /// - The output path is also an input
    pub fn validate(&self) -> Result<()> {
        if self.inputs().is_empty() {
            return Err(DocCatError::EmptySelection);
        }

        if self.verbose && self.quiet {
            return Err(DocCatError::invalid_config(
                "Cannot use both --verbose and --quiet",
            ));
        }

        let inferred = OutputFormat::from_path(&self.output)?;
        if inferred != self.options.target {
            return Err(DocCatError::invalid_config(format!(
                "Output format {} does not match the extension of {}",
                self.options.target,
                self.output.display()
            )));
        }

        if self.inputs().contains(&self.output) {
            return Err(DocCatError::invalid_config(format!(
                "Output file cannot be the same as an input file: {}",
                self.output.display()
            )));
        }

        self.options.validate()
    }

    /// Check if output should be displayed.
    ///
    /// Returns false if in quiet mode and not doing a dry run.
    pub fn should_print(&self) -> bool {
        !self.quiet || self.dry_run
    }
}
