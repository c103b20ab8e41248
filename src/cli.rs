//! CLI argument parsing for doccat.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input collection and conversion into a
//! validated [`Config`].

use clap::Parser;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use doccat::config::{CompressionLevel, Config, Metadata, OverwriteMode, PageSize};
use doccat::error::{DocCatError, Result};
use doccat::format::{InputFormat, OutputFormat};
use doccat::utils::resolve_inputs;

/// Concatenate documents into a single PDF or DOCX file.
///
/// doccat accepts PDF, JPEG, PNG, BMP, GIF, TIFF, DOCX and XML inputs and
/// converts each one into the output format, in the order given.
#[derive(Parser, Debug)]
#[command(name = "doccat")]
#[command(version)]
#[command(about = "Concatenate PDF, image, DOCX and XML files into one PDF or DOCX", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input files to merge (in order)
    ///
    /// Files, directories (searched recursively for supported files) and
    /// glob patterns are accepted. Inputs are merged in the order provided.
    ///
    /// Examples:
    ///   doccat cover.pdf scan.png notes.docx -o bundle.pdf
    ///   doccat 'chapters/*.docx' -o book.docx
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<PathBuf>,

    /// Output file path
    ///
    /// The extension selects the output format: .pdf or .docx.
    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    /// Output format (pdf or docx); must agree with the output extension
    #[arg(long, value_name = "FORMAT")]
    #[arg(value_parser = ["pdf", "docx"])]
    pub format: Option<String>,

    /// Dry run - validate inputs and preview the merge without creating output
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - list every input and enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Force overwrite of existing output file without confirmation
    #[arg(short, long)]
    pub force: bool,

    /// Never overwrite existing output file
    #[arg(long, conflicts_with = "force")]
    pub no_clobber: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the merge report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Compression level for PDF output
    ///
    /// - none: content streams are written as produced
    /// - standard: compress every stream (default)
    /// - maximum: also drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Paper size for pages drawn from DOCX and XML inputs
    #[arg(long, value_name = "SIZE", default_value = "letter")]
    #[arg(value_parser = ["letter", "a4"])]
    pub page_size: String,

    /// Display width of images in DOCX output, in inches
    #[arg(long, value_name = "INCHES", default_value_t = doccat::config::DEFAULT_IMAGE_WIDTH_INCHES)]
    pub image_width: f32,

    /// Set title metadata for PDF output
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Set author metadata for PDF output
    #[arg(long, value_name = "TEXT")]
    pub author: Option<String>,

    /// Set subject metadata for PDF output
    #[arg(long, value_name = "TEXT")]
    pub subject: Option<String>,

    /// Set keywords metadata for PDF output (comma-separated)
    #[arg(long, value_name = "TEXT")]
    pub keywords: Option<String>,

    /// Read additional inputs from a file (one path per line)
    ///
    /// Blank lines and lines starting with '#' are skipped. Use '-' to read
    /// from stdin. Listed paths are appended after the direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// # Errors
    ///
    /// Returns an error if an option value is invalid, the output extension
    /// is unsupported or disagrees with `--format`, or configuration
    /// validation fails.
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let mut config = Config::new(inputs, &self.output)?;

        if let Some(ref format) = self.format {
            config.options.target = OutputFormat::from_str(format)?;
        }

        config.options.compression = CompressionLevel::from_str(&self.compression)?;
        config.options.layout = PageSize::from_str(&self.page_size)?.layout();
        config.options.image_width = self.image_width;
        config.options.metadata = Metadata::new(
            self.title.clone(),
            self.author.clone(),
            self.subject.clone(),
            self.keywords.clone(),
        );

        config.overwrite_mode = if self.force {
            OverwriteMode::Force
        } else if self.no_clobber {
            OverwriteMode::NoClobber
        } else {
            OverwriteMode::Prompt
        };
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;
        config.quiet = self.quiet;
        config.json = self.json;

        config.validate()?;
        Ok(config)
    }

    /// Get all input paths: direct inputs expanded, then the input list.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern or directory cannot be expanded, the
    /// input list cannot be read or parsed, or nothing was selected.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = resolve_inputs(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            all_inputs.extend(read_input_list(input_list_path).await?);
        }

        if all_inputs.is_empty() {
            return Err(DocCatError::EmptySelection);
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a list file, or stdin for `-`.
async fn read_input_list(path: &Path) -> Result<Vec<PathBuf>> {
    if path.as_os_str() == "-" {
        return parse_input_list(BufReader::new(tokio::io::stdin()), path).await;
    }

    let file = tokio::fs::File::open(path)
        .await
        .map_err(|e| DocCatError::FailedToReadInputList {
            path: path.to_path_buf(),
            source: e,
        })?;
    parse_input_list(BufReader::new(file), path).await
}

/// Parse one path per line; `#` comments and blank lines are skipped.
///
/// Every listed path must carry a supported input extension.
async fn parse_input_list<R>(reader: R, path: &Path) -> Result<Vec<PathBuf>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut paths = Vec::new();
    let mut line_number = 0;

    while let Some(line) =
        lines
            .next_line()
            .await
            .map_err(|e| DocCatError::FailedToReadInputList {
                path: path.to_path_buf(),
                source: e,
            })?
    {
        line_number += 1;
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let input_path = PathBuf::from(line);
        if !InputFormat::is_supported(&input_path) {
            return Err(DocCatError::InvalidInputList {
                path: path.to_path_buf(),
                line_number,
                details: format!("Unsupported file format: {line}"),
            });
        }

        paths.push(input_path);
    }

    Ok(paths)
}
