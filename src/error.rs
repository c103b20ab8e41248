//! Error types for doccat.
//!
//! This module defines all error types that can occur while collecting
//! inputs, converting them and writing the merged document. Errors are
//! designed to be informative and actionable, providing clear context about
//! what went wrong and how to fix it.
//!
//! # Error Categories
//!
//! - **Selection Errors**: Empty input list, unsupported extensions
//! - **Source Errors**: An input could not be read or decoded
//! - **Output Errors**: The merged document could not be serialized or written
//! - **Validation Errors**: Invalid arguments or configuration

use std::io;
use std::path::PathBuf;

/// Result type alias for doccat operations.
pub type Result<T> = std::result::Result<T, DocCatError>;

/// Main error type for doccat operations.
#[derive(Debug, thiserror::Error)]
pub enum DocCatError {
    /// No files were selected before the merge was invoked.
    #[error("No files selected\n  Hint: Add at least one PDF, image, DOCX or XML file")]
    EmptySelection,

    /// File extension is not one of the supported input or output formats.
    #[error("Unsupported file format '{extension}': {}", .path.display())]
    UnsupportedFormat {
        /// Path with the offending extension.
        path: PathBuf,
        /// The extension as written (may be empty).
        extension: String,
    },

    /// An input could not be parsed or decoded.
    #[error("Failed to read source: {}\n  Reason: {reason}", .path.display())]
    SourceRead {
        /// Path of the failing input.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// The merged document could not be serialized or written.
    #[error("Failed to write merged document: {}\n  Reason: {reason}", .path.display())]
    Serialization {
        /// Destination path.
        path: PathBuf,
        /// Underlying cause.
        reason: String,
    },

    /// Input file was not found.
    #[error("File not found: {}", .path.display())]
    FileNotFound {
        /// Path to the file that was not found.
        path: PathBuf,
    },

    /// Input path exists but is not a regular file.
    #[error("Not a file: {}", .path.display())]
    NotAFile {
        /// Path that is not a file.
        path: PathBuf,
    },

    /// Input file is not accessible (permission denied, etc.).
    #[error("Cannot access file: {}\n  Reason: {source}", .path.display())]
    FileNotAccessible {
        /// Path to the inaccessible file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Output file already exists and overwrite is not allowed.
    #[error(
        "Output file already exists: {}\n  Use --force to overwrite or choose a different output path",
        .path.display()
    )]
    OutputExists {
        /// Path to the existing output file.
        path: PathBuf,
    },

    /// Failed to read input list file.
    #[error("Failed to read input list file: {}\n  Reason: {source}", .path.display())]
    FailedToReadInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// Input list file contains an invalid entry.
    #[error(
        "Invalid entry in input list file: {} at line {line_number}\n  Details: {details}",
        .path.display()
    )]
    InvalidInputList {
        /// Path to the input list file.
        path: PathBuf,
        /// Line number with the error.
        line_number: usize,
        /// Details about what's invalid.
        details: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// The input list was modified while a merge was running.
    #[error("Input list cannot be changed while a merge is running")]
    ListBusy,

    /// The merge was cancelled between inputs.
    #[error("Operation cancelled by user")]
    Cancelled,

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },

    /// Generic error with a custom message.
    #[error("{message}")]
    Other {
        /// Error message.
        message: String,
    },
}

impl DocCatError {
    /// Create an UnsupportedFormat error for a path.
    pub fn unsupported_format(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::UnsupportedFormat { path, extension }
    }

    /// Create a SourceRead error.
    pub fn source_read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceRead {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Serialization {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a FileNotFound error.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an OutputExists error.
    pub fn output_exists(path: impl Into<PathBuf>) -> Self {
        Self::OutputExists { path: path.into() }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an Other error with a custom message.
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Path of the input or output this error is about, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::UnsupportedFormat { path, .. }
            | Self::SourceRead { path, .. }
            | Self::Serialization { path, .. }
            | Self::FileNotFound { path }
            | Self::NotAFile { path }
            | Self::FileNotAccessible { path, .. }
            | Self::OutputExists { path }
            | Self::FailedToReadInputList { path, .. }
            | Self::InvalidInputList { path, .. } => Some(path),
            _ => None,
        }
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptySelection => 1,
            Self::UnsupportedFormat { .. } => 1,
            Self::SourceRead { .. } => 3,
            Self::Serialization { .. } => 5,
            Self::FileNotFound { .. } => 2,
            Self::NotAFile { .. } => 2,
            Self::FileNotAccessible { .. } => 2,
            Self::OutputExists { .. } => 4,
            Self::FailedToReadInputList { .. } => 2,
            Self::InvalidInputList { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::ListBusy => 6,
            Self::Cancelled => 130, // Standard exit code for SIGINT
            Self::Io { .. } => 5,
            Self::Other { .. } => 1,
        }
    }
}
