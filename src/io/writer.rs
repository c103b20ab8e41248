//! Output writing.
//!
//! The merged document is produced fully in memory and then handed to
//! [`OutputWriter`], which performs an atomic replace:
//! - Write to a hidden temporary file next to the destination
//! - Flush and sync it
//! - Rename it over the destination
//!
//! If any step fails the temporary file is removed and the destination is
//! left exactly as it was.
//!
//! # Examples
//!
//! ```no_run
//! use doccat::io::OutputWriter;
//! use std::path::Path;
//!
//! # fn example(bytes: Vec<u8>) -> doccat::Result<()> {
//! let writer = OutputWriter::new();
//! let stats = writer.write(&bytes, Path::new("merged.pdf"))?;
//! println!("Wrote {} in {:?}", stats.format_file_size(), stats.write_time);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::error::{DocCatError, Result};
use crate::utils::format_file_size;

/// Buffer size for writing (in bytes).
const BUFFER_SIZE: usize = 64 * 1024;

/// Statistics about a write operation.
#[derive(Debug, Clone, Serialize)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writes finished documents to disk.
#[derive(Debug, Clone, Default)]
pub struct OutputWriter;

impl OutputWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Write `bytes` to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`DocCatError::Serialization`] if the file cannot be created,
    /// written or moved into place. The destination is untouched in that
    /// case and no temporary file is left behind.
    pub fn write(&self, bytes: &[u8], path: &Path) -> Result<WriteStatistics> {
        let start = Instant::now();

        let temp_path = temp_path_for(path);
        let result = self
            .write_file(bytes, &temp_path)
            .and_then(|()| std::fs::rename(&temp_path, path));

        if let Err(e) = result {
            // Best effort; the temp file may not exist yet.
            let _ = std::fs::remove_file(&temp_path);
            return Err(DocCatError::serialization(path, e));
        }

        let write_time = start.elapsed();
        let file_size = std::fs::metadata(path)
            .map(|m| m.len())
            .unwrap_or(bytes.len() as u64);

        tracing::debug!(path = %path.display(), bytes = file_size, ?write_time, "wrote output");

        Ok(WriteStatistics {
            write_time,
            file_size,
            output_path: path.to_path_buf(),
        })
    }

    fn write_file(&self, bytes: &[u8], path: &Path) -> std::io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
        writer.write_all(bytes)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }

    /// Check if a file can be written to the given path.
    ///
    /// Performs pre-flight checks without actually writing.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Parent directory doesn't exist
    /// - Parent directory is not writable
    pub async fn can_write(&self, path: &Path) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => return Ok(()),
        };

        let metadata =
            tokio::fs::metadata(parent)
                .await
                .map_err(|_| DocCatError::InvalidConfig {
                    message: format!("Output directory does not exist: {}", parent.display()),
                })?;

        if !metadata.is_dir() {
            return Err(DocCatError::invalid_config(format!(
                "Output parent is not a directory: {}",
                parent.display()
            )));
        }

        if metadata.permissions().readonly() {
            return Err(DocCatError::invalid_config(format!(
                "Output directory is not writable: {}",
                parent.display()
            )));
        }

        Ok(())
    }

    /// Check if output file exists.
    pub async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }
}

/// Hidden sibling of `path` used as the write target before the rename.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{name}.{}.tmp", std::process::id()))
}
