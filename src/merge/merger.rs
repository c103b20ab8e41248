//! Core merge implementation.
//!
//! This module implements the merge loop: inputs are loaded one at a time,
//! in order, handed to the output builder's adapter for their format, and
//! reported as progress. The first failure aborts the whole merge.

use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::config::MergeOptions;
use crate::error::{DocCatError, Result};
use crate::format::{InputFormat, OutputFormat};
use crate::io::{OutputWriter, SourceReader, WriteStatistics};
use crate::merge::OutputBuilder;
use crate::session::InputItem;
use crate::utils::format_file_size;

/// Progress after an input has been merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MergeProgress {
    /// Inputs merged so far.
    pub completed: usize,
    /// Inputs in this merge.
    pub total: usize,
    /// `round(completed / total * 100)`, in `0..=100`.
    pub percent: u8,
}

impl MergeProgress {
    /// Progress for `completed` of `total` inputs.
    pub fn new(completed: usize, total: usize) -> Self {
        let percent = if total == 0 {
            100
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            completed,
            total,
            percent: percent.min(100),
        }
    }

    /// Whether every input has been merged.
    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

/// What one input contributed to the output.
#[derive(Debug, Clone, Serialize)]
pub struct InputSummary {
    /// Source path.
    pub path: PathBuf,
    /// Detected input format.
    pub format: InputFormat,
    /// Output units (pages or body elements) it produced.
    pub units: usize,
    /// Source size in bytes.
    pub file_size: u64,
}

/// Statistics about a merge operation.
#[derive(Debug, Clone, Serialize)]
pub struct MergeStatistics {
    /// Output format.
    pub target: OutputFormat,

    /// Number of inputs merged.
    pub files_merged: usize,

    /// Total pages (PDF) or body elements (DOCX) in the output.
    pub total_units: usize,

    /// Per-input contributions, in merge order.
    pub inputs: Vec<InputSummary>,

    /// Total size of input files.
    pub input_size: u64,

    /// Time spent reading and decoding inputs.
    pub load_time: Duration,

    /// Total time for the merge, serialization included.
    pub merge_time: Duration,
}

impl MergeStatistics {
    /// Format input size as human-readable string.
    pub fn format_input_size(&self) -> String {
        format_file_size(self.input_size)
    }

    /// Unit name with plural suffix for `total_units`.
    pub fn unit_label(&self) -> String {
        let unit = self.target.unit_name();
        if self.total_units == 1 {
            unit.to_string()
        } else {
            format!("{unit}s")
        }
    }
}

/// A merged document held in memory.
#[derive(Debug)]
pub struct MergedDocument {
    /// Serialized output.
    pub bytes: Vec<u8>,

    /// Statistics about the merge.
    pub statistics: MergeStatistics,
}

/// Outcome of a merge written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    /// Statistics about the merge.
    pub statistics: MergeStatistics,

    /// Statistics about the write.
    pub output: WriteStatistics,
}

/// Merges an ordered list of inputs into one output document.
#[derive(Debug, Clone)]
pub struct Merger {
    reader: SourceReader,
    writer: OutputWriter,
    options: MergeOptions,
}

impl Merger {
    /// Create a merger with the given options.
    pub fn new(options: MergeOptions) -> Self {
        Self {
            reader: SourceReader::new(),
            writer: OutputWriter::new(),
            options,
        }
    }

    /// Options in use.
    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge `inputs` in order and return the serialized document.
    ///
    /// `progress` is called exactly once per input, after it has been
    /// merged, with non-decreasing percentages ending at 100.
    ///
    /// # Errors
    ///
    /// - [`DocCatError::EmptySelection`] when `inputs` is empty
    /// - [`DocCatError::SourceRead`] naming the first input that fails
    /// - [`DocCatError::Serialization`] when the output cannot be produced
    pub fn merge<F>(&self, inputs: &[InputItem], progress: F) -> Result<MergedDocument>
    where
        F: FnMut(MergeProgress),
    {
        self.merge_cancellable(inputs, &AtomicBool::new(false), progress)
    }

    /// Like [`Merger::merge`], checking `cancel` before each input.
    ///
    /// # Errors
    ///
    /// Additionally returns [`DocCatError::Cancelled`] once `cancel` is set.
    pub fn merge_cancellable<F>(
        &self,
        inputs: &[InputItem],
        cancel: &AtomicBool,
        progress: F,
    ) -> Result<MergedDocument>
    where
        F: FnMut(MergeProgress),
    {
        let start = Instant::now();
        let (builder, mut statistics) = self.assemble(inputs, cancel, progress)?;
        let bytes = builder
            .finish()
            .map_err(|e| DocCatError::serialization(PathBuf::new(), e))?;
        statistics.merge_time = start.elapsed();
        Ok(MergedDocument { bytes, statistics })
    }

    /// Merge `inputs` and write the result atomically to `destination`.
    ///
    /// Nothing is written unless every input merged and the document
    /// serialized; an existing destination is replaced only by a complete
    /// file.
    pub fn merge_to_file<F>(
        &self,
        inputs: &[InputItem],
        destination: &Path,
        cancel: &AtomicBool,
        progress: F,
    ) -> Result<MergeReport>
    where
        F: FnMut(MergeProgress),
    {
        let start = Instant::now();
        let (builder, mut statistics) = self.assemble(inputs, cancel, progress)?;
        let bytes = builder
            .finish()
            .map_err(|e| DocCatError::serialization(destination, e))?;
        statistics.merge_time = start.elapsed();

        let output = self.writer.write(&bytes, destination)?;

        tracing::info!(
            output = %destination.display(),
            files = statistics.files_merged,
            units = statistics.total_units,
            bytes = output.file_size,
            "merge complete"
        );

        Ok(MergeReport { statistics, output })
    }

    fn assemble<F>(
        &self,
        inputs: &[InputItem],
        cancel: &AtomicBool,
        mut progress: F,
    ) -> Result<(OutputBuilder, MergeStatistics)>
    where
        F: FnMut(MergeProgress),
    {
        if inputs.is_empty() {
            return Err(DocCatError::EmptySelection);
        }

        tracing::info!(
            inputs = inputs.len(),
            target = %self.options.target,
            "starting merge"
        );

        let total = inputs.len();
        let mut builder = OutputBuilder::new(&self.options);
        let mut summaries = Vec::with_capacity(total);
        let mut load_time = Duration::ZERO;

        for (index, item) in inputs.iter().enumerate() {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!(completed = index, total, "merge cancelled");
                return Err(DocCatError::Cancelled);
            }

            let loaded = self.reader.load(item)?;
            load_time += loaded.load_time;

            let units = builder
                .adapters()
                .append(loaded.document)
                .map_err(|e| match e {
                    DocCatError::SourceRead { .. } => e,
                    other => DocCatError::source_read(&item.path, other),
                })?;

            tracing::debug!(
                path = %item.path.display(),
                format = %item.format,
                units,
                "merged input"
            );

            summaries.push(InputSummary {
                path: item.path.clone(),
                format: item.format,
                units,
                file_size: loaded.file_size,
            });
            progress(MergeProgress::new(index + 1, total));
        }

        let statistics = MergeStatistics {
            target: self.options.target,
            files_merged: summaries.len(),
            total_units: builder.adapters().unit_count(),
            input_size: summaries.iter().map(|s| s.file_size).sum(),
            inputs: summaries,
            load_time,
            merge_time: Duration::ZERO,
        };

        Ok((builder, statistics))
    }
}
