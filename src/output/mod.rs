//! Output formatting and display for doccat.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - The merge progress bar
//! - Validation and merge summaries
//! - Quiet and verbose modes
//!
//! Library diagnostics go through `tracing`; this module is only for what
//! the CLI tells the user.
//!
//! # Examples
//!
//! ```no_run
//! use doccat::config::Config;
//! use doccat::output::OutputFormatter;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;
pub mod progress;

pub use formatter::{MessageLevel, OutputFormatter};
pub use progress::ProgressBar;

use crate::merge::MergeReport;
use crate::utils::format_file_size;
use crate::validation::ValidationSummary;

/// Display validation summary to the user.
///
/// Verbose mode lists every input with its detected format and contents.
pub fn display_validation_summary(formatter: &OutputFormatter, summary: &ValidationSummary) {
    if formatter.is_verbose() {
        for (index, result) in summary.results.iter().enumerate() {
            let contents = result
                .describe_units()
                .map(|units| format!(", {units}"))
                .unwrap_or_default();
            formatter.list_item(
                index + 1,
                &format!(
                    "{} ({}{}, {})",
                    result.path.display(),
                    result.format,
                    contents,
                    format_file_size(result.file_size)
                ),
            );
        }
    }

    formatter.info(&format!(
        "Validated {} file(s), {}",
        summary.files_validated,
        summary.format_total_size()
    ));
}

/// One-line description of a finished merge.
pub fn merge_summary_line(report: &MergeReport) -> String {
    let stats = &report.statistics;
    format!(
        "Merged {} file(s) into {} ({} {}, {}) in {:.2}s",
        stats.files_merged,
        report.output.output_path.display(),
        stats.total_units,
        stats.unit_label(),
        report.output.format_file_size(),
        stats.merge_time.as_secs_f64()
    )
}

/// Display the outcome of a merge to the user.
pub fn display_merge_report(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.success(&merge_summary_line(report));

    if formatter.is_verbose() {
        let stats = &report.statistics;
        formatter.detail("Input size", &stats.format_input_size());
        formatter.detail(
            "Load time",
            &format!("{:.2}s", stats.load_time.as_secs_f64()),
        );
        formatter.detail(
            "Write time",
            &format!("{:.2}s", report.output.write_time.as_secs_f64()),
        );
        for input in &stats.inputs {
            formatter.detail(
                &input.path.display().to_string(),
                &format!("{} -> {} {}", input.format, input.units, stats.target.unit_name()),
            );
        }
    }
}
