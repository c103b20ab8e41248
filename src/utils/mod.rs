//! Utilities for path collection and display formatting.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{DocCatError, Result};
use crate::format::InputFormat;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Returns a flattened list of resolved paths, each pattern's matches in
/// the order `glob` yields them (alphabetical).
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns {
        resolved_paths.extend(collect_paths_for_pattern(pattern)?);
    }

    Ok(resolved_paths)
}

/// Expand a single glob pattern into filesystem paths.
///
/// Pattern examples:
/// - `"**/*.pdf"`
/// - `"./scans/*.png"`
fn collect_paths_for_pattern<P: AsRef<str>>(pattern: P) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern.as_ref()).map_err(|err| {
        DocCatError::invalid_config(format!("Invalid pattern '{}': {err}", pattern.as_ref()))
    })?;

    paths
        .map(|entry| entry.map_err(|err| DocCatError::other(err.to_string())))
        .collect()
}

/// Whether a command-line input should be treated as a glob pattern.
pub fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Recursively collect supported input files below `dir`, sorted by path.
///
/// Hidden entries (names starting with `.`) are skipped.
pub fn expand_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let walker = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry.file_name()));

    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(dir).to_path_buf();
            match err.into_io_error() {
                Some(source) => DocCatError::FileNotAccessible { path, source },
                None => DocCatError::other(format!(
                    "Filesystem loop detected below {}",
                    path.display()
                )),
            }
        })?;

        if entry.file_type().is_file() && InputFormat::is_supported(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Resolve command-line inputs into an ordered list of files.
///
/// Each entry is expanded in place: glob patterns to their matching files,
/// directories to the supported files below them, anything else kept as
/// given. Whether a kept path exists is checked later, by validation.
///
/// # Errors
///
/// Returns an error if a pattern is invalid or matches nothing, or if a
/// directory cannot be walked.
pub fn resolve_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut resolved = Vec::with_capacity(inputs.len());

    for input in inputs {
        let text = input.to_string_lossy();
        if !input.exists() && is_glob_pattern(&text) {
            let matches: Vec<PathBuf> = collect_paths_for_patterns([&*text])?
                .into_iter()
                .filter(|path| path.is_file())
                .collect();
            if matches.is_empty() {
                return Err(DocCatError::invalid_config(format!(
                    "Pattern matched no files: {text}"
                )));
            }
            resolved.extend(matches);
        } else if input.is_dir() {
            resolved.extend(expand_directory(input)?);
        } else {
            resolved.push(input.clone());
        }
    }

    Ok(resolved)
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
