//! The ordered input list a user assembles before merging.
//!
//! [`InputList`] is the single source of truth for what gets merged and in
//! which order. Items are validated for a supported extension when they are
//! added. While a merge is running the list is locked: every mutating
//! operation fails with [`DocCatError::ListBusy`] until the run ends.
//!
//! # Examples
//!
//! ```
//! use doccat::session::InputList;
//!
//! let mut list = InputList::new();
//! list.add("cover.pdf").unwrap();
//! list.add("photo.jpg").unwrap();
//! list.move_item(1, 0).unwrap();
//!
//! let snapshot = list.begin_merge().unwrap();
//! assert_eq!(snapshot[0].path.to_str(), Some("photo.jpg"));
//! assert!(list.add("late.pdf").is_err());
//!
//! list.finish_merge(true);
//! assert!(list.is_empty());
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{DocCatError, Result};
use crate::format::InputFormat;

/// A file queued for merging, with its detected format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputItem {
    /// Path to the source file.
    pub path: PathBuf,
    /// Format inferred from the extension.
    pub format: InputFormat,
}

impl InputItem {
    /// Create an item, detecting its format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`DocCatError::UnsupportedFormat`] for unknown extensions.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = InputFormat::from_path(&path)?;
        Ok(Self { path, format })
    }

    /// File name for display, falling back to the full path.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Ordered, user-editable list of inputs.
#[derive(Debug, Default)]
pub struct InputList {
    items: Vec<InputItem>,
    merging: bool,
}

impl InputList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a path to the end of the list.
    ///
    /// # Errors
    ///
    /// - [`DocCatError::ListBusy`] while a merge is running
    /// - [`DocCatError::UnsupportedFormat`] for unknown extensions
    pub fn add(&mut self, path: impl Into<PathBuf>) -> Result<&InputItem> {
        self.ensure_idle()?;
        let item = InputItem::new(path)?;
        self.items.push(item);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Append several paths, stopping at the first rejected one.
    ///
    /// Paths before the rejected one stay in the list.
    pub fn add_all<I, P>(&mut self, paths: I) -> Result<usize>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut added = 0;
        for path in paths {
            self.add(path)?;
            added += 1;
        }
        Ok(added)
    }

    /// Remove and return the item at `index`.
    pub fn remove(&mut self, index: usize) -> Result<InputItem> {
        self.ensure_idle()?;
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Remove every item whose path equals `path`. Returns how many were removed.
    pub fn remove_path(&mut self, path: &Path) -> Result<usize> {
        self.ensure_idle()?;
        let before = self.items.len();
        self.items.retain(|item| item.path != path);
        Ok(before - self.items.len())
    }

    /// Move the item at `from` so that it ends up at position `to`.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.ensure_idle()?;
        self.check_index(from)?;
        self.check_index(to)?;
        let item = self.items.remove(from);
        self.items.insert(to, item);
        Ok(())
    }

    /// Remove all items.
    pub fn clear(&mut self) -> Result<()> {
        self.ensure_idle()?;
        self.items.clear();
        Ok(())
    }

    /// Items in merge order.
    pub fn items(&self) -> &[InputItem] {
        &self.items
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether a merge currently holds the list.
    pub fn is_merging(&self) -> bool {
        self.merging
    }

    /// Lock the list and return an ordered snapshot for the pipeline.
    ///
    /// # Errors
    ///
    /// - [`DocCatError::EmptySelection`] when there is nothing to merge
    /// - [`DocCatError::ListBusy`] when a merge is already running
    pub fn begin_merge(&mut self) -> Result<Vec<InputItem>> {
        self.ensure_idle()?;
        if self.items.is_empty() {
            return Err(DocCatError::EmptySelection);
        }
        self.merging = true;
        Ok(self.items.clone())
    }

    /// Unlock the list. A successful merge clears it; a failed one leaves it
    /// untouched so the offending input can be fixed and the merge retried.
    pub fn finish_merge(&mut self, success: bool) {
        self.merging = false;
        if success {
            self.items.clear();
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.merging {
            Err(DocCatError::ListBusy)
        } else {
            Ok(())
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(DocCatError::invalid_config(format!(
                "Index {index} is out of range for a list of {} item(s)",
                self.items.len()
            )))
        }
    }
}
