//! doccat - Concatenate documents into a single PDF or DOCX file.
//!
//! This library merges an ordered list of heterogeneous inputs into one
//! output document, converting each input into the output's model:
//!
//! - PDF inputs contribute their pages (PDF output) or per-page text (DOCX)
//! - Raster images become a page or an inline picture
//! - DOCX inputs contribute their body elements or rendered text
//! - XML inputs are rendered as an indented element outline
//!
//! Merges report progress once per input, can be cancelled between inputs
//! and write their output atomically.
//!
//! # Examples
//!
//! ## Basic Merge
//!
//! ```no_run
//! use doccat::config::Config;
//! use doccat::merge;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::new(
//!     vec![PathBuf::from("a.pdf"), PathBuf::from("b.jpg"), PathBuf::from("c.docx")],
//!     "merged.pdf",
//! )?;
//!
//! let report = merge::merge_documents(&config).await?;
//! println!("Created {} page document", report.statistics.total_units);
//! # Ok(())
//! # }
//! ```
//!
//! ## Driving a merge from an event loop
//!
//! ```no_run
//! use doccat::config::MergeOptions;
//! use doccat::format::OutputFormat;
//! use doccat::merge::{MergeTask, Merger};
//! use doccat::session::InputList;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut list = InputList::new();
//! list.add("report.pdf")?;
//! list.add("diagram.png")?;
//! list.move_item(1, 0)?;
//!
//! let merger = Merger::new(MergeOptions::new(OutputFormat::Docx));
//! let mut task = MergeTask::spawn(merger, list.begin_merge()?, PathBuf::from("out.docx"));
//! while let Some(progress) = task.next_progress().await {
//!     println!("{}%", progress.percent);
//! }
//! let result = task.wait().await;
//! list.finish_merge(result.is_ok());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod format;
pub mod io;
pub mod logging;
pub mod merge;
pub mod output;
pub mod render;
pub mod session;
pub mod utils;
pub mod validation;
pub mod xml;

// Re-export commonly used types
pub use config::Config;
pub use error::{DocCatError, Result};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
