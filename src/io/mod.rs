//! I/O operations for doccat.
//!
//! This module handles all file I/O operations including:
//! - Loading inputs of every supported format from disk
//! - Writing the merged document atomically
//!
//! # Examples
//!
//! ```no_run
//! use doccat::io::{SourceReader, OutputWriter};
//! use doccat::session::InputItem;
//!
//! # fn example() -> doccat::Result<()> {
//! let reader = SourceReader::new();
//! let loaded = reader.load(&InputItem::new("input.xml")?)?;
//! println!("Read {} bytes", loaded.file_size);
//!
//! let writer = OutputWriter::new();
//! writer.write(b"%PDF-1.5", std::path::Path::new("output.pdf"))?;
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod writer;

pub use reader::{LoadedSource, SourceDocument, SourceReader};
pub use writer::{OutputWriter, WriteStatistics};
