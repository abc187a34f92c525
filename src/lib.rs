//! Doctext - text and bookmark extraction from legacy binary Word documents
//!
//! This library decodes the pre-XML Word document format (.doc), which
//! stores its content inside an OLE2 compound file. It reconstructs the
//! logical document text from the piece table and extracts named bookmark
//! ranges, returning both on an immutable [`Document`].
//!
//! The decoder covers exactly the structures needed for text recovery: the
//! File Information Block, the piece table, and the bookmark tables. Styles,
//! fields, revision marks, and embedded objects are out of scope.
//!
//! # Example - extracting a document
//!
//! ```no_run
//! use doctext::WordExtractor;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = WordExtractor::extract("document.doc").await?;
//!
//! // The full logical text, pieces concatenated in order
//! println!("{}", doc.text());
//!
//! // Named bookmark ranges in character-position space
//! for (name, range) in doc.bookmarks() {
//!     println!("{name}: {}..{}", range.start, range.end);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Example - from bytes already in memory
//!
//! ```no_run
//! use doctext::WordExtractor;
//! use std::io::Cursor;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = std::fs::read("document.doc")?;
//! let doc = WordExtractor::extract_from_reader(Cursor::new(bytes))?;
//! println!("{} pieces", doc.pieces().len());
//! # Ok(())
//! # }
//! ```

/// Bookmark table extraction
pub mod bookmarks;

/// Format constants: compound-file layout, FIB offsets, marker bytes
pub mod consts;

/// OLE2 compound-file container access
pub mod container;

/// The assembled document result
pub mod document;

/// Error types
pub mod error;

/// File Information Block parsing
pub mod fib;

/// Piece table reconstruction
pub mod piece_table;

/// The extraction pipeline
pub mod extractor;

mod binary;

pub use container::{CompoundFile, Container, ContainerError, is_compound_file};
pub use document::{Bookmark, Boundaries, Document};
pub use error::{ExtractError, Result};
pub use extractor::WordExtractor;
pub use fib::FileInformationBlock;
pub use piece_table::{Piece, PieceTable};
