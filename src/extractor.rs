//! The extraction pipeline.
//!
//! Stages run in strict sequence: open the container, drain the main
//! stream, parse the FIB, drain the FIB-selected table stream, extract
//! bookmarks and pieces, assemble the [`Document`]. Any failure aborts the
//! remaining stages; there is never a partially populated result.
use crate::bookmarks;
use crate::consts::MAIN_STREAM;
use crate::container::{CompoundFile, Container, ContainerError};
use crate::document::Document;
use crate::error::{ExtractError, Result};
use crate::fib::FileInformationBlock;
use crate::piece_table::PieceTable;
use bytes::Bytes;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Text and bookmark extractor for legacy binary Word documents.
///
/// # Examples
///
/// ```rust,no_run
/// use doctext::WordExtractor;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let doc = WordExtractor::extract("report.doc").await?;
/// println!("{}", doc.text());
/// for (name, range) in doc.bookmarks() {
///     println!("{name}: {}..{}", range.start, range.end);
/// }
/// # Ok(())
/// # }
/// ```
pub struct WordExtractor;

impl WordExtractor {
    /// Extract a document from a file path.
    ///
    /// The file is drained into memory asynchronously; all decoding after
    /// that is synchronous, CPU-bound work over the resident buffers.
    pub async fn extract<P: AsRef<Path>>(path: P) -> Result<Document> {
        let data = tokio::fs::read(path).await?;
        Self::extract_from_reader(Cursor::new(data))
    }

    /// Extract a document from any `Read + Seek` byte source.
    pub fn extract_from_reader<R: Read + Seek>(reader: R) -> Result<Document> {
        let mut container = CompoundFile::open(reader)?;
        Self::extract_from(&mut container)
    }

    /// Extract a document from an already-open container.
    ///
    /// The table stream cannot be chosen until the FIB flags from the main
    /// stream are known, so the two reads are strictly ordered.
    pub fn extract_from<C: Container>(container: &mut C) -> Result<Document> {
        let word_document = read_stream(container, MAIN_STREAM)?;
        let fib = FileInformationBlock::parse(&word_document)?;
        let table_stream = read_stream(container, fib.table_stream_name())?;

        let bookmarks = bookmarks::parse(&word_document, &table_stream)?;
        let pieces = PieceTable::parse(&word_document, &table_stream)?;

        Ok(Document::new(
            fib.boundaries().clone(),
            pieces.into_pieces(),
            bookmarks,
        ))
    }
}

/// Drain a named stream, distinguishing "the stream is missing" from other
/// container failures.
fn read_stream<C: Container>(container: &mut C, name: &str) -> Result<Bytes> {
    container.stream(name).map_err(|err| match err {
        ContainerError::StreamNotFound(name) => ExtractError::StreamNotFound(name),
        other => ExtractError::Container(other),
    })
}
