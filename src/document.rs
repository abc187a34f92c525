//! The assembled document: boundaries, pieces, and bookmarks.
use crate::piece_table::Piece;
use std::collections::HashMap;

/// Text-boundary counters read from the FIB.
///
/// These are descriptive metadata on the result; they are not cross-checked
/// against the piece table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boundaries {
    /// Byte offset of the text start in the main stream
    pub fc_min: u32,
    /// Character count of the main document text
    pub ccp_text: u32,
    /// Character count of the footnote text
    pub ccp_ftn: u32,
    /// Character count of the header text
    pub ccp_hdd: u32,
    /// Character count of the annotation text
    pub ccp_atn: u32,
}

/// A named bookmark's span in logical character-position space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    /// Starting character position
    pub start: u32,
    /// Ending character position
    pub end: u32,
}

/// A fully decoded document.
///
/// Built once per extraction call and immutable afterwards; concatenating
/// the pieces in order yields the complete logical text.
#[derive(Debug, Clone)]
pub struct Document {
    boundaries: Boundaries,
    pieces: Vec<Piece>,
    bookmarks: HashMap<String, Bookmark>,
}

impl Document {
    pub(crate) fn new(
        boundaries: Boundaries,
        pieces: Vec<Piece>,
        bookmarks: HashMap<String, Bookmark>,
    ) -> Self {
        Self {
            boundaries,
            pieces,
            bookmarks,
        }
    }

    /// The boundary counters from the document header.
    #[inline]
    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }

    /// The ordered piece sequence.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// The bookmark name → range mapping.
    #[inline]
    pub fn bookmarks(&self) -> &HashMap<String, Bookmark> {
        &self.bookmarks
    }

    /// The full logical document text, pieces concatenated in order.
    pub fn text(&self) -> String {
        let capacity = self.pieces.iter().map(|p| p.text.len()).sum();
        let mut text = String::with_capacity(capacity);
        for piece in &self.pieces {
            text.push_str(&piece.text);
        }
        text
    }
}
