//! Piece table reconstruction.
//!
//! The logical document text is not contiguous in the main stream. A piece
//! table in the table stream — reached through the CLX pointer in the FIB —
//! lists ordered fragments ("pieces"), each naming a source byte offset, an
//! encoding, and a character-count extent. Concatenating the decoded pieces
//! in table order reproduces the full text.
use crate::binary::{decode_latin1, decode_utf16le, read_u16_le, read_u32_le, read_u8, slice};
use crate::consts::*;
use crate::error::{ExtractError, Result};

/// One contiguous text fragment.
#[derive(Debug, Clone)]
pub struct Piece {
    /// Running source-extent accumulator at the time this piece was read;
    /// advances by `tot_length` for single-byte pieces and `tot_length / 2`
    /// for double-byte pieces.
    pub start: u32,
    /// Extent taken from the piece's character-position boundary pair
    pub tot_length: u32,
    /// Byte offset into the main stream where the fragment's bytes begin
    pub file_pos: u32,
    /// True for double-byte (UTF-16LE) text, false for single-byte
    pub unicode: bool,
    /// Decoded fragment text
    pub text: String,
    /// Length of `text` in UTF-16 code units, the unit character positions
    /// are expressed in. A supplementary-plane character counts as two.
    pub length: usize,
    /// This piece's start in the assembled document's character-position space
    pub position: usize,
    /// This piece's end in the assembled document's character-position space
    pub end_position: usize,
}

/// The ordered piece sequence for a document.
#[derive(Debug, Clone)]
pub struct PieceTable {
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// Locate and decode the piece table.
    ///
    /// Walks the property-run prefix in the table stream, validates the
    /// piece-table marker, then decodes every descriptor. Decoding is
    /// all-or-nothing: any out-of-range read or bad marker fails the whole
    /// document.
    pub fn parse(word_document: &[u8], table_stream: &[u8]) -> Result<Self> {
        let mut pos = read_u32_le(word_document, FIB_FC_CLX)? as usize;

        // Property runs precede the piece table; each is a marker byte, a
        // u16 byte length, and that many bytes of run data.
        while read_u8(table_stream, pos)? == CLX_GRPPRL_MARKER {
            pos += 1;
            let skip = read_u16_le(table_stream, pos)? as usize;
            pos += 2 + skip;
        }

        let marker = read_u8(table_stream, pos)?;
        pos += 1;
        if marker != CLX_PIECE_TABLE_MARKER {
            return Err(ExtractError::Corrupted(format!(
                "unexpected piece table marker 0x{marker:02x}"
            )));
        }

        let table_size = read_u32_le(table_stream, pos)? as usize;
        pos += 4;
        if table_size < 4 {
            return Err(ExtractError::Corrupted(format!(
                "piece table size {table_size} too small"
            )));
        }
        let count = (table_size - 4) / PIECE_ENTRY_SIZE;

        let mut pieces = Vec::with_capacity(count);
        let mut start: u32 = 0;
        let mut last_position: usize = 0;

        for x in 0..count {
            // The leading two descriptor bytes are flags unrelated to text
            // location; the fc field follows them.
            let descriptor_offset = pos + (count + 1) * 4 + x * PIECE_DESCRIPTOR_SIZE + 2;
            let mut file_pos = read_u32_le(table_stream, descriptor_offset)?;

            // fc bit 30 clear means double-byte text at the offset as-is;
            // set means single-byte text with the offset stored doubled.
            let unicode = file_pos & PIECE_FC_COMPRESSED == 0;
            if !unicode {
                file_pos &= !PIECE_FC_COMPRESSED;
                file_pos /= 2;
            }

            let l_start = read_u32_le(table_stream, pos + x * 4)?;
            let l_end = read_u32_le(table_stream, pos + (x + 1) * 4)?;
            let tot_length = l_end.checked_sub(l_start).ok_or_else(|| {
                ExtractError::Corrupted(format!(
                    "piece {x} boundaries out of order ({l_start}..{l_end})"
                ))
            })?;

            let text = decode_piece_text(word_document, file_pos, tot_length, unicode)?;
            // Positions are UTF-16 code-unit counts, so a surrogate pair
            // contributes two even though it decodes to one char.
            let length = text.encode_utf16().count();
            let piece = Piece {
                start,
                tot_length,
                file_pos,
                unicode,
                text,
                length,
                position: last_position,
                end_position: last_position + length,
            };

            last_position = piece.end_position;
            start += if unicode {
                tot_length / 2
            } else {
                tot_length
            };
            pieces.push(piece);
        }

        Ok(Self { pieces })
    }

    /// The pieces in traversal order.
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Consume the table, yielding the owned piece sequence.
    #[inline]
    pub fn into_pieces(self) -> Vec<Piece> {
        self.pieces
    }
}

/// Decode one fragment's bytes out of the main stream.
///
/// Single-byte pieces occupy `tot_length` bytes and pass through as 8-bit
/// text; double-byte pieces occupy `2 * tot_length` bytes of UTF-16LE.
fn decode_piece_text(
    word_document: &[u8],
    file_pos: u32,
    tot_length: u32,
    unicode: bool,
) -> Result<String> {
    let offset = file_pos as usize;
    if unicode {
        let bytes = slice(word_document, offset, tot_length as usize * 2)?;
        Ok(decode_utf16le(bytes))
    } else {
        let bytes = slice(word_document, offset, tot_length as usize)?;
        Ok(decode_latin1(bytes))
    }
}
