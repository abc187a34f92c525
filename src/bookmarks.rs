//! Bookmark extraction.
//!
//! Bookmarks live in three table-stream regions located by fc/lcb pairs in
//! the FIB: a length-prefixed name table (SttbfBkmk) and two parallel
//! position arrays (PlcfBkf, PlcfBkl) holding the start and end character
//! positions. The name table must use the extended double-byte encoding;
//! single-byte name tables are not supported.
use crate::binary::{decode_utf16le, read_u16_le, read_u32_le, slice};
use crate::consts::*;
use crate::document::Bookmark;
use crate::error::{ExtractError, Result};
use std::collections::HashMap;

/// Extract the bookmark name → range mapping.
///
/// A zero-length name table means the document has no bookmarks and yields
/// an empty map, not an error.
pub fn parse(word_document: &[u8], table_stream: &[u8]) -> Result<HashMap<String, Bookmark>> {
    let fc_names = read_u32_le(word_document, FIB_FC_STTBF_BKMK)? as usize;
    let lcb_names = read_u32_le(word_document, FIB_LCB_STTBF_BKMK)? as usize;
    let fc_starts = read_u32_le(word_document, FIB_FC_PLCF_BKF)? as usize;
    let lcb_starts = read_u32_le(word_document, FIB_LCB_PLCF_BKF)? as usize;
    let fc_ends = read_u32_le(word_document, FIB_FC_PLCF_BKL)? as usize;
    let lcb_ends = read_u32_le(word_document, FIB_LCB_PLCF_BKL)? as usize;

    let mut bookmarks = HashMap::new();
    if lcb_names == 0 {
        return Ok(bookmarks);
    }

    let names = slice(table_stream, fc_names, lcb_names)?;
    let starts = slice(table_stream, fc_starts, lcb_starts)?;
    let ends = slice(table_stream, fc_ends, lcb_ends)?;

    let marker = read_u16_le(names, 0)?;
    if marker != STTBF_EXTENDED_MARKER {
        return Err(ExtractError::Unsupported(format!(
            "single-byte bookmark name table (marker 0x{marker:04x})"
        )));
    }

    // Skip the marker and two reserved counters.
    let mut offset = STTBF_HEADER_SIZE;
    let mut index = 0usize;
    while offset < lcb_names {
        let code_units = read_u16_le(names, offset)? as usize;
        let byte_length = code_units * 2;
        let raw_name = slice(names, offset + 2, byte_length)?;
        let name = decode_utf16le(raw_name);

        let start = read_u32_le(starts, index * 4)?;
        let end = read_u32_le(ends, index * 4)?;
        bookmarks.insert(name, Bookmark { start, end });

        offset += 2 + byte_length;
        index += 1;
    }

    Ok(bookmarks)
}
