//! File Information Block (FIB) parsing.
//!
//! The FIB sits at offset 0 of the WordDocument stream. Its fixed-offset
//! scalar fields locate everything else: which table stream holds the piece
//! table, where the bookmark tables live, and the text-boundary counters.
use crate::binary::{read_u16_le, read_u32_le};
use crate::consts::*;
use crate::document::Boundaries;
use crate::error::{ExtractError, Result};

/// Minimum buffer length needed to cover every fixed FIB field this crate
/// reads (the CLX pointer is the furthest one).
const FIB_MIN_SIZE: usize = FIB_FC_CLX + 4;

/// File Information Block.
///
/// Parsed from an in-memory buffer; performs no I/O and has no side effects
/// beyond returning its scalars.
#[derive(Debug, Clone)]
pub struct FileInformationBlock {
    /// Format version (nFib)
    nfib: u16,
    /// Language id
    lid: u16,
    /// Flags, including table-stream selection and encryption
    flags: u16,
    /// Text-boundary counters
    boundaries: Boundaries,
}

impl FileInformationBlock {
    /// Parse the FIB from the main document stream.
    ///
    /// Fails with `InvalidFormat` when the magic number does not match —
    /// the buffer is not a recognized Word document and the rest of the
    /// pipeline must not run.
    pub fn parse(word_document: &[u8]) -> Result<Self> {
        if word_document.len() < FIB_MIN_SIZE {
            return Err(ExtractError::Corrupted(
                "main stream too short for FIB".to_string(),
            ));
        }

        let magic = read_u16_le(word_document, FIB_WIDENT)?;
        if magic != FIB_MAGIC {
            return Err(ExtractError::InvalidFormat(format!(
                "not a Word document: magic number 0x{magic:04x}"
            )));
        }

        let nfib = read_u16_le(word_document, FIB_NFIB)?;
        let lid = read_u16_le(word_document, FIB_LID)?;
        let flags = read_u16_le(word_document, FIB_FLAGS)?;

        let boundaries = Boundaries {
            fc_min: read_u32_le(word_document, FIB_FC_MIN)?,
            ccp_text: read_u32_le(word_document, FIB_CCP_TEXT)?,
            ccp_ftn: read_u32_le(word_document, FIB_CCP_FTN)?,
            ccp_hdd: read_u32_le(word_document, FIB_CCP_HDD)?,
            ccp_atn: read_u32_le(word_document, FIB_CCP_ATN)?,
        };

        Ok(Self {
            nfib,
            lid,
            flags,
            boundaries,
        })
    }

    /// The file format version (nFib).
    #[inline]
    pub fn version(&self) -> u16 {
        self.nfib
    }

    /// The language id.
    #[inline]
    pub fn language_id(&self) -> u16 {
        self.lid
    }

    /// Whether the document is encrypted. Encrypted text is not decrypted
    /// by this crate; the flag is surfaced for callers.
    #[inline]
    pub fn is_encrypted(&self) -> bool {
        self.flags & FIB_FLAG_ENCRYPTED != 0
    }

    /// Which table stream holds the piece and bookmark tables.
    #[inline]
    pub fn table_stream_name(&self) -> &'static str {
        if self.flags & FIB_FLAG_WHICH_TABLE != 0 {
            TABLE_STREAM_1
        } else {
            TABLE_STREAM_0
        }
    }

    /// The text-boundary counters.
    #[inline]
    pub fn boundaries(&self) -> &Boundaries {
        &self.boundaries
    }
}
