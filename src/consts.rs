//! Format constants for OLE2 compound files and the Word binary format.
//!
//! Every fixed offset and marker byte the decoder relies on lives here so
//! the format contract stays auditable in one place.

// ---------------------------------------------------------------------------
// OLE2 compound file (container)
// ---------------------------------------------------------------------------

/// Magic bytes at the beginning of every OLE2 compound file.
pub const OLE_MAGIC: &[u8; 8] = b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1";

/// Minimal size of an OLE2 file with 512-byte sectors.
pub const MINIMAL_OLE_SIZE: usize = 1536;

/// Size of the compound file header in bytes.
pub const OLE_HEADER_SIZE: usize = 512;

/// Size of a directory entry in bytes.
pub const DIRENTRY_SIZE: usize = 128;

/// End of a sector chain.
pub const ENDOFCHAIN: u32 = 0xFFFFFFFE;
/// Unallocated sector.
pub const FREESECT: u32 = 0xFFFFFFFF;
/// Unallocated directory entry / no sibling.
pub const NOSTREAM: u32 = 0xFFFFFFFF;

/// Directory entry is a storage object.
pub const STGTY_STORAGE: u8 = 1;
/// Directory entry is a stream object.
pub const STGTY_STREAM: u8 = 2;
/// Directory entry is the root storage.
pub const STGTY_ROOT: u8 = 5;

// ---------------------------------------------------------------------------
// Word document streams
// ---------------------------------------------------------------------------

/// Name of the main document stream.
pub const MAIN_STREAM: &str = "WordDocument";

/// Table stream name when FIB flag bit 9 is set.
pub const TABLE_STREAM_1: &str = "1Table";
/// Table stream name when FIB flag bit 9 is clear.
pub const TABLE_STREAM_0: &str = "0Table";

// ---------------------------------------------------------------------------
// FIB (File Information Block) fixed offsets in the WordDocument stream
// ---------------------------------------------------------------------------

/// Magic number expected at offset 0 of the FIB (Word 97+).
pub const FIB_MAGIC: u16 = 0xA5EC;

/// Offset of the u16 magic number.
pub const FIB_WIDENT: usize = 0x0000;
/// Offset of the u16 format version (nFib).
pub const FIB_NFIB: usize = 0x0002;
/// Offset of the u16 language id.
pub const FIB_LID: usize = 0x0006;
/// Offset of the u16 flags field.
pub const FIB_FLAGS: usize = 0x000A;

/// Flags bit: document is encrypted.
pub const FIB_FLAG_ENCRYPTED: u16 = 0x0100;
/// Flags bit: use "1Table" rather than "0Table".
pub const FIB_FLAG_WHICH_TABLE: u16 = 0x0200;

/// Offset of fcMin (byte offset of text start in the main stream).
pub const FIB_FC_MIN: usize = 0x0018;
/// Offset of ccpText (character count of the main text).
pub const FIB_CCP_TEXT: usize = 0x004C;
/// Offset of ccpFtn (character count of footnotes).
pub const FIB_CCP_FTN: usize = 0x0050;
/// Offset of ccpHdd (character count of headers).
pub const FIB_CCP_HDD: usize = 0x0054;
/// Offset of ccpAtn (character count of annotations).
pub const FIB_CCP_ATN: usize = 0x005C;

/// Offset of fcSttbfBkmk (bookmark name table offset in the table stream).
pub const FIB_FC_STTBF_BKMK: usize = 0x0142;
/// Offset of lcbSttbfBkmk (bookmark name table byte length).
pub const FIB_LCB_STTBF_BKMK: usize = 0x0146;
/// Offset of fcPlcfBkf (bookmark start-position array offset).
pub const FIB_FC_PLCF_BKF: usize = 0x014A;
/// Offset of lcbPlcfBkf (bookmark start-position array byte length).
pub const FIB_LCB_PLCF_BKF: usize = 0x014E;
/// Offset of fcPlcfBkl (bookmark end-position array offset).
pub const FIB_FC_PLCF_BKL: usize = 0x0152;
/// Offset of lcbPlcfBkl (bookmark end-position array byte length).
pub const FIB_LCB_PLCF_BKL: usize = 0x0156;

/// Offset of fcClx (piece table location in the table stream).
pub const FIB_FC_CLX: usize = 0x01A2;

// ---------------------------------------------------------------------------
// CLX / piece table markers in the table stream
// ---------------------------------------------------------------------------

/// Marker byte introducing a property-run region to be skipped.
pub const CLX_GRPPRL_MARKER: u8 = 0x01;
/// Marker byte introducing the piece table itself.
pub const CLX_PIECE_TABLE_MARKER: u8 = 0x02;

/// Bytes contributed per piece: a 4-byte boundary entry plus an 8-byte
/// descriptor (with one extra boundary entry overall).
pub const PIECE_ENTRY_SIZE: usize = 12;
/// Size of a piece descriptor in bytes.
pub const PIECE_DESCRIPTOR_SIZE: usize = 8;
/// Descriptor fc bit: set means single-byte text with a doubled offset.
pub const PIECE_FC_COMPRESSED: u32 = 0x4000_0000;

// ---------------------------------------------------------------------------
// Bookmark name table
// ---------------------------------------------------------------------------

/// Leading u16 of the name table signalling extended (double-byte) names.
pub const STTBF_EXTENDED_MARKER: u16 = 0xFFFF;
/// Bytes to skip before the first name: marker plus two reserved counters.
pub const STTBF_HEADER_SIZE: usize = 6;
