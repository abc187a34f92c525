//! Little-endian scalar reads and text decoding over in-memory buffers.
use crate::error::{ExtractError, Result};
use encoding_rs::UTF_16LE;
use zerocopy::{FromBytes, LE, U16, U32};

/// Read a little-endian u16 from a byte slice at the given offset.
#[inline]
pub fn read_u16_le(data: &[u8], offset: usize) -> Result<u16> {
    let end = offset
        .checked_add(2)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| ExtractError::Corrupted(format!("u16 read out of range at {offset}")))?;
    U16::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| ExtractError::Corrupted(format!("u16 read failed at {offset}")))
}

/// Read a little-endian u32 from a byte slice at the given offset.
#[inline]
pub fn read_u32_le(data: &[u8], offset: usize) -> Result<u32> {
    let end = offset
        .checked_add(4)
        .filter(|&end| end <= data.len())
        .ok_or_else(|| ExtractError::Corrupted(format!("u32 read out of range at {offset}")))?;
    U32::<LE>::read_from_bytes(&data[offset..end])
        .map(|v| v.get())
        .map_err(|_| ExtractError::Corrupted(format!("u32 read failed at {offset}")))
}

/// Read a single byte from a byte slice at the given offset.
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8> {
    data.get(offset)
        .copied()
        .ok_or_else(|| ExtractError::Corrupted(format!("byte read out of range at {offset}")))
}

/// Slice `len` bytes out of a buffer, failing on any out-of-range access.
#[inline]
pub fn slice(data: &[u8], offset: usize, len: usize) -> Result<&[u8]> {
    offset
        .checked_add(len)
        .filter(|&end| end <= data.len())
        .map(|end| &data[offset..end])
        .ok_or_else(|| {
            ExtractError::Corrupted(format!("slice of {len} bytes out of range at {offset}"))
        })
}

/// Decode UTF-16LE bytes to a String.
///
/// Used for double-byte piece text and bookmark names. Unpaired surrogates
/// become U+FFFD rather than failing the document.
pub fn decode_utf16le(data: &[u8]) -> String {
    // No BOM sniffing: the bytes are raw little-endian code units.
    let (text, _) = UTF_16LE.decode_without_bom_handling(data);
    text.into_owned()
}

/// Decode single-byte piece text as a raw 8-bit passthrough.
///
/// The original format stores these bytes without a declared codepage; each
/// byte maps directly to the Unicode scalar of the same value, so the byte
/// content survives untouched.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_u16_le() {
        let data = [0x34, 0x12, 0xFF];
        assert_eq!(read_u16_le(&data, 0).unwrap(), 0x1234);
        assert!(read_u16_le(&data, 2).is_err());
    }

    #[test]
    fn test_read_u32_le() {
        let data = [0x78, 0x56, 0x34, 0x12];
        assert_eq!(read_u32_le(&data, 0).unwrap(), 0x12345678);
        assert!(read_u32_le(&data, 1).is_err());
    }

    #[test]
    fn test_slice_bounds() {
        let data = [1u8, 2, 3, 4];
        assert_eq!(slice(&data, 1, 2).unwrap(), &[2, 3]);
        assert!(slice(&data, 3, 2).is_err());
        assert!(slice(&data, usize::MAX, 2).is_err());
    }

    #[test]
    fn test_decode_utf16le() {
        let data = [0x68, 0x00, 0x69, 0x00]; // "hi"
        assert_eq!(decode_utf16le(&data), "hi");
    }

    #[test]
    fn test_decode_latin1_passthrough() {
        let data = [0x68, 0xE9, 0x21]; // "hé!" in latin1
        assert_eq!(decode_latin1(&data), "h\u{e9}!");
    }
}
