//! OLE2 compound-file container access.
//!
//! A `.doc` file is an OLE2 structured storage: a miniature filesystem with
//! a FAT, an optional MiniFAT for small streams, and a directory of named
//! entries. The extraction pipeline only needs one capability from it —
//! "open the named stream and hand back all of its bytes" — which is what
//! the [`Container`] trait captures. [`CompoundFile`] is the real
//! implementation over any `Read + Seek` source.
use crate::consts::*;
use bytes::Bytes;
use std::io::{self, Read, Seek, SeekFrom};
use thiserror::Error;
use zerocopy::{FromBytes, LE, U16, U32, U64};
use zerocopy_derive::FromBytes as DeriveFromBytes;

/// Error types for compound-file access.
#[derive(Error, Debug)]
pub enum ContainerError {
    /// IO error while reading the underlying source
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The source does not carry the compound-file magic bytes
    #[error("not an OLE2 compound file")]
    NotCompoundFile,

    /// The compound-file header is structurally invalid
    #[error("invalid container header: {0}")]
    InvalidHeader(String),

    /// A sector chain or directory entry is inconsistent
    #[error("corrupted container: {0}")]
    Corrupted(String),

    /// No stream with the requested name exists
    #[error("no stream named {0:?}")]
    StreamNotFound(String),
}

/// Named-stream access capability.
///
/// The decoder consumes exactly two stream names per document; anything that
/// can produce their bytes can drive the pipeline, which keeps tests free of
/// on-disk fixtures.
pub trait Container {
    /// Read the full contents of the named stream.
    fn stream(&mut self, name: &str) -> Result<Bytes, ContainerError>;
}

/// On-disk layout of a 128-byte directory entry.
#[derive(Debug, Clone, DeriveFromBytes)]
#[repr(C)]
struct RawDirEntry {
    /// Entry name in UTF-16LE, null-padded
    name: [u8; 64],
    /// Name length in bytes, including the null terminator
    name_len: U16<LE>,
    entry_type: u8,
    node_color: u8,
    sid_left: U32<LE>,
    sid_right: U32<LE>,
    sid_child: U32<LE>,
    clsid: [u8; 16],
    state_bits: U32<LE>,
    creation_time: U64<LE>,
    modified_time: U64<LE>,
    start_sector: U32<LE>,
    stream_size: U64<LE>,
}

/// A parsed directory entry.
#[derive(Debug, Clone)]
struct DirEntry {
    name: String,
    entry_type: u8,
    sid_left: u32,
    sid_right: u32,
    sid_child: u32,
    start_sector: u32,
    size: u64,
    in_minifat: bool,
}

/// An OLE2 compound file opened over a `Read + Seek` source.
#[derive(Debug)]
pub struct CompoundFile<R: Read + Seek> {
    reader: R,
    sector_size: usize,
    mini_sector_size: usize,
    /// Sector chain table: maps each sector to its successor
    fat: Vec<u32>,
    minifat: Vec<u32>,
    entries: Vec<Option<DirEntry>>,
    root_child: u32,
    root_start_sector: u32,
    /// Backing data of the mini stream, loaded on first MiniFAT read
    ministream: Option<Vec<u8>>,
}

impl<R: Read + Seek> CompoundFile<R> {
    /// Open and index a compound file.
    ///
    /// Validates the header, then loads the FAT (header DIFAT plus any
    /// chained DIFAT sectors), the directory, and the MiniFAT.
    pub fn open(mut reader: R) -> Result<Self, ContainerError> {
        let file_size = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(0))?;
        if file_size < MINIMAL_OLE_SIZE as u64 {
            return Err(ContainerError::NotCompoundFile);
        }

        let mut header = [0u8; OLE_HEADER_SIZE];
        reader.read_exact(&mut header)?;
        if &header[0..8] != OLE_MAGIC {
            return Err(ContainerError::NotCompoundFile);
        }

        let byte_order = header_u16(&header, 0x1C);
        if byte_order != 0xFFFE {
            return Err(ContainerError::InvalidHeader(format!(
                "byte order mark 0x{byte_order:04X}"
            )));
        }

        let sector_shift = header_u16(&header, 0x1E);
        let mini_sector_shift = header_u16(&header, 0x20);
        if !(7..=20).contains(&sector_shift) || mini_sector_shift >= sector_shift {
            return Err(ContainerError::InvalidHeader(format!(
                "sector shifts {sector_shift}/{mini_sector_shift}"
            )));
        }

        let first_dir_sector = header_u32(&header, 0x30);
        let mini_stream_cutoff = header_u32(&header, 0x38);
        let first_minifat_sector = header_u32(&header, 0x3C);
        let num_minifat_sectors = header_u32(&header, 0x40);
        let first_difat_sector = header_u32(&header, 0x44);
        let num_difat_sectors = header_u32(&header, 0x48);

        let mut file = CompoundFile {
            reader,
            sector_size: 1usize << sector_shift,
            mini_sector_size: 1usize << mini_sector_shift,
            fat: Vec::new(),
            minifat: Vec::new(),
            entries: Vec::new(),
            root_child: NOSTREAM,
            root_start_sector: ENDOFCHAIN,
            ministream: None,
        };

        file.load_fat(&header, first_difat_sector, num_difat_sectors)?;
        file.load_directory(first_dir_sector, mini_stream_cutoff)?;
        if num_minifat_sectors > 0 {
            file.load_minifat(first_minifat_sector)?;
        }

        Ok(file)
    }

    /// Load the FAT from the sector indexes in the header DIFAT and any
    /// chained DIFAT sectors.
    fn load_fat(
        &mut self,
        header: &[u8; OLE_HEADER_SIZE],
        first_difat_sector: u32,
        num_difat_sectors: u32,
    ) -> Result<(), ContainerError> {
        // The first 109 FAT sector indexes live in the header at 0x4C.
        let mut fat_sectors = Vec::new();
        for i in 0..109 {
            let sector = header_u32(header, 0x4C + i * 4);
            if sector == FREESECT || sector == ENDOFCHAIN {
                break;
            }
            fat_sectors.push(sector);
        }

        // Larger files continue the DIFAT in its own sector chain, where
        // the final u32 of each sector points at the next DIFAT sector.
        let mut difat_sector = first_difat_sector;
        let per_sector = self.sector_size / 4 - 1;
        for _ in 0..num_difat_sectors {
            if difat_sector == ENDOFCHAIN || difat_sector == FREESECT {
                break;
            }
            let data = self.read_sector(difat_sector)?;
            for i in 0..per_sector {
                let sector = sector_u32(&data, i * 4)?;
                if sector == FREESECT || sector == ENDOFCHAIN {
                    break;
                }
                fat_sectors.push(sector);
            }
            difat_sector = sector_u32(&data, per_sector * 4)?;
        }

        let entries_per_sector = self.sector_size / 4;
        self.fat.reserve(fat_sectors.len() * entries_per_sector);
        for &sector_id in &fat_sectors {
            let data = self.read_sector(sector_id)?;
            for i in 0..entries_per_sector {
                self.fat.push(sector_u32(&data, i * 4)?);
            }
        }

        Ok(())
    }

    fn load_minifat(&mut self, first_minifat_sector: u32) -> Result<(), ContainerError> {
        let data = self.read_chain(first_minifat_sector)?;
        self.minifat.reserve(data.len() / 4);
        for chunk in data.chunks_exact(4) {
            self.minifat.push(sector_u32(chunk, 0)?);
        }
        Ok(())
    }

    /// Load and parse all directory entries.
    fn load_directory(
        &mut self,
        first_dir_sector: u32,
        mini_stream_cutoff: u32,
    ) -> Result<(), ContainerError> {
        let dir_data = self.read_chain(first_dir_sector)?;
        let count = dir_data.len() / DIRENTRY_SIZE;
        if count == 0 {
            return Err(ContainerError::Corrupted("empty directory".to_string()));
        }

        self.entries = Vec::with_capacity(count);
        for i in 0..count {
            let chunk = &dir_data[i * DIRENTRY_SIZE..(i + 1) * DIRENTRY_SIZE];
            self.entries
                .push(parse_dir_entry(chunk, self.sector_size, mini_stream_cutoff));
        }

        let root = self.entries[0]
            .as_ref()
            .filter(|e| e.entry_type == STGTY_ROOT)
            .ok_or_else(|| ContainerError::Corrupted("missing root entry".to_string()))?;
        self.root_child = root.sid_child;
        self.root_start_sector = root.start_sector;
        Ok(())
    }

    fn read_sector(&mut self, sector_id: u32) -> Result<Vec<u8>, ContainerError> {
        let position = (sector_id as u64 + 1) * self.sector_size as u64;
        self.reader.seek(SeekFrom::Start(position))?;
        let mut buffer = vec![0u8; self.sector_size];
        self.reader.read_exact(&mut buffer)?;
        Ok(buffer)
    }

    /// Read a whole stream by walking its FAT chain.
    fn read_chain(&mut self, start_sector: u32) -> Result<Vec<u8>, ContainerError> {
        let mut data = Vec::new();
        let mut sector = start_sector;
        let mut hops = 0usize;
        while sector != ENDOFCHAIN {
            if sector as usize >= self.fat.len() {
                return Err(ContainerError::Corrupted(format!(
                    "sector {sector} outside FAT"
                )));
            }
            if hops > self.fat.len() {
                return Err(ContainerError::Corrupted("cyclic FAT chain".to_string()));
            }
            data.extend_from_slice(&self.read_sector(sector)?);
            sector = self.fat[sector as usize];
            hops += 1;
        }
        Ok(data)
    }

    /// Read a small stream by walking its MiniFAT chain through the root
    /// entry's mini stream.
    fn read_mini_chain(&mut self, start_sector: u32, size: u64) -> Result<Vec<u8>, ContainerError> {
        if self.ministream.is_none() {
            let backing = self.read_chain(self.root_start_sector)?;
            self.ministream = Some(backing);
        }
        let ministream = self.ministream.as_ref().unwrap();

        let mut data = Vec::new();
        let mut sector = start_sector;
        let mut hops = 0usize;
        while sector != ENDOFCHAIN {
            if sector as usize >= self.minifat.len() {
                return Err(ContainerError::Corrupted(format!(
                    "mini sector {sector} outside MiniFAT"
                )));
            }
            if hops > self.minifat.len() {
                return Err(ContainerError::Corrupted(
                    "cyclic MiniFAT chain".to_string(),
                ));
            }
            let offset = sector as usize * self.mini_sector_size;
            let end = offset + self.mini_sector_size;
            if end > ministream.len() {
                return Err(ContainerError::Corrupted(
                    "mini sector beyond mini stream".to_string(),
                ));
            }
            data.extend_from_slice(&ministream[offset..end]);
            sector = self.minifat[sector as usize];
            hops += 1;
        }

        data.truncate(size as usize);
        Ok(data)
    }

    /// Find a root-level entry by name, case-insensitively, by walking the
    /// directory's sibling tree.
    fn find_entry(&self, name: &str) -> Option<&DirEntry> {
        let mut pending = vec![self.root_child];
        while let Some(sid) = pending.pop() {
            if sid == NOSTREAM || sid as usize >= self.entries.len() {
                continue;
            }
            let Some(entry) = self.entries[sid as usize].as_ref() else {
                continue;
            };
            if entry.name.eq_ignore_ascii_case(name) {
                return Some(entry);
            }
            pending.push(entry.sid_left);
            pending.push(entry.sid_right);
        }
        None
    }

    /// Whether a root-level stream with the given name exists.
    pub fn has_stream(&self, name: &str) -> bool {
        self.find_entry(name)
            .is_some_and(|e| e.entry_type == STGTY_STREAM)
    }
}

impl<R: Read + Seek> Container for CompoundFile<R> {
    fn stream(&mut self, name: &str) -> Result<Bytes, ContainerError> {
        let entry = self
            .find_entry(name)
            .filter(|e| e.entry_type == STGTY_STREAM)
            .cloned()
            .ok_or_else(|| ContainerError::StreamNotFound(name.to_string()))?;

        let data = if entry.in_minifat {
            self.read_mini_chain(entry.start_sector, entry.size)?
        } else {
            let mut data = self.read_chain(entry.start_sector)?;
            data.truncate(entry.size as usize);
            data
        };
        Ok(Bytes::from(data))
    }
}

fn parse_dir_entry(data: &[u8], sector_size: usize, mini_stream_cutoff: u32) -> Option<DirEntry> {
    let raw = RawDirEntry::read_from_bytes(data).ok()?;

    let name_len = (raw.name_len.get() as usize).saturating_sub(2).min(64);
    let name = crate::binary::decode_utf16le(&raw.name[..name_len])
        .trim_end_matches('\0')
        .to_string();

    // 512-byte-sector files only use the low half of the size field.
    let size = if sector_size == 512 {
        raw.stream_size.get() & 0xFFFF_FFFF
    } else {
        raw.stream_size.get()
    };

    let in_minifat = raw.entry_type == STGTY_STREAM && size < mini_stream_cutoff as u64;

    Some(DirEntry {
        name,
        entry_type: raw.entry_type,
        sid_left: raw.sid_left.get(),
        sid_right: raw.sid_right.get(),
        sid_child: raw.sid_child.get(),
        start_sector: raw.start_sector.get(),
        size,
        in_minifat,
    })
}

#[inline]
fn header_u16(header: &[u8], offset: usize) -> u16 {
    U16::<LE>::read_from_bytes(&header[offset..offset + 2])
        .map(|v| v.get())
        .unwrap_or(0)
}

#[inline]
fn header_u32(header: &[u8], offset: usize) -> u32 {
    U32::<LE>::read_from_bytes(&header[offset..offset + 4])
        .map(|v| v.get())
        .unwrap_or(0)
}

#[inline]
fn sector_u32(data: &[u8], offset: usize) -> Result<u32, ContainerError> {
    if offset + 4 > data.len() {
        return Err(ContainerError::Corrupted(
            "truncated sector data".to_string(),
        ));
    }
    U32::<LE>::read_from_bytes(&data[offset..offset + 4])
        .map(|v| v.get())
        .map_err(|_| ContainerError::Corrupted("unreadable sector data".to_string()))
}

/// Check whether a byte buffer starts like an OLE2 compound file.
pub fn is_compound_file(data: &[u8]) -> bool {
    data.len() >= MINIMAL_OLE_SIZE && &data[0..8] == OLE_MAGIC
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_rejects_short_input() {
        let result = CompoundFile::open(Cursor::new(vec![0u8; 100]));
        assert!(matches!(result, Err(ContainerError::NotCompoundFile)));
    }

    #[test]
    fn test_rejects_wrong_magic() {
        let result = CompoundFile::open(Cursor::new(vec![0u8; MINIMAL_OLE_SIZE]));
        assert!(matches!(result, Err(ContainerError::NotCompoundFile)));
    }

    #[test]
    fn test_rejects_bad_byte_order() {
        let mut data = vec![0u8; MINIMAL_OLE_SIZE];
        data[..8].copy_from_slice(OLE_MAGIC);
        // byte order mark left zeroed
        let result = CompoundFile::open(Cursor::new(data));
        assert!(matches!(result, Err(ContainerError::InvalidHeader(_))));
    }

    #[test]
    fn test_is_compound_file() {
        let mut data = vec![0u8; MINIMAL_OLE_SIZE];
        assert!(!is_compound_file(&data));
        data[..8].copy_from_slice(OLE_MAGIC);
        assert!(is_compound_file(&data));
        assert!(!is_compound_file(&data[..8]));
    }
}
