//! End-to-end extraction tests over a synthetic OLE2 compound file.
//!
//! The fixture builder lays out a minimal version-3 compound file (512-byte
//! sectors, FAT-only streams) around a hand-written FIB, piece table, and
//! bookmark tables, so the whole pipeline runs without on-disk fixtures.
use doctext::{CompoundFile, ExtractError, WordExtractor, is_compound_file};
use std::io::Cursor;

const ENDOFCHAIN: u32 = 0xFFFFFFFE;
const FREESECT: u32 = 0xFFFFFFFF;
const NOSTREAM: u32 = 0xFFFFFFFF;

fn put_u16(buffer: &mut [u8], offset: usize, value: u16) {
    buffer[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
}

fn put_u32(buffer: &mut [u8], offset: usize, value: u32) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

/// Write one 128-byte directory entry.
fn dir_entry(
    buffer: &mut [u8],
    index: usize,
    name: &str,
    entry_type: u8,
    right: u32,
    child: u32,
    start_sector: u32,
    size: u32,
) {
    let base = index * 128;
    let units: Vec<u16> = name.encode_utf16().collect();
    for (i, unit) in units.iter().enumerate() {
        put_u16(buffer, base + i * 2, *unit);
    }
    put_u16(buffer, base + 64, (units.len() as u16 + 1) * 2);
    buffer[base + 66] = entry_type;
    put_u32(buffer, base + 68, NOSTREAM); // left sibling
    put_u32(buffer, base + 72, right);
    put_u32(buffer, base + 76, child);
    put_u32(buffer, base + 116, start_sector);
    put_u32(buffer, base + 120, size);
}

/// Build a compound file holding the given root-level streams.
///
/// Layout: header, sector 0 = FAT, sector 1 = directory, then each stream's
/// data sectors in order. The mini-stream cutoff is zeroed so every stream
/// lives in the regular FAT.
fn build_compound_file(streams: &[(&str, &[u8])]) -> Vec<u8> {
    assert!(streams.len() <= 3, "directory fixture holds one sector");
    let sector = 512usize;

    let mut header = vec![0u8; sector];
    header[..8].copy_from_slice(b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1");
    put_u16(&mut header, 0x18, 0x003E); // minor version
    put_u16(&mut header, 0x1A, 3); // major version
    put_u16(&mut header, 0x1C, 0xFFFE); // byte order
    put_u16(&mut header, 0x1E, 9); // sector shift
    put_u16(&mut header, 0x20, 6); // mini sector shift
    put_u32(&mut header, 0x2C, 1); // FAT sector count
    put_u32(&mut header, 0x30, 1); // first directory sector
    put_u32(&mut header, 0x38, 0); // mini stream cutoff: nothing is mini
    put_u32(&mut header, 0x3C, ENDOFCHAIN);
    put_u32(&mut header, 0x44, ENDOFCHAIN);
    put_u32(&mut header, 0x4C, 0); // DIFAT[0]: FAT lives in sector 0
    for i in 1..109 {
        put_u32(&mut header, 0x4C + i * 4, FREESECT);
    }

    let mut fat = vec![FREESECT; sector / 4];
    fat[0] = 0xFFFFFFFD; // FAT sector marker
    fat[1] = ENDOFCHAIN; // directory is a single sector

    let mut directory = vec![0u8; sector];
    dir_entry(&mut directory, 0, "Root Entry", 5, NOSTREAM, 1, ENDOFCHAIN, 0);

    let mut data = Vec::new();
    let mut next_sector = 2u32;
    for (i, (name, contents)) in streams.iter().enumerate() {
        let sectors = contents.len().div_ceil(sector).max(1);
        let start = next_sector;
        for s in 0..sectors {
            fat[(start as usize) + s] = if s + 1 == sectors {
                ENDOFCHAIN
            } else {
                start + s as u32 + 1
            };
        }
        next_sector += sectors as u32;

        let right = if i + 1 < streams.len() {
            i as u32 + 2
        } else {
            NOSTREAM
        };
        dir_entry(
            &mut directory,
            i + 1,
            name,
            2,
            right,
            NOSTREAM,
            start,
            contents.len() as u32,
        );

        let mut chunk = contents.to_vec();
        chunk.resize(sectors * sector, 0);
        data.extend_from_slice(&chunk);
    }

    let mut file = header;
    let fat_bytes: Vec<u8> = fat.iter().flat_map(|v| v.to_le_bytes()).collect();
    file.extend_from_slice(&fat_bytes);
    file.extend_from_slice(&directory);
    file.extend_from_slice(&data);
    file
}

/// A WordDocument stream: FIB with magic, flags, boundaries, bookmark
/// fields, CLX pointer at 0x10 into the table stream, and the text bytes.
fn word_document_stream() -> Vec<u8> {
    let mut main = vec![0u8; 1024];
    put_u16(&mut main, 0x00, 0xA5EC);
    put_u16(&mut main, 0x02, 0x00C1); // nFib: Word 97
    put_u16(&mut main, 0x0A, 0); // flags: 0Table, unencrypted
    put_u32(&mut main, 0x18, 256); // fcMin
    put_u32(&mut main, 0x4C, 11); // ccpText
    // Bookmark tables in the table stream.
    put_u32(&mut main, 0x0142, 64); // fcSttbfBkmk
    put_u32(&mut main, 0x0146, 18); // lcbSttbfBkmk
    put_u32(&mut main, 0x014A, 96); // fcPlcfBkf
    put_u32(&mut main, 0x014E, 4); // lcbPlcfBkf
    put_u32(&mut main, 0x0152, 100); // fcPlcfBkl
    put_u32(&mut main, 0x0156, 4); // lcbPlcfBkl
    put_u32(&mut main, 0x01A2, 16); // fcClx

    // "hello " single-byte at 256, "world" UTF-16LE at 300.
    main[256..262].copy_from_slice(b"hello ");
    for (i, unit) in "world".encode_utf16().enumerate() {
        put_u16(&mut main, 300 + i * 2, unit);
    }
    main
}

/// The matching table stream: a property run and the two-piece table at 16,
/// the bookmark name table ("greet") at 64, position arrays at 96 and 100.
fn table_stream() -> Vec<u8> {
    let mut table = vec![0u8; 104];

    // Property run: marker 1, two bytes of payload.
    table[16] = 0x01;
    put_u16(&mut table, 17, 2);
    // Piece table: marker 2 at 21, size 28 = 4 + 2 pieces * 12.
    table[21] = 0x02;
    put_u32(&mut table, 22, 28);
    put_u32(&mut table, 26, 0); // cp 0
    put_u32(&mut table, 30, 6); // cp 6
    put_u32(&mut table, 34, 11); // cp 11
    // Descriptor 0: single-byte at 256 (fc doubled, bit 30 set).
    put_u32(&mut table, 40, (256 * 2) | 0x4000_0000);
    // Descriptor 1: double-byte at 300.
    put_u32(&mut table, 48, 300);

    // Bookmark name table: extended marker, reserved counters, "greet".
    put_u16(&mut table, 64, 0xFFFF);
    put_u16(&mut table, 70, 5);
    for (i, unit) in "greet".encode_utf16().enumerate() {
        put_u16(&mut table, 72 + i * 2, unit);
    }
    put_u32(&mut table, 96, 0); // bookmark start cp
    put_u32(&mut table, 100, 5); // bookmark end cp
    table
}

#[test]
fn extracts_text_and_bookmarks_from_compound_file() {
    let main = word_document_stream();
    let table = table_stream();
    let file = build_compound_file(&[("WordDocument", &main), ("0Table", &table)]);
    assert!(is_compound_file(&file));

    let doc = WordExtractor::extract_from_reader(Cursor::new(file)).unwrap();
    assert_eq!(doc.text(), "hello world");

    let pieces = doc.pieces();
    assert_eq!(pieces.len(), 2);
    assert!(!pieces[0].unicode);
    assert!(pieces[1].unicode);
    assert_eq!(pieces[0].end_position, pieces[1].position);

    assert_eq!(doc.boundaries().fc_min, 256);
    assert_eq!(doc.boundaries().ccp_text, 11);

    let bookmark = doc.bookmarks()["greet"];
    assert_eq!(bookmark.start, 0);
    assert_eq!(bookmark.end, 5);
}

#[test]
fn has_stream_reports_named_streams() {
    let main = word_document_stream();
    let table = table_stream();
    let file = build_compound_file(&[("WordDocument", &main), ("0Table", &table)]);

    let container = CompoundFile::open(Cursor::new(file)).unwrap();
    assert!(container.has_stream("WordDocument"));
    assert!(container.has_stream("worddocument")); // names match case-insensitively
    assert!(container.has_stream("0Table"));
    assert!(!container.has_stream("1Table"));
    assert!(!container.has_stream("Root Entry")); // storages are not streams
}

#[tokio::test]
async fn extracts_from_a_file_path() {
    let main = word_document_stream();
    let table = table_stream();
    let file = build_compound_file(&[("WordDocument", &main), ("0Table", &table)]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.doc");
    std::fs::write(&path, &file).unwrap();

    let doc = WordExtractor::extract(&path).await.unwrap();
    assert_eq!(doc.text(), "hello world");
}

#[tokio::test]
async fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = WordExtractor::extract(dir.path().join("absent.doc")).await;
    assert!(matches!(result, Err(ExtractError::Io(_))));
}

#[test]
fn non_compound_input_is_a_container_error() {
    let result = WordExtractor::extract_from_reader(Cursor::new(vec![0u8; 4096]));
    assert!(matches!(result, Err(ExtractError::Container(_))));
}

#[test]
fn missing_word_document_stream_is_a_stream_error() {
    let table = table_stream();
    let file = build_compound_file(&[("0Table", &table)]);
    let result = WordExtractor::extract_from_reader(Cursor::new(file));
    assert!(matches!(result, Err(ExtractError::StreamNotFound(_))));
}
