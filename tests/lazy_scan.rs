//! Tests for on-demand TOC scanning.
//!
//! Lookups must decode records only up to the one requested, and a lazily
//! scanned archive must answer exactly like a fully preloaded one.

mod common;

use std::io::Cursor;

use pakfile::Archive;

use common::build_archive_str;

fn sample() -> Vec<u8> {
    build_archive_str(&[
        ("first", b"1"),
        ("second", b"22"),
        ("third", b"333"),
        ("fourth", b""),
        ("fifth", b"55555"),
    ])
}

#[test]
fn test_open_reads_only_header() {
    let archive = Archive::open(Cursor::new(sample())).unwrap();
    assert_eq!(archive.scanned_records(), 0);
    assert_eq!(archive.pending_records(), 5);

    let header = archive.header().unwrap();
    assert_eq!(header.entry_count, 5);
    assert_eq!(header.content_start(), 16 + header.toc_byte_size as u64);
}

#[test]
fn test_lookup_stops_at_match() {
    let archive = Archive::open(Cursor::new(sample())).unwrap();

    let view = archive.open_file("second").unwrap().unwrap();
    assert_eq!(view.read().unwrap(), b"22");
    assert_eq!(archive.scanned_records(), 2);

    // Already known: no further scanning.
    archive.open_file("first").unwrap().unwrap();
    assert_eq!(archive.scanned_records(), 2);

    archive.open_file("fourth").unwrap().unwrap();
    assert_eq!(archive.scanned_records(), 4);
    assert_eq!(archive.pending_records(), 1);
}

#[test]
fn test_missing_lookup_scans_everything() {
    let archive = Archive::open(Cursor::new(sample())).unwrap();
    assert!(archive.open_file("nope").unwrap().is_none());
    assert_eq!(archive.pending_records(), 0);
}

#[test]
fn test_lazy_matches_preloaded() {
    let names = ["fifth", "first", "nope", "third", "second", "fourth", "first"];

    let lazy = Archive::open(Cursor::new(sample())).unwrap();
    let eager = Archive::open(Cursor::new(sample())).unwrap();
    eager.preload_all().unwrap();

    for name in names {
        let a = lazy.open_file(name).unwrap().map(|v| v.read().unwrap());
        let b = eager.open_file(name).unwrap().map(|v| v.read().unwrap());
        assert_eq!(a, b, "lookup of {}", name);
    }
}

#[test]
fn test_reads_between_scans_keep_cursor() {
    let archive = Archive::open(Cursor::new(sample())).unwrap();

    // Reading content seeks into the content region; the next lookup must
    // still decode the TOC from where it stopped.
    let first = archive.open_file("first").unwrap().unwrap();
    assert_eq!(first.read().unwrap(), b"1");
    assert_eq!(first.read().unwrap(), b"1");

    let third = archive.open_file("third").unwrap().unwrap();
    assert_eq!(first.read().unwrap(), b"1");
    assert_eq!(third.read().unwrap(), b"333");

    let fifth = archive.open_file("fifth").unwrap().unwrap();
    assert_eq!(fifth.read().unwrap(), b"55555");
}

#[test]
fn test_count_and_iterate() {
    let archive = Archive::open(Cursor::new(sample())).unwrap();
    assert_eq!(archive.count_files().unwrap(), 5);

    let views = archive.iterate_files().unwrap();
    assert_eq!(views.len(), 5);
    let listed: Vec<(String, usize)> = views
        .map(|v| (v.path().to_string(), v.read().unwrap().len()))
        .collect();
    assert_eq!(
        listed,
        [
            ("first".to_string(), 1),
            ("second".to_string(), 2),
            ("third".to_string(), 3),
            ("fourth".to_string(), 0),
            ("fifth".to_string(), 5),
        ]
    );

    // Each call is a fresh pass.
    assert_eq!(archive.iterate_files().unwrap().count(), 5);
}

#[test]
fn test_duplicate_paths_first_record_wins() {
    let data = build_archive_str(&[("dup", b"first"), ("dup", b"second")]);
    let archive = Archive::open(Cursor::new(data)).unwrap();

    assert_eq!(
        archive.open_file("dup").unwrap().unwrap().read().unwrap(),
        b"first"
    );
    assert_eq!(archive.count_files().unwrap(), 1);
}

#[test]
fn test_toc_size_mismatch_is_tolerated() {
    let mut data = build_archive_str(&[("a", b"x")]);
    // Declare a TOC larger than the records actually use.
    data[8..12].copy_from_slice(&100i32.to_le_bytes());

    let archive = Archive::open(Cursor::new(data)).unwrap();
    assert_eq!(archive.count_files().unwrap(), 1);
    assert_eq!(
        archive.open_file("a").unwrap().unwrap().read().unwrap(),
        b"x"
    );
}
