//! Tests for Segment
//!
//! These tests verify:
//! - Append-only writes and offset-indexed reads
//! - Latest-offset-wins semantics for rewritten keys
//! - Tombstones and the delete contract
//! - The one-way read-only transition at the size threshold
//! - Corruption detection on key mismatch

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use stratakv::storage::Segment;
use stratakv::StrataError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const DEFAULT_LIMIT: u64 = 100_000;

fn setup_segment(limit: u64) -> (TempDir, Segment) {
    let temp_dir = TempDir::new().unwrap();
    let segment = Segment::create("t1_0000000000001", temp_dir.path(), limit).unwrap();
    (temp_dir, segment)
}

// =============================================================================
// Creation Tests
// =============================================================================

#[test]
fn test_create_makes_file_on_disk() {
    let (_temp, segment) = setup_segment(DEFAULT_LIMIT);

    assert!(segment.path().is_file());
    assert_eq!(segment.size(), 0);
    assert!(!segment.is_read_only());
}

#[test]
fn test_create_fails_if_file_exists() {
    let temp_dir = TempDir::new().unwrap();
    let _first = Segment::create("t1_0000000000001", temp_dir.path(), DEFAULT_LIMIT).unwrap();

    let second = Segment::create("t1_0000000000001", temp_dir.path(), DEFAULT_LIMIT);

    assert!(matches!(second, Err(StrataError::Io(_))));
}

// =============================================================================
// Write/Read Tests
// =============================================================================

#[test]
fn test_write_then_read() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    assert!(segment.write("apple", b"red").unwrap());

    assert_eq!(segment.read("apple").unwrap(), Some(b"red".to_vec()));
}

#[test]
fn test_read_unknown_key() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);
    segment.write("apple", b"red").unwrap();

    assert_eq!(segment.read("banana").unwrap(), None);
}

#[test]
fn test_rewrite_reads_latest_value() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    segment.write("key", b"old").unwrap();
    segment.write("key", b"new").unwrap();

    // Only the latest offset within the segment matters
    assert_eq!(segment.read("key").unwrap(), Some(b"new".to_vec()));
}

#[test]
fn test_size_advances_by_encoded_record_size() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    segment.write("key", b"value").unwrap();
    // frame (8) + key (3) + value (5)
    assert_eq!(segment.size(), 16);

    segment.write("k2", b"v2").unwrap();
    assert_eq!(segment.size(), 16 + 12);
}

// =============================================================================
// Delete/Tombstone Tests
// =============================================================================

#[test]
fn test_delete_known_key() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);
    segment.write("key", b"value").unwrap();

    assert!(segment.delete("key").unwrap());

    // Latest record for the key is now a tombstone
    assert_eq!(segment.read("key").unwrap(), None);
}

#[test]
fn test_delete_unknown_key_refused() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    assert!(!segment.delete("never_written").unwrap());
}

#[test]
fn test_tombstone_for_foreign_key() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    // write_tombstone does not require the key to be present
    assert!(segment.write_tombstone("foreign").unwrap());

    assert_eq!(segment.read("foreign").unwrap(), None);
    assert!(segment.contains_key("foreign"));
}

#[test]
fn test_write_after_delete_revives_key() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);

    segment.write("key", b"v1").unwrap();
    segment.delete("key").unwrap();
    segment.write("key", b"v2").unwrap();

    assert_eq!(segment.read("key").unwrap(), Some(b"v2".to_vec()));
}

// =============================================================================
// Read-Only Transition Tests
// =============================================================================

#[test]
fn test_read_only_flips_at_threshold() {
    // Each record is 8 + 4 + 8 = 20 bytes; the third crosses 48
    let (_temp, mut segment) = setup_segment(48);

    assert!(segment.write("key1", b"12345678").unwrap());
    assert!(!segment.is_read_only());

    assert!(segment.write("key2", b"12345678").unwrap());
    assert!(!segment.is_read_only());

    assert!(segment.write("key3", b"12345678").unwrap());
    assert!(segment.is_read_only());
}

#[test]
fn test_read_only_segment_refuses_appends() {
    let (_temp, mut segment) = setup_segment(10);
    segment.write("key", b"a value long enough").unwrap();
    assert!(segment.is_read_only());

    assert!(!segment.write("other", b"value").unwrap());
    assert!(!segment.write_tombstone("other").unwrap());
    assert!(!segment.delete("key").unwrap());
}

#[test]
fn test_read_only_segment_still_serves_reads() {
    let (_temp, mut segment) = setup_segment(10);
    segment.write("key", b"a value long enough").unwrap();
    assert!(segment.is_read_only());

    assert_eq!(
        segment.read("key").unwrap(),
        Some(b"a value long enough".to_vec())
    );
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_key_mismatch_surfaces_corruption() {
    let (_temp, mut segment) = setup_segment(DEFAULT_LIMIT);
    segment.write("aaa", b"value").unwrap();

    // Damage the key bytes in place: layout is [len: 4][key: 3][...]
    let mut file = OpenOptions::new()
        .write(true)
        .open(segment.path())
        .unwrap();
    file.seek(SeekFrom::Start(4)).unwrap();
    file.write_all(b"bbb").unwrap();
    drop(file);

    let result = segment.read("aaa");

    assert!(matches!(result, Err(StrataError::Corruption(_))));
}
