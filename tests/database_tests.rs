//! Tests for Database
//!
//! These tests verify:
//! - Table creation and duplicate-name rejection
//! - Routing of write/read/delete by table name
//! - Typed failures for unregistered tables vs. silent not-found on read
//! - Eager argument validation at the call boundary

use stratakv::{Database, StrataError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_database() -> (TempDir, Database) {
    let temp_dir = TempDir::new().unwrap();
    let database = Database::create("db1", temp_dir.path(), 100_000, 5_000).unwrap();
    (temp_dir, database)
}

// =============================================================================
// Table Creation Tests
// =============================================================================

#[test]
fn test_create_makes_directory() {
    let temp_dir = TempDir::new().unwrap();

    let database = Database::create("db1", temp_dir.path(), 100_000, 5_000).unwrap();

    assert!(database.path().is_dir());
    assert_eq!(database.table_count(), 0);
}

#[test]
fn test_create_table() {
    let (_temp, mut database) = setup_database();

    database.create_table_if_not_exists("t1").unwrap();

    assert_eq!(database.table_count(), 1);
    assert!(database.path().join("t1").is_dir());
}

#[test]
fn test_create_duplicate_table_fails() {
    let (_temp, mut database) = setup_database();
    database.create_table_if_not_exists("t1").unwrap();

    let result = database.create_table_if_not_exists("t1");

    assert!(matches!(result, Err(StrataError::AlreadyExists(_))));
    assert_eq!(database.table_count(), 1);
}

// =============================================================================
// Routing Tests
// =============================================================================

#[test]
fn test_write_read_delete_round_trip() {
    let (_temp, mut database) = setup_database();
    database.create_table_if_not_exists("t1").unwrap();

    database.write("t1", "alice", b"1").unwrap();
    assert_eq!(database.read("t1", "alice").unwrap(), Some(b"1".to_vec()));

    database.delete("t1", "alice").unwrap();
    assert_eq!(database.read("t1", "alice").unwrap(), None);
}

#[test]
fn test_tables_are_independent() {
    let (_temp, mut database) = setup_database();
    database.create_table_if_not_exists("t1").unwrap();
    database.create_table_if_not_exists("t2").unwrap();

    database.write("t1", "key", b"from_t1").unwrap();
    database.write("t2", "key", b"from_t2").unwrap();

    assert_eq!(database.read("t1", "key").unwrap(), Some(b"from_t1".to_vec()));
    assert_eq!(database.read("t2", "key").unwrap(), Some(b"from_t2".to_vec()));

    database.delete("t1", "key").unwrap();
    assert_eq!(database.read("t1", "key").unwrap(), None);
    assert_eq!(database.read("t2", "key").unwrap(), Some(b"from_t2".to_vec()));
}

#[test]
fn test_write_to_unknown_table_fails() {
    let (_temp, mut database) = setup_database();

    let result = database.write("ghost", "key", b"value");

    assert!(matches!(result, Err(StrataError::NotFound(_))));
}

#[test]
fn test_delete_in_unknown_table_fails() {
    let (_temp, mut database) = setup_database();

    let result = database.delete("ghost", "key");

    assert!(matches!(result, Err(StrataError::NotFound(_))));
}

#[test]
fn test_read_from_unknown_table_is_not_found() {
    let (_temp, mut database) = setup_database();

    // Reads never fail for a missing table; they read as "not found"
    assert_eq!(database.read("ghost", "key").unwrap(), None);
}

// =============================================================================
// Argument Validation Tests
// =============================================================================

#[test]
fn test_empty_table_name_rejected() {
    let (_temp, mut database) = setup_database();

    let result = database.create_table_if_not_exists("");

    assert!(matches!(result, Err(StrataError::InvalidArgument(_))));
}

#[test]
fn test_table_name_with_path_separator_rejected() {
    let (_temp, mut database) = setup_database();

    for name in ["a/b", "a\\b", "..", "."] {
        let result = database.create_table_if_not_exists(name);
        assert!(
            matches!(result, Err(StrataError::InvalidArgument(_))),
            "name {:?} should be rejected",
            name
        );
    }

    // Nothing was created on disk
    assert_eq!(database.table_count(), 0);
}

#[test]
fn test_empty_key_rejected_before_io() {
    let (_temp, mut database) = setup_database();
    database.create_table_if_not_exists("t1").unwrap();

    assert!(matches!(
        database.write("t1", "", b"value"),
        Err(StrataError::InvalidArgument(_))
    ));
    assert!(matches!(
        database.delete("t1", ""),
        Err(StrataError::InvalidArgument(_))
    ));

    // Validation fires even before the table lookup
    assert!(matches!(
        database.write("ghost", "", b"value"),
        Err(StrataError::InvalidArgument(_))
    ));
}
