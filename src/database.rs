//! Database
//!
//! A thin router: a named directory owning a registry of tables, creating
//! them on demand and routing write/read/delete calls by table name.
//! Argument shape is validated here, at the call boundary, before any I/O
//! is attempted.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, StrataError};
use crate::index::Registry;
use crate::storage::{CachedTable, Table};

/// A named collection of tables under one directory
pub struct Database {
    /// Database name; doubles as the directory name under the working dir
    name: String,

    /// The database's backing directory
    path: PathBuf,

    /// Table name → table
    tables: Registry<CachedTable>,

    /// Segment size threshold handed to every table this database creates
    segment_size_limit: u64,

    /// Cache capacity handed to every table this database creates
    cache_capacity: usize,
}

impl Database {
    /// Create a fresh database backed by a new directory under `env_root`.
    ///
    /// Fails if the directory already exists.
    pub fn create(
        name: &str,
        env_root: &Path,
        segment_size_limit: u64,
        cache_capacity: usize,
    ) -> Result<Self> {
        let path = env_root.join(name);
        fs::create_dir(&path)?;

        Ok(Self {
            name: name.to_string(),
            path,
            tables: Registry::new(),
            segment_size_limit,
            cache_capacity,
        })
    }

    /// Reconstruct a database from tables replayed out of an existing
    /// directory
    pub fn reconstruct(
        name: String,
        path: PathBuf,
        tables: Registry<CachedTable>,
        segment_size_limit: u64,
        cache_capacity: usize,
    ) -> Self {
        Self {
            name,
            path,
            tables,
            segment_size_limit,
            cache_capacity,
        }
    }

    /// Create and register a table. Fails with `AlreadyExists` if the name
    /// is already registered.
    pub fn create_table_if_not_exists(&mut self, table_name: &str) -> Result<()> {
        validate_name("table name", table_name)?;

        if self.tables.contains(table_name) {
            return Err(StrataError::AlreadyExists(format!("table {}", table_name)));
        }

        let table = Table::create(table_name, &self.path, self.segment_size_limit)?;
        self.tables
            .insert(table_name, CachedTable::new(table, self.cache_capacity));

        Ok(())
    }

    /// Write a key-value pair into `table_name`.
    ///
    /// Fails with `NotFound` if the table is unregistered.
    pub fn write(&mut self, table_name: &str, key: &str, value: &[u8]) -> Result<()> {
        validate_key(key)?;

        self.table_mut(table_name)?.write(key, value)
    }

    /// Read the latest value for `key` from `table_name`.
    ///
    /// Never fails for a missing table or key; both read as "not found".
    pub fn read(&mut self, table_name: &str, key: &str) -> Result<Option<Vec<u8>>> {
        match self.tables.get_mut(table_name) {
            Some(table) => table.read(key),
            None => Ok(None),
        }
    }

    /// Delete `key` from `table_name`.
    ///
    /// Fails with `NotFound` if the table is unregistered; deleting an
    /// absent key is a no-op.
    pub fn delete(&mut self, table_name: &str, key: &str) -> Result<()> {
        validate_key(key)?;

        self.table_mut(table_name)?.delete(key)
    }

    /// Look up a registered table or fail with `NotFound`
    fn table_mut(&mut self, table_name: &str) -> Result<&mut CachedTable> {
        self.tables
            .get_mut(table_name)
            .ok_or_else(|| StrataError::NotFound(format!("table {}", table_name)))
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The database's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The database's backing directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of registered tables
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Look up a registered table
    pub fn table(&self, table_name: &str) -> Option<&CachedTable> {
        self.tables.get(table_name)
    }
}

// =============================================================================
// Argument Validation
// =============================================================================

/// Reject names that are empty or would escape the on-disk layout
pub(crate) fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StrataError::InvalidArgument(format!(
            "{} must not be empty",
            kind
        )));
    }

    if name == "." || name == ".." || name.contains(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(StrataError::InvalidArgument(format!(
            "{} {:?} is not a valid directory name",
            kind, name
        )));
    }

    Ok(())
}

/// Reject keys the record layout cannot round-trip meaningfully
fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(StrataError::InvalidArgument(
            "key must not be empty".to_string(),
        ));
    }

    Ok(())
}
