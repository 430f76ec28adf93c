//! Cache-augmented Table
//!
//! A decorator over [`Table`] that keeps a bounded recency cache coherent
//! with the persisted state: writes go through and populate the cache,
//! reads are served from the cache when possible, deletes invalidate.
//! A "not found" result is never cached.

use crate::error::Result;

use super::{RecencyCache, Table};

/// A table with a recency cache in front of its persistent read path
pub struct CachedTable {
    table: Table,
    cache: RecencyCache,
}

impl CachedTable {
    /// Wrap `table` with a cache holding at most `cache_capacity` entries
    pub fn new(table: Table, cache_capacity: usize) -> Self {
        Self {
            table,
            cache: RecencyCache::with_capacity(cache_capacity),
        }
    }

    /// Write through to the table, then update the cache entry
    pub fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        self.table.write(key, value)?;
        self.cache.insert(key, value.to_vec());
        Ok(())
    }

    /// Read from the cache; on a miss, read through and populate on a hit
    pub fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(value) = self.cache.get(key) {
            return Ok(Some(value.to_vec()));
        }

        match self.table.read(key)? {
            Some(value) => {
                self.cache.insert(key, value.clone());
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// Delete through to the table, then drop the cache entry
    pub fn delete(&mut self, key: &str) -> Result<()> {
        self.table.delete(key)?;
        self.cache.remove(key);
        Ok(())
    }

    /// The table's name
    pub fn name(&self) -> &str {
        self.table.name()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The wrapped table
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The cache sitting in front of the table
    pub fn cache(&self) -> &RecencyCache {
        &self.cache
    }
}
