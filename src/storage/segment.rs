//! Segment
//!
//! One append-only file holding an ordered log of records, plus an
//! in-memory index mapping each key to the byte offset of that key's most
//! recent record within this file.
//!
//! A segment is writable until its size reaches the configured threshold;
//! from then on it is permanently read-only. Every operation opens the
//! underlying file for just that call; no file handle is held across
//! calls, so individual operations are independent and retryable.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::error::{Result, StrataError};
use crate::index::Registry;
use crate::record::{Record, RecordReader, RecordWriter};

/// One shard of a table's write history
pub struct Segment {
    /// Segment name; embeds the table name and a creation marker
    name: String,

    /// Path of the backing file
    path: PathBuf,

    /// Running byte size of the backing file
    size: u64,

    /// Once flipped, no further appends, ever
    read_only: bool,

    /// Key → byte offset of the key's latest record in this file
    index: Registry<u64>,

    /// Size threshold at which the segment flips to read-only
    size_limit: u64,
}

impl Segment {
    /// Create a fresh segment backed by a new file under `table_root`.
    ///
    /// Fails if a file with this name already exists.
    pub fn create(name: &str, table_root: &Path, size_limit: u64) -> Result<Self> {
        let path = table_root.join(name);

        // create_new: a segment name must never collide with an existing file
        OpenOptions::new().write(true).create_new(true).open(&path)?;

        Ok(Self {
            name: name.to_string(),
            path,
            size: 0,
            read_only: false,
            index: Registry::new(),
            size_limit,
        })
    }

    /// Reconstruct a segment from state replayed out of an existing file.
    ///
    /// The segment comes up read-only if the recovered size already meets
    /// the threshold.
    pub fn reconstruct(
        name: String,
        path: PathBuf,
        size: u64,
        index: Registry<u64>,
        size_limit: u64,
    ) -> Self {
        Self {
            name,
            path,
            size,
            read_only: size >= size_limit,
            index,
            size_limit,
        }
    }

    /// Append a value record for `key`.
    ///
    /// Returns `Ok(false)` if the segment is read-only; the caller rolls to
    /// a new segment and retries there.
    pub fn write(&mut self, key: &str, value: &[u8]) -> Result<bool> {
        if self.read_only {
            return Ok(false);
        }

        self.append(key, Record::value(key, value))?;
        Ok(true)
    }

    /// Append a tombstone for `key`, whether or not this segment knows it.
    ///
    /// Returns `Ok(false)` if the segment is read-only.
    pub fn write_tombstone(&mut self, key: &str) -> Result<bool> {
        if self.read_only {
            return Ok(false);
        }

        self.append(key, Record::tombstone(key))?;
        Ok(true)
    }

    /// Append a tombstone for a key this segment currently holds.
    ///
    /// Returns `Ok(false)` if the key is unknown to this segment or the
    /// segment is read-only.
    pub fn delete(&mut self, key: &str) -> Result<bool> {
        if self.read_only || !self.index.contains(key) {
            return Ok(false);
        }

        self.append(key, Record::tombstone(key))?;
        Ok(true)
    }

    /// Read the latest record for `key` out of this segment.
    ///
    /// Returns:
    /// - `Ok(Some(value))` — key found with value
    /// - `Ok(None)` — key unknown to this segment, or its latest record
    ///   here is a tombstone
    /// - `Err(Corruption)` — the record at the indexed offset does not
    ///   carry the requested key
    pub fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let offset = match self.index.get(key) {
            Some(&offset) => offset,
            None => return Ok(None),
        };

        // Scoped open: the handle is released on every exit path
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(offset))?;

        let mut reader = RecordReader::new(BufReader::new(file));
        let record = reader.next_record()?.ok_or_else(|| {
            StrataError::Corruption(format!(
                "segment {}: no record at indexed offset {}",
                self.name, offset
            ))
        })?;

        // The indexed offset must hold the key it was indexed under
        if record.key() != key.as_bytes() {
            return Err(StrataError::Corruption(format!(
                "segment {}: record at offset {} does not carry key {:?}",
                self.name, offset, key
            )));
        }

        match record {
            Record::Value { value, .. } => Ok(Some(value)),
            Record::Tombstone { .. } => Ok(None),
        }
    }

    /// Whether this segment has stopped accepting appends
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Append `record`, then update index and size counters.
    ///
    /// The index entry is only written after the record is durably appended,
    /// so a failed write never leaves the index pointing at bytes that did
    /// not reach the file.
    fn append(&mut self, key: &str, record: Record) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let written = RecordWriter::new(file).write(&record)?;

        self.index.insert(key, self.size);
        self.size += written;

        if self.size >= self.size_limit {
            self.read_only = true;
            tracing::debug!(
                "segment {} reached {} bytes, now read-only",
                self.name,
                self.size
            );
        }

        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The segment's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current byte size of the backing file
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Whether this segment holds an index entry for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains(key)
    }
}
