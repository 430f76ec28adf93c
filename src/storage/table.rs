//! Table
//!
//! Key-value semantics over a growing sequence of segments. At most one
//! segment (the newest) is writable at any time; the table-local index
//! maps each key to the segment holding that key's latest write, so a read
//! is always satisfied by exactly one segment.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::index::Registry;

use super::Segment;

/// A named collection of segments with last-writer-wins key routing
pub struct Table {
    /// Table name; doubles as the directory name under the database root
    name: String,

    /// The table's backing directory
    path: PathBuf,

    /// Segments in creation order; the last one is the current segment
    segments: Vec<Segment>,

    /// Key → slot (in `segments`) of the segment owning the key's latest write
    index: Registry<usize>,

    /// Highest creation marker handed out so far
    last_marker: u64,

    /// Size threshold passed down to every segment this table creates
    segment_size_limit: u64,

    /// Number of reads that went to a segment file (not served elsewhere)
    disk_reads: u64,
}

impl Table {
    /// Create a fresh table backed by a new directory under `db_root`.
    ///
    /// Fails if the directory already exists.
    pub fn create(name: &str, db_root: &Path, segment_size_limit: u64) -> Result<Self> {
        let path = db_root.join(name);
        fs::create_dir(&path)?;

        Ok(Self {
            name: name.to_string(),
            path,
            segments: Vec::new(),
            index: Registry::new(),
            last_marker: 0,
            segment_size_limit,
            disk_reads: 0,
        })
    }

    /// Reconstruct a table from segments replayed out of an existing
    /// directory. `segments` must be in creation order; the last one becomes
    /// the current segment. The creation marker is re-seeded from the
    /// recovered segment names so new segments keep sorting after them.
    pub fn reconstruct(
        name: String,
        path: PathBuf,
        segments: Vec<Segment>,
        index: Registry<usize>,
        segment_size_limit: u64,
    ) -> Self {
        let last_marker = segments
            .iter()
            .filter_map(|segment| parse_marker(segment.name()))
            .max()
            .unwrap_or(0);

        Self {
            name,
            path,
            segments,
            index,
            last_marker,
            segment_size_limit,
            disk_reads: 0,
        }
    }

    /// Write a key-value pair.
    ///
    /// Routes to the current segment, creating one if there is none or the
    /// current one is read-only. If the segment still refuses the write
    /// (threshold crossed exactly at this call), rolls once and retries.
    /// On success the table index points the key at the segment that took
    /// the record.
    pub fn write(&mut self, key: &str, value: &[u8]) -> Result<()> {
        let mut slot = self.writable_slot()?;

        if !self.segments[slot].write(key, value)? {
            slot = self.roll_segment()?;
            if !self.segments[slot].write(key, value)? {
                return Err(refused_after_roll(self.segments[slot].name()));
            }
        }

        self.index.insert(key, slot);
        Ok(())
    }

    /// Read the latest value for `key`.
    ///
    /// The index names the one segment allowed to answer; no other segment
    /// is scanned.
    pub fn read(&mut self, key: &str) -> Result<Option<Vec<u8>>> {
        let slot = match self.index.get(key) {
            Some(&slot) => slot,
            None => return Ok(None),
        };

        self.disk_reads += 1;
        self.segments[slot].read(key)
    }

    /// Delete `key`. Deleting an absent key is a no-op, not an error.
    ///
    /// The tombstone goes to the *current* writable segment, not
    /// necessarily the one owning the key, so a delete succeeds even after
    /// the owning segment has gone read-only. The index is repointed to the
    /// segment that took the tombstone.
    pub fn delete(&mut self, key: &str) -> Result<()> {
        if !self.index.contains(key) {
            return Ok(());
        }

        let mut slot = self.writable_slot()?;

        if !self.segments[slot].write_tombstone(key)? {
            slot = self.roll_segment()?;
            if !self.segments[slot].write_tombstone(key)? {
                return Err(refused_after_roll(self.segments[slot].name()));
            }
        }

        self.index.insert(key, slot);
        Ok(())
    }

    /// Slot of the current writable segment, rolling to a new one if there
    /// is no segment yet or the current one is read-only
    fn writable_slot(&mut self) -> Result<usize> {
        match self.segments.last() {
            Some(current) if !current.is_read_only() => Ok(self.segments.len() - 1),
            _ => self.roll_segment(),
        }
    }

    /// Create the next segment and make it current
    fn roll_segment(&mut self) -> Result<usize> {
        let name = self.next_segment_name();
        let segment = Segment::create(&name, &self.path, self.segment_size_limit)?;

        tracing::debug!("table {}: rolled to segment {}", self.name, name);

        self.segments.push(segment);
        Ok(self.segments.len() - 1)
    }

    /// Next segment name: table name + a monotonically increasing creation
    /// marker, fixed-width so lexicographic order equals creation order.
    ///
    /// The marker is the current unix-millis timestamp, bumped past the last
    /// marker handed out so two segments created within one millisecond (or
    /// after a clock step backwards) still get distinct, ordered names.
    fn next_segment_name(&mut self) -> String {
        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or(0);

        self.last_marker = now_millis.max(self.last_marker + 1);
        format!("{}_{:013}", self.name, self.last_marker)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The table's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's backing directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of segments this table owns
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The table's segments, in creation order
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of reads that hit a segment file
    pub fn disk_reads(&self) -> u64 {
        self.disk_reads
    }
}

/// Parse the creation marker out of a segment name (`{table}_{marker}`)
fn parse_marker(segment_name: &str) -> Option<u64> {
    segment_name.rsplit('_').next()?.parse().ok()
}

/// A writable segment refused an append; only possible if something else
/// flipped it read-only between the roll and the write
fn refused_after_roll(segment_name: &str) -> crate::error::StrataError {
    io::Error::new(
        io::ErrorKind::Other,
        format!("fresh segment {} refused an append", segment_name),
    )
    .into()
}
