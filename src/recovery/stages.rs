//! Recovery Stages
//!
//! The four replay stages, top-down. Each stage verifies its piece of the
//! on-disk layout, recurses, and hands a fully reconstructed object back
//! up. Replay never writes to any file.

use std::fs;
use std::io::{self, BufReader};
use std::path::Path;

use crate::database::Database;
use crate::error::{Result, StrataError};
use crate::index::Registry;
use crate::record::RecordReader;
use crate::storage::{CachedTable, Segment, Table};

use super::{DatabaseContext, EnvironmentContext, SegmentContext, TableContext};

/// Everything the segment stage hands back to the table stage
pub struct SegmentReplay {
    /// The reconstructed segment
    pub segment: Segment,

    /// Keys touched by this segment, in record order; the table stage
    /// repoints its index at this segment for each of them
    pub keys: Vec<String>,

    /// Whether the file ended mid-record and replay stopped early
    pub truncated: bool,
}

// =============================================================================
// Stage 1: Environment
// =============================================================================

/// Recover every database under the working directory.
///
/// A missing working directory is created and yields an empty environment.
/// Every existing child must recover as a database, in no particular order.
pub fn recover_environment(context: &EnvironmentContext) -> Result<Registry<Database>> {
    let working_dir = context.working_dir();

    if !working_dir.exists() {
        fs::create_dir_all(working_dir)?;
        tracing::info!("created working directory {}", working_dir.display());
        return Ok(Registry::new());
    }

    if !working_dir.is_dir() {
        return Err(StrataError::InvalidArgument(format!(
            "working path {} is not a directory",
            working_dir.display()
        )));
    }

    let mut databases = Registry::new();

    for entry in fs::read_dir(working_dir)? {
        let entry = entry?;
        let database = recover_database(context.database(entry_name(&entry)?))?;
        databases.insert(database.name().to_string(), database);
    }

    Ok(databases)
}

// =============================================================================
// Stage 2: Database
// =============================================================================

/// Recover one database directory and every table beneath it
pub fn recover_database(context: DatabaseContext) -> Result<Database> {
    verify_directory("database", context.name(), context.path())?;

    let mut tables = Registry::new();

    for entry in fs::read_dir(context.path())? {
        let entry = entry?;
        let table = recover_table(context.table(entry_name(&entry)?))?;
        tables.insert(table.name().to_string(), table);
    }

    tracing::debug!(
        "database {}: {} table(s) recovered",
        context.name(),
        tables.len()
    );

    Ok(Database::reconstruct(
        context.name().to_string(),
        context.path().to_path_buf(),
        tables,
        context.segment_size_limit(),
        context.cache_capacity(),
    ))
}

// =============================================================================
// Stage 3: Table
// =============================================================================

/// Recover one table directory by replaying its segments in creation order.
///
/// Segment names embed a creation marker, so sorting by name ascending
/// replays oldest first: a key rewritten in a later segment ends up
/// indexed to the later segment, and the last segment becomes current.
pub fn recover_table(context: TableContext) -> Result<CachedTable> {
    verify_directory("table", context.name(), context.path())?;

    let mut segment_names = Vec::new();
    for entry in fs::read_dir(context.path())? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            segment_names.push(entry_name(&entry)?);
        }
    }
    segment_names.sort();

    let mut segments = Vec::new();
    let mut index = Registry::new();

    for segment_name in segment_names {
        let replay = recover_segment(context.segment(segment_name))?;

        let slot = segments.len();
        segments.push(replay.segment);

        // Later segments overwrite whatever earlier ones left here
        for key in replay.keys {
            index.insert(key, slot);
        }
    }

    tracing::debug!(
        "table {}: {} segment(s) replayed, {} key(s) indexed",
        context.name(),
        segments.len(),
        index.len()
    );

    let table = Table::reconstruct(
        context.name().to_string(),
        context.path().to_path_buf(),
        segments,
        index,
        context.segment_size_limit(),
    );

    Ok(CachedTable::new(table, context.cache_capacity()))
}

// =============================================================================
// Stage 4: Segment
// =============================================================================

/// Replay one segment file into an offset index and a touched-key list.
///
/// Decodes records sequentially, tracking a running offset. A file that
/// ends mid-record stops the replay early; whatever decoded before that
/// point is the segment's effective content. The reconstructed segment is
/// read-only iff its recovered size meets the threshold.
pub fn recover_segment(context: SegmentContext) -> Result<SegmentReplay> {
    // Missing or unreadable segment files are fatal to startup
    let file = fs::File::open(context.path())?;
    let mut reader = RecordReader::new(BufReader::new(file));

    let mut index = Registry::new();
    let mut keys = Vec::new();
    let mut size: u64 = 0;
    let mut truncated = false;

    loop {
        match reader.next_record() {
            Ok(Some(record)) => {
                let key = String::from_utf8(record.key().to_vec()).map_err(|_| {
                    StrataError::Corruption(format!(
                        "segment {}: non-UTF-8 key at offset {}",
                        context.name(),
                        size
                    ))
                })?;

                index.insert(key.clone(), size);
                size += record.encoded_len();
                keys.push(key);
            }
            Ok(None) => break,
            Err(StrataError::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                tracing::warn!(
                    "segment {}: file ends mid-record after {} intact byte(s), replaying the prefix",
                    context.name(),
                    size
                );
                truncated = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }

    let segment = Segment::reconstruct(
        context.name().to_string(),
        context.path().to_path_buf(),
        size,
        index,
        context.size_limit(),
    );

    Ok(SegmentReplay {
        segment,
        keys,
        truncated,
    })
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Fail fatally unless `path` is a readable directory
fn verify_directory(kind: &str, name: &str, path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        StrataError::Corruption(format!("{} {} is not readable: {}", kind, name, e))
    })?;

    if !metadata.is_dir() {
        return Err(StrataError::Corruption(format!(
            "{} path {} is not a directory",
            kind,
            path.display()
        )));
    }

    Ok(())
}

/// A directory entry's name as UTF-8, or a fatal layout error
fn entry_name(entry: &fs::DirEntry) -> Result<String> {
    entry.file_name().into_string().map_err(|name| {
        StrataError::Corruption(format!("non-UTF-8 name {:?} in working tree", name))
    })
}
