//! Recovery Contexts
//!
//! One immutable context value per recovery stage. A stage derives the
//! child context for each entity it recurses into; nothing is mutated or
//! shared back up the chain.

use std::path::{Path, PathBuf};

use crate::config::Config;

/// Context for the environment stage: the root of the replay
#[derive(Debug, Clone)]
pub struct EnvironmentContext {
    working_dir: PathBuf,
    segment_size_limit: u64,
    cache_capacity: usize,
}

impl EnvironmentContext {
    /// Build the root context from the engine configuration
    pub fn new(config: &Config) -> Self {
        Self {
            working_dir: config.working_dir.clone(),
            segment_size_limit: config.segment_size_limit,
            cache_capacity: config.cache_capacity,
        }
    }

    /// The root working directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Derive the context for one database under this environment
    pub fn database(&self, name: String) -> DatabaseContext {
        DatabaseContext {
            path: self.working_dir.join(&name),
            name,
            segment_size_limit: self.segment_size_limit,
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Context for one database directory
#[derive(Debug, Clone)]
pub struct DatabaseContext {
    name: String,
    path: PathBuf,
    segment_size_limit: u64,
    cache_capacity: usize,
}

impl DatabaseContext {
    /// The database's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The database's directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Segment size threshold for tables under this database
    pub fn segment_size_limit(&self) -> u64 {
        self.segment_size_limit
    }

    /// Cache capacity for tables under this database
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Derive the context for one table under this database
    pub fn table(&self, name: String) -> TableContext {
        TableContext {
            path: self.path.join(&name),
            name,
            segment_size_limit: self.segment_size_limit,
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Context for one table directory
#[derive(Debug, Clone)]
pub struct TableContext {
    name: String,
    path: PathBuf,
    segment_size_limit: u64,
    cache_capacity: usize,
}

impl TableContext {
    /// The table's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The table's directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Segment size threshold for this table's segments
    pub fn segment_size_limit(&self) -> u64 {
        self.segment_size_limit
    }

    /// Cache capacity for this table
    pub fn cache_capacity(&self) -> usize {
        self.cache_capacity
    }

    /// Derive the context for one segment file under this table
    pub fn segment(&self, name: String) -> SegmentContext {
        SegmentContext {
            path: self.path.join(&name),
            name,
            size_limit: self.segment_size_limit,
        }
    }
}

/// Context for one segment file
#[derive(Debug, Clone)]
pub struct SegmentContext {
    name: String,
    path: PathBuf,
    size_limit: u64,
}

impl SegmentContext {
    /// The segment's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The segment file's path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size threshold at which the segment is read-only
    pub fn size_limit(&self) -> u64 {
        self.size_limit
    }
}
