//! Environment
//!
//! The single long-lived root of the engine: owns the working directory and
//! the registry of databases. Constructed explicitly once at startup and
//! threaded through whatever needs it; there is no globally retrievable
//! instance.
//!
//! `Environment::open` runs the full recovery chain before returning, so
//! every index is rebuilt from the on-disk segments before any external
//! call is served.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::database::{validate_name, Database};
use crate::error::{Result, StrataError};
use crate::index::Registry;
use crate::recovery::{self, EnvironmentContext};

/// The root object owning all databases under one working directory
pub struct Environment {
    /// Engine configuration
    config: Config,

    /// Root working directory, created on first use
    working_dir: PathBuf,

    /// Database name → database
    databases: Registry<Database>,
}

impl Environment {
    /// Open an environment, replaying whatever the working directory holds.
    ///
    /// On startup:
    /// 1. Create the working directory if it does not exist
    /// 2. Recover every database / table / segment found beneath it
    /// 3. Ready to serve calls
    ///
    /// Any fatal recovery error aborts the open; the environment never
    /// comes up partially initialized.
    pub fn open(config: Config) -> Result<Self> {
        let context = EnvironmentContext::new(&config);
        let databases = recovery::recover_environment(&context)?;

        tracing::info!(
            "environment open: {} database(s) under {}",
            databases.len(),
            config.working_dir.display()
        );

        Ok(Self {
            working_dir: config.working_dir.clone(),
            config,
            databases,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified working directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().working_dir(path).build();
        Self::open(config)
    }

    /// Create and register a database. Fails with `AlreadyExists` if the
    /// name is already registered.
    pub fn create_database(&mut self, name: &str) -> Result<()> {
        validate_name("database name", name)?;

        if self.databases.contains(name) {
            return Err(StrataError::AlreadyExists(format!("database {}", name)));
        }

        let database = Database::create(
            name,
            &self.working_dir,
            self.config.segment_size_limit,
            self.config.cache_capacity,
        )?;
        self.databases.insert(name, database);

        Ok(())
    }

    /// Look up a registered database
    pub fn database(&self, name: &str) -> Option<&Database> {
        self.databases.get(name)
    }

    /// Look up a registered database, mutably
    pub fn database_mut(&mut self, name: &str) -> Option<&mut Database> {
        self.databases.get_mut(name)
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// The root working directory
    pub fn working_dir(&self) -> &Path {
        &self.working_dir
    }

    /// Number of registered databases
    pub fn database_count(&self) -> usize {
        self.databases.len()
    }

    /// The configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
