//! stratakv CLI
//!
//! Command-line interface for poking an embedded stratakv environment.
//! A thin consumer of the engine's public call surface; it never touches
//! segment files, indices, or the record format directly.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use stratakv::{Config, Environment, Result, StrataError};

/// stratakv CLI
#[derive(Parser, Debug)]
#[command(name = "stratakv")]
#[command(about = "Embedded log-structured key-value storage engine")]
#[command(version)]
struct Args {
    /// Working directory
    #[arg(short, long, default_value = "./stratakv_data")]
    working_dir: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a database
    CreateDb {
        /// The database to create
        database: String,
    },

    /// Create a table in a database
    CreateTable {
        /// The database holding the table
        database: String,

        /// The table to create
        table: String,
    },

    /// Set a key-value pair
    Set {
        /// The database holding the table
        database: String,

        /// The table to write into
        table: String,

        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Get a value by key
    Get {
        /// The database holding the table
        database: String,

        /// The table to read from
        table: String,

        /// The key to get
        key: String,
    },

    /// Delete a key
    Del {
        /// The database holding the table
        database: String,

        /// The table to delete from
        table: String,

        /// The key to delete
        key: String,
    },
}

fn main() -> ExitCode {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,stratakv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder().working_dir(&args.working_dir).build();
    let mut env = Environment::open(config)?;

    match args.command {
        Commands::CreateDb { database } => {
            env.create_database(&database)?;
            println!("created database {}", database);
        }
        Commands::CreateTable { database, table } => {
            database_mut(&mut env, &database)?.create_table_if_not_exists(&table)?;
            println!("created table {}", table);
        }
        Commands::Set {
            database,
            table,
            key,
            value,
        } => {
            database_mut(&mut env, &database)?.write(&table, &key, value.as_bytes())?;
            println!("ok");
        }
        Commands::Get {
            database,
            table,
            key,
        } => match database_mut(&mut env, &database)?.read(&table, &key)? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(not found)"),
        },
        Commands::Del {
            database,
            table,
            key,
        } => {
            database_mut(&mut env, &database)?.delete(&table, &key)?;
            println!("ok");
        }
    }

    Ok(())
}

fn database_mut<'e>(
    env: &'e mut Environment,
    name: &str,
) -> Result<&'e mut stratakv::Database> {
    env.database_mut(name)
        .ok_or_else(|| StrataError::NotFound(format!("database {}", name)))
}
