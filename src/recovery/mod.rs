//! Recovery Module
//!
//! Rebuilds every in-memory index by replaying the on-disk segments at
//! startup, without rewriting any file.
//!
//! ## Stages
//!
//! A four-stage, strictly top-down replay. Each stage derives an immutable
//! context value for its children rather than mutating a shared one:
//!
//! 1. **Environment stage**: create the working directory if it is
//!    missing (empty environment); otherwise recover each child as a
//!    database.
//! 2. **Database stage**: verify the child is a readable directory (else
//!    fail fatally), recover each of its children as a table, register the
//!    reconstructed database.
//! 3. **Table stage**: list segment files, sort them by name ascending
//!    (name order = creation order), replay each in that order. Ordering
//!    is load-bearing: a key rewritten in a later segment must end up
//!    indexed to the later segment.
//! 4. **Segment stage**: sequentially decode every record, tracking a
//!    running offset; stop early (without failing recovery) if the file
//!    ends mid-record; reconstruct the segment read-only iff its recovered
//!    size meets the threshold; overwrite the table-local index entry for
//!    every key touched.
//!
//! Fatal stage errors (unreadable directory or file, structurally corrupt
//! record layout) abort startup; the engine must not come up partially
//! initialized.

mod context;
mod stages;

pub use context::{DatabaseContext, EnvironmentContext, SegmentContext, TableContext};
pub use stages::{
    recover_database, recover_environment, recover_segment, recover_table, SegmentReplay,
};
