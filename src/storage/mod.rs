//! Storage Module
//!
//! Per-table persistence over append-only segments.
//!
//! ## Responsibilities
//! - Append-only segment files with a fast key → offset lookup
//! - Segment rollover once the size threshold is reached
//! - Key-value semantics over a growing sequence of segments
//! - A bounded recency cache in front of the persistent read path
//!
//! ## Layout on disk
//! ```text
//! {table dir}/
//!   ├── {table}_0000001712345678   (oldest segment, read-only)
//!   ├── {table}_0000001712345901   (read-only)
//!   └── {table}_0000001712346155   (current, writable)
//! ```
//!
//! Segment names embed the table name plus a monotonically increasing
//! creation marker, so lexicographic name order equals creation order;
//! recovery relies on this.

mod cache;
mod caching;
mod segment;
mod table;

pub use cache::RecencyCache;
pub use caching::CachedTable;
pub use segment::Segment;
pub use table::Table;
