//! In-memory graph store for the suggestion engine.
//!
//! Provides a snapshot-backed implementation of every ranking port:
//! - Topic resolution by id
//! - Outbound/inbound links with sentence occurrence counts
//! - Parent-category membership
//! - Symmetric pairwise relatedness scores
//!
//! Snapshots are JSON documents loaded once and indexed in memory.

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::StoreError;
pub use snapshot::{CategoryRecord, GraphSnapshot, LinkRecord, RelatednessRecord};
pub use store::{SnapshotStore, StoreStats};
