//! # Storage Layer
//!
//! This module defines the storage abstraction for inven. The [`DataStore`]
//! trait allows the application to work with different storage backends.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **future backends** (database, cloud, etc.) without changing core logic
//! - Keep business logic **decoupled** from persistence details
//!
//! ## Write-Through Model
//!
//! The [`Inventory`](crate::inventory::Inventory) keeps the authoritative
//! state in memory and treats the store as a mirror: the whole snapshot is
//! loaded once at startup and rewritten after every mutation. Stores never
//! see partial updates, so a backend is just "read one document, write one
//! document".
//!
//! There is no coordination between concurrent writers. Two processes
//! pointed at the same backing file race, and the last writer wins.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - Whole snapshot stored as pretty-printed JSON in `data.json`
//!   - Missing file loads as the empty snapshot
//!   - Supports a configurable data file name
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Exposes the last saved snapshot so write-through is observable

use crate::error::Result;
use crate::model::Snapshot;

pub mod fs;
pub mod memory;

/// Abstract interface for snapshot storage.
///
/// Implementations must hand back the last saved snapshot on [`load`]
/// (or the empty snapshot if nothing was ever saved) and persist the full
/// snapshot on [`save`].
///
/// [`load`]: DataStore::load
/// [`save`]: DataStore::save
pub trait DataStore {
    /// Load the persisted snapshot, or the empty snapshot if none exists.
    fn load(&self) -> Result<Snapshot>;

    /// Persist the full snapshot, replacing whatever was stored before.
    fn save(&mut self, snapshot: &Snapshot) -> Result<()>;
}
