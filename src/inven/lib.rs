//! # Inven Architecture
//!
//! Inven is a **UI-agnostic inventory-tracking library**. This is not a CLI
//! application that happens to have some library code—it's a library that
//! happens to have a CLI client.
//!
//! That distinction drives the entire architecture and should guide all
//! development.
//!
//! ## The Three-Layer Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (main.rs, args.rs)                               │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! │  - Owns user-input validation (required fields, conflicts)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over the inventory                           │
//! │  - Normalizes inputs (id prefixes → UUIDs)                  │
//! │  - Returns structured Result types                          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Core (inventory.rs, resolve.rs, search.rs, commands/)      │
//! │  - Single source of truth for all entity collections        │
//! │  - Cascade deletes, search, location resolution             │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DataStore trait (whole-snapshot load/save)      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## The Inventory Is the Only Mutation Surface
//!
//! Every entity collection (items, racks, shelves, cartons, binders,
//! containers) lives inside [`inventory::Inventory`]. Nothing else holds a
//! writable reference. Each mutation runs to completion, writes the whole
//! snapshot through the storage backend, and then notifies subscribers—in
//! that order, synchronously. Memory is the authority; storage is a mirror.
//!
//! ## Key Principle: Never Crash on a Stale Reference
//!
//! Deletes cascade down the location hierarchy (rack → shelf →
//! carton/binder/container) but never touch items. Items left pointing at a
//! deleted shelf are expected, not an error: lookups degrade to empty
//! strings, unknown-id mutations are silent no-ops, and the `doctor`
//! command reports (but never repairs) dangling references.
//!
//! ## Testing Strategy
//!
//! 1. **Core** (`inventory.rs` and friends): thorough unit tests against
//!    `InMemoryStore`. This is where the lion's share of testing lives.
//! 2. **API** (`api.rs`): tests for identifier normalization and dispatch.
//! 3. **CLI** (`tests/`): integration tests against the real binary in a
//!    temporary data directory.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`inventory`]: The state container owning every collection
//! - [`resolve`]: Location path resolution
//! - [`search`]: Substring matching across item fields
//! - [`commands`]: Workflow commands (export, doctor, config)
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (entities, `Location`, `Snapshot`)
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod inventory;
pub mod model;
pub mod resolve;
pub mod search;
pub mod store;
