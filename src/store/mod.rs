//! # Persistent Store
//!
//! Durable string-keyed store of JSON values with an in-memory mirror and
//! change notifications. Every other feature persists through it.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//! - **Toggleable**: false

pub mod backend;
pub mod persistent;

pub use backend::{Backend, MemoryBackend, SqliteBackend, StoreError};
pub use persistent::{PersistentStore, StoreChange};
