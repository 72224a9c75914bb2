//! # Vivarium IO
//!
//! Persistence and serialization for the Vivarium habitat:
//! - structured error type with a `Result` alias
//! - validated JSON helpers
//! - in-memory and JSON-file implementations of `PersistenceService`

/// Error types and result aliases for I/O operations
pub mod error;
/// Snapshot persistence services
pub mod persistence;
/// Validated JSON serialization helpers
pub mod serialization;

pub use error::{IoError, Result};
pub use persistence::{JsonFilePersistence, MemoryPersistence, SaveRecord};
pub use serialization::{from_json, read_json_file, to_json, to_json_pretty, write_json_file};
