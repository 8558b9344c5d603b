//! Persistent key-value storage
//!
//! Every concern gets its own key holding a JSON value. The engine reads a
//! key, mutates the value, and writes the whole value back; each write is
//! self-contained, so an interrupted compound update leaves every key in a
//! consistent state.
//!
//! ```text
//! ┌──────────────┐    typed get/set    ┌────────────┐   get/set/remove   ┌──────────────┐
//! │   Managers   │ ──────────────────▶ │ Repository │ ─────────────────▶ │ KeyValueStore│
//! └──────────────┘                     └────────────┘                    └──────────────┘
//!                                                                    MemoryStore / SqliteStore
//! ```

mod keys;
mod memory;
mod repository;
mod sqlite;

pub use keys::StoreKey;
pub use memory::MemoryStore;
pub use repository::Repository;
pub use sqlite::SqliteStore;

use anyhow::Result;

/// Synchronous string key-value store holding JSON-serialized values
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for a key, if present
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for a key
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a key (no-op if absent)
    fn remove(&self, key: &str) -> Result<()>;
}
