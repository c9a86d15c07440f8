//! Persistence backends.
//!
//! The journal never talks to a database directly. It goes through
//! [`KeyValueStore`], a small async key/value contract mirroring the browser
//! extension storage area the journal format was designed around: values are
//! arbitrary JSON documents addressed by string keys.

mod memory;
mod sqlite;

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Async key/value persistence collaborator.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Fetch the values stored under `keys`. Missing keys are simply absent
    /// from the returned map.
    async fn get(&self, keys: &[&str]) -> Result<HashMap<String, Value>>;

    /// Store every entry, replacing existing values.
    async fn set(&self, entries: HashMap<String, Value>) -> Result<()>;

    /// Delete the given keys. Deleting a missing key is not an error.
    async fn remove(&self, keys: &[&str]) -> Result<()>;
}
