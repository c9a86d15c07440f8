//! # flixlog-store
//!
//! The FlixLog annotation journal: show records with timestamped annotations,
//! per-show and global friend lists, friend nicknames, and JSON import/export.
//!
//! State lives in a [`KeyValueStore`] as a handful of JSON documents (the show
//! collection, the friend registry, the nickname map and the device ID).
//! Every operation is a method on [`Journal`], which reads the document it
//! needs, mutates it, and writes it back whole.
//!
//! ```no_run
//! use std::sync::Arc;
//! use flixlog_store::{Journal, MemoryStore};
//!
//! # async fn demo() -> flixlog_store::Result<()> {
//! let journal = Journal::new(Arc::new(MemoryStore::new()));
//! let show = journal.get_or_create_show("Dark").await?;
//! journal.add_annotation(&show.id, 754.0, "the cave").await?;
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod backup;
pub mod journal;
pub mod migrations;
pub mod models;

mod annotations;
mod device;
mod error;
mod friends;
mod nicknames;

pub use backend::{KeyValueStore, MemoryStore, SqliteStore};
pub use backup::{ImportStats, ShowExport};
pub use error::{Result, StoreError};
pub use journal::Journal;
pub use models::*;
