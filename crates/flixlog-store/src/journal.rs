//! The journal handle and show-level CRUD.
//!
//! [`Journal`] owns a [`KeyValueStore`] and performs every mutation as a
//! read-modify-write of the whole value stored under one key. Mutations run
//! under a per-journal write gate, so callers sharing one `Journal` through an
//! `Arc` never lose each other's updates.

use std::collections::HashMap;
use std::sync::Arc;

use flixlog_shared::constants::SHOWS_KEY;
use flixlog_shared::ShowId;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::backend::KeyValueStore;
use crate::error::{Result, StoreError};
use crate::models::{clamp_rating, ShowRecord};

/// Result of a read-modify-write closure: whether the loaded value must be
/// written back, and what to hand to the caller.
pub(crate) enum Mutation<T> {
    Changed(T),
    Unchanged(T),
}

/// Handle over one journal persisted in a [`KeyValueStore`].
pub struct Journal {
    backend: Arc<dyn KeyValueStore>,
    write_gate: Mutex<()>,
}

impl Journal {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_gate: Mutex::new(()),
        }
    }

    pub fn backend(&self) -> &Arc<dyn KeyValueStore> {
        &self.backend
    }

    // ------------------------------------------------------------------
    // Persistence helpers
    // ------------------------------------------------------------------

    /// Load and decode the value under `key`. Missing or `null` values decode
    /// to `T::default()`; read and decode failures propagate.
    pub(crate) async fn load_value<T>(&self, key: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        let mut values = self.backend.get(&[key]).await?;
        match values.remove(key) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    pub(crate) async fn save_value<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let encoded = serde_json::to_value(value)?;
        self.backend
            .set(HashMap::from([(key.to_string(), encoded)]))
            .await
    }

    /// Strict loader used by every mutation.
    pub(crate) async fn load_shows(&self) -> Result<Vec<ShowRecord>> {
        self.load_value(SHOWS_KEY).await
    }

    pub(crate) async fn save_shows(&self, shows: &[ShowRecord]) -> Result<()> {
        self.save_value(SHOWS_KEY, shows).await
    }

    /// Read-modify-write of the value under `key`, holding the write gate.
    pub(crate) async fn update_value<V, T, F>(&self, key: &str, f: F) -> Result<T>
    where
        V: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut V) -> Result<Mutation<T>>,
    {
        let _gate = self.write_gate.lock().await;

        let mut value: V = self.load_value(key).await?;
        match f(&mut value)? {
            Mutation::Changed(out) => {
                self.save_value(key, &value).await?;
                Ok(out)
            }
            Mutation::Unchanged(out) => Ok(out),
        }
    }

    pub(crate) async fn update_shows<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<ShowRecord>) -> Result<Mutation<T>>,
    {
        self.update_value(SHOWS_KEY, f).await
    }

    /// Same as [`Self::update_shows`] but scoped to one show; `NotFound` if
    /// the ID is absent.
    pub(crate) async fn update_show<T, F>(&self, show_id: &ShowId, f: F) -> Result<T>
    where
        F: FnOnce(&mut ShowRecord) -> Result<Mutation<T>>,
    {
        self.update_shows(|shows| {
            let show = find_mut(shows, show_id)?;
            f(show)
        })
        .await
    }

    /// Hold the write gate for a multi-key operation.
    pub(crate) async fn lock_writes(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.write_gate.lock().await
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Every show in the journal. A read failure degrades to an empty list.
    pub async fn get_journal(&self) -> Vec<ShowRecord> {
        match self.load_shows().await {
            Ok(shows) => shows,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read journal, treating as empty");
                Vec::new()
            }
        }
    }

    pub async fn get_show(&self, show_id: &ShowId) -> Result<ShowRecord> {
        let shows = self.load_shows().await?;
        shows
            .into_iter()
            .find(|s| &s.id == show_id)
            .ok_or_else(|| StoreError::show_not_found(show_id))
    }

    /// Case-insensitive lookup without creating anything.
    pub async fn get_show_by_title(&self, title: &str) -> Option<ShowRecord> {
        self.get_journal()
            .await
            .into_iter()
            .find(|s| s.matches_title(title))
    }

    // ------------------------------------------------------------------
    // Create / update / delete
    // ------------------------------------------------------------------

    /// Return the show whose title matches `title` (ignoring case), creating
    /// and persisting an empty record on first reference.
    pub async fn get_or_create_show(&self, title: &str) -> Result<ShowRecord> {
        let candidate = ShowRecord::new(title)?;

        self.update_shows(move |shows| {
            if let Some(existing) = shows.iter().find(|s| s.matches_title(&candidate.title)) {
                return Ok(Mutation::Unchanged(existing.clone()));
            }

            tracing::debug!(id = %candidate.id, title = %candidate.title, "creating show");
            shows.push(candidate.clone());
            Ok(Mutation::Changed(candidate))
        })
        .await
    }

    /// Replace the review text and rating. The rating is clamped into `0..=5`.
    pub async fn update_show_review(
        &self,
        show_id: &ShowId,
        review: &str,
        rating: i64,
    ) -> Result<ShowRecord> {
        self.update_show(show_id, |show| {
            show.review = review.trim().to_string();
            show.rating = clamp_rating(rating);
            show.touch();
            Ok(Mutation::Changed(show.clone()))
        })
        .await
    }

    pub async fn delete_show(&self, show_id: &ShowId) -> Result<()> {
        self.update_shows(|shows| {
            let idx = shows
                .iter()
                .position(|s| &s.id == show_id)
                .ok_or_else(|| StoreError::show_not_found(show_id))?;

            let removed = shows.remove(idx);
            tracing::debug!(id = %removed.id, title = %removed.title, "deleted show");
            Ok(Mutation::Changed(()))
        })
        .await
    }
}

pub(crate) fn find_mut<'a>(
    shows: &'a mut [ShowRecord],
    show_id: &ShowId,
) -> Result<&'a mut ShowRecord> {
    shows
        .iter_mut()
        .find(|s| &s.id == show_id)
        .ok_or_else(|| StoreError::show_not_found(show_id))
}
