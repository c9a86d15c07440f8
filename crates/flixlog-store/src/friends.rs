//! Per-show sharing lists and the global friend registry.
//!
//! Adding a friend to a show also registers it globally (best-effort).
//! Removing a friend globally cascades into every show.

use std::collections::HashMap;

use flixlog_shared::constants::{FRIENDS_KEY, SHOWS_KEY};
use flixlog_shared::ShowId;

use crate::error::{best_effort, Result, StoreError};
use crate::journal::{find_mut, Journal, Mutation};
use crate::models::ShowRecord;

fn clean_friend_id(friend_id: &str) -> Result<&str> {
    let friend_id = friend_id.trim();
    if friend_id.is_empty() {
        return Err(StoreError::validation("Friend id cannot be empty"));
    }
    Ok(friend_id)
}

impl Journal {
    // ------------------------------------------------------------------
    // Per-show
    // ------------------------------------------------------------------

    /// Share a show with `friend_id`. Idempotent: an existing member leaves
    /// the record (and its `last_modified`) untouched. The show must exist
    /// before the friend is registered globally.
    pub async fn add_friend(&self, show_id: &ShowId, friend_id: &str) -> Result<ShowRecord> {
        let friend_id = clean_friend_id(friend_id)?;
        let _gate = self.lock_writes().await;

        let mut shows = self.load_shows().await?;
        let show = find_mut(&mut shows, show_id)?;

        best_effort("register global friend", self.register_friend(friend_id).await);

        if show.has_friend(friend_id) {
            return Ok(show.clone());
        }
        show.friends.push(friend_id.to_string());
        show.touch();
        let updated = show.clone();

        self.save_shows(&shows).await?;
        Ok(updated)
    }

    /// Stop sharing a show with `friend_id`. Removing a non-member is a
    /// no-op.
    pub async fn remove_friend(&self, show_id: &ShowId, friend_id: &str) -> Result<ShowRecord> {
        let friend_id = friend_id.trim();

        self.update_show(show_id, |show| {
            if !show.has_friend(friend_id) {
                return Ok(Mutation::Unchanged(show.clone()));
            }
            show.friends.retain(|f| f != friend_id);
            show.touch();
            Ok(Mutation::Changed(show.clone()))
        })
        .await
    }

    pub async fn get_friends(&self, show_id: &ShowId) -> Result<Vec<String>> {
        Ok(self.get_show(show_id).await?.friends)
    }

    // ------------------------------------------------------------------
    // Global registry
    // ------------------------------------------------------------------

    /// Every friend ID known across shows, in registration order.
    pub async fn get_global_friends(&self) -> Result<Vec<String>> {
        self.load_value(FRIENDS_KEY).await
    }

    pub async fn add_global_friend(&self, friend_id: &str) -> Result<()> {
        let friend_id = clean_friend_id(friend_id)?;
        let _gate = self.lock_writes().await;
        self.register_friend(friend_id).await
    }

    /// Append to the registry if absent. Caller holds the write gate.
    async fn register_friend(&self, friend_id: &str) -> Result<()> {
        let mut friends: Vec<String> = self.load_value(FRIENDS_KEY).await?;
        if friends.iter().any(|f| f == friend_id) {
            return Ok(());
        }
        friends.push(friend_id.to_string());
        self.save_value(FRIENDS_KEY, &friends).await
    }

    /// Forget a friend everywhere: the global registry and every show's
    /// sharing list. Both keys are read before anything is written, and the
    /// changes land in a single backend write.
    pub async fn remove_global_friend(&self, friend_id: &str) -> Result<()> {
        let friend_id = clean_friend_id(friend_id)?;
        let _gate = self.lock_writes().await;

        let mut friends: Vec<String> = self.load_value(FRIENDS_KEY).await?;
        let mut shows = self.load_shows().await?;

        let mut entries = HashMap::new();

        let registered = friends.len();
        friends.retain(|f| f != friend_id);
        if friends.len() != registered {
            entries.insert(FRIENDS_KEY.to_string(), serde_json::to_value(&friends)?);
        }

        let mut changed = 0usize;
        for show in shows.iter_mut().filter(|s| s.has_friend(friend_id)) {
            show.friends.retain(|f| f != friend_id);
            show.touch();
            changed += 1;
        }
        if changed > 0 {
            entries.insert(SHOWS_KEY.to_string(), serde_json::to_value(&shows)?);
        }

        if !entries.is_empty() {
            self.backend().set(entries).await?;
        }

        tracing::debug!(friend = friend_id, shows_changed = changed, "removed global friend");
        Ok(())
    }
}
