//! Display nicknames for friend IDs.

use std::collections::HashMap;

use flixlog_shared::constants::NICKNAMES_KEY;

use crate::error::{Result, StoreError};
use crate::journal::{Journal, Mutation};

impl Journal {
    /// Set the display name for `friend_id`. An empty or blank nickname
    /// deletes the entry.
    pub async fn set_friend_nickname(&self, friend_id: &str, nickname: &str) -> Result<()> {
        let friend_id = friend_id.trim();
        if friend_id.is_empty() {
            return Err(StoreError::validation("Friend id cannot be empty"));
        }
        let nickname = nickname.trim();

        self.update_value(NICKNAMES_KEY, |map: &mut HashMap<String, String>| {
            if nickname.is_empty() {
                return Ok(match map.remove(friend_id) {
                    Some(_) => Mutation::Changed(()),
                    None => Mutation::Unchanged(()),
                });
            }
            if map.get(friend_id).map(String::as_str) == Some(nickname) {
                return Ok(Mutation::Unchanged(()));
            }
            map.insert(friend_id.to_string(), nickname.to_string());
            Ok(Mutation::Changed(()))
        })
        .await
    }

    /// The nickname for `friend_id`, or the ID itself when none is set.
    pub async fn get_friend_nickname(&self, friend_id: &str) -> Result<String> {
        let friend_id = friend_id.trim();
        let mut map = self.get_all_friend_nicknames().await?;
        Ok(map.remove(friend_id).unwrap_or_else(|| friend_id.to_string()))
    }

    pub async fn get_all_friend_nicknames(&self) -> Result<HashMap<String, String>> {
        self.load_value(NICKNAMES_KEY).await
    }
}
