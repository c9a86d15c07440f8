//! JSON export and import, for sharing one show's annotations and for
//! whole-journal backups.

use std::collections::HashSet;

use flixlog_shared::constants::SHOWS_KEY;
use flixlog_shared::time::now_millis;
use flixlog_shared::ShowId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, StoreError};
use crate::journal::{find_mut, Journal, Mutation};
use crate::models::{Annotation, ShowRecord};

/// What gets shared for a single show: the reactions, nothing else. Friends,
/// rating, review and the local show ID stay private.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowExport {
    pub title: String,
    pub annotations: Vec<Annotation>,
    /// Epoch milliseconds
    pub exported_at: i64,
}

/// Outcome of merging a shared annotation set into a show.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportStats {
    pub show: ShowRecord,
    /// Annotations actually added; duplicates by ID are not counted.
    pub added_count: usize,
}

/// Decode and check the `annotations` array of a shared payload without
/// touching storage.
fn parse_shared_annotations(json: &str) -> Result<Vec<Annotation>> {
    let payload: Value = serde_json::from_str(json)
        .map_err(|e| StoreError::validation(format!("Malformed import JSON: {e}")))?;

    let Some(raw) = payload.get("annotations").filter(|v| v.is_array()) else {
        return Err(StoreError::validation(
            "Import payload has no annotations array",
        ));
    };

    let annotations: Vec<Annotation> = serde_json::from_value(raw.clone())
        .map_err(|e| StoreError::validation(format!("Invalid annotation in import: {e}")))?;
    for annotation in &annotations {
        annotation.validate()?;
    }
    Ok(annotations)
}

impl Journal {
    /// Serialize one show's title and annotations for sharing.
    pub async fn export_show(&self, show_id: &ShowId) -> Result<String> {
        let show = self.get_show(show_id).await?;
        let export = ShowExport {
            title: show.title,
            annotations: show.annotations,
            exported_at: now_millis(),
        };
        Ok(serde_json::to_string_pretty(&export)?)
    }

    /// Merge a shared annotation set into a show, skipping any annotation
    /// whose ID the show already has.
    pub async fn import_show_annotations(&self, show_id: &ShowId, json: &str) -> Result<ImportStats> {
        let incoming = parse_shared_annotations(json)?;

        let stats = self
            .update_shows(|shows| {
                let show = find_mut(shows, show_id)?;

                let mut known: HashSet<_> = show.annotations.iter().map(|a| a.id.clone()).collect();
                let mut added_count = 0;
                for annotation in incoming {
                    if known.insert(annotation.id.clone()) {
                        show.annotations.push(annotation);
                        added_count += 1;
                    }
                }

                show.sort_annotations();
                show.touch();
                Ok(Mutation::Changed(ImportStats {
                    show: show.clone(),
                    added_count,
                }))
            })
            .await?;

        tracing::info!(
            show = %stats.show.id,
            added = stats.added_count,
            "imported shared annotations"
        );
        Ok(stats)
    }

    /// The whole journal as pretty-printed JSON.
    pub async fn export_journal(&self) -> Result<String> {
        let shows = self.get_journal().await;
        Ok(serde_json::to_string_pretty(&shows)?)
    }

    /// Replace the whole journal with a backup. Every record is checked
    /// before anything is written; one bad record rejects the import.
    pub async fn import_journal(&self, json: &str) -> Result<Vec<ShowRecord>> {
        let parsed: Value = serde_json::from_str(json)
            .map_err(|e| StoreError::validation(format!("Malformed journal JSON: {e}")))?;
        if !parsed.is_array() {
            return Err(StoreError::validation("Invalid journal format: expected an array"));
        }

        let shows: Vec<ShowRecord> = serde_json::from_value(parsed)
            .map_err(|e| StoreError::validation(format!("Invalid show record: {e}")))?;
        for show in &shows {
            show.validate()?;
        }

        let _gate = self.lock_writes().await;
        self.save_shows(&shows).await?;

        tracing::info!(shows = shows.len(), "journal imported");
        Ok(shows)
    }

    /// Drop every show. Friends, nicknames and the device ID are kept.
    pub async fn clear_journal(&self) -> Result<()> {
        let _gate = self.lock_writes().await;
        self.backend().remove(&[SHOWS_KEY]).await?;
        tracing::info!("journal cleared");
        Ok(())
    }
}
