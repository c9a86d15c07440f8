//! Domain model structs persisted in the journal.
//!
//! Field names serialize in camelCase so stored and exported JSON stays
//! compatible with journals written by the browser extension. New records
//! are only built through the validating constructors.

use flixlog_shared::constants::{MAX_RATING, UNKNOWN_DEVICE};
use flixlog_shared::time::now_millis;
use flixlog_shared::{AnnotationId, ShowId};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, StoreError};

// ---------------------------------------------------------------------------
// Annotation
// ---------------------------------------------------------------------------

/// A timestamped note attached to a show.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Annotation {
    /// Unique within the owning show.
    pub id: AnnotationId,
    /// Playback position in whole seconds.
    #[serde(deserialize_with = "deserialize_seconds")]
    pub timestamp: u64,
    /// Trimmed, never empty.
    pub text: String,
    /// Epoch milliseconds; set once at creation.
    #[serde(default)]
    pub created_date: i64,
    /// Device that wrote the note.
    #[serde(default = "unknown_device")]
    pub device_id: String,
}

impl Annotation {
    /// Build a new annotation, validating the playback position and text.
    pub fn new(timestamp_seconds: f64, text: &str, device_id: impl Into<String>) -> Result<Self> {
        let timestamp = validate_timestamp(timestamp_seconds)?;
        let text = validate_text(text)?;

        Ok(Self {
            id: AnnotationId::new(),
            timestamp,
            text,
            created_date: now_millis(),
            device_id: device_id.into(),
        })
    }

    /// Check an annotation that arrived from outside (import payloads).
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(StoreError::validation("Annotation id cannot be empty"));
        }
        validate_text(&self.text)?;
        Ok(())
    }
}

/// Reject non-finite or negative positions; round the rest to whole seconds.
pub fn validate_timestamp(seconds: f64) -> Result<u64> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(StoreError::validation(format!(
            "Invalid timestamp: {seconds}"
        )));
    }
    Ok(seconds.round() as u64)
}

fn validate_text(text: &str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::validation("Annotation text cannot be empty"));
    }
    Ok(text.to_string())
}

fn unknown_device() -> String {
    UNKNOWN_DEVICE.to_string()
}

// Older payloads may carry fractional seconds.
fn deserialize_seconds<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    validate_timestamp(raw).map_err(serde::de::Error::custom)
}

// ---------------------------------------------------------------------------
// ShowRecord
// ---------------------------------------------------------------------------

/// One tracked show or movie.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ShowRecord {
    pub id: ShowId,
    pub title: String,
    /// Star rating in `0..=5`.
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub review: String,
    /// Always sorted ascending by `timestamp`.
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Friend IDs this show is shared with, in the order they were added.
    #[serde(default)]
    pub friends: Vec<String>,
    pub added_date: i64,
    pub last_modified: i64,
}

impl ShowRecord {
    /// Create an empty record for `title`.
    pub fn new(title: &str) -> Result<Self> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::validation("Show title cannot be empty"));
        }

        let now = now_millis();
        Ok(Self {
            id: ShowId::new(),
            title: title.to_string(),
            rating: 0,
            review: String::new(),
            annotations: Vec::new(),
            friends: Vec::new(),
            added_date: now,
            last_modified: now,
        })
    }

    /// Case-insensitive title comparison.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title.to_lowercase() == title.trim().to_lowercase()
    }

    /// Bump `last_modified`, never moving it backwards or below `added_date`.
    pub fn touch(&mut self) {
        self.last_modified = now_millis()
            .max(self.last_modified)
            .max(self.added_date);
    }

    /// Stable sort, so notes at the same second keep their relative order.
    pub fn sort_annotations(&mut self) {
        self.annotations.sort_by_key(|a| a.timestamp);
    }

    pub fn has_annotation(&self, id: &AnnotationId) -> bool {
        self.annotations.iter().any(|a| &a.id == id)
    }

    pub fn has_friend(&self, friend_id: &str) -> bool {
        self.friends.iter().any(|f| f == friend_id)
    }

    /// Check a record that arrived from outside (journal imports).
    pub fn validate(&self) -> Result<()> {
        if self.id.as_str().trim().is_empty() {
            return Err(StoreError::validation("Show id cannot be empty"));
        }
        if self.title.trim().is_empty() {
            return Err(StoreError::validation(format!(
                "Show {} has an empty title",
                self.id
            )));
        }
        if self.rating > MAX_RATING {
            return Err(StoreError::validation(format!(
                "Show {} has rating {} above {MAX_RATING}",
                self.id, self.rating
            )));
        }
        if self.last_modified < self.added_date {
            return Err(StoreError::validation(format!(
                "Show {} was modified before it was added",
                self.id
            )));
        }

        let mut seen = std::collections::HashSet::new();
        for annotation in &self.annotations {
            annotation.validate()?;
            if !seen.insert(&annotation.id) {
                return Err(StoreError::validation(format!(
                    "Show {} has duplicate annotation id {}",
                    self.id, annotation.id
                )));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ratings
// ---------------------------------------------------------------------------

/// Clamp an arbitrary integer into the valid rating range.
pub fn clamp_rating(rating: i64) -> u8 {
    rating.clamp(0, MAX_RATING as i64) as u8
}

/// Parse user-entered rating text. Reads the leading integer the way a form
/// field would ("4 stars" is 4); anything unparseable is 0.
pub fn parse_rating(input: &str) -> u8 {
    let input = input.trim();
    let (sign, digits) = match input.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, input.strip_prefix('+').unwrap_or(input)),
    };
    let leading: String = digits.chars().take_while(|c| c.is_ascii_digit()).collect();

    match leading.parse::<i64>() {
        Ok(n) => clamp_rating(sign * n),
        // Overflowing digit runs are still "a big number".
        Err(_) if !leading.is_empty() && sign > 0 => MAX_RATING,
        Err(_) => 0,
    }
}
