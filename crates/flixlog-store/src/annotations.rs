//! Timestamped annotations nested in each show record.

use flixlog_shared::{AnnotationId, ShowId};

use crate::error::{Result, StoreError};
use crate::journal::{Journal, Mutation};
use crate::models::{Annotation, ShowRecord};

impl Journal {
    /// Attach a note at `timestamp_seconds` to a show.
    ///
    /// The input is validated before any storage access. The list is
    /// re-sorted by timestamp afterwards; notes at the same second keep their
    /// insertion order.
    pub async fn add_annotation(
        &self,
        show_id: &ShowId,
        timestamp_seconds: f64,
        text: &str,
    ) -> Result<ShowRecord> {
        // Validate with a placeholder author so bad input never costs a read.
        let mut annotation = Annotation::new(timestamp_seconds, text, String::new())?;
        annotation.device_id = self.acting_device().await;

        self.update_show(show_id, move |show| {
            tracing::debug!(
                show = %show.id,
                annotation = %annotation.id,
                timestamp = annotation.timestamp,
                "adding annotation"
            );
            show.annotations.push(annotation);
            show.sort_annotations();
            show.touch();
            Ok(Mutation::Changed(show.clone()))
        })
        .await
    }

    pub async fn remove_annotation(
        &self,
        show_id: &ShowId,
        annotation_id: &AnnotationId,
    ) -> Result<ShowRecord> {
        self.update_show(show_id, |show| {
            let idx = show
                .annotations
                .iter()
                .position(|a| &a.id == annotation_id)
                .ok_or_else(|| StoreError::annotation_not_found(annotation_id))?;

            show.annotations.remove(idx);
            show.touch();
            Ok(Mutation::Changed(show.clone()))
        })
        .await
    }
}
