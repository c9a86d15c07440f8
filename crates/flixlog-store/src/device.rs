//! Local device identity used to attribute annotations.

use flixlog_shared::constants::{DEVICE_ID_KEY, UNKNOWN_DEVICE};
use flixlog_shared::DeviceIdentity;

use crate::error::{best_effort, Result};
use crate::journal::{Journal, Mutation};

impl Journal {
    /// Return this device's identity, generating and persisting one on first
    /// use.
    pub async fn device_id(&self) -> Result<DeviceIdentity> {
        self.update_value(DEVICE_ID_KEY, |stored: &mut Option<String>| {
            if let Some(existing) = stored.as_deref().and_then(DeviceIdentity::from_stored) {
                return Ok(Mutation::Unchanged(existing));
            }

            let generated = DeviceIdentity::generate();
            tracing::info!(device_id = %generated, "generated device identity");
            *stored = Some(generated.as_str().to_string());
            Ok(Mutation::Changed(generated))
        })
        .await
    }

    /// Author string for new annotations. Best-effort: falls back to
    /// `"unknown"` when the identity cannot be read or stored.
    pub(crate) async fn acting_device(&self) -> String {
        best_effort("resolve device id", self.device_id().await)
            .map(DeviceIdentity::into_string)
            .unwrap_or_else(|| UNKNOWN_DEVICE.to_string())
    }
}
