use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::DEVICE_ID_RANDOM_LEN;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Locally generated identity standing in for a user account.
/// Format: `device_<random base36>_<epoch millis>`. No account, no server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    /// Generate a new random identity stamped with the current time
    pub fn generate() -> Self {
        Self::generate_at(crate::time::now_millis())
    }

    /// Generate a new random identity stamped with `epoch_millis`
    pub fn generate_at(epoch_millis: i64) -> Self {
        let mut rng = rand::thread_rng();
        let random: String = (0..DEVICE_ID_RANDOM_LEN)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("device_{random}_{epoch_millis}"))
    }

    /// Wrap a previously persisted identity. Blank values are rejected so a
    /// corrupted entry gets regenerated instead of propagated.
    pub fn from_stored(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(Self(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
