/// Storage key holding the whole show collection
pub const SHOWS_KEY: &str = "ktp_shows_journal";

/// Storage key holding the global friend registry
pub const FRIENDS_KEY: &str = "friends";

/// Storage key holding the friend nickname map
pub const NICKNAMES_KEY: &str = "ktp_friend_nicknames";

/// Storage key holding this device's generated identity
pub const DEVICE_ID_KEY: &str = "ktp_device_id";

/// Author recorded on annotations when the device identity cannot be resolved
pub const UNKNOWN_DEVICE: &str = "unknown";

/// Highest star rating a show can carry
pub const MAX_RATING: u8 = 5;

/// Length of the random segment in a generated device ID
pub const DEVICE_ID_RANDOM_LEN: usize = 9;
