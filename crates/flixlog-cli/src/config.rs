//! CLI configuration loaded from environment variables.
//!
//! Every setting has a default so `flixlog` works with zero configuration.

use std::path::PathBuf;
use std::str::FromStr;

/// Which persistence backend the journal runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// SQLite file on disk.
    Sqlite,
    /// In-process store that starts empty on every run and is dropped on
    /// exit. Dry-run mode: mutating subcommands succeed but nothing is kept.
    Memory,
}

impl BackendKind {
    /// Whether writes outlive the process.
    pub fn is_persistent(self) -> bool {
        matches!(self, Self::Sqlite)
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend '{other}'")),
        }
    }
}

/// CLI configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// SQLite database path.
    /// Env: `FLIXLOG_DB_PATH`
    /// Default: `None`, meaning the platform data directory.
    pub db_path: Option<PathBuf>,

    /// Persistence backend.
    /// Env: `FLIXLOG_BACKEND` (`sqlite` / `memory`)
    /// Default: `sqlite`
    pub backend: BackendKind,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            backend: BackendKind::Sqlite,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("FLIXLOG_DB_PATH") {
            if !path.trim().is_empty() {
                config.db_path = Some(PathBuf::from(path));
            }
        }

        if let Some(value) = lookup("FLIXLOG_BACKEND") {
            match value.parse::<BackendKind>() {
                Ok(kind) => config.backend = kind,
                Err(e) => {
                    tracing::warn!(value = %value, error = %e, "Invalid FLIXLOG_BACKEND, using default");
                }
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_db_path(mut self, path: Option<PathBuf>) -> Self {
        if path.is_some() {
            self.db_path = path;
        }
        self
    }
}
