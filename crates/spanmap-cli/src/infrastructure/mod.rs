//! File-backed adapters: snapshot loading and TOML configuration.

pub mod config_file;
pub mod snapshot;

pub use config_file::{load_config, AppConfig, ConfigError};
pub use snapshot::{load_snapshot, Snapshot, SnapshotError, SnapshotFile};
