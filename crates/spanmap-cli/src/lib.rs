//! spanmap-cli library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! ```text
//! spanmap (main.rs)         clap arguments, logging, stdout
//!   application/commands    url | layout | export | plan
//!   infrastructure/
//!     snapshot              JSON/TOML snapshot file → provider traits
//!     config_file           TOML settings → EngineConfig
//! ```

pub mod application;
pub mod infrastructure;
