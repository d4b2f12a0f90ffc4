//! Configuration system for Tessera.
//!
//! Provides TOML-based configuration with:
//! - `[server]` listener settings
//! - `[session]` provider, cookie and lifetime settings
//! - Config file layering (user config directory + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigLayer, ConfigPaths, LayerStatus, LoadedConfig, config_dir, load_config,
    read_config_file, user_config_file,
};
pub use error::{ConfigError, Result};
pub use types::*;
