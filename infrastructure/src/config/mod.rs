//! Configuration file loading for code-tutor
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TUTOR_*` environment variables (`TUTOR_ORACLE__MODEL=...`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./tutor.toml` or `./.tutor.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/code-tutor/config.toml`
//! 5. Fallback: `~/.config/code-tutor/config.toml`
//! 6. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAgentsConfig, FileConfig, FileOracleConfig, FileOutputConfig,
    FileReplConfig, FileSessionConfig, FileToolCommandConfig, OracleProvider,
};
pub use loader::ConfigLoader;
