//! Text oracle adapters
//!
//! - [`HttpOracle`]: OpenAI-compatible chat completions over HTTP
//! - [`CommandOracle`]: any local command that reads a prompt on stdin

mod command;
mod http;

pub use command::CommandOracle;
pub use http::HttpOracle;

use crate::config::{FileOracleConfig, OracleProvider};
use std::sync::Arc;
use tracing::info;
use tutor_application::{OracleError, TextOracle};

/// Build the configured oracle adapter
pub fn build_oracle(config: &FileOracleConfig) -> Result<Arc<dyn TextOracle>, OracleError> {
    match config.provider {
        OracleProvider::Http => {
            let oracle = HttpOracle::from_config(config);
            info!("Using HTTP oracle {}", oracle.name());
            Ok(Arc::new(oracle))
        }
        OracleProvider::Command => {
            let command = config
                .command
                .as_deref()
                .ok_or_else(|| OracleError::Unavailable("oracle.command is not set".to_string()))?;
            let oracle = CommandOracle::new(command, config.args.clone())
                .with_timeout_seconds(config.timeout_seconds);
            if !oracle.is_available() {
                return Err(OracleError::Unavailable(format!(
                    "command '{}' not found on PATH",
                    command
                )));
            }
            info!("Using command oracle {}", oracle.name());
            Ok(Arc::new(oracle))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_http_oracle_by_default() {
        let oracle = build_oracle(&FileOracleConfig::default()).unwrap();
        assert_eq!(oracle.name(), "gpt-4o-mini");
    }

    #[test]
    fn test_build_command_oracle_requires_installed_command() {
        let config = FileOracleConfig {
            provider: OracleProvider::Command,
            command: Some("definitely-not-a-real-cmd-xyz".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            build_oracle(&config),
            Err(OracleError::Unavailable(_))
        ));
    }
}
