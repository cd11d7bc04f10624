//! Command-line interface parsing for citywx
//!
//! This module handles parsing of CLI arguments using clap, including the
//! initial batch size, the weather API key, and the optional log file.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Number of cities requested at startup before any scrolling
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The batch size cannot be zero
    #[error("Invalid batch size: must be at least 1")]
    InvalidBatchSize,
}

/// citywx - Browse the world's populated cities and their weather forecasts
#[derive(Parser, Debug)]
#[command(name = "citywx")]
#[command(about = "City directory browser with weather forecasts")]
#[command(version)]
pub struct Cli {
    /// Number of cities to load initially (grows while scrolling)
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// OpenWeatherMap API key
    ///
    /// Falls back to the CITYWX_API_KEY environment variable, then to a key
    /// baked in at build time. Without a key the city list still works, but
    /// forecast requests will fail and be logged.
    #[arg(long, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Write logs to this file (the terminal itself stays clean)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Initial city batch size
    pub batch_size: usize,
    /// Resolved weather API key, if any source provided one
    pub api_key: Option<String>,
    /// Log file path, if logging was requested
    pub log_file: Option<PathBuf>,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            api_key: None,
            log_file: None,
        }
    }
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Arguments
    /// * `cli` - The parsed CLI struct
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if the batch size is zero
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let batch_size = cli.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(CliError::InvalidBatchSize);
        }

        Ok(Self {
            batch_size,
            api_key: resolve_api_key(cli.api_key.as_deref()),
            log_file: cli.log_file.clone(),
        })
    }
}

/// Resolves the weather API key from its possible sources.
///
/// Precedence: the `--api-key` flag, then the `CITYWX_API_KEY` environment
/// variable, then a key baked in at build time.
pub fn resolve_api_key(flag: Option<&str>) -> Option<String> {
    pick_api_key(
        flag,
        std::env::var("CITYWX_API_KEY").ok(),
        option_env!("CITYWX_API_KEY"),
    )
}

/// Picks the first non-empty key from the resolved sources
fn pick_api_key(flag: Option<&str>, env: Option<String>, baked: Option<&str>) -> Option<String> {
    if let Some(key) = flag.filter(|k| !k.is_empty()) {
        return Some(key.to_string());
    }
    if let Some(key) = env.filter(|k| !k.is_empty()) {
        return Some(key);
    }
    baked.map(str::to_string).filter(|k| !k.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_config_default() {
        let config = StartupConfig::default();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.api_key.is_none());
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["citywx"]);
        assert!(cli.batch_size.is_none());
        assert!(cli.api_key.is_none());
        assert!(cli.log_file.is_none());
    }

    #[test]
    fn test_cli_parse_batch_size() {
        let cli = Cli::parse_from(["citywx", "--batch-size", "40"]);
        assert_eq!(cli.batch_size, Some(40));
    }

    #[test]
    fn test_cli_parse_api_key() {
        let cli = Cli::parse_from(["citywx", "--api-key", "abc123"]);
        assert_eq!(cli.api_key.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cli_parse_log_file() {
        let cli = Cli::parse_from(["citywx", "--log-file", "/tmp/citywx.log"]);
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/citywx.log")));
    }

    #[test]
    fn test_startup_config_from_cli_defaults() {
        let cli = Cli::parse_from(["citywx"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.batch_size, DEFAULT_BATCH_SIZE);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_startup_config_from_cli_custom_batch_size() {
        let cli = Cli::parse_from(["citywx", "--batch-size", "30"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.batch_size, 30);
    }

    #[test]
    fn test_startup_config_from_cli_zero_batch_size() {
        let cli = Cli::parse_from(["citywx", "--batch-size", "0"]);
        let result = StartupConfig::from_cli(&cli);
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(err.to_string().contains("batch size"));
    }

    #[test]
    fn test_startup_config_from_cli_flag_key_wins() {
        let cli = Cli::parse_from(["citywx", "--api-key", "from-flag"]);
        let config = StartupConfig::from_cli(&cli).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("from-flag"));
    }

    #[test]
    fn test_pick_api_key_precedence() {
        assert_eq!(
            pick_api_key(Some("flag"), Some("env".to_string()), Some("baked")),
            Some("flag".to_string())
        );
        assert_eq!(
            pick_api_key(None, Some("env".to_string()), Some("baked")),
            Some("env".to_string())
        );
        assert_eq!(
            pick_api_key(None, None, Some("baked")),
            Some("baked".to_string())
        );
        assert_eq!(pick_api_key(None, None, None), None);
    }

    #[test]
    fn test_pick_api_key_skips_empty_sources() {
        assert_eq!(
            pick_api_key(Some(""), Some("env".to_string()), None),
            Some("env".to_string())
        );
        assert_eq!(pick_api_key(Some(""), Some(String::new()), Some("")), None);
    }
}
