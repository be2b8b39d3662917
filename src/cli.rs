// CLI module for argument parsing and configuration

use crate::source::{DEFAULT_BASE_URL, DEFAULT_BATCH_SIZE};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use std::time::Duration;

const MAX_BATCH_SIZE: usize = 100;
const DEFAULT_TIMEOUT_SECS: u64 = 15;
/// Gesture offset units per terminal column
pub const DEFAULT_SENSITIVITY: f64 = 8.0;

/// Catswp - swipe through cat pictures in your terminal
///
/// Drag a card right to like it, left to pass, or use the arrow keys.
#[derive(Parser, Debug, Clone)]
#[command(name = "catswp")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of cats to fetch per deck
    #[arg(short = 'c', long = "count", default_value_t = DEFAULT_BATCH_SIZE)]
    pub count: usize,

    /// Base URL of the cat API
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Gesture units per terminal column dragged
    ///
    /// A card commits once dragged past 100 units, so at the default of 8
    /// a drag of 13 columns decides.
    #[arg(long = "sensitivity", default_value_t = DEFAULT_SENSITIVITY)]
    pub sensitivity: f64,

    /// Write logs to this file instead of the cache directory
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Show the welcome screen even if it was already seen
    #[arg(long = "welcome", action = ArgAction::SetTrue)]
    pub show_welcome: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the arguments and return any errors
    pub fn validate(&self) -> Result<(), String> {
        if self.count == 0 || self.count > MAX_BATCH_SIZE {
            return Err(format!(
                "Invalid count: {}. Must be between 1 and {}",
                self.count, MAX_BATCH_SIZE
            ));
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(format!(
                "Invalid base URL: '{}'. Must start with http:// or https://",
                self.base_url
            ));
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be at least 1 second".to_string());
        }

        if !self.sensitivity.is_finite() || self.sensitivity <= 0.0 {
            return Err(format!(
                "Invalid sensitivity: {}. Must be a positive number",
                self.sensitivity
            ));
        }

        Ok(())
    }
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub batch_size: usize,
    pub base_url: String,
    pub timeout: Duration,
    pub sensitivity: f64,
    pub log_file: Option<PathBuf>,
    pub show_welcome: bool,
}

impl From<Args> for AppConfig {
    fn from(args: Args) -> Self {
        AppConfig {
            batch_size: args.count,
            base_url: args.base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(args.timeout_secs),
            sensitivity: args.sensitivity,
            log_file: args.log_file,
            show_welcome: args.show_welcome,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            batch_size: DEFAULT_BATCH_SIZE,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            sensitivity: DEFAULT_SENSITIVITY,
            log_file: None,
            show_welcome: false,
        }
    }
}
