//! Runtime configuration.
//!
//! Configuration is resolved once at startup from command-line flags,
//! environment variables and an optional `.env` file, then passed explicitly
//! to the components that need it.

use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Spoolman API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:7912/api/v1";

/// Configuration flags shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct ConfigArgs {
    /// Spoolman API base URL
    #[arg(long, value_name = "URL", env = "SPOOLMAN_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// HTTP timeout for catalog requests, in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 10)]
    pub timeout: u64,

    /// Directory to write snapshot files into
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Spoolman API base URL, without a trailing slash.
    pub api_url: String,
    /// Timeout for a whole catalog request.
    pub timeout: Duration,
    /// Where snapshots are written.
    pub output_dir: PathBuf,
}

impl Config {
    /// Create a configuration for `api_url` with default settings.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: normalize_url(api_url.into()),
            timeout: Duration::from_secs(10),
            output_dir: PathBuf::from("."),
        }
    }

    /// URL of the spool listing endpoint.
    pub fn spool_endpoint(&self) -> String {
        format!("{}/spool", self.api_url)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl From<ConfigArgs> for Config {
    fn from(args: ConfigArgs) -> Self {
        Self {
            api_url: normalize_url(args.api_url),
            timeout: Duration::from_secs(args.timeout),
            output_dir: args.output_dir,
        }
    }
}

fn normalize_url(url: String) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.len() == url.len() {
        url
    } else {
        trimmed.to_string()
    }
}
