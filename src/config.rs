//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheSettings;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lifetime in seconds of cache entries set with the default; 0 = never expire
    pub default_expiration: u64,
    /// Seconds between background cache sweeps; 0 disables the sweeper
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Optional JSON seed for the in-memory record store
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_EXPIRATION` - Default cache entry lifetime in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Cache sweep frequency in seconds (default: 90)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `SEED_FILE` - Path to a JSON seed file (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_expiration: env::var("DEFAULT_EXPIRATION")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.default_expiration),
            cleanup_interval: env::var("CLEANUP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            seed_file: env::var_os("SEED_FILE")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Cache construction parameters derived from this config.
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            default_expiration: Duration::from_secs(self.default_expiration),
            cleanup_interval: Duration::from_secs(self.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_expiration: 60,
            cleanup_interval: 90,
            server_port: 3000,
            seed_file: None,
        }
    }
}
