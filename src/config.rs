//! Configuration file support for newest
//!
//! Supports `.newestrc.toml` and `newest.toml` configuration files.
//!
//! Example configuration:
//! ```toml
//! # Prefix shared by every release identifier
//! product = "pkg"
//!
//! # Where the canonical version feed lives
//! feed_url = "https://releases.example.com/feed?mode=json"
//!
//! # Object listing of uploaded release artifacts
//! listing_url = "https://storage.example.com/storage/v1/b/releases/o"
//! listing_prefix = "pkg"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Maximum size for config files (1 MB) to prevent DoS
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

/// Environment variable overriding the feed URL
pub const FEED_URL_ENV: &str = "NEWEST_FEED_URL";

/// Environment variable overriding the listing URL
pub const LISTING_URL_ENV: &str = "NEWEST_LISTING_URL";

/// Configuration loaded from .newestrc.toml or newest.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewestConfig {
    /// Product name prefixed to every release identifier
    pub product: Option<String>,

    /// URL of the canonical version feed
    pub feed_url: Option<String>,

    /// URL of the object listing of release artifacts
    pub listing_url: Option<String>,

    /// Object-name prefix passed to the listing
    pub listing_prefix: Option<String>,
}

impl NewestConfig {
    /// Load configuration by searching for config files in the given
    /// directory and its parents
    pub fn discover(start_dir: &Path) -> Option<(Self, PathBuf)> {
        let config_names = [".newestrc.toml", "newest.toml"];

        let mut current = Some(start_dir);
        while let Some(dir) = current {
            for name in &config_names {
                let config_path = dir.join(name);
                if config_path.exists()
                    && let Some(config) = Self::load_from_path(&config_path)
                {
                    return Some((config, config_path));
                }
            }
            current = dir.parent();
        }

        None
    }

    /// Load configuration from a specific file path (silent failure for
    /// auto-discovery)
    pub fn load_from_path(path: &Path) -> Option<Self> {
        Self::load_from_path_with_error(path).ok()
    }

    /// Load configuration from a specific file path with detailed error
    /// messages, for an explicitly requested config file
    pub fn load_from_path_with_error(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Err(format!("Config file not found: {}", path.display()));
        }

        match std::fs::metadata(path) {
            Ok(metadata) => {
                if metadata.len() > MAX_CONFIG_FILE_SIZE {
                    return Err(format!(
                        "Config file too large: {} bytes (max {} MB)",
                        metadata.len(),
                        MAX_CONFIG_FILE_SIZE / 1024 / 1024
                    ));
                }
            }
            Err(e) => {
                return Err(format!(
                    "Cannot read config file metadata: {}. Check file permissions.",
                    e
                ));
            }
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        toml::from_str(&content)
            .map_err(|e| format!("Invalid TOML in config file {}:\n  {}", path.display(), e))
    }

    /// Resolve the product name: flag > config > default
    pub fn resolve_product(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.product.clone())
            .unwrap_or_else(|| "pkg".to_string())
    }

    /// Resolve the feed URL: flag > environment > config
    pub fn resolve_feed_url(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| env_url(FEED_URL_ENV))
            .or_else(|| self.feed_url.clone())
    }

    /// Resolve the listing URL: flag > environment > config
    pub fn resolve_listing_url(&self, flag: Option<&str>) -> Option<String> {
        flag.map(str::to_string)
            .or_else(|| env_url(LISTING_URL_ENV))
            .or_else(|| self.listing_url.clone())
    }
}

fn env_url(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|value| !value.is_empty())
}
