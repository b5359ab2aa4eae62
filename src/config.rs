//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::path::PathBuf;

/// Default entry lifetime: 7 days.
pub const DEFAULT_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default number of lines kept on each side of a search match.
pub const DEFAULT_CONTEXT_LINES: usize = 3;

/// Directory name of the cache root under the home directory.
const ROOT_DIR_NAME: &str = ".doccache";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding every cache entry
    pub cache_root: PathBuf,
    /// TTL in seconds applied to every entry at write time
    pub ttl: u64,
    /// Lines of context around each search match
    pub context_lines: usize,
    /// HTTP server port for `serve`
    pub server_port: u16,
    /// Background sweep interval in seconds for `serve`
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DOCCACHE_ROOT` - Cache root directory (default: `~/.doccache`)
    /// - `DOCCACHE_TTL` - Entry TTL in seconds (default: 604800)
    /// - `DOCCACHE_CONTEXT_LINES` - Search context lines (default: 3)
    /// - `DOCCACHE_PORT` - HTTP server port (default: 3000)
    /// - `DOCCACHE_SWEEP_INTERVAL` - Reaper frequency in seconds (default: 3600)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_root: env::var_os("DOCCACHE_ROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_root),
            ttl: env::var("DOCCACHE_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.ttl),
            context_lines: env::var("DOCCACHE_CONTEXT_LINES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.context_lines),
            server_port: env::var("DOCCACHE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            sweep_interval: env::var("DOCCACHE_SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval),
        }
    }
}

/// Returns `~/.doccache`, falling back to a relative path when no home
/// directory is known.
pub fn default_cache_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(ROOT_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(ROOT_DIR_NAME))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_root: default_cache_root(),
            ttl: DEFAULT_TTL_SECS,
            context_lines: DEFAULT_CONTEXT_LINES,
            server_port: 3000,
            sweep_interval: 3600,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ttl, 604_800);
        assert_eq!(config.context_lines, 3);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 3600);
        assert!(config.cache_root.ends_with(".doccache"));
    }

    #[test]
    fn test_config_from_env() {
        // Single test touches the env so parallel tests don't race on it
        env::set_var("DOCCACHE_ROOT", "/tmp/doccache-config-test");
        env::set_var("DOCCACHE_TTL", "60");
        env::set_var("DOCCACHE_CONTEXT_LINES", "not-a-number");
        env::remove_var("DOCCACHE_PORT");
        env::remove_var("DOCCACHE_SWEEP_INTERVAL");

        let config = Config::from_env();
        assert_eq!(config.cache_root, PathBuf::from("/tmp/doccache-config-test"));
        assert_eq!(config.ttl, 60);
        assert_eq!(config.context_lines, DEFAULT_CONTEXT_LINES);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.sweep_interval, 3600);

        env::remove_var("DOCCACHE_ROOT");
        env::remove_var("DOCCACHE_TTL");
        env::remove_var("DOCCACHE_CONTEXT_LINES");
    }
}
