use std::{net::SocketAddr, time::Duration};

use serde::Deserialize;
use tokio::sync::oneshot;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub listen_address: String,
    #[serde(skip)]
    pub port_tx: Option<oneshot::Sender<u16>>,
    pub db_connection_string: String,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Absent disables the background policy reloader.
    #[serde(default, with = "humantime_serde")]
    pub policy_reload_interval: Option<Duration>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub ttl: Duration,
    #[serde(default = "default_cache_max_size")]
    pub max_size: usize,
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> Duration {
    Duration::from_secs(30)
}

fn default_cache_max_size() -> usize {
    1024
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl: default_cache_ttl(),
            max_size: default_cache_max_size(),
        }
    }
}

impl Config {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listen_address
            .parse()
            .map_err(|_| anyhow::Error::msg(format!("Invalid listen address `{}`", self.listen_address)))
    }

    /// Path of the SQLite database, with an optional `sqlite://` prefix
    /// stripped.
    #[must_use]
    pub fn db_path(&self) -> &str {
        self.db_connection_string
            .strip_prefix("sqlite://")
            .unwrap_or(&self.db_connection_string)
    }

    #[must_use]
    pub fn using_inmemory_storage(&self) -> bool {
        self.db_connection_string.contains(":memory:")
    }

    pub fn sanitize(&self) -> anyhow::Result<()> {
        self.socket_addr()?;

        if self.db_connection_string.is_empty() {
            return Err(anyhow::Error::msg("A database connection string is required"));
        }

        if self.cache.enabled && self.cache.max_size == 0 {
            return Err(anyhow::Error::msg(
                "The role cache size must be greater than zero when the cache is enabled",
            ));
        }

        Ok(())
    }
}
