use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub redis: RedisConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub banners: BannerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// No URL means banners live in memory.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// No URL disables rate limiting.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct RedisConfig {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    #[serde(default = "default_rate_limit_requests")]
    pub requests: i64,
    #[serde(default = "default_rate_limit_window")]
    pub window_seconds: i64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests: default_rate_limit_requests(),
            window_seconds: default_rate_limit_window(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BannerConfig {
    /// Applied when a listing request carries no `limit`; `None` returns every eligible banner.
    pub default_limit: Option<usize>,
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
    /// JSON array of banners for the in-memory store. Falls back to the built-in samples.
    pub seed_file: Option<String>,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            default_limit: None,
            event_buffer: default_event_buffer(),
            seed_file: None,
        }
    }
}

fn default_max_connections() -> u32 { 5 }
fn default_rate_limit_requests() -> i64 { 100 }
fn default_rate_limit_window() -> i64 { 60 }
fn default_event_buffer() -> usize { 100 }

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Per-environment overrides are optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `AFRIKVENT__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("AFRIKVENT").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_sections_default() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str("[server]\nport = 3000\n", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.database.url.is_none());
        assert!(cfg.redis.url.is_none());
        assert_eq!(cfg.rate_limit.requests, 100);
        assert_eq!(cfg.banners.event_buffer, 100);
        assert!(cfg.banners.default_limit.is_none());
    }
}
