//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use approval_infra::DatabaseConfig;
#[cfg(feature = "redis")]
use approval_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Origin used to build shareable links. Derived from each request when
    /// unset.
    pub public_origin: Option<String>,
    /// Largest accepted JSON body; submissions embed the whole image.
    pub json_limit_bytes: usize,
    pub pubsub_buffer_size: usize,
    pub database: Option<DatabaseConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_var("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parse_var("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080),
            public_origin: env::var("PUBLIC_ORIGIN")
                .ok()
                .map(|origin| origin.trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty()),
            json_limit_bytes: parse_var("JSON_LIMIT_BYTES", 10 * 1024 * 1024),
            pubsub_buffer_size: parse_var("PUBSUB_BUFFER_SIZE", 100),
            database,
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
