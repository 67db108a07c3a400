//! Configuration module
//!
//! All tunables come from the environment; nothing security-sensitive is
//! hardcoded. `JWT_SECRET` in particular has no default and startup fails
//! without it.

use std::env;

const DEFAULT_SERVER_PORT: u16 = 5000;
const DEFAULT_MAX_VIDEO_SIZE_BYTES: u64 = 50 * 1024 * 1024;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 1;
const DEFAULT_PROCESSING_TICK_MS: u64 = 2000;
const DEFAULT_PROCESSING_STEP_PERCENT: u8 = 20;
const DEFAULT_PROCESSING_SAFE_PROBABILITY: f64 = 0.7;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    /// Root directory for the local blob store.
    pub storage_path: String,
    /// HS256 signing secret for bearer tokens. Required.
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Upload ceiling for a single video, in bytes.
    pub max_video_size_bytes: u64,
    /// Allowed origins for browser clients (CORS); empty means any.
    pub cors_origins: Vec<String>,
    /// Interval between simulated processing ticks.
    pub processing_tick_ms: u64,
    /// Progress added per tick, in percentage points.
    pub processing_step_percent: u8,
    /// Probability that the placeholder classifier marks a video safe.
    pub processing_safe_probability: f64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;
        if jwt_secret.len() < 16 {
            anyhow::bail!("JWT_SECRET must be at least 16 characters");
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Config {
            server_port: env_or("SERVER_PORT", DEFAULT_SERVER_PORT),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://clipcast.db?mode=rwc".to_string()),
            storage_path: env::var("STORAGE_PATH").unwrap_or_else(|_| "uploads".to_string()),
            jwt_secret,
            jwt_expiry_hours: env_or("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS),
            max_video_size_bytes: env_or("MAX_VIDEO_SIZE_BYTES", DEFAULT_MAX_VIDEO_SIZE_BYTES),
            cors_origins,
            processing_tick_ms: env_or("PROCESSING_TICK_MS", DEFAULT_PROCESSING_TICK_MS),
            processing_step_percent: env_or(
                "PROCESSING_STEP_PERCENT",
                DEFAULT_PROCESSING_STEP_PERCENT,
            ),
            processing_safe_probability: env_or(
                "PROCESSING_SAFE_PROBABILITY",
                DEFAULT_PROCESSING_SAFE_PROBABILITY,
            ),
        })
    }
}
