//! Configuration module
//!
//! Settings for the asset desk: where the asset API lives, how files are admitted
//! and read, and how long notices stay on screen. Values come from the environment
//! (with `.env` support) and fall back to the defaults below.

use std::env;
use std::time::Duration;

use crate::error::AppError;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const MAX_FILE_SIZE_MB: u64 = 10;
const READ_TIMEOUT_SECS: u64 = 30;
const FALLBACK_CHUNK_SIZE: usize = 0x8000;
const DOWNLOAD_DELAY_MS: u64 = 100;
const NOTICE_DISMISS_SECS: u64 = 5;
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Runtime configuration for the ingestion pipeline and API client.
#[derive(Clone, Debug)]
pub struct DeskConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Path prefix in front of `/assets` (e.g. "/api").
    pub api_prefix: String,
    pub max_file_size_bytes: u64,
    /// Advisory limit on the primary read. `None` disables it.
    pub read_timeout: Option<Duration>,
    pub fallback_chunk_size: usize,
    pub download_delay: Duration,
    pub notice_dismiss_after: Duration,
    pub http_timeout: Duration,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            api_prefix: String::new(),
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            read_timeout: Some(Duration::from_secs(READ_TIMEOUT_SECS)),
            fallback_chunk_size: FALLBACK_CHUNK_SIZE,
            download_delay: Duration::from_millis(DOWNLOAD_DELAY_MS),
            notice_dismiss_after: Duration::from_secs(NOTICE_DISMISS_SECS),
            http_timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
        }
    }
}

fn megabytes_to_bytes(mb: u64) -> Result<u64, AppError> {
    mb.checked_mul(1024 * 1024).ok_or_else(|| {
        AppError::Config(format!("MAX_FILE_SIZE_MB is too large: {}", mb))
    })
}

impl DeskConfig {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_url = env::var("ASSETDESK_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let api_token = env::var("ASSETDESK_API_TOKEN")
            .or_else(|_| env::var("API_TOKEN"))
            .ok()
            .filter(|s| !s.trim().is_empty());

        let api_prefix = env::var("ASSETDESK_API_PREFIX")
            .unwrap_or_default()
            .trim_end_matches('/')
            .to_string();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<u64>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let read_timeout_secs = env::var("READ_TIMEOUT_SECS")
            .unwrap_or_else(|_| READ_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(READ_TIMEOUT_SECS);

        let config = DeskConfig {
            api_url,
            api_token,
            api_prefix,
            max_file_size_bytes: megabytes_to_bytes(max_file_size_mb)?,
            read_timeout: (read_timeout_secs > 0).then(|| Duration::from_secs(read_timeout_secs)),
            fallback_chunk_size: env::var("FALLBACK_CHUNK_SIZE")
                .unwrap_or_else(|_| FALLBACK_CHUNK_SIZE.to_string())
                .parse()
                .unwrap_or(FALLBACK_CHUNK_SIZE),
            download_delay: Duration::from_millis(
                env::var("DOWNLOAD_DELAY_MS")
                    .unwrap_or_else(|_| DOWNLOAD_DELAY_MS.to_string())
                    .parse()
                    .unwrap_or(DOWNLOAD_DELAY_MS),
            ),
            notice_dismiss_after: Duration::from_secs(
                env::var("NOTICE_DISMISS_SECS")
                    .unwrap_or_else(|_| NOTICE_DISMISS_SECS.to_string())
                    .parse()
                    .unwrap_or(NOTICE_DISMISS_SECS),
            ),
            http_timeout: Duration::from_secs(
                env::var("HTTP_TIMEOUT_SECS")
                    .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                    .parse()
                    .unwrap_or(HTTP_TIMEOUT_SECS),
            ),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.max_file_size_bytes == 0 {
            return Err(AppError::Config(
                "MAX_FILE_SIZE_MB must be greater than zero".to_string(),
            ));
        }

        if self.fallback_chunk_size < 3 {
            return Err(AppError::Config(
                "FALLBACK_CHUNK_SIZE must be at least 3 bytes".to_string(),
            ));
        }

        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "ASSETDESK_API_URL must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }

        Ok(())
    }
}
