use std::path::PathBuf;

use anyhow::{Context, Result};

/// Environment variable holding the live model credential.
/// Read on every availability check, never cached in `Config`.
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Application configuration loaded from environment variables.
/// Nothing here is required: every value has a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory that receives temporary uploads.
    pub upload_dir: PathBuf,
    /// Per-file upload ceiling in bytes.
    pub max_upload_bytes: usize,
    pub openai: OpenAiSettings,
}

/// Settings for the live chat-completion provider.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    /// Name of the env var the provider reads its credential from.
    pub api_key_var: String,
}

impl Default for OpenAiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            timeout_secs: 30,
            api_key_var: OPENAI_API_KEY_VAR.to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 5000,
            rust_log: "info".to_string(),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: 10 * 1024 * 1024,
            openai: OpenAiSettings::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();

        let max_upload_mb: usize = parse_env("MAX_UPLOAD_MB", 10)?;

        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            upload_dir: std::env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.upload_dir),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            openai: OpenAiSettings {
                base_url: std::env::var("OPENAI_BASE_URL")
                    .map(|url| url.trim_end_matches('/').to_string())
                    .unwrap_or(defaults.openai.base_url),
                model: std::env::var("OPENAI_MODEL").unwrap_or(defaults.openai.model),
                timeout_secs: parse_env("OPENAI_TIMEOUT_SECS", defaults.openai.timeout_secs)?,
                api_key_var: defaults.openai.api_key_var,
            },
        })
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        Err(_) => Ok(default),
    }
}
