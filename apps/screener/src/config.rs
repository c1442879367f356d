use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every setting has a default; malformed numeric values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where uploaded resumes are written (sub-folders of folder uploads are kept).
    pub upload_dir: PathBuf,
    /// Where generated CSV reports are written and served from.
    pub report_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Directory of a fine-tuned BERT token-classification checkpoint.
    /// When unset, name extraction runs on the regex fallbacks only.
    pub ner_model_dir: Option<PathBuf>,
    pub ner_max_tokens: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let max_upload_mb: usize = parse_env("MAX_UPLOAD_MB", 50)?;
        let max_upload_bytes = megabytes_to_bytes(max_upload_mb)?;

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: env_path("UPLOAD_DIR", "uploads"),
            report_dir: env_path("REPORT_DIR", "outputs"),
            max_upload_bytes,
            ner_model_dir: std::env::var("NER_MODEL_DIR")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            ner_max_tokens: parse_env("NER_MAX_TOKENS", 512)?,
        })
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(std::env::var(key).unwrap_or_else(|_| default.to_string()))
}

fn megabytes_to_bytes(mb: usize) -> Result<usize> {
    mb.checked_mul(1024 * 1024)
        .with_context(|| format!("MAX_UPLOAD_MB={mb} does not fit in a byte count"))
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
