// src/config.rs

use anyhow::{Context, Result};
use std::{env, time::Duration};

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_email: String,
    /// PEM private key with real newlines (the env var carries them as `\n`).
    pub private_key: String,
    pub spreadsheet_id: String,
    /// Tab name, used both as the fetch range and as the prefix of cell updates.
    pub sheet_name: String,
    pub webhook_url: String,
    pub port: u16,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("environment variable {} must be set", key))
        };

        let port = match lookup("PORT") {
            Some(p) => p
                .parse()
                .with_context(|| format!("PORT is not a valid port: {:?}", p))?,
            None => 5000,
        };
        let rate_limit_max = match lookup("RATE_LIMIT_MAX") {
            Some(v) => v
                .parse()
                .with_context(|| format!("RATE_LIMIT_MAX is not a number: {:?}", v))?,
            None => 100,
        };
        let window_secs: u64 = match lookup("RATE_LIMIT_WINDOW_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("RATE_LIMIT_WINDOW_SECS is not a number: {:?}", v))?,
            None => 15 * 60,
        };

        Ok(Self {
            client_email: required("GOOGLE_CLIENT_EMAIL")?,
            private_key: unescape_newlines(&required("GOOGLE_PRIVATE_KEY")?),
            spreadsheet_id: required("SPREADSHEET_ID")?,
            sheet_name: lookup("SHEET_NAME").unwrap_or_else(|| "Hoja 1".to_string()),
            webhook_url: required("WEBHOOK_URL")?,
            port,
            rate_limit_max,
            rate_limit_window: Duration::from_secs(window_secs.max(1)),
        })
    }
}

/// Keys pasted into env files usually arrive with literal `\n` sequences.
fn unescape_newlines(raw: &str) -> String {
    raw.replace("\\n", "\n")
}
