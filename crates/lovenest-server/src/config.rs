use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;

/// Runtime configuration, read from `LOVENEST_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub messages_path: PathBuf,
    pub static_dir: PathBuf,
    pub index_path: PathBuf,
    pub start_date: NaiveDate,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str, default: &str| get(key).unwrap_or_else(|| default.into());

        let port = var("LOVENEST_PORT", "5000");
        let port: u16 = port
            .parse()
            .with_context(|| format!("LOVENEST_PORT is not a valid port: {port:?}"))?;

        let start_date = var("LOVENEST_START_DATE", "2024-01-01");
        let start_date = NaiveDate::parse_from_str(&start_date, "%Y-%m-%d").with_context(|| {
            format!("LOVENEST_START_DATE must be YYYY-MM-DD, got {start_date:?}")
        })?;

        Ok(Self {
            host: var("LOVENEST_HOST", "0.0.0.0"),
            port,
            upload_dir: var("LOVENEST_UPLOAD_DIR", "static/uploads").into(),
            messages_path: var("LOVENEST_MESSAGES_PATH", "messages.json").into(),
            static_dir: var("LOVENEST_STATIC_DIR", "static").into(),
            index_path: var("LOVENEST_INDEX_PATH", "templates/index.html").into(),
            start_date,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .with_context(|| format!("invalid listen address {addr:?}"))
    }
}
