use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use chrono_tz::Tz;
use marginwatch_core::utils::time_utils::{parse_market_tz, DEFAULT_MARKET_TZ};

/// Which advisor answers `/advice`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorMode {
    /// Always the fallback text
    Disabled,
    /// Offline digest built from the current analysis
    Digest,
}

impl FromStr for AdvisorMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" => Ok(AdvisorMode::Disabled),
            "digest" => Ok(AdvisorMode::Digest),
            other => Err(anyhow::anyhow!("Unknown advisor '{}'", other)),
        }
    }
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub market_tz: Tz,
    pub snapshot_check_interval: Duration,
    pub sync_dir: Option<PathBuf>,
    pub quotes_file: Option<PathBuf>,
    pub advisor: AdvisorMode,
}

fn optional_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("MW_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid MW_LISTEN_ADDR")?;
        let db_path = std::env::var("MW_DB_PATH").unwrap_or_else(|_| "./db/app.db".into());
        let cors_allow = std::env::var("MW_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("MW_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let market_tz = std::env::var("MW_MARKET_TZ")
            .map(|name| parse_market_tz(&name))
            .unwrap_or(DEFAULT_MARKET_TZ);
        let check_secs: u64 = std::env::var("MW_SNAPSHOT_CHECK_SECS")
            .unwrap_or_else(|_| "900".into())
            .parse()
            .unwrap_or(900);
        let advisor = std::env::var("MW_ADVISOR")
            .unwrap_or_else(|_| "digest".into())
            .parse()
            .context("Invalid MW_ADVISOR")?;

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            market_tz,
            snapshot_check_interval: Duration::from_secs(check_secs.max(1)),
            sync_dir: optional_path("MW_SYNC_DIR"),
            quotes_file: optional_path("MW_QUOTES_FILE"),
            advisor,
        })
    }

    /// Defaults with the database placed at `db_path`; used by tests and tools.
    pub fn with_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            market_tz: DEFAULT_MARKET_TZ,
            snapshot_check_interval: Duration::from_secs(900),
            sync_dir: None,
            quotes_file: None,
            advisor: AdvisorMode::Digest,
        }
    }
}
