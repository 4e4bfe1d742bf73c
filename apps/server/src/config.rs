use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use anyhow::Context;
use recipesaver_core::constants::SEARCH_DEBOUNCE;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub upload_dir: PathBuf,
    pub public_base_url: String,
    /// Raw `RS_JWT_SECRET`; a random per-process key is used when unset.
    pub jwt_secret: Option<String>,
    pub token_ttl: Duration,
    pub search_debounce: Duration,
    pub max_upload_bytes: usize,
    pub session_idle: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("RS_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .context("Invalid RS_LISTEN_ADDR")?;
        let db_path = env_or("RS_DB_PATH", "./db/app.db");
        let cors_allow = env_or("RS_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = parse_or("RS_REQUEST_TIMEOUT_MS", 30_000);
        let static_dir = env_or("RS_STATIC_DIR", "dist");
        let upload_dir = PathBuf::from(env_or("RS_UPLOAD_DIR", "./uploads"));
        let public_base_url = env_or("RS_PUBLIC_BASE_URL", "http://localhost:8080")
            .trim_end_matches('/')
            .to_string();
        let jwt_secret = std::env::var("RS_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let token_ttl_secs: u64 = parse_or("RS_TOKEN_TTL_SECS", 7 * 24 * 60 * 60);
        let debounce_ms: u64 = parse_or("RS_SEARCH_DEBOUNCE_MS", SEARCH_DEBOUNCE.as_millis() as u64);
        let max_upload_bytes: usize = parse_or("RS_MAX_UPLOAD_BYTES", 10 * 1024 * 1024);
        let session_idle_secs: u64 = parse_or("RS_SESSION_IDLE_SECS", 30 * 60);
        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir,
            upload_dir,
            public_base_url,
            jwt_secret,
            token_ttl: Duration::from_secs(token_ttl_secs),
            search_debounce: Duration::from_millis(debounce_ms),
            max_upload_bytes,
            session_idle: Duration::from_secs(session_idle_secs),
        })
    }

    /// Defaults rooted in `data_dir`, for embedding and tests.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: data_dir.join("app.db").to_string_lossy().into_owned(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            static_dir: "dist".to_string(),
            upload_dir: data_dir.join("uploads"),
            public_base_url: "http://localhost:8080".to_string(),
            jwt_secret: None,
            token_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            search_debounce: SEARCH_DEBOUNCE,
            max_upload_bytes: 10 * 1024 * 1024,
            session_idle: Duration::from_secs(30 * 60),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
