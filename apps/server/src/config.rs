use std::{net::SocketAddr, path::PathBuf, time::Duration};

use finboard_market_data::GatewayConfig;

/// Time the HTTP layer allows beyond the upstream timeout.
const UPSTREAM_GRACE: Duration = Duration::from_secs(5);

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_path: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub dedupe_window: Duration,
    pub alpha_vantage_key: Option<String>,
    pub finnhub_key: Option<String>,
    pub alpha_vantage_base_url: Option<String>,
    pub finnhub_base_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("FB_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .expect("Invalid FB_LISTEN_ADDR");
        let data_path = std::env::var("FB_DATA_PATH")
            .unwrap_or_else(|_| "./data/dashboard.json".into())
            .into();
        let cors_allow = std::env::var("FB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = env_millis("FB_REQUEST_TIMEOUT_MS", 30_000);
        let dedupe_ms = env_millis("FB_DEDUPE_WINDOW_MS", 5_000);

        Self {
            listen_addr,
            data_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            dedupe_window: Duration::from_millis(dedupe_ms),
            alpha_vantage_key: env_opt("ALPHA_VANTAGE_API_KEY"),
            finnhub_key: env_opt("FINNHUB_API_KEY"),
            alpha_vantage_base_url: env_opt("FB_ALPHA_VANTAGE_BASE_URL"),
            finnhub_base_url: env_opt("FB_FINNHUB_BASE_URL"),
        }
    }

    /// Deadline for a whole HTTP request, strictly longer than the upstream one.
    pub fn server_timeout(&self) -> Duration {
        self.request_timeout + UPSTREAM_GRACE
    }

    /// Provider credentials and endpoints. Upstream calls share the request timeout.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            alpha_vantage_key: self.alpha_vantage_key.clone(),
            finnhub_key: self.finnhub_key.clone(),
            alpha_vantage_base_url: self.alpha_vantage_base_url.clone(),
            finnhub_base_url: self.finnhub_base_url.clone(),
            timeout: self.request_timeout,
        }
    }
}

fn env_opt(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_millis(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
