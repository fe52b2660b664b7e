/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Public base URL used to build confirm links (default:
    /// `http://localhost:3000`).
    pub app_url: String,
    /// Pause between recipients during a bulk notification send, in
    /// milliseconds (default: `200`).
    pub send_interval_ms: u64,
    /// Pending manuscripts older than this are auto-approved (default: `48`).
    pub auto_approve_hours: i64,
    /// Pending manuscripts older than this get one reminder (default: `24`).
    pub remind_hours: i64,
    /// How often the auto-approve/reminder sweep runs, in seconds
    /// (default: `3600`).
    pub sweep_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `0.0.0.0`               |
    /// | `PORT`                    | `3000`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    /// | `APP_URL`                 | `http://localhost:3000` |
    /// | `ALIMTALK_SEND_INTERVAL_MS` | `200`                 |
    /// | `AUTO_APPROVE_HOURS`      | `48`                    |
    /// | `REMIND_HOURS`            | `24`                    |
    /// | `SWEEP_INTERVAL_SECS`     | `3600`                  |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let app_url = std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:3000".into());

        let send_interval_ms: u64 = std::env::var("ALIMTALK_SEND_INTERVAL_MS")
            .unwrap_or_else(|_| "200".into())
            .parse()
            .expect("ALIMTALK_SEND_INTERVAL_MS must be a valid u64");

        let auto_approve_hours: i64 = std::env::var("AUTO_APPROVE_HOURS")
            .unwrap_or_else(|_| "48".into())
            .parse()
            .expect("AUTO_APPROVE_HOURS must be a valid i64");

        let remind_hours: i64 = std::env::var("REMIND_HOURS")
            .unwrap_or_else(|_| "24".into())
            .parse()
            .expect("REMIND_HOURS must be a valid i64");

        let sweep_interval_secs: u64 = std::env::var("SWEEP_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .expect("SWEEP_INTERVAL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            app_url,
            send_interval_ms,
            auto_approve_hours,
            remind_hours,
            sweep_interval_secs,
        }
    }

    /// The confirm link distributed to advertisers for a token.
    pub fn confirm_url(&self, token: &str) -> String {
        format!("{}/confirm/{token}", self.app_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ServerConfig {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cors_origins: vec![],
            request_timeout_secs: 30,
            app_url: "https://blog.example.com/".to_string(),
            send_interval_ms: 0,
            auto_approve_hours: 48,
            remind_hours: 24,
            sweep_interval_secs: 3600,
        }
    }

    #[test]
    fn test_confirm_url_strips_trailing_slash() {
        assert_eq!(
            config().confirm_url("tok-1"),
            "https://blog.example.com/confirm/tok-1"
        );
    }
}
