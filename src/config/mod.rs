use std::env;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub server_host: String,
    pub server_port: u16,
    pub api_base_uri: String,
    /// Backend base URL handed to the front-end. The backend itself is mocked.
    pub api_base_url: String,
    pub walletconnect_project_id: String,
    pub app_env: String,
    pub auth_cookie_name: String,
    pub balance_delay_ms: u64,
    /// Page sections that require a valid session, e.g. `wallet` guards `/m/wallet/...`.
    pub protected_sections: Vec<String>,
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: &str) -> String {
    lookup(name).unwrap_or_else(|| default.to_string())
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the config from any variable source, e.g. the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        if jwt_secret.is_empty() {
            return Err(ConfigError::Invalid {
                name: "JWT_SECRET",
                value: String::new(),
            });
        }

        let jwt_expiration = optional(&lookup, "JWT_EXPIRATION", "24h");
        let jwt_expiration = jwt_expiration
            .trim_end_matches('h')
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid {
                name: "JWT_EXPIRATION",
                value: jwt_expiration.clone(),
            })?;

        Ok(Config {
            jwt_secret,
            jwt_expiration_secs: jwt_expiration * 3600,
            server_host: optional(&lookup, "SERVER_HOST", "0.0.0.0"),
            server_port: parsed(&lookup, "SERVER_PORT", 3000)?,
            api_base_uri: optional(&lookup, "API_BASE_URI", "/api"),
            api_base_url: optional(&lookup, "API_BASE_URL", "http://localhost:8080"),
            walletconnect_project_id: optional(&lookup, "WALLETCONNECT_PROJECT_ID", ""),
            app_env: optional(&lookup, "APP_ENV", "production"),
            auth_cookie_name: optional(&lookup, "AUTH_COOKIE_NAME", "auth-token"),
            balance_delay_ms: parsed(&lookup, "BALANCE_DELAY_MS", 500)?,
            protected_sections: optional(
                &lookup,
                "PROTECTED_SECTIONS",
                "wallet,profile,history,games",
            )
            .split(',')
            .map(|s| s.trim().trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        })
    }

    /// Defaults suitable for tests and local runs.
    pub fn development(jwt_secret: &str) -> Self {
        Config {
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration_secs: 24 * 3600,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            api_base_uri: "/api".to_string(),
            api_base_url: "http://localhost:8080".to_string(),
            walletconnect_project_id: String::new(),
            app_env: "development".to_string(),
            auth_cookie_name: "auth-token".to_string(),
            balance_delay_ms: 0,
            protected_sections: ["wallet", "profile", "history", "games"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    pub fn balance_delay(&self) -> Duration {
        Duration::from_millis(self.balance_delay_ms)
    }

    pub fn is_development(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("development")
    }

    /// Cookies are only marked `Secure` outside local development.
    pub fn secure_cookies(&self) -> bool {
        !self.is_development()
    }
}
