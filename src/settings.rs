//! Process settings from the environment (after `.env` is loaded).

use crate::error::ConfigError;
use std::net::SocketAddr;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/trip_admin";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Public base URL, used in printed instructions. Defaults to the bind address.
    pub app_url: String,
    pub max_connections: u32,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };
        let bind = get("BIND_ADDR", DEFAULT_BIND_ADDR);
        let bind_addr = bind
            .parse()
            .map_err(|e| ConfigError::Settings(format!("BIND_ADDR '{}': {}", bind, e)))?;
        let max = get("DB_MAX_CONNECTIONS", &DEFAULT_MAX_CONNECTIONS.to_string());
        let max_connections = max
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| ConfigError::Settings(format!("DB_MAX_CONNECTIONS '{}' is not a positive integer", max)))?;
        let app_url = get("APP_URL", &local_url(bind_addr));
        Ok(Settings {
            database_url: get("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_addr,
            app_url: app_url.trim_end_matches('/').to_string(),
            max_connections,
        })
    }

    /// Where the interactive API documentation is served.
    pub fn documentation_url(&self) -> String {
        format!("{}/api/documentation", self.app_url)
    }
}

/// URL a local browser reaches the server at; wildcard binds map to `localhost`.
fn local_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() || addr.ip().is_loopback() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{}", addr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply() {
        let s = from(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.bind_addr.port(), 3000);
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.documentation_url(), "http://localhost:3000/api/documentation");
    }

    #[test]
    fn app_url_follows_bind_addr() {
        let s = from(&[("BIND_ADDR", "0.0.0.0:8080")]).unwrap();
        assert_eq!(s.app_url, "http://localhost:8080");
        let s = from(&[("BIND_ADDR", "10.1.2.3:9000")]).unwrap();
        assert_eq!(s.app_url, "http://10.1.2.3:9000");
        let s = from(&[("BIND_ADDR", "0.0.0.0:8080"), ("APP_URL", "https://admin.example.com")]).unwrap();
        assert_eq!(s.app_url, "https://admin.example.com");
    }

    #[test]
    fn app_url_trailing_slash_is_trimmed() {
        let s = from(&[("APP_URL", "https://trips.example.com/")]).unwrap();
        assert_eq!(s.documentation_url(), "https://trips.example.com/api/documentation");
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(from(&[("BIND_ADDR", "nowhere")]), Err(ConfigError::Settings(_))));
        assert!(matches!(from(&[("DB_MAX_CONNECTIONS", "0")]), Err(ConfigError::Settings(_))));
    }
}
