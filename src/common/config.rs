// src/common/config.rs
//! Runtime configuration read from the environment (after `.env` is loaded)

use std::env;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://sdr_api.db";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub reset_db: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let port = lookup("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let cors_origins = parse_origins(
            &lookup("CORS_ORIGINS").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let reset_db = lookup("RESET_DB")
            .unwrap_or_else(|| "false".to_string())
            .to_lowercase()
            == "true";

        Self {
            database_url,
            port,
            cors_origins,
            reset_db,
        }
    }

    /// Logs the effective configuration on startup
    pub fn log_summary(&self) {
        info!(
            database_url = %self.database_url,
            port = self.port,
            cors_origins = ?self.cors_origins,
            reset_db = self.reset_db,
            "Configuration loaded"
        );
    }
}

/// Splits a comma-separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" http://a.com , ,http://b.com,"),
            vec!["http://a.com".to_string(), "http://b.com".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(
            config.cors_origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string()
            ]
        );
        assert!(!config.reset_db, "Reset should be disabled by default");
    }

    #[test]
    fn test_config_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("DATABASE_URL", "sqlite://data/test.db"),
            ("PORT", "9090"),
            ("CORS_ORIGINS", "https://sdr.example.com"),
            ("RESET_DB", "TRUE"),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database_url, "sqlite://data/test.db");
        assert_eq!(config.port, 9090);
        assert_eq!(config.cors_origins, vec!["https://sdr.example.com".to_string()]);
        assert!(config.reset_db);
    }

    #[test]
    fn test_invalid_port_falls_back_to_default() {
        let config = AppConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, DEFAULT_PORT);
    }
}
