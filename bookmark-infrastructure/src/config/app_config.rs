use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use bookmark_domain::{DbConfig, RuntimeConfig};

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub www_root: String,
    pub platform_base_url: String,
    pub platform_api_token: Option<String>,
    pub public_base_url: String,
    pub session_cookie_name: String,
    pub manage_capability: String,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            www_root: "http://127.0.0.1:8080".to_string(),
            platform_base_url: "http://127.0.0.1:8080/local/api".to_string(),
            platform_api_token: None,
            public_base_url: "http://127.0.0.1:3240".to_string(),
            session_cookie_name: "PlatformSession".to_string(),
            manage_capability: "course:manageactivities".to_string(),
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "platform_logs".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            request_timeout_seconds: 15,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var("BOOKMARK_CONFIG").unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        if !file_path.exists() {
            warn!("config.toml not found, using defaults");
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.normalize();
            config.validate()?;
            return Ok(config);
        }

        let raw = fs::read_to_string(file_path).await?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(value) = env::var("BOOKMARK_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Ok(value) = env::var("BOOKMARK_WWW_ROOT") {
            self.www_root = value;
        }
        if let Ok(value) = env::var("BOOKMARK_PLATFORM_BASE_URL") {
            self.platform_base_url = value;
        }
        if let Ok(value) = env::var("BOOKMARK_PLATFORM_API_TOKEN") {
            self.platform_api_token = Some(value);
        }
        if let Ok(value) = env::var("BOOKMARK_PUBLIC_BASE_URL") {
            self.public_base_url = value;
        }
        if let Ok(value) = env::var("BOOKMARK_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Ok(value) = env::var("BOOKMARK_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Ok(value) = env::var("BOOKMARK_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Ok(value) = env::var("BOOKMARK_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
    }

    fn normalize(&mut self) {
        trim_trailing_slash(&mut self.www_root);
        trim_trailing_slash(&mut self.platform_base_url);
        trim_trailing_slash(&mut self.public_base_url);
        drop_if_blank(&mut self.platform_api_token);
        drop_if_blank(&mut self.clickhouse_user);
        drop_if_blank(&mut self.clickhouse_password);
    }

    fn validate(&self) -> Result<()> {
        if self.bind_addr.parse::<std::net::SocketAddr>().is_err() {
            return Err(anyhow!("bind_addr '{}' is not a socket address", self.bind_addr));
        }
        for (name, value) in [
            ("www_root", &self.www_root),
            ("platform_base_url", &self.platform_base_url),
            ("public_base_url", &self.public_base_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(anyhow!("{} '{}' must be an http(s) URL", name, value));
            }
        }
        if self.clickhouse_database.trim().is_empty() {
            return Err(anyhow!("clickhouse_database must not be empty"));
        }
        if self.session_cookie_name.trim().is_empty() {
            return Err(anyhow!("session_cookie_name must not be empty"));
        }
        if self.manage_capability.trim().is_empty() {
            return Err(anyhow!("manage_capability must not be empty"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be positive"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            www_root: self.www_root.clone(),
            platform_base_url: self.platform_base_url.clone(),
            platform_api_token: self.platform_api_token.clone(),
            public_base_url: self.public_base_url.clone(),
            session_cookie_name: self.session_cookie_name.clone(),
            manage_capability: self.manage_capability.clone(),
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }
}

fn trim_trailing_slash(value: &mut String) {
    while value.ends_with('/') {
        value.pop();
    }
}

fn drop_if_blank(value: &mut Option<String>) {
    if value.as_deref().map(str::trim) == Some("") {
        *value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_trailing_slashes_and_blank_secrets() {
        let mut config = AppConfig {
            www_root: "http://lms.example/".to_string(),
            platform_base_url: "http://lms.example/local/api//".to_string(),
            platform_api_token: Some("  ".to_string()),
            ..AppConfig::default()
        };
        config.normalize();
        assert_eq!(config.www_root, "http://lms.example");
        assert_eq!(config.platform_base_url, "http://lms.example/local/api");
        assert_eq!(config.platform_api_token, None);
    }

    #[test]
    fn validate_rejects_bad_bind_addr_and_urls() {
        let mut config = AppConfig::default();
        config.bind_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.www_root = "lms.example".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.request_timeout_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn toml_fields_override_defaults() {
        let raw = r#"
            bind_addr = "0.0.0.0:9000"
            www_root = "https://lms.example"
            clickhouse_database = "moodle_logs"
        "#;
        let config: AppConfig = toml::from_str(raw).expect("parse config");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.www_root, "https://lms.example");
        assert_eq!(config.clickhouse_database, "moodle_logs");
        assert_eq!(config.session_cookie_name, "PlatformSession");
    }
}
