use anyhow::Result;
use chrono_tz::Tz;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::Deserialize;
use std::net::SocketAddr;

use crate::domain::NotificationService;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub db: DbConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}
impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig { pub token: String }

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Push provider settings. The endpoint overrides exist so a provider can be
/// proxied or replaced by a local stub.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationConfig {
    pub timezone: String,
    pub http_timeout_seconds: u64,
    pub nma_url: String,
    pub prowl_url: String,
}

impl NotificationConfig {
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid notification.timezone '{}': {}", self.timezone, e))
    }

    pub fn api_url(&self, service: NotificationService) -> &str {
        match service {
            NotificationService::Nma => &self.nma_url,
            NotificationService::Prowl => &self.prowl_url,
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            timezone: "Europe/Amsterdam".to_string(),
            http_timeout_seconds: 10,
            nma_url: NotificationService::Nma.default_api_url().to_string(),
            prowl_url: NotificationService::Prowl.default_api_url().to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("DSMR__").split("__"));
        Ok(figment.extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_defaults_point_at_providers() {
        let cfg = NotificationConfig::default();
        assert_eq!(cfg.api_url(NotificationService::Nma), "https://www.notifymyandroid.com/publicapi/notify");
        assert_eq!(cfg.api_url(NotificationService::Prowl), "https://api.prowlapp.com/publicapi/add");
        assert_eq!(cfg.tz().unwrap(), chrono_tz::Europe::Amsterdam);
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        let cfg = NotificationConfig {
            timezone: "Mars/Olympus_Mons".to_string(),
            ..NotificationConfig::default()
        };
        assert!(cfg.tz().is_err());
    }

    #[test]
    fn test_load_from_toml_string() {
        let figment = Figment::new().merge(Toml::string(
            r#"
            [server]
            host = "127.0.0.1"
            port = 7777

            [auth]
            token = "abc"

            [db]
            url = "sqlite::memory:"

            [notification]
            timezone = "UTC"
            http_timeout_seconds = 5
            nma_url = "http://localhost/nma"
            prowl_url = "http://localhost/prowl"
            "#,
        ));
        let cfg: Config = figment.extract().unwrap();
        assert_eq!(cfg.server.request_timeout_secs, 30);
        assert_eq!(cfg.db.max_connections, 5);
        assert_eq!(cfg.server.socket_addr().unwrap().port(), 7777);
        assert_eq!(cfg.notification.api_url(NotificationService::Prowl), "http://localhost/prowl");
    }
}
