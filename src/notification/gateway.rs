use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;
use tracing::debug;

use super::NotifyError;
use crate::config::NotificationConfig;
use crate::domain::NotificationService;

pub const PRIORITY: &str = "-2";
pub const APPLICATION: &str = "DSMR-Reader";
pub const EVENT: &str = "Daily usage notification";

#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver one message through `service`. Any non-2xx answer is an error.
    async fn push(
        &self,
        service: NotificationService,
        api_key: &str,
        description: &str,
    ) -> Result<(), NotifyError>;
}

/// Form-encoded POST to the NMA/Prowl style public APIs.
#[derive(Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    config: NotificationConfig,
}

impl HttpPushGateway {
    pub fn new(config: NotificationConfig) -> Result<Self, NotifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("dsmr-notifier/", env!("CARGO_PKG_VERSION"))),
        );
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_seconds.max(1)))
            .default_headers(headers)
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn push(
        &self,
        service: NotificationService,
        api_key: &str,
        description: &str,
    ) -> Result<(), NotifyError> {
        let url = self.config.api_url(service);
        let params = [
            ("apikey", api_key),
            ("priority", PRIORITY),
            ("application", APPLICATION),
            ("event", EVENT),
            ("description", description),
        ];

        let resp = self.client.post(url).form(&params).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        debug!(%service, status = status.as_u16(), "Notify API responded");

        if !status.is_success() {
            return Err(NotifyError::Delivery {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
