//! Home Assistant REST client

use crate::{ControllerError, LightCommand, LightService, Result, SelectCommand};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Default timeout for a single service call
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default number of retry attempts for transient failures
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default base delay for exponential backoff
const DEFAULT_BASE_DELAY_MS: u64 = 250;

/// Calls Home Assistant services over its REST API
///
/// Connection errors and 5xx responses are retried with exponential
/// backoff. Timeouts and 4xx responses fail immediately.
///
/// # Example
///
/// ```no_run
/// use controller::{HomeAssistantClient, LightCommand, LightService};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = HomeAssistantClient::new("http://homeassistant.local:8123", "token");
///     client
///         .turn_on(&LightCommand::color("light.desk", [255, 140, 0], 60))
///         .await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HomeAssistantClient {
    client: Client,
    base_url: String,
    token: String,
    timeout: Duration,
    max_retries: u32,
    base_delay_ms: u64,
}

impl HomeAssistantClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
        }
    }

    /// Set the per-request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the maximum number of retry attempts for transient failures
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the base delay for exponential backoff (in milliseconds)
    pub fn with_base_delay_ms(mut self, delay_ms: u64) -> Self {
        self.base_delay_ms = delay_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn service_url(&self, domain: &str, service: &str) -> String {
        format!("{}/api/services/{}/{}", self.base_url, domain, service)
    }

    async fn call<T: Serialize + Sync>(&self, domain: &str, service: &str, body: &T) -> Result<()> {
        if !self.is_configured() {
            return Err(ControllerError::NotConfigured);
        }

        let url = self.service_url(domain, service);
        let mut attempt = 0;
        loop {
            let response = self
                .client
                .post(&url)
                .bearer_auth(&self.token)
                .json(body)
                .timeout(self.timeout)
                .send()
                .await;

            match response {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return Ok(());
                    }

                    if status.is_server_error() && attempt < self.max_retries {
                        tracing::debug!("{} returned {}, retrying", url, status);
                        tokio::time::sleep(self.calculate_backoff_delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }

                    let body = resp.text().await.unwrap_or_default();
                    return Err(ControllerError::Status {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) => {
                    if e.is_timeout() {
                        return Err(ControllerError::Timeout(self.timeout.as_millis() as u64));
                    }

                    if e.is_connect() && attempt < self.max_retries {
                        tracing::debug!("Connection to {} failed, retrying", self.base_url);
                        tokio::time::sleep(self.calculate_backoff_delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }

                    if e.is_connect() {
                        return Err(ControllerError::Connection(format!(
                            "Failed to connect to {} after {} attempts",
                            self.base_url,
                            attempt + 1
                        )));
                    }

                    return Err(ControllerError::RequestFailed(e));
                }
            }
        }
    }

    /// Calculate exponential backoff delay for retry attempts
    fn calculate_backoff_delay(&self, attempt: u32) -> Duration {
        let delay_ms = self.base_delay_ms * 2u64.pow(attempt);
        Duration::from_millis(delay_ms)
    }
}

impl LightService for HomeAssistantClient {
    async fn turn_on(&self, command: &LightCommand) -> Result<()> {
        self.call("light", "turn_on", command).await
    }

    async fn select_option(&self, command: &SelectCommand) -> Result<()> {
        self.call("select", "select_option", command).await
    }

    fn is_configured(&self) -> bool {
        !self.base_url.is_empty() && !self.token.is_empty()
    }
}
