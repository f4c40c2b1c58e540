/*
[INPUT]:  HTTP configuration (base URL, timeouts)
[OUTPUT]: Configured reqwest client ready for API calls
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::http::{RentrollError, Result};

/// Default address of a locally running RentRoll server
pub const DEFAULT_BASE_URL: &str = "http://localhost:8270";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Main HTTP client for the RentRoll web services
#[derive(Debug, Clone)]
pub struct RentrollClient {
    http_client: Client,
    base_url: Url,
}

impl RentrollClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(config, DEFAULT_BASE_URL)
    }

    /// Create a client pointed at an explicit server (tests, non-default hosts)
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        // Endpoints are joined relatively so a path prefix on the base survives.
        let mut base = base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        if base_url.cannot_be_a_base() {
            return Err(RentrollError::Config(format!(
                "base url cannot be used as a base: {base_url}"
            )));
        }

        Ok(Self {
            http_client,
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build full URL for an endpoint such as `v1/expense`
    pub(crate) fn url(&self, endpoint: &str) -> Result<Url> {
        Ok(self.base_url.join(endpoint.trim_start_matches('/'))?)
    }

    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "rentroll request");
        self.http_client.request(method, url)
    }

    /// Send a request and decode the service envelope into `T`
    pub(crate) async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let body = self.send_text(builder).await?;
        let value: Value = serde_json::from_str(&body)?;
        check_status(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    /// Send a request and return the body as text, failing on non-2xx
    pub(crate) async fn send_text(&self, builder: RequestBuilder) -> Result<String> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RentrollError::api_error(status, body));
        }
        Ok(body)
    }

    /// Send a request and return the raw body, failing on non-2xx
    pub(crate) async fn send_bytes(&self, builder: RequestBuilder) -> Result<Vec<u8>> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RentrollError::api_error(status, body));
        }
        Ok(response.bytes().await?.to_vec())
    }
}

/// Turn `{"status":"error","message":..}` into [`RentrollError::Server`]
pub(crate) fn check_status(value: &Value) -> Result<()> {
    if value.get("status").and_then(Value::as_str) == Some("error") {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("request failed")
            .to_string();
        return Err(RentrollError::Server { message });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn base_url_keeps_path_prefix() {
        let client =
            RentrollClient::with_config_and_base_url(ClientConfig::default(), "http://host/rr")
                .expect("client");
        let url = client.url("/v1/expense").expect("url");
        assert_eq!(url.as_str(), "http://host/rr/v1/expense");
    }

    #[test]
    fn error_envelope_becomes_server_error() {
        let err = check_status(&json!({"status": "error", "message": "no such BID"}))
            .expect_err("should fail");
        assert!(err.is_business_error());
        assert_eq!(err.to_string(), "no such BID");

        assert!(check_status(&json!({"status": "success"})).is_ok());
        assert!(check_status(&json!({"REX": []})).is_ok());
    }
}
