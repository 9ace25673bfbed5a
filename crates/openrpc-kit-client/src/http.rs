//! HTTP transport over `reqwest`.

use std::time::Duration;

use openrpc_kit_protocol::HttpMethod;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest};

/// Sends envelopes as JSON bodies with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| TransportError::Http(err.to_string()))?;
        Ok(Self {
            client,
            timeout: config.timeout,
        })
    }

    /// Use a preconfigured `reqwest` client.
    pub fn with_client(client: reqwest::Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout(self.timeout)
        } else {
            TransportError::Http(err.to_string())
        }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Option<Value>, TransportError> {
        let builder = match request.http_method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
        };

        let response = builder
            .json(&request.body)
            .send()
            .await
            .map_err(|err| self.map_error(err))?;
        let status = response.status();
        debug!(method = %request.http_method, url = %request.url, status = status.as_u16(), "http exchange");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let bytes = response.bytes().await.map_err(|err| self.map_error(err))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| TransportError::InvalidBody(err.to_string()))
    }
}
