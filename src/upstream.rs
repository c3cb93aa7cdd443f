use axum::body::Bytes;
use reqwest::{header::CONTENT_TYPE, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::UpstreamError;

pub fn http_client(config: &Config) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.upstream_timeout_secs))
        .build()
}

/// Client for the external letter service: one endpoint drafts letters, the
/// other archives finished ones. Each call is a single attempt.
#[derive(Clone)]
pub struct LetterService {
    client: Client,
    generation_url: String,
    archive_url: String,
}

impl LetterService {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            generation_url: config.generation_url.clone(),
            archive_url: config.archive_url.clone(),
        }
    }

    /// Sends a generation request body as-is. A non-success status is an
    /// error; the JSON reply is returned untouched otherwise.
    pub async fn generate(&self, body: Bytes) -> Result<Value, UpstreamError> {
        info!("Sending generation request ({} bytes)", body.len());
        debug!("Generation payload: {}", String::from_utf8_lossy(&body));

        let response = self
            .client
            .post(&self.generation_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let data: Value = serde_json::from_str(&text)?;
        debug!("Generation response: {}", data);
        Ok(data)
    }

    /// Sends an archive record as-is and returns whatever JSON comes back,
    /// regardless of status.
    pub async fn archive(&self, body: Bytes) -> Result<Value, UpstreamError> {
        info!("Sending archive request ({} bytes)", body.len());

        let text = self
            .client
            .post(&self.archive_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?
            .text()
            .await?;
        Ok(serde_json::from_str(&text)?)
    }
}
