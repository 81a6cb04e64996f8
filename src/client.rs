use std::time::Duration;

use thiserror::Error;

use crate::constants::{DEFAULT_API_BASE_URL, REQUEST_TIMEOUT_SECS, SCREENER_PATH};
use crate::filters::FilterDictionary;
use crate::model::{ScreenResponse, StockRecord};

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
        }
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("screener returned {status}: {body}")]
    Status { status: u16, body: String },
}

/// HTTP client for the remote screening endpoint.
#[derive(Clone, Debug)]
pub struct ScreenerClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl ScreenerClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            SCREENER_PATH
        )
    }

    /// POST the filter dictionary and return the matching stocks in response order.
    pub async fn screen(&self, filters: &FilterDictionary) -> Result<Vec<StockRecord>, ClientError> {
        let response = self.http.post(self.endpoint()).json(filters).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ScreenResponse = response.json().await?;
        log::debug!(
            target: "client.screen",
            "{} filters -> {} stocks",
            filters.len(),
            payload.stocks.len()
        );
        Ok(payload.stocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = ScreenerClient::new(ClientConfig {
            base_url: "http://localhost:9000/api/".into(),
            ..ClientConfig::default()
        })
        .expect("client");
        assert_eq!(client.endpoint(), "http://localhost:9000/api/screener");
    }
}
