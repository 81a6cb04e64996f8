use std::fmt;

use gloo_net::http::Request;
use stock_screener::{FilterDictionary, ScreenResponse, StockRecord};

/// Progress of the latest screening request.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Loaded(usize),
    Failed(String),
}

/// Errors that can surface while querying the screening endpoint.
#[derive(Debug)]
pub enum ScreenFetchError {
    Request(String),
    Status(u16),
    Deserialize(String),
}

impl fmt::Display for ScreenFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreenFetchError::Request(err) => write!(f, "request failed: {err}"),
            ScreenFetchError::Status(status) => write!(f, "screener returned {status}"),
            ScreenFetchError::Deserialize(err) => write!(f, "malformed response: {err}"),
        }
    }
}

/// POST the active filters and return the matching stocks.
pub async fn fetch_screen(
    url: &str,
    filters: &FilterDictionary,
) -> Result<Vec<StockRecord>, ScreenFetchError> {
    let response = Request::post(url)
        .json(filters)
        .map_err(|err| ScreenFetchError::Request(err.to_string()))?
        .send()
        .await
        .map_err(|err| ScreenFetchError::Request(err.to_string()))?;

    if !response.ok() {
        return Err(ScreenFetchError::Status(response.status()));
    }

    let payload: ScreenResponse = response
        .json()
        .await
        .map_err(|err| ScreenFetchError::Deserialize(err.to_string()))?;
    Ok(payload.stocks)
}
