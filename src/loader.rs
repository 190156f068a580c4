use std::time::Duration;

use chrono::NaiveDate;
use reqwest::{
    blocking::Client,
    header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT},
    StatusCode, Url,
};

use crate::{error::RatesError, model::Snapshot, utils::to_request_date};

pub const DEFAULT_ENDPOINT: &str = "http://www.cbr.ru/scripts/XML_daily_eng.asp";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/88.0.4324.190 Safari/537.36";

pub trait SnapshotFetcher {
    fn fetch(&self, date: NaiveDate) -> Result<Snapshot, RatesError>;
}

/// Central bank daily rates endpoint over blocking HTTP.
pub struct CbrFetcher {
    client: Client,
    endpoint: String,
}

impl CbrFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RatesError> {
        let endpoint = endpoint.into();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| RatesError::ConnectionError {
                url: endpoint.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn request_url(&self, date: NaiveDate) -> Result<Url, RatesError> {
        let connection_error = |reason: String| RatesError::ConnectionError {
            url: format!("{}?date_req={}", self.endpoint, to_request_date(date)),
            reason,
        };

        let mut url = Url::parse(&self.endpoint).map_err(|e| connection_error(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(connection_error(format!("unsupported scheme {}", url.scheme())));
        }

        url.set_query(Some(&format!("date_req={}", to_request_date(date))));

        Ok(url)
    }
}

impl SnapshotFetcher for CbrFetcher {
    fn fetch(&self, date: NaiveDate) -> Result<Snapshot, RatesError> {
        let url = self.request_url(date)?;
        tracing::debug!(%url, "requesting daily snapshot");

        let response = self.client.get(url.clone()).send().map_err(|e| {
            tracing::warn!(%url, error = %e, "transport failure");
            RatesError::ConnectionError {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::warn!(%url, %status, "data source refused the request");
            return Err(RatesError::RemoteUnavailable {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(|e| RatesError::ConnectionError {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        parse_snapshot(&body, date)
    }
}

/// Parses a `ValCurs` document. `requested` only labels errors.
pub fn parse_snapshot(body: &str, requested: NaiveDate) -> Result<Snapshot, RatesError> {
    let snapshot: Snapshot = serde_xml_rs::from_str(strip_prolog(body))
        .map_err(|e| RatesError::malformed_snapshot(to_request_date(requested), e.to_string()))?;

    tracing::debug!(
        date = %snapshot.date,
        quotes = snapshot.quotes.len(),
        "parsed snapshot"
    );

    Ok(snapshot)
}

// The body is already decoded, so the declared encoding no longer applies.
fn strip_prolog(body: &str) -> &str {
    let body = body.trim_start_matches('\u{feff}').trim_start();
    if body.starts_with("<?xml") {
        if let Some(end) = body.find("?>") {
            return &body[end + 2..];
        }
    }
    body
}
