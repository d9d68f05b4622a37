use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use super::errors::WorkerApiError;
use crate::models::VideoId;

/// Characters left as-is when a video id is placed in a path segment.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// HTTP client for the counting worker.
#[derive(Clone, Debug)]
pub struct WorkerApi {
    pub(super) client: reqwest::Client,
    pub(super) base_url: String,
}

impl WorkerApi {
    /// Create a client for `base_url`. `timeout` applies per request; with
    /// `None` a hung request simply never completes.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, WorkerApiError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|e| WorkerApiError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let mut builder = reqwest::Client::builder().default_headers(standard_headers());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(WorkerApiError::from_reqwest)?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(super) fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(super) fn video_path(id: &VideoId) -> String {
        format!("/video/{}", utf8_percent_encode(id.as_str(), PATH_SEGMENT))
    }

    /// Send `request`, reject non-2xx responses and decode the JSON body.
    ///
    /// The body is decoded in two steps so a missing or mistyped field
    /// surfaces as `ParseError` rather than a transport error.
    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        operation_name: &str,
    ) -> Result<T, WorkerApiError> {
        let response = request.send().await.map_err(WorkerApiError::from_reqwest)?;
        let status = response.status();

        debug!("[{}] Response: {}", operation_name, status);

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            warn!(
                "[{}] Error response - Status: {}, Body: {}",
                operation_name,
                status.as_u16(),
                body
            );
            return Err(WorkerApiError::from_status(status.as_u16(), body));
        }

        let body = response.text().await.map_err(WorkerApiError::from_reqwest)?;
        serde_json::from_str(&body).map_err(|e| {
            warn!("[{}] Malformed response body: {}", operation_name, e);
            WorkerApiError::ParseError(e.to_string())
        })
    }
}

fn standard_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers
}
