//! Entity Length Probe
//!
//! Secondary lightweight request that resolves a transfer's total byte count
//! when the primary response does not declare one (chunked or
//! gzip-transformed bodies). The result feeds
//! [`TransferDelegate::update_bytes_expected`](crate::delegate::TransferDelegate::update_bytes_expected);
//! probe failure is never fatal, the transfer simply stays
//! length-uncomputable.

use reqwest::header::{HeaderMap, CONTENT_LENGTH};
use reqwest::Client;
use url::Url;
use tracing::debug;

/// Issue a HEAD request and extract the entity length, if the server reports
/// one.
pub async fn probe_entity_length(client: &Client, url: Url, headers: HeaderMap) -> Option<u64> {
    let response = match client.head(url.clone()).headers(headers).send().await {
        Ok(response) => response,
        Err(err) => {
            debug!(url = %url, error = %err, "Entity length probe failed");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!(url = %url, status = %response.status(), "Entity length probe rejected");
        return None;
    }

    let length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    match length {
        Some(length) => debug!(url = %url, length, "Entity length resolved"),
        None => debug!(url = %url, "Entity length probe returned no Content-Length"),
    }

    length
}
