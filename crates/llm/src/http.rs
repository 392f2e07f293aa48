//! Blocking JSON-over-HTTP transport shared by the providers.
//!
//! Errors carry the HTTP status or a transport category only. Response
//! bodies, URLs and credentials never reach an error message.

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use slidegen_core::{Error, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::ProviderError(transport_category(&e).to_string()))?;
        Ok(Self { client })
    }

    /// POST `body` as JSON and decode a JSON response.
    pub(crate) fn post_json<B, T>(&self, url: &str, headers: &[(&str, &str)], body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        for (name, value) in headers {
            request = request.header(*name, *value);
        }

        let response = request
            .send()
            .map_err(|e| Error::ProviderError(transport_category(&e).to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ProviderError(format!(
                "provider returned HTTP status {}",
                status.as_u16()
            )));
        }

        response
            .json()
            .map_err(|_| Error::ProviderError("provider response was not the expected JSON".to_string()))
    }
}

/// Coarse description of a transport failure.
fn transport_category(e: &reqwest::Error) -> &'static str {
    if e.is_timeout() {
        "provider request timed out"
    } else if e.is_connect() {
        "could not connect to provider"
    } else if e.is_builder() {
        "invalid provider request"
    } else if e.is_decode() {
        "provider response could not be decoded"
    } else {
        "provider request failed"
    }
}
