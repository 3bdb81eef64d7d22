//! HTTP backend - reqwest blocking client for the encryption service.
//!
//! The base URL is injected at construction; there is no global endpoint.
//! No retries, no auth headers. The timeout is the transport default unless
//! one is configured explicitly.

use super::error::ApiError;
use super::types::{
    BlobId, BlobRecord, BlobSummary, DecryptRequest, DecryptResponse, DeleteResponse,
    EncryptRequest, EncryptResponse, PingResponse, SaveRequest, SaveResponse,
};
use super::Backend;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

const ENCRYPT_PATH: &str = "/api/encrypt";
const DECRYPT_PATH: &str = "/api/decrypt";
const SAVE_PATH: &str = "/api/save";
const BLOB_PATH: &str = "/api/blob";
const BLOBS_PATH: &str = "/api/blobs";
const PING_PATH: &str = "/api/ping";

/// [`Backend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    /// Create a backend for `base_url` with the transport's default timeout.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_timeout(base_url, None)
    }

    /// Create a backend with an explicit request timeout.
    pub fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn blob_url(&self, id: &BlobId) -> Result<Url, ApiError> {
        let endpoint = self.endpoint(BLOB_PATH);
        let mut url = Url::parse(&endpoint).map_err(|e| ApiError::InvalidBaseUrl {
            url: endpoint.clone(),
            reason: e.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                url: endpoint.clone(),
                reason: "URL cannot have a path".to_string(),
            })?
            .push(&id.to_string());
        Ok(url)
    }

    fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);
        let request = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        send(request)
    }
}

/// Send a request and decode a JSON success body.
///
/// Non-success statuses keep the raw body so callers can pick the message
/// they want to show.
fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ApiError> {
    let response = request.header(ACCEPT, "application/json").send()?;
    let status = response.status();
    let body = response.text()?;

    if !status.is_success() {
        debug!("Server returned {}", status);
        return Err(ApiError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(serde_json::from_str(&body)?)
}

fn normalize_base_url(base_url: &str) -> Result<String, ApiError> {
    let trimmed = base_url.trim().trim_end_matches('/');
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base_url.to_string(),
        reason,
    };

    let parsed = Url::parse(trimmed).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(invalid(format!("unsupported scheme '{}'", other))),
    }
}

impl Backend for HttpBackend {
    fn encrypt(&self, req: &EncryptRequest) -> Result<EncryptResponse, ApiError> {
        self.post_json(ENCRYPT_PATH, req)
    }

    fn decrypt(&self, req: &DecryptRequest) -> Result<DecryptResponse, ApiError> {
        self.post_json(DECRYPT_PATH, req)
    }

    fn save(&self, req: &SaveRequest) -> Result<SaveResponse, ApiError> {
        self.post_json(SAVE_PATH, req)
    }

    fn get_blob(&self, id: &BlobId) -> Result<BlobRecord, ApiError> {
        let url = self.blob_url(id)?;
        debug!("GET {}", url);
        send(self.client.get(url))
    }

    fn list_blobs(&self, limit: u32) -> Result<Vec<BlobSummary>, ApiError> {
        let url = self.endpoint(BLOBS_PATH);
        debug!("GET {} (limit={})", url, limit);
        send(self.client.get(&url).query(&[("limit", limit)]))
    }

    fn delete_blob(&self, id: &BlobId) -> Result<DeleteResponse, ApiError> {
        let url = self.blob_url(id)?;
        debug!("DELETE {}", url);
        send(self.client.delete(url))
    }

    fn ping(&self) -> Result<PingResponse, ApiError> {
        let url = self.endpoint(PING_PATH);
        debug!("GET {}", url);
        send(self.client.get(&url))
    }
}
