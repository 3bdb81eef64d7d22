//! Wire types for the encryption service.
//!
//! Every type here lives for a single request/response cycle. Nothing is
//! cached client-side.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /api/encrypt`.
#[derive(Clone, Serialize)]
pub struct EncryptRequest {
    pub plaintext: String,
    pub password: String,
}

impl fmt::Debug for EncryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptRequest")
            .field("plaintext_len", &self.plaintext.len())
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /api/encrypt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EncryptResponse {
    /// Base64 of `salt || iv || tag || ct`
    pub ciphertext_b64: String,
}

/// Body of `POST /api/decrypt`.
#[derive(Clone, Serialize)]
pub struct DecryptRequest {
    pub ciphertext_b64: String,
    pub password: String,
}

impl fmt::Debug for DecryptRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptRequest")
            .field("ciphertext_b64", &self.ciphertext_b64)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response of `POST /api/decrypt`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecryptResponse {
    pub plaintext: String,
}

/// Body of `POST /api/save`.
///
/// Carries only the ciphertext and its metadata. There is deliberately no
/// field for a password or plaintext, so neither can reach storage through
/// this type. Unset options are sent as JSON `null`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveRequest {
    pub ciphertext_b64: String,
    pub filename: Option<String>,
    pub note: Option<String>,
    pub owner: Option<String>,
}

/// Opaque identifier of a stored blob.
///
/// The service currently hands out integers, but callers only ever echo
/// the value back, so strings are accepted too.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum BlobId {
    Int(i64),
    Text(String),
}

impl fmt::Display for BlobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobId::Int(id) => write!(f, "{}", id),
            BlobId::Text(id) => f.write_str(id),
        }
    }
}

impl From<i64> for BlobId {
    fn from(id: i64) -> Self {
        BlobId::Int(id)
    }
}

impl std::str::FromStr for BlobId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(id) => BlobId::Int(id),
            Err(_) => BlobId::Text(s.to_string()),
        })
    }
}

/// Response of `POST /api/save`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SaveResponse {
    pub id: BlobId,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Full record from `GET /api/blob/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlobRecord {
    pub id: BlobId,
    pub ciphertext_b64: String,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub algorithm: Option<String>,
    #[serde(default)]
    pub kdf: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Row of `GET /api/blobs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BlobSummary {
    pub id: BlobId,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Response of `DELETE /api/blob/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteResponse {
    pub deleted: bool,
}

/// Response of `GET /api/ping`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PingResponse {
    pub ok: bool,
    #[serde(default)]
    pub msg: Option<String>,
}
