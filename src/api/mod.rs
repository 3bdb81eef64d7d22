//! API module - Talking to the encryption service.
//!
//! This module contains:
//! - Wire types for every endpoint
//! - The [`Backend`] trait the orchestrator is written against
//! - [`HttpBackend`], the reqwest implementation

pub mod client;
pub mod error;
pub mod types;

pub use client::HttpBackend;
pub use error::ApiError;
pub use types::{
    BlobId, BlobRecord, BlobSummary, DecryptRequest, DecryptResponse, DeleteResponse,
    EncryptRequest, EncryptResponse, PingResponse, SaveRequest, SaveResponse,
};

/// Every call the client makes to the service.
///
/// Implementations must be shareable across threads: the auto-save runs on
/// a background thread while the caller keeps using the same backend.
pub trait Backend: Send + Sync {
    /// `POST /api/encrypt`
    fn encrypt(&self, req: &EncryptRequest) -> Result<EncryptResponse, ApiError>;

    /// `POST /api/decrypt`
    fn decrypt(&self, req: &DecryptRequest) -> Result<DecryptResponse, ApiError>;

    /// `POST /api/save`
    fn save(&self, req: &SaveRequest) -> Result<SaveResponse, ApiError>;

    /// `GET /api/blob/{id}`
    fn get_blob(&self, id: &BlobId) -> Result<BlobRecord, ApiError>;

    /// `GET /api/blobs?limit=N`
    fn list_blobs(&self, limit: u32) -> Result<Vec<BlobSummary>, ApiError>;

    /// `DELETE /api/blob/{id}`
    fn delete_blob(&self, id: &BlobId) -> Result<DeleteResponse, ApiError>;

    /// `GET /api/ping`
    fn ping(&self) -> Result<PingResponse, ApiError>;
}
