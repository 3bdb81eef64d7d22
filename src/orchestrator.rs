//! Orchestrator - request/response flows over a [`Backend`].
//!
//! Knows nothing about forms or terminals. Input validation happens here,
//! before any network call, so an invalid request never leaves the process.
//!
//! Operations may overlap freely (an auto-save can still be running while
//! the next decrypt starts); there is no sequencing between them.

use crate::api::{
    ApiError, Backend, BlobId, BlobRecord, BlobSummary, DecryptRequest, EncryptRequest,
    PingResponse, SaveRequest, SaveResponse,
};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Note attached to a save when the caller gives none.
pub const DEFAULT_NOTE: &str = "auto-saved";

/// Errors of the user-facing flows. `Display` is the alert text.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Enter a password")]
    MissingPassword,

    #[error("Provide ciphertext and password")]
    MissingDecryptInput,

    #[error("Encryption failed: {}", .0.message())]
    Encrypt(#[source] ApiError),

    #[error("Decryption failed: {}", .0.detail())]
    Decrypt(#[source] ApiError),

    #[error("Cannot load blob {id}: {}", .source.detail())]
    Load {
        id: BlobId,
        #[source]
        source: ApiError,
    },

    #[error("Request failed: {}", .0.detail())]
    Backend(#[source] ApiError),
}

impl FlowError {
    /// True for errors raised before any request was sent.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            FlowError::MissingPassword | FlowError::MissingDecryptInput
        )
    }
}

/// Values applied to a save when the caller leaves them unset.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDefaults {
    pub note: String,
    pub owner: Option<String>,
}

impl Default for SaveDefaults {
    fn default() -> Self {
        Self {
            note: DEFAULT_NOTE.to_string(),
            owner: None,
        }
    }
}

/// Caller-supplied metadata for a save. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveMeta {
    pub filename: Option<String>,
    pub note: Option<String>,
    pub owner: Option<String>,
}

/// Handle to a background save.
///
/// Dropping it detaches the save; it still runs to completion. Waiting is
/// only for diagnostics: the encrypt that started it has already finished.
#[derive(Debug)]
pub struct SaveTask {
    handle: JoinHandle<Option<SaveResponse>>,
}

impl SaveTask {
    /// Block until the save finishes. `None` means it failed.
    pub fn wait(self) -> Option<SaveResponse> {
        self.handle.join().unwrap_or_else(|_| {
            error!("Auto-save thread panicked");
            None
        })
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Client request orchestrator.
#[derive(Clone)]
pub struct Orchestrator {
    backend: Arc<dyn Backend>,
    defaults: SaveDefaults,
}

impl Orchestrator {
    pub fn new(backend: impl Backend + 'static, defaults: SaveDefaults) -> Self {
        Self::from_arc(Arc::new(backend), defaults)
    }

    /// Share an existing backend (e.g. one the caller also inspects).
    pub fn from_arc(backend: Arc<dyn Backend>, defaults: SaveDefaults) -> Self {
        Self { backend, defaults }
    }

    /// Encrypt `plaintext` with `password`, returning the base64 ciphertext.
    ///
    /// An empty password fails without a request. An empty plaintext is
    /// allowed.
    pub fn encrypt(&self, plaintext: &str, password: &str) -> Result<String, FlowError> {
        if password.is_empty() {
            return Err(FlowError::MissingPassword);
        }

        let req = EncryptRequest {
            plaintext: plaintext.to_string(),
            password: password.to_string(),
        };
        let resp = self.backend.encrypt(&req).map_err(FlowError::Encrypt)?;

        info!(
            "Encrypt succeeded, ciphertext length: {}",
            resp.ciphertext_b64.len()
        );
        Ok(resp.ciphertext_b64)
    }

    /// Decrypt `ciphertext_b64` with `password`. The plaintext is returned
    /// exactly as the server sent it.
    pub fn decrypt(&self, ciphertext_b64: &str, password: &str) -> Result<String, FlowError> {
        if ciphertext_b64.is_empty() || password.is_empty() {
            return Err(FlowError::MissingDecryptInput);
        }

        let req = DecryptRequest {
            ciphertext_b64: ciphertext_b64.to_string(),
            password: password.to_string(),
        };
        let resp = self.backend.decrypt(&req).map_err(FlowError::Decrypt)?;

        debug!("Decrypt succeeded");
        Ok(resp.plaintext)
    }

    /// Build the save body, filling unset metadata from the defaults.
    pub fn save_request(&self, ciphertext_b64: &str, meta: SaveMeta) -> SaveRequest {
        SaveRequest {
            ciphertext_b64: ciphertext_b64.to_string(),
            filename: non_empty(meta.filename),
            note: non_empty(meta.note).or_else(|| non_empty(Some(self.defaults.note.clone()))),
            owner: non_empty(meta.owner).or_else(|| non_empty(self.defaults.owner.clone())),
        }
    }

    /// Persist a ciphertext. Never fails: every error is logged and
    /// reported as `None`.
    pub fn save(&self, ciphertext_b64: &str, meta: SaveMeta) -> Option<SaveResponse> {
        let req = self.save_request(ciphertext_b64, meta);
        save_with(self.backend.as_ref(), &req)
    }

    /// Run [`save`](Self::save) on a detached thread.
    pub fn spawn_save(&self, ciphertext_b64: &str, meta: SaveMeta) -> SaveTask {
        let req = self.save_request(ciphertext_b64, meta);
        let backend = Arc::clone(&self.backend);

        info!("Calling save in the background");
        let handle = thread::spawn(move || {
            let result = save_with(backend.as_ref(), &req);
            match &result {
                Some(resp) => info!("Saved record id: {}", resp.id),
                None => info!("Save returned nothing or failed"),
            }
            result
        });

        SaveTask { handle }
    }

    /// Fetch a stored ciphertext and its metadata.
    pub fn load(&self, id: &BlobId) -> Result<BlobRecord, FlowError> {
        self.backend.get_blob(id).map_err(|source| FlowError::Load {
            id: id.clone(),
            source,
        })
    }

    /// Most recent stored blobs, newest first as the server orders them.
    pub fn list(&self, limit: u32) -> Result<Vec<BlobSummary>, FlowError> {
        self.backend.list_blobs(limit).map_err(FlowError::Backend)
    }

    /// Delete a stored blob. `Ok(false)` when the server reports nothing was
    /// deleted.
    pub fn remove(&self, id: &BlobId) -> Result<bool, FlowError> {
        let resp = self.backend.delete_blob(id).map_err(FlowError::Backend)?;
        Ok(resp.deleted)
    }

    pub fn ping(&self) -> Result<PingResponse, FlowError> {
        self.backend.ping().map_err(FlowError::Backend)
    }
}

fn save_with(backend: &dyn Backend, req: &SaveRequest) -> Option<SaveResponse> {
    match backend.save(req) {
        Ok(resp) => Some(resp),
        Err(ApiError::Status { status, body }) => {
            warn!("Save failed: {} {}", status, body);
            None
        }
        Err(e) => {
            error!("Save error: {}", e);
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
