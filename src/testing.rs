//! Scripted in-memory [`Backend`] for unit tests.

use crate::api::{
    ApiError, Backend, BlobId, BlobRecord, BlobSummary, DecryptRequest, DecryptResponse,
    DeleteResponse, EncryptRequest, EncryptResponse, PingResponse, SaveRequest, SaveResponse,
};
use std::sync::mpsc::Receiver;
use std::sync::Mutex;

/// A request the fake received.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Encrypt {
        plaintext: String,
        password: String,
    },
    Decrypt {
        ciphertext_b64: String,
        password: String,
    },
    Save(SaveRequest),
    GetBlob(BlobId),
    ListBlobs(u32),
    DeleteBlob(BlobId),
    Ping,
}

#[derive(Debug, Clone)]
enum Reply<T> {
    Ok(T),
    Status(u16, String),
    Transport,
}

impl<T: Clone> Reply<T> {
    fn get(&self) -> Result<T, ApiError> {
        match self {
            Reply::Ok(value) => Ok(value.clone()),
            Reply::Status(status, body) => Err(ApiError::Status {
                status: *status,
                body: body.clone(),
            }),
            Reply::Transport => Err(transport_error()),
        }
    }
}

/// A real `reqwest::Error` produced without touching the network.
fn transport_error() -> ApiError {
    let err = reqwest::blocking::Client::new()
        .get("not a url")
        .send()
        .expect_err("relative URL must fail");
    ApiError::Transport(err)
}

fn not_scripted<T>() -> Reply<T> {
    Reply::Status(500, "not scripted".to_string())
}

pub struct FakeBackend {
    calls: Mutex<Vec<Call>>,
    encrypt: Reply<EncryptResponse>,
    decrypt: Reply<DecryptResponse>,
    save: Reply<SaveResponse>,
    blob: Reply<BlobRecord>,
    save_gate: Mutex<Option<Receiver<()>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            encrypt: not_scripted(),
            decrypt: not_scripted(),
            save: not_scripted(),
            blob: Reply::Status(404, r#"{"detail":"Not found"}"#.to_string()),
            save_gate: Mutex::new(None),
        }
    }

    pub fn encrypt_ok(mut self, ciphertext_b64: &str) -> Self {
        self.encrypt = Reply::Ok(EncryptResponse {
            ciphertext_b64: ciphertext_b64.to_string(),
        });
        self
    }

    pub fn encrypt_status(mut self, status: u16, body: &str) -> Self {
        self.encrypt = Reply::Status(status, body.to_string());
        self
    }

    pub fn encrypt_transport_error(mut self) -> Self {
        self.encrypt = Reply::Transport;
        self
    }

    pub fn decrypt_transport_error(mut self) -> Self {
        self.decrypt = Reply::Transport;
        self
    }

    pub fn decrypt_ok(mut self, plaintext: &str) -> Self {
        self.decrypt = Reply::Ok(DecryptResponse {
            plaintext: plaintext.to_string(),
        });
        self
    }

    pub fn decrypt_status(mut self, status: u16, body: &str) -> Self {
        self.decrypt = Reply::Status(status, body.to_string());
        self
    }

    pub fn save_ok(mut self, id: i64) -> Self {
        self.save = Reply::Ok(SaveResponse {
            id: BlobId::Int(id),
            created_at: None,
        });
        self
    }

    pub fn save_status(mut self, status: u16, body: &str) -> Self {
        self.save = Reply::Status(status, body.to_string());
        self
    }

    pub fn save_transport_error(mut self) -> Self {
        self.save = Reply::Transport;
        self
    }

    /// Hold every save until a message arrives on `gate`.
    pub fn save_gated(self, gate: Receiver<()>) -> Self {
        *self.save_gate.lock().unwrap() = Some(gate);
        self
    }

    pub fn blob(mut self, ciphertext_b64: &str) -> Self {
        self.blob = Reply::Ok(BlobRecord {
            id: BlobId::Int(5),
            ciphertext_b64: ciphertext_b64.to_string(),
            filename: Some("secret.txt".to_string()),
            note: Some("auto-saved".to_string()),
            algorithm: Some("AES-256-GCM".to_string()),
            kdf: Some("PBKDF2:100000".to_string()),
            owner: None,
            created_at: None,
        });
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn save_requests(&self) -> Vec<SaveRequest> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Save(req) => Some(req),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Backend for FakeBackend {
    fn encrypt(&self, req: &EncryptRequest) -> Result<EncryptResponse, ApiError> {
        self.record(Call::Encrypt {
            plaintext: req.plaintext.clone(),
            password: req.password.clone(),
        });
        self.encrypt.get()
    }

    fn decrypt(&self, req: &DecryptRequest) -> Result<DecryptResponse, ApiError> {
        self.record(Call::Decrypt {
            ciphertext_b64: req.ciphertext_b64.clone(),
            password: req.password.clone(),
        });
        self.decrypt.get()
    }

    fn save(&self, req: &SaveRequest) -> Result<SaveResponse, ApiError> {
        let gate = self.save_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.record(Call::Save(req.clone()));
        self.save.get()
    }

    fn get_blob(&self, id: &BlobId) -> Result<BlobRecord, ApiError> {
        self.record(Call::GetBlob(id.clone()));
        self.blob.get()
    }

    fn list_blobs(&self, limit: u32) -> Result<Vec<BlobSummary>, ApiError> {
        self.record(Call::ListBlobs(limit));
        let summary = self.blob.get()?;
        Ok(vec![BlobSummary {
            id: summary.id,
            filename: summary.filename,
            note: summary.note,
            created_at: summary.created_at,
        }])
    }

    fn delete_blob(&self, id: &BlobId) -> Result<DeleteResponse, ApiError> {
        self.record(Call::DeleteBlob(id.clone()));
        self.blob.get().map(|_| DeleteResponse { deleted: true })
    }

    fn ping(&self) -> Result<PingResponse, ApiError> {
        self.record(Call::Ping);
        Ok(PingResponse {
            ok: true,
            msg: Some("pong".to_string()),
        })
    }
}
