//! blobcrypt - client for a password-based encryption service.
//!
//! The service does all the cryptography (PBKDF2 + AES-256-GCM) and stores
//! ciphertext. This crate provides:
//! - Typed HTTP access to its endpoints ([`api`])
//! - Encrypt/decrypt/save flows with input validation and fire-and-forget
//!   auto-save ([`orchestrator`])
//! - A view-binding layer that maps those flows onto named form fields
//!   ([`bindings`], [`view`])
//! - TOML configuration ([`config`])

pub mod api;
pub mod bindings;
pub mod config;
pub mod orchestrator;
pub mod view;

#[cfg(test)]
mod testing;

// Re-export main types
pub use api::{ApiError, Backend, BlobId, HttpBackend};
pub use bindings::{EncryptOutcome, FormController};
pub use config::Config;
pub use orchestrator::{FlowError, Orchestrator, SaveDefaults, SaveMeta, SaveTask};
pub use view::{Field, FormState, Toggle, View};
