//! View bindings - glue between a [`View`] and the [`Orchestrator`].
//!
//! Each operation reads named fields, runs one orchestrator flow, then
//! writes the result back or raises an alert. Errors are both alerted and
//! returned so callers can also act on them (exit codes, tests).

use crate::api::{BlobId, BlobRecord};
use crate::orchestrator::{FlowError, Orchestrator, SaveMeta, SaveTask};
use crate::view::{Field, Toggle, View};
use tracing::info;

/// Result of a successful encrypt.
#[derive(Debug)]
pub struct EncryptOutcome {
    pub ciphertext_b64: String,
    /// Background save, if auto-save was on. Safe to drop.
    pub autosave: Option<SaveTask>,
}

pub struct FormController {
    orchestrator: Orchestrator,
}

impl FormController {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Encrypt `plaintext` with `password` and show the ciphertext.
    ///
    /// On success the ciphertext goes to both the output field and the
    /// decrypt input. With auto-save on (the default when the view has no
    /// toggle) a background save is started with the ciphertext, filename
    /// and note only.
    pub fn encrypt<V: View>(&self, view: &mut V) -> Result<EncryptOutcome, FlowError> {
        let plaintext = view.value(Field::Plaintext).unwrap_or_default();
        let password = view.value(Field::Password).unwrap_or_default();

        let ciphertext_b64 = alert_on_err(view, self.orchestrator.encrypt(&plaintext, &password))?;

        view.set_value(Field::Ciphertext, &ciphertext_b64);
        view.set_value(Field::CiphertextIn, &ciphertext_b64);

        let autosave = if view.is_checked(Toggle::AutoSave).unwrap_or(true) {
            let meta = SaveMeta {
                filename: view.value(Field::Filename),
                note: view.value(Field::Note),
                owner: None,
            };
            Some(self.orchestrator.spawn_save(&ciphertext_b64, meta))
        } else {
            info!("Auto-save disabled");
            None
        };

        Ok(EncryptOutcome {
            ciphertext_b64,
            autosave,
        })
    }

    /// Decrypt the decrypt-input ciphertext and show the plaintext.
    pub fn decrypt<V: View>(&self, view: &mut V) -> Result<String, FlowError> {
        let ciphertext_b64 = view.value(Field::CiphertextIn).unwrap_or_default();
        let password = view.value(Field::PasswordIn).unwrap_or_default();

        let plaintext = alert_on_err(view, self.orchestrator.decrypt(&ciphertext_b64, &password))?;
        view.set_value(Field::Recovered, &plaintext);
        Ok(plaintext)
    }

    /// Put a stored ciphertext into the decrypt input, along with its
    /// filename and note.
    pub fn load<V: View>(&self, view: &mut V, id: &BlobId) -> Result<BlobRecord, FlowError> {
        let record = alert_on_err(view, self.orchestrator.load(id))?;

        view.set_value(Field::CiphertextIn, &record.ciphertext_b64);
        view.set_value(Field::Filename, record.filename.as_deref().unwrap_or(""));
        view.set_value(Field::Note, record.note.as_deref().unwrap_or(""));
        Ok(record)
    }
}

fn alert_on_err<V: View, T>(view: &mut V, result: Result<T, FlowError>) -> Result<T, FlowError> {
    if let Err(err) = &result {
        view.alert(&err.to_string());
    }
    result
}
