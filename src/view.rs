//! View module - Named form fields the controller reads and writes.
//!
//! The orchestrator never touches a view. Only
//! [`FormController`](crate::bindings::FormController) does, so any front end
//! (terminal, GUI, test double) can sit behind the [`View`] trait.

use std::collections::HashMap;
use std::fmt;

/// Text fields of the encrypt/decrypt form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Text to encrypt
    Plaintext,
    /// Password for encryption
    Password,
    /// Encryption result
    Ciphertext,
    /// Ciphertext to decrypt (pre-filled after an encrypt)
    CiphertextIn,
    /// Password for decryption
    PasswordIn,
    /// Decryption result
    Recovered,
    /// Optional filename stored with the ciphertext
    Filename,
    /// Optional note stored with the ciphertext
    Note,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Field::Plaintext => "plaintext",
            Field::Password => "password",
            Field::Ciphertext => "ciphertext",
            Field::CiphertextIn => "ciphertext_in",
            Field::PasswordIn => "password_in",
            Field::Recovered => "recovered",
            Field::Filename => "filename",
            Field::Note => "note",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Checkbox-style toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Toggle {
    AutoSave,
}

/// Access to form fields plus a user-visible alert channel.
pub trait View {
    /// Current value of a field, `None` if the view has no such field.
    fn value(&self, field: Field) -> Option<String>;

    /// Overwrite a field.
    fn set_value(&mut self, field: Field, value: &str);

    /// State of a toggle, `None` if the view has no such toggle.
    fn is_checked(&self, toggle: Toggle) -> Option<bool>;

    /// Show a blocking message to the user.
    fn alert(&mut self, message: &str);
}

/// In-memory form.
///
/// Used directly by tests and wrapped by the terminal front end.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    fields: HashMap<Field, String>,
    toggles: HashMap<Toggle, bool>,
    alerts: Vec<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field setter.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        self.fields.insert(field, value.into());
        self
    }

    /// Builder-style toggle setter.
    pub fn with_toggle(mut self, toggle: Toggle, checked: bool) -> Self {
        self.toggles.insert(toggle, checked);
        self
    }

    /// Field value as `&str`, empty when unset.
    pub fn get(&self, field: Field) -> &str {
        self.fields.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Alerts raised so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }
}

impl View for FormState {
    fn value(&self, field: Field) -> Option<String> {
        self.fields.get(&field).cloned()
    }

    fn set_value(&mut self, field: Field, value: &str) {
        self.fields.insert(field, value.to_string());
    }

    fn is_checked(&self, toggle: Toggle) -> Option<bool> {
        self.toggles.get(&toggle).copied()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
