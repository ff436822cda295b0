//! Contact entity and its editable field set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned contact identifier.
pub type ContactId = i64;

/// A persisted contact record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl Contact {
    /// Returns true when `term` occurs, ignoring case, in any text field.
    ///
    /// An empty term matches every contact.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.address,
            &self.notes,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// The five editable fields, as supplied by create and update requests.
///
/// Every field is optional on the wire. Absent optional fields become empty
/// strings when written, so an update always replaces all five columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ContactFields {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContactValidationError {
    #[error("Name is required")]
    MissingName,
}

/// Field values after validation, ready to be written to a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidContact {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub notes: String,
}

impl ContactFields {
    /// Convenience constructor used by callers that only know the name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Checks that `name` is present and non-empty and fills defaults.
    pub fn validate(self) -> Result<ValidContact, ContactValidationError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ContactValidationError::MissingName),
        };

        Ok(ValidContact {
            name,
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
            notes: self.notes.unwrap_or_default(),
        })
    }
}
