//! Contact persistence subsystem.
//!
//! # Data Flow
//! ```text
//! handler
//!     → ContactFields (wire shape, all optional)
//!     → validate() → ValidContact
//!     → ContactStore (one transaction per call)
//!     → contacts table
//! ```
//!
//! # Design Decisions
//! - Name validation happens before any SQL runs
//! - Every operation is atomic with respect to the single row it touches
//! - Search is a linear scan with case-insensitive containment per field

pub mod contact;
pub mod error;
pub mod location;
pub mod sqlite;

pub use contact::{Contact, ContactFields, ContactId, ContactValidationError, ValidContact};
pub use error::{StoreError, StoreResult};
pub use location::{DatabaseLocation, DatabaseUrlError};
pub use sqlite::SqliteContactStore;

/// Storage contract for contacts.
///
/// Implementations are synchronous; async callers run them on a blocking
/// thread.
pub trait ContactStore: Send + Sync {
    /// Every contact in storage order.
    fn list_all(&self) -> StoreResult<Vec<Contact>>;

    fn get(&self, id: ContactId) -> StoreResult<Contact>;

    /// Validates `fields` and inserts a new row with a fresh id.
    fn create(&self, fields: ContactFields) -> StoreResult<Contact>;

    /// Overwrites all five editable fields of an existing contact.
    fn update(&self, id: ContactId, fields: ContactFields) -> StoreResult<Contact>;

    fn delete(&self, id: ContactId) -> StoreResult<()>;

    /// Contacts where `term` occurs case-insensitively in any text field.
    fn search(&self, term: &str) -> StoreResult<Vec<Contact>> {
        let contacts = self.list_all()?;
        if term.is_empty() {
            return Ok(contacts);
        }
        Ok(contacts.into_iter().filter(|c| c.matches(term)).collect())
    }
}
