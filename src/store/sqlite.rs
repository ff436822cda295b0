//! SQLite-backed contact store.
//!
//! # Responsibilities
//! - Open file or in-memory databases and bootstrap the `contacts` table
//! - Map rows to `Contact` values
//! - Run each mutation inside its own transaction
//!
//! # Invariants
//! - Write paths validate fields before any SQL mutation
//! - A failed mutation leaves the table untouched (transaction is dropped,
//!   which rolls back)

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::store::contact::{Contact, ContactFields, ContactId};
use crate::store::error::{StoreError, StoreResult};
use crate::store::location::DatabaseLocation;
use crate::store::ContactStore;

const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS contacts (
    id      INTEGER PRIMARY KEY AUTOINCREMENT,
    name    TEXT NOT NULL,
    email   TEXT NOT NULL DEFAULT '',
    phone   TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT '',
    notes   TEXT NOT NULL DEFAULT ''
);";

const CONTACT_SELECT_SQL: &str = "SELECT id, name, email, phone, address, notes FROM contacts";

/// Contact store over a single guarded SQLite connection.
pub struct SqliteContactStore {
    conn: Mutex<Connection>,
}

impl SqliteContactStore {
    /// Opens the database at `location` and ensures the schema exists.
    pub fn open(location: &DatabaseLocation, busy_timeout: Duration) -> StoreResult<Self> {
        let started_at = Instant::now();
        let conn = match location {
            DatabaseLocation::Memory => Connection::open_in_memory()?,
            DatabaseLocation::File(path) => {
                let conn = Connection::open(path)?;
                conn.busy_timeout(busy_timeout)?;
                let mode: String = conn.pragma_update_and_check(
                    None,
                    "journal_mode",
                    "WAL",
                    |row| row.get(0),
                )?;
                tracing::debug!(journal_mode = %mode, "Journal mode set");
                conn
            }
        };

        conn.execute_batch(SCHEMA_SQL)?;

        tracing::info!(
            database = %location,
            duration_ms = started_at.elapsed().as_millis() as u64,
            "Contact store opened"
        );

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::open(&DatabaseLocation::Memory, Duration::ZERO)
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}

impl ContactStore for SqliteContactStore {
    fn list_all(&self) -> StoreResult<Vec<Contact>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare_cached(&format!("{CONTACT_SELECT_SQL} ORDER BY id"))?;
        let contacts = stmt
            .query_map([], map_contact)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(contacts)
    }

    fn get(&self, id: ContactId) -> StoreResult<Contact> {
        let conn = self.lock()?;
        find(&conn, id)?.ok_or(StoreError::NotFound(id))
    }

    fn create(&self, fields: ContactFields) -> StoreResult<Contact> {
        let valid = fields.validate()?;

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute(
            "INSERT INTO contacts (name, email, phone, address, notes)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                valid.name,
                valid.email,
                valid.phone,
                valid.address,
                valid.notes
            ],
        )?;
        let id = tx.last_insert_rowid();
        let contact = fetch_in(&tx, id)?;
        tx.commit()?;

        tracing::info!(contact_id = id, "Contact created");
        Ok(contact)
    }

    fn update(&self, id: ContactId, fields: ContactFields) -> StoreResult<Contact> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        if find(&tx, id)?.is_none() {
            return Err(StoreError::NotFound(id));
        }
        let valid = fields.validate()?;

        tx.execute(
            "UPDATE contacts
             SET name = ?1, email = ?2, phone = ?3, address = ?4, notes = ?5
             WHERE id = ?6",
            params![
                valid.name,
                valid.email,
                valid.phone,
                valid.address,
                valid.notes,
                id
            ],
        )?;
        let contact = fetch_in(&tx, id)?;
        tx.commit()?;

        tracing::info!(contact_id = id, "Contact updated");
        Ok(contact)
    }

    fn delete(&self, id: ContactId) -> StoreResult<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let changed = tx.execute("DELETE FROM contacts WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        tx.commit()?;

        tracing::info!(contact_id = id, "Contact deleted");
        Ok(())
    }
}

fn find(conn: &Connection, id: ContactId) -> StoreResult<Option<Contact>> {
    let contact = conn
        .query_row(
            &format!("{CONTACT_SELECT_SQL} WHERE id = ?1"),
            params![id],
            map_contact,
        )
        .optional()?;
    Ok(contact)
}

fn fetch_in(tx: &Transaction<'_>, id: ContactId) -> StoreResult<Contact> {
    find(tx, id)?.ok_or(StoreError::NotFound(id))
}

fn map_contact(row: &Row<'_>) -> rusqlite::Result<Contact> {
    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        address: row.get(4)?,
        notes: row.get(5)?,
    })
}
