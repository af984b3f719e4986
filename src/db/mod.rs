//! SQLite-backed contact storage.
//!
//! The database lives at `~/.crm-assistant/contacts.db` unless an explicit
//! path, the `CRM_ASSISTANT_DB` env var or the config's `databasePath` points
//! elsewhere (in that order). The
//! intelligence layer never touches it directly; request handlers go through
//! the `ContactStore` trait so tests and the JSON-file mode can swap in
//! `MemoryContactStore`.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use rusqlite::Connection;

use crate::types::{Contact, CrmConfig, NewContact};

pub mod contacts;
pub mod memory;
pub mod types;

pub use memory::MemoryContactStore;
pub use types::*;

/// Env var that overrides the config file's database path.
pub const DB_PATH_ENV: &str = "CRM_ASSISTANT_DB";

pub struct ContactDb {
    conn: Connection,
}

impl ContactDb {
    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// Open (or create) the database named by `config` and apply the schema.
    pub fn open(config: &CrmConfig) -> Result<Self, DbError> {
        let path = Self::db_path(config)?;
        Self::open_at(path)
    }

    /// Open a database at an explicit path. Useful for testing.
    pub fn open_at(path: PathBuf) -> Result<Self, DbError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(DbError::CreateDir)?;
            }
        }

        let conn = Connection::open(&path)?;

        // WAL so the MCP binary can read while the CLI writes
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;

        crate::migrations::run_migrations(&conn).map_err(DbError::Migration)?;

        log::debug!("Opened contacts database at {}", path.display());
        Ok(Self { conn })
    }

    /// An explicitly requested path (e.g. `--db`) wins; otherwise falls back
    /// to [`ContactDb::db_path`].
    pub fn resolve_path(explicit: Option<&Path>, config: &CrmConfig) -> Result<PathBuf, DbError> {
        match explicit {
            Some(path) if !path.as_os_str().is_empty() => Ok(path.to_path_buf()),
            _ => Self::db_path(config),
        }
    }

    /// Resolve the database path: `CRM_ASSISTANT_DB`, then the config's
    /// `databasePath`, then `~/.crm-assistant/contacts.db`.
    pub fn db_path(config: &CrmConfig) -> Result<PathBuf, DbError> {
        if let Ok(path) = std::env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = config.database_path.as_deref().filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
        let home = dirs::home_dir().ok_or(DbError::HomeDirNotFound)?;
        Ok(home.join(".crm-assistant").join("contacts.db"))
    }
}

/// Build the row a store persists for `new`: fresh id, current timestamp,
/// empty company collapsed to null and missing revenue defaulted to 0.
/// Timestamps are fixed-width so they sort as text.
pub(crate) fn stored_contact(new: &NewContact) -> Contact {
    Contact {
        id: uuid::Uuid::new_v4().to_string(),
        name: new.name.trim().to_string(),
        email: new.email.trim().to_string(),
        company: new
            .company
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        revenue: new.revenue.unwrap_or(0.0),
        created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    }
}
