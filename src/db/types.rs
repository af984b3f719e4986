//! Shared type definitions for the database layer.

use thiserror::Error;

use crate::types::{Contact, NewContact};

/// Errors specific to database operations.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Home directory not found")]
    HomeDirNotFound,

    #[error("Failed to create database directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Failed to load contacts file: {0}")]
    Import(String),
}

/// Read access to the contact collection plus the single insert the
/// request handlers need. Implementations never expose partial writes.
pub trait ContactStore {
    /// All contacts, newest first.
    fn all_contacts(&self) -> Result<Vec<Contact>, DbError>;

    /// Up to `limit` contacts by revenue, highest first.
    fn top_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError>;

    /// Up to `limit` contacts, newest first.
    fn recent_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError>;

    fn get_contact(&self, id: &str) -> Result<Option<Contact>, DbError>;

    /// Case-insensitive substring match on name or email.
    fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<Contact>, DbError>;

    /// Persist a validated contact and return the stored row.
    fn insert_contact(&mut self, contact: &NewContact) -> Result<Contact, DbError>;
}
