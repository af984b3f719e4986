use rusqlite::params;

use super::*;

const CONTACT_COLUMNS: &str = "id, name, email, company, revenue, created_at";

impl ContactDb {
    // =========================================================================
    // Contacts
    // =========================================================================

    /// Insert a contact and return the stored row.
    pub fn insert_new_contact(&self, new: &NewContact) -> Result<Contact, DbError> {
        let contact = stored_contact(new);
        self.conn.execute(
            "INSERT INTO contacts (id, name, email, company, revenue, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                contact.id,
                contact.name,
                contact.email,
                contact.company,
                contact.revenue,
                contact.created_at,
            ],
        )?;
        log::info!("Inserted contact {} ({})", contact.id, contact.name);
        Ok(contact)
    }

    /// Get a contact by ID.
    pub fn get_contact_by_id(&self, id: &str) -> Result<Option<Contact>, DbError> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?1"))?;
        let mut rows = stmt.query_map(params![id], Self::map_contact_row)?;
        match rows.next() {
            Some(row) => Ok(Some(row?)),
            None => Ok(None),
        }
    }

    /// Contacts newest first. `None` returns every row.
    pub fn get_contacts_by_recency(&self, limit: Option<usize>) -> Result<Vec<Contact>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![sql_limit(limit)], Self::map_contact_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Contacts by revenue, highest first.
    pub fn get_contacts_by_revenue(&self, limit: usize) -> Result<Vec<Contact>, DbError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             ORDER BY revenue DESC, created_at DESC
             LIMIT ?1"
        ))?;
        let rows = stmt.query_map(params![sql_limit(Some(limit))], Self::map_contact_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Case-insensitive substring search over name and email, newest first.
    /// Matching happens in Rust because SQLite's `LOWER` only folds ASCII.
    pub fn search_contacts_by_text(&self, query: &str, limit: usize) -> Result<Vec<Contact>, DbError> {
        let needle = query.to_lowercase();
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts
             ORDER BY created_at DESC, rowid DESC"
        ))?;
        let mut hits = Vec::new();
        for row in stmt.query_map([], Self::map_contact_row)? {
            if hits.len() >= limit {
                break;
            }
            let contact = row?;
            if contact.matches_query(&needle) {
                hits.push(contact);
            }
        }
        Ok(hits)
    }

    fn map_contact_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
        Ok(Contact {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
            company: row.get(3)?,
            revenue: row.get::<_, Option<f64>>(4)?.unwrap_or(0.0),
            created_at: row.get(5)?,
        })
    }
}

impl ContactStore for ContactDb {
    fn all_contacts(&self) -> Result<Vec<Contact>, DbError> {
        self.get_contacts_by_recency(None)
    }

    fn top_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError> {
        self.get_contacts_by_revenue(limit)
    }

    fn recent_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError> {
        self.get_contacts_by_recency(Some(limit))
    }

    fn get_contact(&self, id: &str) -> Result<Option<Contact>, DbError> {
        self.get_contact_by_id(id)
    }

    fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<Contact>, DbError> {
        self.search_contacts_by_text(query, limit)
    }

    fn insert_contact(&mut self, contact: &NewContact) -> Result<Contact, DbError> {
        self.insert_new_contact(contact)
    }
}

/// SQLite treats a negative LIMIT as "no limit".
fn sql_limit(limit: Option<usize>) -> i64 {
    limit
        .and_then(|l| i64::try_from(l).ok())
        .unwrap_or(-1)
}
