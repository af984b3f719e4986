//! `Vec`-backed contact store for tests and the JSON-file CLI mode.

use std::path::Path;

use super::{stored_contact, ContactStore, DbError};
use crate::types::{Contact, NewContact};
use crate::util::desc;

#[derive(Debug, Clone, Default)]
pub struct MemoryContactStore {
    /// Insertion order; later entries are newer on `created_at` ties.
    contacts: Vec<Contact>,
}

impl MemoryContactStore {
    pub fn new(contacts: Vec<Contact>) -> Self {
        Self { contacts }
    }

    /// Load a JSON array of contacts, e.g. an export of the `contacts` table.
    pub fn from_json_file(path: &Path) -> Result<Self, DbError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| DbError::Import(format!("{}: {}", path.display(), e)))?;
        let contacts: Vec<Contact> = serde_json::from_str(&content)
            .map_err(|e| DbError::Import(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded {} contacts from {}", contacts.len(), path.display());
        Ok(Self::new(contacts))
    }

    fn newest_first(&self) -> Vec<Contact> {
        let mut sorted: Vec<Contact> = self.contacts.iter().rev().cloned().collect();
        sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        sorted
    }
}

impl ContactStore for MemoryContactStore {
    fn all_contacts(&self) -> Result<Vec<Contact>, DbError> {
        Ok(self.newest_first())
    }

    fn top_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError> {
        let mut sorted = self.newest_first();
        sorted.sort_by(|a, b| desc(a.revenue, b.revenue));
        sorted.truncate(limit);
        Ok(sorted)
    }

    fn recent_contacts(&self, limit: usize) -> Result<Vec<Contact>, DbError> {
        let mut sorted = self.newest_first();
        sorted.truncate(limit);
        Ok(sorted)
    }

    fn get_contact(&self, id: &str) -> Result<Option<Contact>, DbError> {
        Ok(self.contacts.iter().find(|c| c.id == id).cloned())
    }

    fn search_contacts(&self, query: &str, limit: usize) -> Result<Vec<Contact>, DbError> {
        let needle = query.to_lowercase();
        Ok(self
            .newest_first()
            .into_iter()
            .filter(|c| c.matches_query(&needle))
            .take(limit)
            .collect())
    }

    fn insert_contact(&mut self, contact: &NewContact) -> Result<Contact, DbError> {
        let stored = stored_contact(contact);
        self.contacts.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(id: &str, name: &str, revenue: f64, created_at: &str) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            company: None,
            revenue,
            created_at: created_at.to_string(),
        }
    }

    fn sample() -> MemoryContactStore {
        MemoryContactStore::new(vec![
            contact("1", "Old", 500.0, "2024-01-01T00:00:00.000000Z"),
            contact("2", "New", 9000.0, "2024-03-01T00:00:00.000000Z"),
            contact("3", "Mid", 2500.0, "2024-02-01T00:00:00.000000Z"),
        ])
    }

    fn names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_all_contacts_newest_first() {
        let store = sample();
        assert_eq!(names(&store.all_contacts().unwrap()), vec!["New", "Mid", "Old"]);
        assert_eq!(names(&store.recent_contacts(1).unwrap()), vec!["New"]);
    }

    #[test]
    fn test_top_contacts() {
        let store = sample();
        assert_eq!(names(&store.top_contacts(2).unwrap()), vec!["New", "Mid"]);
    }

    #[test]
    fn test_search_and_lookup() {
        let store = sample();
        assert_eq!(names(&store.search_contacts("MID", 50).unwrap()), vec!["Mid"]);
        assert_eq!(store.search_contacts("example.com", 2).unwrap().len(), 2);
        assert_eq!(store.get_contact("1").unwrap().map(|c| c.name), Some("Old".to_string()));
        assert!(store.get_contact("missing").unwrap().is_none());
    }

    #[test]
    fn test_insert_is_newest() {
        let mut store = sample();
        let stored = store
            .insert_contact(&NewContact {
                name: "Fresh".into(),
                email: "fresh@x.io".into(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(store.all_contacts().unwrap().len(), 4);
        assert_eq!(store.all_contacts().unwrap()[0].id, stored.id);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("contacts.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","name":"Ann","email":"ann@acme.io","company":"Acme","revenue":1200,"createdAt":"2024-01-01T00:00:00Z"},
                {"id":"b","name":"Bo"}]"#,
        )
        .unwrap();
        let store = MemoryContactStore::from_json_file(&path).unwrap();
        assert_eq!(store.all_contacts().unwrap().len(), 2);
        let bo = store.get_contact("b").unwrap().unwrap();
        assert_eq!(bo.revenue, 0.0);
        assert_eq!(bo.company, None);
    }

    #[test]
    fn test_search_folds_non_ascii_case() {
        let store = MemoryContactStore::new(vec![contact(
            "1",
            "Émile Zola",
            0.0,
            "2024-01-01T00:00:00.000000Z",
        )]);
        assert_eq!(store.search_contacts("Émile", 50).unwrap().len(), 1);
        assert_eq!(store.search_contacts("éMILE", 50).unwrap().len(), 1);
    }

    #[test]
    fn test_from_json_file_accepts_null_columns() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("contacts.json");
        std::fs::write(
            &path,
            r#"[{"id":"a","name":"Ann","email":"a@x.io","company":null,"revenue":null},
                {"id":"b","name":"Bo","email":null,"revenue":250,"createdAt":null}]"#,
        )
        .unwrap();
        let store = MemoryContactStore::from_json_file(&path).unwrap();
        let ann = store.get_contact("a").unwrap().unwrap();
        assert_eq!(ann.revenue, 0.0);
        assert_eq!(ann.company, None);
        let bo = store.get_contact("b").unwrap().unwrap();
        assert_eq!(bo.email, "");
        assert_eq!(bo.email_domain(), None);
        assert_eq!(bo.created_at, "");
        assert_eq!(bo.revenue, 250.0);
    }

    #[test]
    fn test_from_json_file_reports_bad_input() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("contacts.json");
        std::fs::write(&path, "not json").unwrap();
        let err = MemoryContactStore::from_json_file(&path).unwrap_err();
        assert!(matches!(err, DbError::Import(_)));
    }
}
