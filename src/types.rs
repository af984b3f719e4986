use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Config
// =============================================================================

/// Configuration stored in `~/.crm-assistant/config.json`.
///
/// Every field has a default, so an absent or partial file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrmConfig {
    /// SQLite file holding the contacts table. Defaults to
    /// `~/.crm-assistant/contacts.db`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<String>,
    #[serde(default = "default_contacts_limit")]
    pub contacts_limit: usize,
    #[serde(default = "default_top_clients_limit")]
    pub top_clients_limit: usize,
    /// How many revenue leaders the chat responder gets to rank against.
    #[serde(default = "default_chat_top_clients")]
    pub chat_top_clients: usize,
    #[serde(default = "default_search_limit")]
    pub search_limit: usize,
    /// Seed for every random draw (strategic edges, confidence, chat fallback).
    /// Unset means thread-local entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rng_seed: Option<u64>,
}

fn default_contacts_limit() -> usize {
    50
}
fn default_top_clients_limit() -> usize {
    5
}
fn default_chat_top_clients() -> usize {
    10
}
fn default_search_limit() -> usize {
    50
}

impl Default for CrmConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            contacts_limit: default_contacts_limit(),
            top_clients_limit: default_top_clients_limit(),
            chat_top_clients: default_chat_top_clients(),
            search_limit: default_search_limit(),
            rng_seed: None,
        }
    }
}

// =============================================================================
// Contacts
// =============================================================================

/// A row from the `contacts` table.
///
/// Owned by the store. The intelligence layer only ever reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub revenue: f64,
    #[serde(default, alias = "created_at", deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// Exports write `null` for unset columns; treat it like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Contact {
    /// Company text lowercased, or `None` when absent or empty.
    pub fn company_lower(&self) -> Option<String> {
        self.company
            .as_deref()
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }

    /// True when the lowercased company contains `keyword`.
    pub fn company_contains(&self, keyword: &str) -> bool {
        self.company_lower()
            .map(|c| c.contains(keyword))
            .unwrap_or(false)
    }

    /// True when the lowercased company contains any of `keywords`.
    pub fn company_contains_any(&self, keywords: &[&str]) -> bool {
        self.company_lower()
            .map(|c| keywords.iter().any(|k| c.contains(k)))
            .unwrap_or(false)
    }

    /// Everything after the first `@`, if any.
    pub fn email_domain(&self) -> Option<&str> {
        self.email.split('@').nth(1).filter(|d| !d.is_empty())
    }

    /// Case-insensitive substring match on name or email. `needle` must
    /// already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }

    pub fn is_gmail(&self) -> bool {
        self.email.contains("@gmail.com")
    }

    pub fn name_len(&self) -> usize {
        self.name.chars().count()
    }
}

/// Input for creating a contact. `name` and `email` are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub revenue: Option<f64>,
}
