//! Request handlers, one per operation of the contact service.
//!
//! Each handler takes the shared `AppState`, reads what it needs from the
//! store under a short lock, runs the pure intelligence functions and returns
//! a serializable response or a `CrmError`. Transports (the CLI, the MCP
//! server) only serialize.

pub mod contacts;
pub mod intelligence;

pub use contacts::{add_contact, list_contacts, search, top_clients};
pub use intelligence::{
    chat, get_analytics, get_insights, get_recommendations, health, predict_revenue,
    relationship_map,
};

#[cfg(test)]
pub(crate) mod test_utils {
    use crate::db::MemoryContactStore;
    use crate::random::ScriptedRandom;
    use crate::state::AppState;
    use crate::types::{Contact, CrmConfig};

    pub fn contact(id: &str, name: &str, email: &str, company: Option<&str>, revenue: f64) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
            revenue,
            created_at: format!("2024-01-{:0>2}T00:00:00.000000Z", id),
        }
    }

    /// Three contacts, newest last in insertion order.
    pub fn sample_contacts() -> Vec<Contact> {
        vec![
            contact("1", "Ann Lee", "ann@acme.io", Some("Acme Tech"), 12000.0),
            contact("2", "Bob", "bob@gmail.com", None, 0.0),
            contact("3", "Carla Mendes", "carla@globex.com", Some("Globex"), 1500.0),
        ]
    }

    /// State over `contacts` whose random draws all return `draw`.
    pub fn state_with(contacts: Vec<Contact>, draw: f64) -> AppState {
        AppState::with_rng(
            CrmConfig::default(),
            Box::new(MemoryContactStore::new(contacts)),
            Box::new(ScriptedRandom::constant(draw)),
        )
    }
}
