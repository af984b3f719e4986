// Contacts service
// Listing, creation, top clients and search. Creation is the only write path
// and the only operation that publishes an event.

use serde::Serialize;
use serde_json::json;

use crate::error::CrmError;
use crate::intelligence::scoring::HIGH_VALUE_SCORE;
use crate::intelligence::{calculate_score, predict_revenue};
use crate::notification::{now_rfc3339, ContactEvent, CONTACT_ADDED};
use crate::state::AppState;
use crate::types::{Contact, NewContact};
use crate::util::round_half_up;

const PRIORITY_REVENUE: f64 = 5000.0;

// =============================================================================
// Response types
// =============================================================================

/// A stored contact plus its computed score and forecast.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub ai_score: u32,
    pub predicted_revenue: f64,
    pub last_updated: String,
}

impl EnhancedContact {
    fn from_contact(contact: Contact, now: &str) -> Self {
        Self {
            ai_score: calculate_score(&contact),
            predicted_revenue: predict_revenue(&contact),
            last_updated: now.to_string(),
            contact,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactListMeta {
    pub total: usize,
    pub average_score: u32,
    pub high_value_contacts: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactList {
    pub contacts: Vec<EnhancedContact>,
    pub meta: ContactListMeta,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactInsights {
    pub priority: &'static str,
    pub category: &'static str,
    pub potential: &'static str,
}

/// A freshly created contact with its quick classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub ai_score: u32,
    pub predicted_revenue: f64,
    pub insights: ContactInsights,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContactCreated {
    pub contact: CreatedContact,
    pub message: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopClients {
    pub top: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub results: Vec<Contact>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Newest contacts first, each scored and forecast. `limit` defaults to the
/// configured `contactsLimit`.
pub fn list_contacts(state: &AppState, limit: Option<usize>) -> Result<ContactList, CrmError> {
    let limit = limit.unwrap_or(state.config.contacts_limit);
    let contacts = state.store.lock().recent_contacts(limit)?;

    let now = now_rfc3339();
    let enhanced: Vec<EnhancedContact> = contacts
        .into_iter()
        .map(|c| EnhancedContact::from_contact(c, &now))
        .collect();

    let meta = list_meta(&enhanced);
    log::info!("Listed {} contacts (limit {})", meta.total, limit);
    Ok(ContactList {
        contacts: enhanced,
        meta,
    })
}

fn list_meta(contacts: &[EnhancedContact]) -> ContactListMeta {
    let total = contacts.len();
    let average_score = if total == 0 {
        0
    } else {
        let sum: u32 = contacts.iter().map(|c| c.ai_score).sum();
        round_half_up(sum as f64 / total as f64) as u32
    };
    ContactListMeta {
        total,
        average_score,
        high_value_contacts: contacts
            .iter()
            .filter(|c| c.ai_score > HIGH_VALUE_SCORE)
            .count(),
    }
}

fn validate_new_contact(new: &NewContact) -> Result<(), CrmError> {
    if new.name.trim().is_empty() || new.email.trim().is_empty() {
        return Err(CrmError::Validation("name and email required".to_string()));
    }
    if let Some(revenue) = new.revenue {
        if !revenue.is_finite() || revenue < 0.0 {
            return Err(CrmError::Validation(
                "revenue must be a non-negative number".to_string(),
            ));
        }
    }
    Ok(())
}

fn classify_new_contact(contact: &Contact, predicted: f64) -> ContactInsights {
    ContactInsights {
        priority: if contact.revenue > PRIORITY_REVENUE { "high" } else { "medium" },
        category: if contact.company_contains("tech") { "tech" } else { "general" },
        potential: if predicted > contact.revenue { "upsell" } else { "maintain" },
    }
}

fn follow_up_advice(contact: &Contact, score: u32) -> Vec<String> {
    vec![
        if score > HIGH_VALUE_SCORE {
            "High-value contact - prioritize follow-up"
        } else {
            "Standard contact"
        }
        .to_string(),
        if contact.company_contains("tech") {
            "Tech industry - consider technical demos"
        } else {
            "General approach"
        }
        .to_string(),
        if contact.revenue > 0.0 {
            "Existing customer - focus on retention"
        } else {
            "New prospect - qualification needed"
        }
        .to_string(),
    ]
}

/// Validate, store, classify and announce a new contact.
pub fn add_contact(state: &AppState, new: &NewContact) -> Result<ContactCreated, CrmError> {
    validate_new_contact(new)?;

    let stored = state.store.lock().insert_contact(new)?;

    let ai_score = calculate_score(&stored);
    let predicted_revenue = predict_revenue(&stored);
    let recommendations = follow_up_advice(&stored, ai_score);
    let created = CreatedContact {
        insights: classify_new_contact(&stored, predicted_revenue),
        contact: stored,
        ai_score,
        predicted_revenue,
    };

    let delivered = state.hub.publish(ContactEvent::new(
        CONTACT_ADDED,
        json!({
            "contact": created,
            "message": format!("New contact added: {}", created.contact.name),
            "timestamp": now_rfc3339(),
        }),
    ));
    log::info!(
        "Added contact {} (score {}), notified {} subscriber(s)",
        created.contact.id,
        ai_score,
        delivered
    );

    Ok(ContactCreated {
        contact: created,
        message: "Contact added successfully with AI insights!".to_string(),
        recommendations,
    })
}

/// Highest revenue first. `limit` defaults to the configured `topClientsLimit`.
pub fn top_clients(state: &AppState, limit: Option<usize>) -> Result<TopClients, CrmError> {
    let limit = limit.unwrap_or(state.config.top_clients_limit);
    let top = state.store.lock().top_contacts(limit)?;
    Ok(TopClients { top })
}

/// Case-insensitive substring match on name or email. A blank query matches
/// nothing.
pub fn search(state: &AppState, query: &str) -> Result<SearchResults, CrmError> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResults { results: vec![] });
    }
    let results = state
        .store
        .lock()
        .search_contacts(query, state.config.search_limit)?;
    log::info!("Search '{}' matched {} contacts", query, results.len());
    Ok(SearchResults { results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_utils::test_db;
    use crate::random::ScriptedRandom;
    use crate::services::test_utils::{sample_contacts, state_with};
    use crate::types::CrmConfig;

    fn new_contact(name: &str, email: &str, company: Option<&str>, revenue: Option<f64>) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
            revenue,
        }
    }

    #[test]
    fn test_list_contacts_with_meta() {
        let state = state_with(sample_contacts(), 0.5);
        let list = list_contacts(&state, None).unwrap();
        let names: Vec<&str> = list.contacts.iter().map(|c| c.contact.name.as_str()).collect();
        assert_eq!(names, vec!["Carla Mendes", "Bob", "Ann Lee"]);
        // scores 37, 15, 57
        assert_eq!(
            list.meta,
            ContactListMeta {
                total: 3,
                average_score: 36,
                high_value_contacts: 0,
            }
        );
    }

    #[test]
    fn test_list_contacts_respects_limit() {
        let state = state_with(sample_contacts(), 0.5);
        let list = list_contacts(&state, Some(1)).unwrap();
        assert_eq!(list.meta.total, 1);
        assert_eq!(list.contacts[0].contact.name, "Carla Mendes");
    }

    #[test]
    fn test_list_contacts_empty_store() {
        let state = state_with(vec![], 0.5);
        let list = list_contacts(&state, None).unwrap();
        assert!(list.contacts.is_empty());
        assert_eq!(list.meta.average_score, 0);
    }

    #[test]
    fn test_enhanced_contact_flattens_fields() {
        let state = state_with(sample_contacts(), 0.5);
        let json = serde_json::to_value(list_contacts(&state, Some(1)).unwrap()).unwrap();
        let first = &json["contacts"][0];
        assert_eq!(first["name"], "Carla Mendes");
        assert_eq!(first["aiScore"], 37);
        assert!(first["lastUpdated"].is_string());
    }

    #[test]
    fn test_add_contact_requires_name_and_email() {
        let state = state_with(vec![], 0.5);
        let err = add_contact(&state, &new_contact("", "x@y.io", None, None)).unwrap_err();
        assert_eq!(err.to_string(), "name and email required");
        assert_eq!(err.status_code(), 400);

        let err = add_contact(&state, &new_contact("Ann", "  ", None, None)).unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
        assert!(state.store.lock().all_contacts().unwrap().is_empty());
    }

    #[test]
    fn test_add_contact_rejects_bad_revenue() {
        let state = state_with(vec![], 0.5);
        for revenue in [-1.0, f64::NAN, f64::INFINITY] {
            let err = add_contact(&state, &new_contact("Ann", "a@x.io", None, Some(revenue)))
                .unwrap_err();
            assert_eq!(err.status_code(), 400);
        }
    }

    #[test]
    fn test_add_high_value_contact() {
        let state = state_with(vec![], 0.5);
        let created = add_contact(
            &state,
            &new_contact("Maximilian Stone", "max@corp.com", Some("TechWorks"), Some(90000.0)),
        )
        .unwrap();

        assert_eq!(created.message, "Contact added successfully with AI insights!");
        assert_eq!(created.contact.ai_score, 100);
        assert_eq!(
            created.contact.insights,
            ContactInsights {
                priority: "high",
                category: "tech",
                potential: "upsell",
            }
        );
        assert_eq!(
            created.recommendations,
            vec![
                "High-value contact - prioritize follow-up",
                "Tech industry - consider technical demos",
                "Existing customer - focus on retention",
            ]
        );
    }

    #[test]
    fn test_add_new_prospect() {
        let state = state_with(vec![], 0.5);
        let created =
            add_contact(&state, &new_contact("Dee", "dee@gmail.com", Some(""), None)).unwrap();

        assert_eq!(created.contact.contact.company, None);
        assert_eq!(created.contact.contact.revenue, 0.0);
        assert_eq!(created.contact.predicted_revenue, 0.0);
        assert_eq!(created.contact.insights.potential, "maintain");
        assert_eq!(created.contact.insights.priority, "medium");
        assert_eq!(
            created.recommendations,
            vec![
                "Standard contact",
                "General approach",
                "New prospect - qualification needed",
            ]
        );
        assert_eq!(state.store.lock().all_contacts().unwrap().len(), 1);
    }

    #[test]
    fn test_add_contact_publishes_event() {
        let state = state_with(vec![], 0.5);
        let mut rx = state.hub.subscribe();

        add_contact(&state, &new_contact("Ann", "ann@acme.io", None, Some(100.0))).unwrap();

        let event = rx.try_recv().expect("contact_added event");
        assert_eq!(event.kind, "contact_added");
        assert_eq!(event.data["message"], "New contact added: Ann");
        assert_eq!(event.data["contact"]["name"], "Ann");
        assert_eq!(event.data["contact"]["insights"]["category"], "general");
    }

    #[test]
    fn test_failed_add_publishes_nothing() {
        let state = state_with(vec![], 0.5);
        let mut rx = state.hub.subscribe();
        let _ = add_contact(&state, &new_contact("", "", None, None));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_top_clients_default_limit() {
        let mut contacts = sample_contacts();
        for i in 4..10 {
            contacts.push(crate::services::test_utils::contact(
                &i.to_string(),
                &format!("Extra {}", i),
                "e@x.io",
                None,
                (i * 100) as f64,
            ));
        }
        let state = state_with(contacts, 0.5);
        let top = top_clients(&state, None).unwrap().top;
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].name, "Ann Lee");
        assert_eq!(top[1].name, "Carla Mendes");
        assert_eq!(top_clients(&state, Some(2)).unwrap().top.len(), 2);
    }

    #[test]
    fn test_search_trims_and_matches() {
        let state = state_with(sample_contacts(), 0.5);
        let results = search(&state, "  GLOBEX ").unwrap().results;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Carla Mendes");
        assert!(search(&state, "   ").unwrap().results.is_empty());
    }

    #[test]
    fn test_add_then_list_on_sqlite() {
        let state = AppState::with_rng(
            CrmConfig::default(),
            Box::new(test_db()),
            Box::new(ScriptedRandom::constant(0.5)),
        );
        add_contact(&state, &new_contact("First", "f@x.io", None, Some(10.0))).unwrap();
        add_contact(&state, &new_contact("Second", "s@x.io", Some("Acme Tech"), Some(20.0))).unwrap();

        let list = list_contacts(&state, None).unwrap();
        let names: Vec<&str> = list.contacts.iter().map(|c| c.contact.name.as_str()).collect();
        assert_eq!(names, vec!["Second", "First"]);
        assert_eq!(search(&state, "SECOND").unwrap().results.len(), 1);
        assert_eq!(top_clients(&state, Some(1)).unwrap().top[0].name, "Second");
    }
}
