// Intelligence service
// Read-only views over the whole contact collection: insights, analytics,
// recommendations, the relationship map, single-contact forecasts and chat.

use serde::Serialize;

use crate::error::CrmError;
use crate::intelligence::{
    build_analytics, build_insights, build_recommendations, build_relationship_map,
    predict_contact, respond, Analytics, Insights, Recommendations, RelationshipMap,
    RevenuePrediction,
};
use crate::notification::now_rfc3339;
use crate::state::AppState;

pub const FEATURES: [&str; 4] = [
    "AI Analytics",
    "Real-time Updates",
    "Relationship Mapping",
    "Revenue Prediction",
];

#[derive(Debug, Clone, Serialize)]
pub struct InsightsResponse {
    pub insights: Insights,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsResponse {
    pub analytics: Analytics,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationsResponse {
    pub recommendations: Recommendations,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionResponse {
    pub prediction: RevenuePrediction,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub ok: bool,
    pub features: Vec<&'static str>,
    pub connections: usize,
}

pub fn health(state: &AppState) -> Health {
    Health {
        ok: true,
        features: FEATURES.to_vec(),
        connections: state.hub.subscriber_count(),
    }
}

/// Aggregate insights over every contact, newest first.
pub fn get_insights(state: &AppState) -> Result<InsightsResponse, CrmError> {
    let contacts = state.store.lock().all_contacts()?;
    let mut rng = state.rng.lock();
    let insights = build_insights(&contacts, &mut **rng);
    log::info!(
        "Built insights for {} contacts ({} connections)",
        insights.total_contacts,
        insights.relationship_map.len()
    );
    Ok(InsightsResponse { insights })
}

pub fn get_analytics(state: &AppState) -> Result<AnalyticsResponse, CrmError> {
    let contacts = state.store.lock().all_contacts()?;
    let analytics = build_analytics(&contacts);
    log::info!("Built analytics for {} contacts", contacts.len());
    Ok(AnalyticsResponse { analytics })
}

pub fn get_recommendations(state: &AppState) -> Result<RecommendationsResponse, CrmError> {
    let contacts = state.store.lock().all_contacts()?;
    let recommendations = build_recommendations(&contacts);
    log::info!(
        "Recommendations: {} immediate, {} weekly, {} monthly",
        recommendations.immediate.len(),
        recommendations.weekly.len(),
        recommendations.monthly.len()
    );
    Ok(RecommendationsResponse { recommendations })
}

pub fn relationship_map(state: &AppState) -> Result<RelationshipMap, CrmError> {
    let contacts = state.store.lock().all_contacts()?;
    let mut rng = state.rng.lock();
    let map = build_relationship_map(&contacts, &mut **rng);
    log::info!(
        "Relationship map: {} nodes, {} connections",
        map.stats.total_nodes,
        map.stats.total_connections
    );
    Ok(map)
}

/// Forecast for one contact. Unknown ids are `NotFound`.
pub fn predict_revenue(state: &AppState, contact_id: &str) -> Result<PredictionResponse, CrmError> {
    let contact = state
        .store
        .lock()
        .get_contact(contact_id)?
        .ok_or_else(|| CrmError::NotFound(contact_id.to_string()))?;
    let mut rng = state.rng.lock();
    let prediction = predict_contact(&contact, &mut **rng);
    Ok(PredictionResponse { prediction })
}

/// Answer a free-text question. Blank messages are rejected.
pub fn chat(state: &AppState, message: &str) -> Result<ChatReply, CrmError> {
    if message.trim().is_empty() {
        return Err(CrmError::Validation("Message is required".to_string()));
    }

    let (contacts, top_clients) = {
        let store = state.store.lock();
        (
            store.all_contacts()?,
            store.top_contacts(state.config.chat_top_clients)?,
        )
    };

    let mut rng = state.rng.lock();
    let response = respond(message, &contacts, &top_clients, &mut **rng);
    log::info!("Answered chat message over {} contacts", contacts.len());

    Ok(ChatReply {
        response,
        timestamp: now_rfc3339(),
    })
}
