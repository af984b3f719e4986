//! Portfolio insights: revenue rollups, rankings, relationship graph and trends.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::intelligence::prediction::{draw_confidence, predict_revenue};
use crate::intelligence::relationships::{find_connections, Connection};
use crate::intelligence::scoring::{score_factors, ScoreFactors};
use crate::random::RandomSource;
use crate::types::Contact;
use crate::util::{desc, round_half_up};

pub const HIGH_VALUE_REVENUE: f64 = 10_000.0;

/// Sum of all revenue.
pub fn total_revenue(contacts: &[Contact]) -> f64 {
    contacts.iter().map(|c| c.revenue).sum()
}

/// Rounded mean revenue; 0 for an empty collection.
pub fn average_revenue(contacts: &[Contact]) -> f64 {
    if contacts.is_empty() {
        return 0.0;
    }
    round_half_up(total_revenue(contacts) / contacts.len() as f64)
}

pub fn count_high_value(contacts: &[Contact]) -> usize {
    contacts.iter().filter(|c| c.revenue > HIGH_VALUE_REVENUE).count()
}

pub fn count_tech(contacts: &[Contact]) -> usize {
    contacts.iter().filter(|c| c.company_contains("tech")).count()
}

/// Contacts whose email is not a personal gmail address.
pub fn count_enterprise(contacts: &[Contact]) -> usize {
    contacts.iter().filter(|c| !c.is_gmail()).count()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyPerformance {
    pub revenue: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueForecast {
    pub contact_id: String,
    pub name: String,
    pub current_revenue: f64,
    pub predicted_revenue: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactScore {
    pub contact_id: String,
    pub name: String,
    pub score: u32,
    pub factors: ScoreFactors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Trends {
    pub high_value_contacts: usize,
    pub tech_companies: usize,
    pub enterprise_domains: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_contacts: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
    /// Keyed by company name as stored.
    pub top_performing_companies: BTreeMap<String, CompanyPerformance>,
    /// Highest predicted revenue first.
    pub revenue_predictions: Vec<RevenueForecast>,
    /// Highest score first.
    pub contact_scores: Vec<ContactScore>,
    pub relationship_map: Vec<Connection>,
    pub trends: Trends,
}

pub fn company_rollup(contacts: &[Contact]) -> BTreeMap<String, CompanyPerformance> {
    let mut rollup: BTreeMap<String, CompanyPerformance> = BTreeMap::new();
    for contact in contacts {
        if let Some(company) = contact.company.as_deref().filter(|c| !c.is_empty()) {
            let entry = rollup.entry(company.to_string()).or_default();
            entry.revenue += contact.revenue;
            entry.count += 1;
        }
    }
    rollup
}

/// Build the insights view. The graph's strategic draws are taken before the
/// per-contact confidence draws.
pub fn build_insights(contacts: &[Contact], rng: &mut dyn RandomSource) -> Insights {
    let relationship_map = find_connections(contacts, rng);

    let mut revenue_predictions: Vec<RevenueForecast> = Vec::with_capacity(contacts.len());
    let mut contact_scores: Vec<ContactScore> = Vec::with_capacity(contacts.len());

    for contact in contacts {
        revenue_predictions.push(RevenueForecast {
            contact_id: contact.id.clone(),
            name: contact.name.clone(),
            current_revenue: contact.revenue,
            predicted_revenue: predict_revenue(contact),
            confidence: draw_confidence(rng),
        });

        let factors = score_factors(contact);
        contact_scores.push(ContactScore {
            contact_id: contact.id.clone(),
            name: contact.name.clone(),
            score: factors.score(),
            factors,
        });
    }

    contact_scores.sort_by(|a, b| b.score.cmp(&a.score));
    revenue_predictions.sort_by(|a, b| desc(a.predicted_revenue, b.predicted_revenue));

    Insights {
        total_contacts: contacts.len(),
        total_revenue: total_revenue(contacts),
        average_revenue: average_revenue(contacts),
        top_performing_companies: company_rollup(contacts),
        revenue_predictions,
        contact_scores,
        relationship_map,
        trends: Trends {
            high_value_contacts: count_high_value(contacts),
            tech_companies: count_tech(contacts),
            enterprise_domains: count_enterprise(contacts),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn contact(id: &str, name: &str, email: &str, company: Option<&str>, revenue: f64) -> Contact {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
            revenue,
            created_at: String::new(),
        }
    }

    fn sample() -> Vec<Contact> {
        vec![
            contact("a", "Ann", "ann@gmail.com", Some("Acme"), 1000.0),
            contact("b", "Alex Techsworth", "alex@techcorp.com", Some("TechCorp"), 12000.0),
            contact("c", "Cy", "cy@acme.io", Some("Acme"), 500.0),
            contact("d", "Dee", "dee@gmail.com", None, 0.0),
        ]
    }

    #[test]
    fn test_totals_and_average() {
        let insights = build_insights(&sample(), &mut ScriptedRandom::constant(0.99));
        assert_eq!(insights.total_contacts, 4);
        assert_eq!(insights.total_revenue, 13500.0);
        // 3375
        assert_eq!(insights.average_revenue, 3375.0);
    }

    #[test]
    fn test_company_rollup() {
        let insights = build_insights(&sample(), &mut ScriptedRandom::constant(0.99));
        let acme = &insights.top_performing_companies["Acme"];
        assert_eq!(acme.revenue, 1500.0);
        assert_eq!(acme.count, 2);
        assert_eq!(insights.top_performing_companies.len(), 2);
    }

    #[test]
    fn test_rankings_sorted_descending() {
        let insights = build_insights(&sample(), &mut ScriptedRandom::constant(0.99));
        assert_eq!(insights.contact_scores[0].contact_id, "b");
        assert_eq!(insights.contact_scores[0].score, 62);
        assert!(insights
            .contact_scores
            .windows(2)
            .all(|w| w[0].score >= w[1].score));

        assert_eq!(insights.revenue_predictions[0].contact_id, "b");
        assert!(insights
            .revenue_predictions
            .windows(2)
            .all(|w| w[0].predicted_revenue >= w[1].predicted_revenue));
        assert_eq!(insights.revenue_predictions.last().unwrap().predicted_revenue, 0.0);
    }

    #[test]
    fn test_trends() {
        let insights = build_insights(&sample(), &mut ScriptedRandom::constant(0.99));
        assert_eq!(
            insights.trends,
            Trends {
                high_value_contacts: 1,
                tech_companies: 1,
                enterprise_domains: 2,
            }
        );
    }

    #[test]
    fn test_confidence_drawn_after_graph() {
        // 6 pairs consume the first 6 draws; the remaining 4 go to confidence.
        let mut draws = vec![0.99; 6];
        draws.extend([0.0, 0.0, 0.0, 0.0]);
        let mut rng = ScriptedRandom::new(draws);
        let insights = build_insights(&sample(), &mut rng);
        assert_eq!(rng.draws(), 10);
        assert!(insights
            .revenue_predictions
            .iter()
            .all(|p| (p.confidence - 0.7).abs() < 1e-9));
        assert!(insights
            .relationship_map
            .iter()
            .all(|e| e.connection_type != crate::intelligence::ConnectionType::Strategic));
    }

    #[test]
    fn test_empty_collection() {
        let insights = build_insights(&[], &mut ScriptedRandom::constant(0.5));
        assert_eq!(insights.total_contacts, 0);
        assert_eq!(insights.total_revenue, 0.0);
        assert_eq!(insights.average_revenue, 0.0);
        assert!(insights.top_performing_companies.is_empty());
        assert!(insights.relationship_map.is_empty());
    }
}
