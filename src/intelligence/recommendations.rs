//! Time-bucketed action recommendations.
//!
//! Each contact is checked against every rule; a contact can land in several
//! buckets. Buckets keep contact iteration order with no dedup and no cap.

use serde::Serialize;

use crate::intelligence::insights::total_revenue;
use crate::intelligence::scoring::{calculate_score, HIGH_VALUE_SCORE};
use crate::types::Contact;
use crate::util::format_money;

const UPSELL_REVENUE_CEILING: f64 = 2_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationType {
    Outreach,
    Upsell,
    Relationship,
    Industry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Immediate,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationItem {
    #[serde(rename = "type")]
    pub kind: RecommendationType,
    pub priority: Priority,
    /// Subject contact's display name.
    pub contact: String,
    pub action: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NarrativeInsight {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: String,
    pub impact: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recommendations {
    pub immediate: Vec<RecommendationItem>,
    pub weekly: Vec<RecommendationItem>,
    pub monthly: Vec<RecommendationItem>,
    pub insights: Vec<NarrativeInsight>,
}

impl Recommendations {
    fn bucket_mut(&mut self, horizon: Horizon) -> &mut Vec<RecommendationItem> {
        match horizon {
            Horizon::Immediate => &mut self.immediate,
            Horizon::Weekly => &mut self.weekly,
            Horizon::Monthly => &mut self.monthly,
        }
    }
}

/// One recommendation rule: bucket, tag, texts and the predicate that fires it.
struct Rule {
    horizon: Horizon,
    kind: RecommendationType,
    priority: Priority,
    action: &'static str,
    reason: &'static str,
    applies: fn(&Contact, u32) -> bool,
}

fn has_no_revenue(contact: &Contact, _score: u32) -> bool {
    contact.revenue == 0.0
}

fn has_low_revenue(contact: &Contact, _score: u32) -> bool {
    contact.revenue > 0.0 && contact.revenue < UPSELL_REVENUE_CEILING
}

fn scores_high(_contact: &Contact, score: u32) -> bool {
    score > HIGH_VALUE_SCORE
}

fn is_tech_company(contact: &Contact, _score: u32) -> bool {
    contact.company_contains("tech")
}

const RULES: [Rule; 4] = [
    Rule {
        horizon: Horizon::Immediate,
        kind: RecommendationType::Outreach,
        priority: Priority::High,
        action: "Initial contact and qualification",
        reason: "New contact with no revenue",
        applies: has_no_revenue,
    },
    Rule {
        horizon: Horizon::Immediate,
        kind: RecommendationType::Upsell,
        priority: Priority::Medium,
        action: "Upsell opportunity identified",
        reason: "Low revenue but engaged customer",
        applies: has_low_revenue,
    },
    Rule {
        horizon: Horizon::Weekly,
        kind: RecommendationType::Relationship,
        priority: Priority::High,
        action: "Schedule check-in call",
        reason: "High-value contact needs attention",
        applies: scores_high,
    },
    Rule {
        horizon: Horizon::Monthly,
        kind: RecommendationType::Industry,
        priority: Priority::Medium,
        action: "Tech industry newsletter",
        reason: "Tech company - industry-specific content",
        applies: is_tech_company,
    },
];

fn narrative(contacts: &[Contact]) -> Vec<NarrativeInsight> {
    let active = contacts.iter().filter(|c| c.revenue > 0.0).count();
    let dormant = contacts.iter().filter(|c| c.revenue == 0.0).count();
    vec![
        NarrativeInsight {
            kind: "revenue",
            message: format!("Total pipeline value: {}", format_money(total_revenue(contacts))),
            impact: Priority::High,
        },
        NarrativeInsight {
            kind: "growth",
            message: format!(
                "{} active customers out of {} total contacts",
                active,
                contacts.len()
            ),
            impact: Priority::Medium,
        },
        NarrativeInsight {
            kind: "opportunity",
            message: format!("{} contacts with no revenue - potential growth area", dormant),
            impact: Priority::High,
        },
    ]
}

pub fn build_recommendations(contacts: &[Contact]) -> Recommendations {
    let mut recommendations = Recommendations::default();

    for contact in contacts {
        let score = calculate_score(contact);
        for rule in RULES.iter().filter(|r| (r.applies)(contact, score)) {
            recommendations.bucket_mut(rule.horizon).push(RecommendationItem {
                kind: rule.kind,
                priority: rule.priority,
                contact: contact.name.clone(),
                action: rule.action.to_string(),
                reason: rule.reason.to_string(),
            });
        }
    }

    recommendations.insights = narrative(contacts);
    recommendations
}
