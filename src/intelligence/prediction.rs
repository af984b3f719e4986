//! Revenue prediction.
//!
//! `predicted = round(revenue * 1.2 * companySize * emailDomain * nameLength * revenue)`.
//! The raw revenue is itself one of the multiplied factors, so the prediction
//! grows with the square of current revenue and is always 0 at zero revenue.

use serde::Serialize;

use crate::random::RandomSource;
use crate::types::Contact;

const GROWTH_BASE: f64 = 1.2;
const UPSELL_REVENUE_CEILING: f64 = 5000.0;

/// Multiplicative factors for one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionFactors {
    pub company_size: f64,
    pub email_domain: f64,
    pub name_length: f64,
    pub current_revenue: f64,
}

impl PredictionFactors {
    pub fn product(&self) -> f64 {
        self.company_size * self.email_domain * self.name_length * self.current_revenue
    }
}

fn has_large_company(contact: &Contact) -> bool {
    contact
        .company
        .as_deref()
        .map(|c| c.chars().count() > 10)
        .unwrap_or(false)
}

fn has_long_name(contact: &Contact) -> bool {
    contact.name_len() > 15
}

pub fn prediction_factors(contact: &Contact) -> PredictionFactors {
    PredictionFactors {
        company_size: if has_large_company(contact) { 1.5 } else { 1.0 },
        email_domain: if contact.is_gmail() { 0.8 } else { 1.2 },
        name_length: if has_long_name(contact) { 1.3 } else { 1.0 },
        current_revenue: contact.revenue,
    }
}

/// Predicted revenue in whole currency units.
pub fn predict_revenue(contact: &Contact) -> f64 {
    let base = contact.revenue * GROWTH_BASE;
    let predicted = (base * prediction_factors(contact).product()).round();
    if predicted.is_finite() {
        predicted.max(0.0)
    } else {
        0.0
    }
}

/// Confidence attached to a prediction, uniform in `[0.7, 1.0)`.
pub fn draw_confidence(rng: &mut dyn RandomSource) -> f64 {
    rng.next_f64() * 0.3 + 0.7
}

// =============================================================================
// Per-contact forecast
// =============================================================================

/// Human-readable labels for the prediction factors.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionLabels {
    pub company_size: &'static str,
    pub email_domain: &'static str,
    pub name_length: &'static str,
    pub current_value: f64,
}

/// Forecast for a single contact with labels and advice.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePrediction {
    pub contact_id: String,
    pub name: String,
    pub current_revenue: f64,
    pub predicted_revenue: f64,
    pub confidence: f64,
    pub factors: PredictionLabels,
    pub recommendations: Vec<String>,
}

pub fn prediction_labels(contact: &Contact) -> PredictionLabels {
    PredictionLabels {
        company_size: if has_large_company(contact) { "Large" } else { "Small" },
        email_domain: if contact.is_gmail() { "Personal" } else { "Business" },
        name_length: if has_long_name(contact) { "Long" } else { "Short" },
        current_value: contact.revenue,
    }
}

pub fn prediction_advice(contact: &Contact) -> Vec<String> {
    vec![
        if contact.revenue < UPSELL_REVENUE_CEILING {
            "Focus on upselling opportunities"
        } else {
            "Maintain relationship"
        }
        .to_string(),
        if contact.company_contains("tech") {
            "Tech industry - high potential"
        } else {
            "Consider industry-specific approach"
        }
        .to_string(),
        "Schedule regular check-ins".to_string(),
    ]
}

pub fn predict_contact(contact: &Contact, rng: &mut dyn RandomSource) -> RevenuePrediction {
    RevenuePrediction {
        contact_id: contact.id.clone(),
        name: contact.name.clone(),
        current_revenue: contact.revenue,
        predicted_revenue: predict_revenue(contact),
        confidence: draw_confidence(rng),
        factors: prediction_labels(contact),
        recommendations: prediction_advice(contact),
    }
}
