//! Contact quality score (0–100).
//!
//! Four weighted terms, summed, rounded and capped:
//! - revenue: one point per 1,000, at most 40
//! - company: 30 with an industry keyword, 15 without, 0 when absent
//! - email domain: 20 on a premium domain, 10 otherwise
//! - name length: 10 above ten characters, 5 otherwise

use serde::Serialize;

use crate::types::Contact;

const REVENUE_POINTS_CAP: f64 = 40.0;
const REVENUE_PER_POINT: f64 = 1000.0;
const MAX_SCORE: u32 = 100;

/// Company keywords worth the full company term.
pub const COMPANY_KEYWORDS: [&str; 5] = ["tech", "ai", "software", "digital", "innovation"];

/// Email substrings treated as premium domains.
pub const PREMIUM_DOMAINS: [&str; 3] = ["@company.com", "@corp.com", "@enterprise.com"];

/// Scores strictly above this mark a high-value contact.
pub const HIGH_VALUE_SCORE: u32 = 70;

/// Per-term breakdown of one score. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactors {
    pub revenue: f64,
    pub company: f64,
    pub domain: f64,
    pub name_length: f64,
}

impl ScoreFactors {
    /// Uncapped sum of the four terms.
    pub fn total(&self) -> f64 {
        self.revenue + self.company + self.domain + self.name_length
    }

    /// Rounded, capped score.
    pub fn score(&self) -> u32 {
        (self.total().round().max(0.0) as u32).min(MAX_SCORE)
    }
}

pub fn score_factors(contact: &Contact) -> ScoreFactors {
    let revenue = (contact.revenue / REVENUE_PER_POINT).clamp(0.0, REVENUE_POINTS_CAP);

    let company = match contact.company_lower() {
        Some(company) if COMPANY_KEYWORDS.iter().any(|k| company.contains(k)) => 30.0,
        Some(_) => 15.0,
        None => 0.0,
    };

    let premium = PREMIUM_DOMAINS.iter().any(|d| contact.email.contains(d));
    let domain = if premium { 20.0 } else { 10.0 };

    let name_length = if contact.name_len() > 10 { 10.0 } else { 5.0 };

    ScoreFactors {
        revenue,
        company,
        domain,
        name_length,
    }
}

/// Quality score in `[0, 100]`.
pub fn calculate_score(contact: &Contact) -> u32 {
    score_factors(contact).score()
}

pub fn is_high_value(contact: &Contact) -> bool {
    calculate_score(contact) > HIGH_VALUE_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, company: Option<&str>, revenue: f64) -> Contact {
        Contact {
            id: "c-1".to_string(),
            name: name.to_string(),
            email: email.to_string(),
            company: company.map(str::to_string),
            revenue,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_tech_contact_on_non_premium_domain() {
        // "@techcorp.com" does not contain "@corp.com", so the domain term is 10.
        let c = contact("Alex Techsworth", "alex@techcorp.com", Some("TechCorp"), 12000.0);
        let f = score_factors(&c);
        assert_eq!(f.revenue, 12.0);
        assert_eq!(f.company, 30.0);
        assert_eq!(f.domain, 10.0);
        assert_eq!(f.name_length, 10.0);
        assert_eq!(calculate_score(&c), 62);
    }

    #[test]
    fn test_premium_domain_scores_higher() {
        let premium = contact("Bo", "bo@corp.com", None, 0.0);
        let plain = contact("Bo", "bo@gmail.com", None, 0.0);
        assert_eq!(score_factors(&premium).domain, 20.0);
        assert_eq!(score_factors(&plain).domain, 10.0);
    }

    #[test]
    fn test_company_terms() {
        assert_eq!(score_factors(&contact("A", "a@x.io", Some("Digital Works"), 0.0)).company, 30.0);
        assert_eq!(score_factors(&contact("A", "a@x.io", Some("Acme Inc"), 0.0)).company, 15.0);
        assert_eq!(score_factors(&contact("A", "a@x.io", None, 0.0)).company, 0.0);
        assert_eq!(score_factors(&contact("A", "a@x.io", Some(""), 0.0)).company, 0.0);
    }

    #[test]
    fn test_revenue_term_caps_at_forty() {
        assert_eq!(score_factors(&contact("A", "a@x.io", None, 40000.0)).revenue, 40.0);
        assert_eq!(score_factors(&contact("A", "a@x.io", None, 900000.0)).revenue, 40.0);
        assert_eq!(score_factors(&contact("A", "a@x.io", None, 2500.0)).revenue, 2.5);
    }

    #[test]
    fn test_name_length_boundary() {
        // exactly ten characters takes the lower branch
        assert_eq!(score_factors(&contact("Abcde Fghi", "a@x.io", None, 0.0)).name_length, 5.0);
        assert_eq!(score_factors(&contact("Abcde Fghij", "a@x.io", None, 0.0)).name_length, 10.0);
    }

    #[test]
    fn test_score_bounds() {
        let max = contact("Maximilian Overstreet", "m@enterprise.com", Some("AI Labs"), 1e9);
        assert_eq!(calculate_score(&max), 100);

        let min = contact("Al", "al@gmail.com", None, 0.0);
        assert_eq!(calculate_score(&min), 15);
    }

    #[test]
    fn test_score_rounds_fractional_revenue() {
        // 2.5 + 15 + 10 + 5 = 32.5 → 33
        let c = contact("Al", "al@gmail.com", Some("Acme"), 2500.0);
        assert_eq!(calculate_score(&c), 33);
    }

    #[test]
    fn test_is_high_value_threshold() {
        // 40 + 30 + 20 + 10 = 100
        assert!(is_high_value(&contact("Maximilian Stone", "m@corp.com", Some("TechCo"), 50000.0)));
        // 10 + 30 + 20 + 10 = 70, not above 70
        assert!(!is_high_value(&contact("Maximilian Stone", "m@corp.com", Some("TechCo"), 10000.0)));
    }
}
