//! Analytics view: overview, distributions, top performers and counters.
//!
//! Top-performer lists are derived from the collection ordered by revenue
//! (highest first), so score and company ties break by revenue rank.

use serde::Serialize;

use crate::intelligence::insights::{
    average_revenue, count_enterprise, count_high_value, total_revenue,
};
use crate::intelligence::scoring::calculate_score;
use crate::types::Contact;
use crate::util::{asc, desc};

const TOP_PERFORMERS: usize = 5;
const UPSELL_REVENUE_CEILING: f64 = 5_000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub total_contacts: usize,
    pub total_revenue: f64,
    pub average_revenue: f64,
    pub median_revenue: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RevenueRanges {
    #[serde(rename = "0-1K")]
    pub under_1k: usize,
    #[serde(rename = "1K-5K")]
    pub from_1k_to_5k: usize,
    #[serde(rename = "5K-10K")]
    pub from_5k_to_10k: usize,
    #[serde(rename = "10K+")]
    pub over_10k: usize,
}

/// Keyword counts are independent; `other` holds companies matching none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyTypes {
    pub tech: usize,
    pub ai: usize,
    pub software: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDistribution {
    pub revenue_ranges: RevenueRanges,
    pub company_types: CompanyTypes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredContact {
    #[serde(flatten)]
    pub contact: Contact,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyRevenue {
    pub company: String,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformers {
    pub by_revenue: Vec<Contact>,
    pub by_score: Vec<ScoredContact>,
    pub by_company: Vec<CompanyRevenue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsCounters {
    pub high_value_contacts: usize,
    pub potential_upsells: usize,
    pub new_opportunities: usize,
    pub enterprise_clients: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub overview: Overview,
    pub distribution: RevenueDistribution,
    pub top_performers: TopPerformers,
    pub insights: AnalyticsCounters,
}

/// Middle element of the ascending revenue list (upper middle for even
/// lengths); 0 when empty.
pub fn median_revenue(contacts: &[Contact]) -> f64 {
    let mut revenues: Vec<f64> = contacts.iter().map(|c| c.revenue).collect();
    revenues.sort_by(|a, b| asc(*a, *b));
    revenues.get(revenues.len() / 2).copied().unwrap_or(0.0)
}

pub fn revenue_ranges(contacts: &[Contact]) -> RevenueRanges {
    let mut ranges = RevenueRanges::default();
    for c in contacts {
        match c.revenue {
            r if r < 1_000.0 => ranges.under_1k += 1,
            r if r < 5_000.0 => ranges.from_1k_to_5k += 1,
            r if r < 10_000.0 => ranges.from_5k_to_10k += 1,
            _ => ranges.over_10k += 1,
        }
    }
    ranges
}

pub fn company_types(contacts: &[Contact]) -> CompanyTypes {
    let mut types = CompanyTypes::default();
    for c in contacts {
        let tech = c.company_contains("tech");
        let ai = c.company_contains("ai");
        let software = c.company_contains("software");
        types.tech += usize::from(tech);
        types.ai += usize::from(ai);
        types.software += usize::from(software);
        types.other += usize::from(!tech && !ai && !software);
    }
    types
}

/// Contacts ordered by revenue, highest first. Stable for ties.
pub fn sort_by_revenue_desc(contacts: &[Contact]) -> Vec<Contact> {
    let mut sorted = contacts.to_vec();
    sorted.sort_by(|a, b| desc(a.revenue, b.revenue));
    sorted
}

fn company_totals(ordered: &[Contact]) -> Vec<CompanyRevenue> {
    let mut totals: Vec<CompanyRevenue> = Vec::new();
    for c in ordered {
        let Some(company) = c.company.as_deref().filter(|co| !co.is_empty()) else {
            continue;
        };
        match totals.iter_mut().find(|t| t.company == company) {
            Some(total) => total.revenue += c.revenue,
            None => totals.push(CompanyRevenue {
                company: company.to_string(),
                revenue: c.revenue,
            }),
        }
    }
    totals.sort_by(|a, b| desc(a.revenue, b.revenue));
    totals
}

pub fn top_performers(contacts: &[Contact]) -> TopPerformers {
    let ordered = sort_by_revenue_desc(contacts);

    let mut by_score: Vec<ScoredContact> = ordered
        .iter()
        .map(|c| ScoredContact {
            contact: c.clone(),
            score: calculate_score(c),
        })
        .collect();
    by_score.sort_by(|a, b| b.score.cmp(&a.score));
    by_score.truncate(TOP_PERFORMERS);

    let mut by_company = company_totals(&ordered);
    by_company.truncate(TOP_PERFORMERS);

    let by_revenue = ordered.into_iter().take(TOP_PERFORMERS).collect();

    TopPerformers {
        by_revenue,
        by_score,
        by_company,
    }
}

pub fn build_analytics(contacts: &[Contact]) -> Analytics {
    let overview = Overview {
        total_contacts: contacts.len(),
        total_revenue: total_revenue(contacts),
        average_revenue: average_revenue(contacts),
        median_revenue: median_revenue(contacts),
    };

    let insights = AnalyticsCounters {
        high_value_contacts: count_high_value(contacts),
        potential_upsells: contacts
            .iter()
            .filter(|c| c.revenue > 0.0 && c.revenue < UPSELL_REVENUE_CEILING)
            .count(),
        new_opportunities: contacts.iter().filter(|c| c.revenue == 0.0).count(),
        enterprise_clients: count_enterprise(contacts),
    };

    Analytics {
        overview,
        distribution: RevenueDistribution {
            revenue_ranges: revenue_ranges(contacts),
            company_types: company_types(contacts),
        },
        top_performers: top_performers(contacts),
        insights,
    }
}
