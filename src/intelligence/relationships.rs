//! Relationship mapping between contacts.
//!
//! Every unordered pair (i < j, input order) is checked against each rule
//! independently. A pair can produce several edges of different types; edges
//! are never merged or deduplicated. The `strategic` rule is a coin flip drawn
//! once per pair from the caller's `RandomSource`.

use std::collections::HashSet;

use serde::Serialize;

use crate::intelligence::scoring::calculate_score;
use crate::random::RandomSource;
use crate::types::Contact;

const HIGH_VALUE_AVERAGE: f64 = 10_000.0;
const HIGH_VALUE_SPREAD: f64 = 0.3;
const STRATEGIC_PROBABILITY: f64 = 0.15;
const TECH_NETWORK_KEYWORDS: [&str; 3] = ["tech", "ai", "lab"];
const PERSONAL_DOMAIN: &str = "gmail.com";

/// Edge type between two contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionType {
    Colleague,
    Domain,
    HighValue,
    TechNetwork,
    Strategic,
}

impl ConnectionType {
    pub fn strength(self) -> f64 {
        match self {
            ConnectionType::Colleague => 0.9,
            ConnectionType::Domain => 0.7,
            ConnectionType::HighValue => 0.6,
            ConnectionType::TechNetwork => 0.5,
            ConnectionType::Strategic => 0.3,
        }
    }
}

/// A typed, weighted edge. Recomputed on every request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub connection_type: ConnectionType,
    pub strength: f64,
}

impl Connection {
    fn between(a: &Contact, b: &Contact, connection_type: ConnectionType) -> Self {
        Self {
            from: a.id.clone(),
            to: b.id.clone(),
            connection_type,
            strength: connection_type.strength(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

fn same_company(a: &Contact, b: &Contact) -> bool {
    match (a.company_lower(), b.company_lower()) {
        (Some(ca), Some(cb)) => ca == cb,
        _ => false,
    }
}

fn same_business_domain(a: &Contact, b: &Contact) -> bool {
    match (a.email_domain(), b.email_domain()) {
        (Some(da), Some(db)) => da == db && da != PERSONAL_DOMAIN,
        _ => false,
    }
}

fn similar_high_value(a: &Contact, b: &Contact) -> bool {
    let average = (a.revenue + b.revenue) / 2.0;
    let spread = (a.revenue - b.revenue).abs();
    average > HIGH_VALUE_AVERAGE && spread < average * HIGH_VALUE_SPREAD
}

fn both_tech(a: &Contact, b: &Contact) -> bool {
    a.company_contains_any(&TECH_NETWORK_KEYWORDS) && b.company_contains_any(&TECH_NETWORK_KEYWORDS)
}

/// Deterministic edges for one pair, in rule order.
pub fn pair_connections(a: &Contact, b: &Contact) -> Vec<Connection> {
    let rules: [(ConnectionType, fn(&Contact, &Contact) -> bool); 4] = [
        (ConnectionType::Colleague, same_company),
        (ConnectionType::Domain, same_business_domain),
        (ConnectionType::HighValue, similar_high_value),
        (ConnectionType::TechNetwork, both_tech),
    ];

    rules
        .iter()
        .filter(|(_, rule)| rule(a, b))
        .map(|(kind, _)| Connection::between(a, b, *kind))
        .collect()
}

/// All edges over all unordered pairs. Pairs sharing an id are skipped.
pub fn find_connections(contacts: &[Contact], rng: &mut dyn RandomSource) -> Vec<Connection> {
    let mut connections = Vec::new();

    for (i, a) in contacts.iter().enumerate() {
        for b in &contacts[i + 1..] {
            if a.id == b.id {
                continue;
            }
            connections.extend(pair_connections(a, b));
            if rng.chance(STRATEGIC_PROBABILITY) {
                connections.push(Connection::between(a, b, ConnectionType::Strategic));
            }
        }
    }

    log::debug!(
        "relationship scan: {} contacts, {} connections",
        contacts.len(),
        connections.len()
    );
    connections
}

// ---------------------------------------------------------------------------
// Relationship map view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub name: String,
    pub company: Option<String>,
    pub revenue: f64,
    pub score: u32,
    pub group: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_connections: usize,
    pub companies: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipMap {
    pub nodes: Vec<GraphNode>,
    pub connections: Vec<Connection>,
    pub stats: GraphStats,
}

/// Distinct non-empty company names (case-sensitive).
pub fn distinct_companies(contacts: &[Contact]) -> usize {
    contacts
        .iter()
        .filter_map(|c| c.company.as_deref())
        .filter(|c| !c.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

pub fn build_relationship_map(contacts: &[Contact], rng: &mut dyn RandomSource) -> RelationshipMap {
    let connections = find_connections(contacts, rng);
    let nodes: Vec<GraphNode> = contacts
        .iter()
        .map(|c| GraphNode {
            id: c.id.clone(),
            name: c.name.clone(),
            company: c.company.clone(),
            revenue: c.revenue,
            score: calculate_score(c),
            group: c
                .company
                .clone()
                .filter(|co| !co.is_empty())
                .unwrap_or_else(|| "Individual".to_string()),
        })
        .collect();

    let stats = GraphStats {
        total_nodes: nodes.len(),
        total_connections: connections.len(),
        companies: distinct_companies(contacts),
    };

    RelationshipMap {
        nodes,
        connections,
        stats,
    }
}
