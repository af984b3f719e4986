//! Keyword-driven answers to free-text CRM questions.
//!
//! The input is lowercased once, then checked against `INTENT_RULES` top to
//! bottom; the first rule whose matcher fires produces the answer. Matching is
//! plain substring containment, so phrases overlap across rules and the table
//! order decides precedence ("top tech clients" must be answered by the tech
//! ranking, not by the generic contact rule further down). When nothing
//! matches, one of four fallback lines is picked with the caller's
//! `RandomSource`.
//!
//! Contacts are borrowed immutably: rankings work on local copies, so the
//! caller's ordering is never changed.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::intelligence::insights::{count_tech, total_revenue};
use crate::intelligence::relationships::distinct_companies;
use crate::intelligence::scoring::{calculate_score, HIGH_VALUE_SCORE};
use crate::random::RandomSource;
use crate::types::Contact;
use crate::util::{asc, desc, format_money, mean, round_half_up};

const DEFAULT_TECH_CLIENTS: usize = 10;

const PROFITABLE_PHRASES: [&str; 12] = [
    "most profitable",
    "highest revenue",
    "best client",
    "top earner",
    "biggest client",
    "most valuable",
    "best person",
    "do business",
    "best to work",
    "top performer",
    "highest earner",
    "best customer",
];

const UNPROFITABLE_PHRASES: [&str; 8] = [
    "most losing",
    "lowest revenue",
    "worst client",
    "least profitable",
    "smallest client",
    "least valuable",
    "poorest client",
    "lowest earner",
];

/// Question category, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TopTechClients,
    MostProfitable,
    LeastProfitable,
    Count,
    Contacts,
    Analytics,
    Recommendations,
    Revenue,
    Companies,
    Help,
    Greeting,
    Fallback,
}

/// Everything a rule may read while answering.
pub struct ChatContext<'a> {
    /// Lowercased question.
    pub input: &'a str,
    pub contacts: &'a [Contact],
    /// Contacts ordered by revenue, highest first.
    pub top_clients: &'a [Contact],
}

struct IntentRule {
    intent: Intent,
    matches: fn(&str) -> bool,
    respond: fn(&ChatContext<'_>) -> String,
}

const INTENT_RULES: [IntentRule; 11] = [
    IntentRule {
        intent: Intent::TopTechClients,
        matches: asks_top_tech,
        respond: answer_top_tech,
    },
    IntentRule {
        intent: Intent::MostProfitable,
        matches: asks_most_profitable,
        respond: answer_most_profitable,
    },
    IntentRule {
        intent: Intent::LeastProfitable,
        matches: asks_least_profitable,
        respond: answer_least_profitable,
    },
    IntentRule {
        intent: Intent::Count,
        matches: asks_count,
        respond: answer_count,
    },
    IntentRule {
        intent: Intent::Contacts,
        matches: asks_contacts,
        respond: answer_contacts,
    },
    IntentRule {
        intent: Intent::Analytics,
        matches: asks_analytics,
        respond: answer_analytics,
    },
    IntentRule {
        intent: Intent::Recommendations,
        matches: asks_recommendations,
        respond: answer_recommendations,
    },
    IntentRule {
        intent: Intent::Revenue,
        matches: asks_revenue,
        respond: answer_revenue,
    },
    IntentRule {
        intent: Intent::Companies,
        matches: asks_companies,
        respond: answer_companies,
    },
    IntentRule {
        intent: Intent::Help,
        matches: asks_help,
        respond: answer_help,
    },
    IntentRule {
        intent: Intent::Greeting,
        matches: is_greeting,
        respond: answer_greeting,
    },
];

fn contains_any(input: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| input.contains(p))
}

// =============================================================================
// Matchers
// =============================================================================

fn asks_top_tech(input: &str) -> bool {
    input.contains("tech") && contains_any(input, &["top", "client"])
}

fn asks_most_profitable(input: &str) -> bool {
    contains_any(input, &PROFITABLE_PHRASES)
}

fn asks_least_profitable(input: &str) -> bool {
    contains_any(input, &UNPROFITABLE_PHRASES)
}

fn asks_count(input: &str) -> bool {
    contains_any(input, &["count", "how many", "total"])
}

fn asks_contacts(input: &str) -> bool {
    contains_any(input, &["contact", "client"])
}

fn asks_analytics(input: &str) -> bool {
    contains_any(input, &["analytics", "insights", "analysis"])
}

fn asks_recommendations(input: &str) -> bool {
    contains_any(input, &["recommend", "suggest", "what should"])
}

fn asks_revenue(input: &str) -> bool {
    contains_any(input, &["revenue", "income", "money"])
}

fn asks_companies(input: &str) -> bool {
    contains_any(input, &["company", "business"])
}

fn asks_help(input: &str) -> bool {
    contains_any(input, &["help", "what can"])
}

fn is_greeting(input: &str) -> bool {
    contains_any(input, &["yo", "hey", "hi"])
}

// =============================================================================
// Answers
// =============================================================================

fn first_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([0-9]+)").unwrap())
}

/// First run of ASCII digits in the question, if any. Overlong literals saturate.
pub fn requested_count(input: &str) -> Option<usize> {
    first_number_re()
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().parse::<usize>().unwrap_or(usize::MAX))
}

fn answer_top_tech(ctx: &ChatContext<'_>) -> String {
    let requested = requested_count(ctx.input).unwrap_or(DEFAULT_TECH_CLIENTS);

    let mut tech: Vec<&Contact> = ctx
        .contacts
        .iter()
        .filter(|c| c.company_contains("tech"))
        .collect();
    tech.sort_by(|a, b| desc(a.revenue, b.revenue));
    tech.truncate(requested);

    if tech.is_empty() {
        return "No tech clients found in your CRM!".to_string();
    }

    let mut response = format!("Your top {} tech clients:\n\n", tech.len());
    for (i, client) in tech.iter().enumerate() {
        response.push_str(&format!(
            "{}. {} - {}\n",
            i + 1,
            client.name,
            format_money(client.revenue)
        ));
    }
    response
}

fn answer_most_profitable(ctx: &ChatContext<'_>) -> String {
    match ctx.top_clients.first() {
        Some(top) => format!(
            "Your most profitable person is {} with {} in revenue!",
            top.name,
            format_money(top.revenue)
        ),
        None => "No profitable clients data available yet. Add some contacts to see rankings!"
            .to_string(),
    }
}

fn answer_least_profitable(ctx: &ChatContext<'_>) -> String {
    // min_by keeps the first of equal minima, same as a stable ascending sort
    match ctx.contacts.iter().min_by(|a, b| asc(a.revenue, b.revenue)) {
        Some(lowest) => format!(
            "Your most losing person is {} with {} in revenue!",
            lowest.name,
            format_money(lowest.revenue)
        ),
        None => "No client data available yet. Add some contacts to see rankings!".to_string(),
    }
}

fn answer_count(ctx: &ChatContext<'_>) -> String {
    format!("You have {} contacts in your CRM!", ctx.contacts.len())
}

fn answer_contacts(ctx: &ChatContext<'_>) -> String {
    let input = ctx.input;
    if contains_any(input, &["total", "how many"]) {
        return format!("You have {} total contacts in your CRM!", ctx.contacts.len());
    }
    if contains_any(input, &["top", "best"]) {
        return match ctx.top_clients.first() {
            Some(top) => format!(
                "Your top client is {} with {} in revenue!",
                top.name,
                format_money(top.revenue)
            ),
            None => "No top clients data available yet. Add some contacts to see rankings!"
                .to_string(),
        };
    }
    if contains_any(input, &["revenue", "money"]) {
        return format!(
            "Total revenue across all contacts: {}!",
            format_money(total_revenue(ctx.contacts))
        );
    }
    format!("You have {} contacts in your CRM!", ctx.contacts.len())
}

fn answer_analytics(ctx: &ChatContext<'_>) -> String {
    let scores: Vec<u32> = ctx.contacts.iter().map(calculate_score).collect();
    let as_f64: Vec<f64> = scores.iter().map(|s| f64::from(*s)).collect();
    let average = round_half_up(mean(&as_f64));

    let mut top: Option<(&Contact, u32)> = None;
    for (contact, score) in ctx.contacts.iter().zip(scores.iter().copied()) {
        if top.map(|(_, best)| score > best).unwrap_or(true) {
            top = Some((contact, score));
        }
    }
    let top_name = top.map(|(c, _)| c.name.as_str()).unwrap_or("N/A");

    format!(
        "AI Insights: {} contacts analyzed. Average AI score: {}/100. Top performer: {}!",
        ctx.contacts.len(),
        average,
        top_name
    )
}

fn answer_recommendations(ctx: &ChatContext<'_>) -> String {
    let high_value = ctx
        .contacts
        .iter()
        .filter(|c| calculate_score(c) > HIGH_VALUE_SCORE)
        .count();
    if high_value > 0 {
        format!(
            "Top recommendation: Focus on your {} high-value contacts! They have AI scores above {}.",
            high_value, HIGH_VALUE_SCORE
        )
    } else {
        "I recommend checking your top clients and focusing on high-revenue contacts!".to_string()
    }
}

fn answer_revenue(ctx: &ChatContext<'_>) -> String {
    let total = total_revenue(ctx.contacts);
    let average = if ctx.contacts.is_empty() {
        0.0
    } else {
        round_half_up(total / ctx.contacts.len() as f64)
    };
    let highest = ctx
        .contacts
        .iter()
        .map(|c| c.revenue)
        .fold(None, |acc: Option<f64>, r| Some(acc.map_or(r, |m| m.max(r))))
        .unwrap_or(0.0);

    format!(
        "Revenue Analysis:\n\u{2022} Total Revenue: {}\n\u{2022} Average per Contact: {}\n\u{2022} Highest Single Revenue: {}",
        format_money(total),
        format_money(average),
        format_money(highest)
    )
}

fn answer_companies(ctx: &ChatContext<'_>) -> String {
    let companies = distinct_companies(ctx.contacts);
    format!(
        "Company Analysis:\n\u{2022} Total Companies: {}\n\u{2022} Tech Companies: {}\n\u{2022} Unique Industries: {} different companies",
        companies,
        count_tech(ctx.contacts),
        companies
    )
}

fn answer_help(_ctx: &ChatContext<'_>) -> String {
    "I can help you with:\n\
     \u{2022} Contact information and statistics\n\
     \u{2022} Revenue analysis and predictions\n\
     \u{2022} AI insights and recommendations\n\
     \u{2022} Analytics and trends\n\
     \u{2022} General CRM questions\n\
     \n\
     Try asking: \"How many contacts do I have?\" or \"Who is my top client?\""
        .to_string()
}

fn answer_greeting(ctx: &ChatContext<'_>) -> String {
    format!(
        "Hey! You have {} contacts in your CRM! What else would you like to know?",
        ctx.contacts.len()
    )
}

fn answer_fallback(ctx: &ChatContext<'_>, rng: &mut dyn RandomSource) -> String {
    let n = ctx.contacts.len();
    let options = [
        format!(
            "I'm not sure what you're asking. You have {} contacts. Try asking \"how many contacts\" or \"who is my top client\"!",
            n
        ),
        format!(
            "You have {} contacts in your CRM. Ask me about revenue, top clients, or analytics!",
            n
        ),
        format!(
            "You have {} contacts. I can help with revenue analysis, top clients, or AI insights!",
            n
        ),
        format!(
            "You have {} contacts! Try asking about totals, revenue, or recommendations!",
            n
        ),
    ];
    let pick = rng.pick_index(options.len());
    options[pick].clone()
}

// =============================================================================
// Entry points
// =============================================================================

/// Which rule would answer `text`.
pub fn classify(text: &str) -> Intent {
    let input = text.to_lowercase();
    INTENT_RULES
        .iter()
        .find(|rule| (rule.matches)(&input))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Fallback)
}

/// Answer a free-text question about `contacts`.
///
/// `top_clients` must already be ordered by revenue, highest first.
pub fn respond(
    text: &str,
    contacts: &[Contact],
    top_clients: &[Contact],
    rng: &mut dyn RandomSource,
) -> String {
    let input = text.to_lowercase();
    let ctx = ChatContext {
        input: &input,
        contacts,
        top_clients,
    };

    match INTENT_RULES.iter().find(|rule| (rule.matches)(&input)) {
        Some(rule) => {
            log::debug!("chat intent: {:?}", rule.intent);
            (rule.respond)(&ctx)
        }
        None => {
            log::debug!("chat intent: {:?}", Intent::Fallback);
            answer_fallback(&ctx, rng)
        }
    }
}
