//! Contact intelligence: deterministic heuristics over a fetched contact list.
//!
//! Every function here is pure over its inputs. The only randomness (strategic
//! edges, prediction confidence, chat fallback) comes from a caller-supplied
//! `RandomSource`. Nothing in this module reads or writes the store.

pub mod analytics;
pub mod chat;
pub mod insights;
pub mod prediction;
pub mod recommendations;
pub mod relationships;
pub mod scoring;

pub use analytics::{build_analytics, Analytics};
pub use chat::{classify, respond, Intent};
pub use insights::{build_insights, Insights};
pub use prediction::{predict_contact, predict_revenue, RevenuePrediction};
pub use recommendations::{build_recommendations, Recommendations};
pub use relationships::{build_relationship_map, find_connections, Connection, ConnectionType, RelationshipMap};
pub use scoring::{calculate_score, score_factors, ScoreFactors};
