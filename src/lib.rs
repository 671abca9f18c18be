//! Trade Match - explainable exporter/importer compatibility scoring
//!
//! This library provides the scoring and ranking engine behind the trade
//! matching service. Records from platform accounts or bulk datasets are
//! normalized into profiles, scored pairwise on nine weighted factors, and
//! ranked with a deterministic, human-readable reason per candidate.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{generate_reason, normalize, rank, score_pair, MatchingConfig, Matcher, Normalizer};
pub use crate::models::{MatchResult, NewsEvent, Profile, RiskMap, ScoreBreakdown, ScoringWeights, SourceRecord, TradeRole};
