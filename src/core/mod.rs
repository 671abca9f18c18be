// Core engine exports
pub mod geo;
pub mod matcher;
pub mod normalizer;
pub mod reason;
pub mod risk;
pub mod scoring;
pub mod similarity;

pub use geo::{compute_geo_score, CorridorTable, GeoScore};
pub use matcher::{rank, MatchingConfig, Matcher};
pub use normalizer::{normalize, FieldDefaults, Normalizer};
pub use reason::{generate_reason, ReasonTier};
pub use risk::compute_industry_risk;
pub use scoring::{score_pair, PairScore, ScoringConfig, SubScores};
pub use similarity::{jaccard_similarity, log_ratio_similarity, norm_linear, recency_weight};
