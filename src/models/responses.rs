use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::domain::MatchResult;

/// Response for the rank endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankResponse {
    pub request_id: String,
    pub scoring_version: String,
    pub total_candidates: usize,
    pub matches: Vec<MatchResult>,
}

/// Response for the risk endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskResponse {
    pub industries: BTreeMap<String, f64>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
