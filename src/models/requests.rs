use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{NewsEvent, TradeRole};
use crate::models::records::SourceRecord;

/// Request to rank candidates against one anchor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RankRequest {
    #[serde(alias = "anchor_role", rename = "anchorRole")]
    pub anchor_role: TradeRole,
    pub anchor: SourceRecord,
    #[validate(length(max = 5000))]
    #[serde(default)]
    pub candidates: Vec<SourceRecord>,
    #[serde(default)]
    pub events: Vec<NewsEvent>,
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to aggregate industry risk from an event snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RiskRequest {
    #[validate(length(max = 10000))]
    #[serde(default)]
    pub events: Vec<NewsEvent>,
}
