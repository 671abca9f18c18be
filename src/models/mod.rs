// Model exports
pub mod domain;
pub mod records;
pub mod requests;
pub mod responses;

pub use domain::{
    CertificationSet, GeoLabel, ImpactLevel, MatchResult, NewsEvent, ParseRoleError, Profile, RiskMap,
    ScoreBreakdown, ScoringWeights, TradeRole, DEFAULT_INDUSTRY_RISK,
};
pub use records::{AccountRecord, AccountTradeProfile, CertificationList, DatasetRow, FlagValue, LooseNumber, SourceRecord};
pub use requests::{RankRequest, RiskRequest};
pub use responses::{ErrorResponse, HealthResponse, RankResponse, RiskResponse};
