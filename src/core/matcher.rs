use chrono::NaiveDate;

use crate::core::reason::generate_reason;
use crate::core::risk::compute_industry_risk;
use crate::core::scoring::{score_pair, ScoringConfig};
use crate::models::{MatchResult, NewsEvent, Profile, RiskMap};

/// Identifier of the built-in weight table
pub const DEFAULT_SCORING_VERSION: &str = "cc-2025.1";

/// Date event recency is measured against unless configured otherwise
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Engine configuration: scoring tables plus the event reference date
#[derive(Debug, Clone)]
pub struct MatchingConfig {
    pub scoring: ScoringConfig,
    pub reference_date: NaiveDate,
    pub version: String,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfig::default(),
            reference_date: default_reference_date(),
            version: DEFAULT_SCORING_VERSION.to_string(),
        }
    }
}

/// Ranking orchestrator
///
/// # Pipeline
/// 1. Aggregate industry risk once from the event snapshot
/// 2. Score every candidate against the anchor
/// 3. Attach a reason to each result
/// 4. Stable sort by score, descending
#[derive(Debug, Clone)]
pub struct Matcher {
    config: MatchingConfig,
}

impl Matcher {
    pub fn new(config: MatchingConfig) -> Self {
        Self { config }
    }

    pub fn with_default_config() -> Self {
        Self {
            config: MatchingConfig::default(),
        }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    pub fn version(&self) -> &str {
        &self.config.version
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.config.reference_date
    }

    /// Industry risk for an event snapshot at the configured reference date
    pub fn risk_map(&self, events: &[NewsEvent]) -> RiskMap {
        compute_industry_risk(events, self.config.reference_date)
    }

    /// Rank candidates for one anchor
    ///
    /// Deterministic for identical inputs. Equal scores keep input order.
    pub fn rank(&self, anchor: &Profile, candidates: &[Profile], events: &[NewsEvent]) -> Vec<MatchResult> {
        let risk = self.risk_map(events);
        self.rank_with_risk(anchor, candidates, &risk)
    }

    /// Rank against a precomputed risk map
    pub fn rank_with_risk(&self, anchor: &Profile, candidates: &[Profile], risk: &RiskMap) -> Vec<MatchResult> {
        let mut results: Vec<MatchResult> = candidates
            .iter()
            .map(|candidate| self.score_pair(anchor, candidate, risk))
            .collect();

        // Vec::sort_by is stable
        results.sort_by(|a, b| b.score.cmp(&a.score));

        tracing::debug!(
            "Ranked {} candidates for anchor {} (top score {:?})",
            results.len(),
            anchor.id,
            results.first().map(|r| r.score)
        );

        results
    }

    /// Score and explain a single anchor/candidate pair
    pub fn score_pair(&self, anchor: &Profile, candidate: &Profile, risk: &RiskMap) -> MatchResult {
        let pair = score_pair(anchor, candidate, risk, &self.config.scoring);
        let reason = generate_reason(pair.score, &pair.breakdown, candidate);

        MatchResult {
            candidate_id: candidate.id.clone(),
            score: pair.score,
            breakdown: pair.breakdown,
            geo_label: pair.geo.label,
            reason,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_config()
    }
}

/// Rank with the built-in configuration
pub fn rank(anchor: &Profile, candidates: &[Profile], events: &[NewsEvent]) -> Vec<MatchResult> {
    Matcher::default().rank(anchor, candidates, events)
}
