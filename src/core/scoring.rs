use crate::core::geo::{compute_geo_score, CorridorTable, GeoScore};
use crate::core::normalizer::{DEFAULT_CAPACITY_TONS, DEFAULT_NEED_TONS};
use crate::core::similarity::{clamp, clamp_unit, jaccard_similarity, log_ratio_similarity, norm_linear};
use crate::models::{Profile, RiskMap, ScoreBreakdown, ScoringWeights};

/// Final score bounds before conversion to a percentage
pub const MIN_TOTAL: f64 = 0.45;
pub const MAX_TOTAL: f64 = 0.98;

/// Default bonus for small-enterprise program participants
pub const DEFAULT_MSME_BONUS: f64 = 0.05;

/// Oversupply ratio tolerated before demand fit starts to decay
const OVERSUPPLY_TOLERANCE: f64 = 3.0;

const JITTER_BUCKETS: u64 = 15;

/// Everything the pair scorer needs besides the two profiles
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    pub corridors: CorridorTable,
    pub msme_bonus: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            corridors: CorridorTable::default(),
            msme_bonus: DEFAULT_MSME_BONUS,
        }
    }
}

/// The nine component scores, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SubScores {
    pub demand_fit: f64,
    pub geo_fit: f64,
    pub behavioral_fit: f64,
    pub reliability: f64,
    pub scale_fit: f64,
    pub outreach_receptiveness: f64,
    pub momentum: f64,
    pub trade_signal: f64,
    pub safety_score: f64,
}

impl SubScores {
    pub fn weighted_sum(&self, weights: &ScoringWeights) -> f64 {
        self.demand_fit * weights.demand_fit
            + self.geo_fit * weights.geo_fit
            + self.behavioral_fit * weights.behavioral_fit
            + self.reliability * weights.reliability
            + self.scale_fit * weights.scale_fit
            + self.outreach_receptiveness * weights.outreach_receptiveness
            + self.momentum * weights.momentum
            + self.trade_signal * weights.trade_signal
            + self.safety_score * weights.safety_score
    }

    pub fn to_breakdown(&self) -> ScoreBreakdown {
        ScoreBreakdown {
            demand_fit: percent(self.demand_fit),
            geo_fit: percent(self.geo_fit),
            behavioral_fit: percent(self.behavioral_fit),
            reliability: percent(self.reliability),
            scale_fit: percent(self.scale_fit),
            outreach_receptiveness: percent(self.outreach_receptiveness),
            momentum: percent(self.momentum),
            trade_signal: percent(self.trade_signal),
            safety_score: percent(self.safety_score),
        }
    }
}

#[inline]
fn percent(v: f64) -> u8 {
    (clamp_unit(v) * 100.0).round() as u8
}

/// Scored pair before reason generation
#[derive(Debug, Clone, PartialEq)]
pub struct PairScore {
    /// Integer compatibility index in 45..=98
    pub score: u8,
    pub sub_scores: SubScores,
    pub breakdown: ScoreBreakdown,
    pub geo: GeoScore,
    pub jitter: f64,
}

/// Deterministic checksum of an identifier: the sum of its Unicode scalar values
pub fn id_checksum(id: &str) -> u64 {
    id.chars().map(|c| u64::from(u32::from(c))).sum()
}

/// Tie-breaking offset in [0, 0.15) derived from an identifier
#[inline]
pub fn id_jitter(id: &str) -> f64 {
    (id_checksum(id) % JITTER_BUCKETS) as f64 / 100.0
}

/// Supply/demand fit of exporter capacity against importer need, before jitter
///
/// Full marks up to 3x oversupply, then a gentle log penalty; undersupply
/// scales linearly.
pub fn demand_fit(capacity: f64, need: f64) -> f64 {
    let capacity = capacity.max(1.0);
    let need = need.max(1.0);
    let ratio = capacity / need;

    let fit = if ratio >= 1.0 {
        1.0 - 0.1 * (ratio.ln() - OVERSUPPLY_TOLERANCE.ln()).max(0.0)
    } else {
        ratio * 0.8
    };

    clamp_unit(fit)
}

/// Score one candidate against an anchor
///
/// The anchor is the exporter side when it carries a capacity; otherwise it
/// is treated as the importer side, including when it carries neither.
pub fn score_pair(anchor: &Profile, candidate: &Profile, risk: &RiskMap, config: &ScoringConfig) -> PairScore {
    let (exp, imp) = if anchor.is_exporter() {
        (anchor, candidate)
    } else {
        (candidate, anchor)
    };

    let jitter = id_jitter(&candidate.id);

    let capacity = exp.capacity.filter(|c| c.is_finite()).unwrap_or(DEFAULT_CAPACITY_TONS);
    let need = imp.need.filter(|n| n.is_finite()).unwrap_or(DEFAULT_NEED_TONS);

    let geo = compute_geo_score(
        exp.region.as_deref(),
        imp.country.as_deref(),
        exp.industry.as_deref(),
        &config.corridors,
    );

    let scale_fit = 0.6 * log_ratio_similarity(exp.revenue_usd, imp.revenue_usd)
        + 0.4 * log_ratio_similarity(exp.team_size, imp.team_size);

    let behavioral_fit = 0.6 * (exp.intent_score + imp.intent_score) / 2.0
        + 0.4 * (exp.prompt_response_score + imp.prompt_response_score) / 2.0;

    let reliability = 0.6 * (exp.payment_terms_score + imp.payment_terms_score) / 2.0
        + 0.4 * jaccard_similarity(Some(&exp.certifications), Some(&imp.certifications));

    let outreach_receptiveness = 0.5 * imp.response_probability
        + 0.3 * imp.engagement_spike
        + 0.2 * imp.decision_maker_change_score;

    let momentum = (exp.hiring_growth + imp.hiring_growth) / 2.0;

    let shipment_term = if exp.shipment_value_usd > 0.0 {
        norm_linear(exp.shipment_value_usd.log10(), 4.0, 7.0)
    } else {
        0.5
    };
    let trade_signal = 0.5 * shipment_term + 0.5 * norm_linear(exp.quantity_tons, 10.0, 5000.0);

    let industry_risk = risk.risk_for(exp.industry.as_deref());
    let safety_score = 1.0
        - clamp_unit(0.4 * industry_risk + 0.3 * exp.war_risk_score + 0.3 * imp.war_event_score);

    let sub_scores = SubScores {
        demand_fit: clamp_unit(demand_fit(capacity, need) + jitter / 2.0),
        geo_fit: clamp_unit(geo.score),
        behavioral_fit: clamp_unit(behavioral_fit),
        reliability: clamp_unit(reliability),
        scale_fit: clamp_unit(scale_fit),
        outreach_receptiveness: clamp_unit(outreach_receptiveness),
        momentum: clamp_unit(momentum),
        trade_signal: clamp_unit(trade_signal),
        safety_score: clamp_unit(safety_score),
    };

    let mut total = sub_scores.weighted_sum(&config.weights) + jitter;
    if candidate.msme_registered {
        total += config.msme_bonus;
    }

    let score = (clamp(total, MIN_TOTAL, MAX_TOTAL) * 100.0).round() as u8;

    PairScore {
        score,
        sub_scores,
        breakdown: sub_scores.to_breakdown(),
        geo,
        jitter,
    }
}
