use std::fmt;

use crate::core::scoring::id_checksum;
use crate::models::{Profile, ScoreBreakdown};

const TEMPLATES_PER_TIER: u64 = 4;

/// Explanation bucket chosen from the final score and breakdown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReasonTier {
    Exceptional,
    Strong,
    Corridor,
    Baseline,
}

impl ReasonTier {
    /// First matching rule wins: score above 85, score above 70, geo fit above 80
    pub fn select(score: u8, breakdown: &ScoreBreakdown) -> Self {
        if score > 85 {
            ReasonTier::Exceptional
        } else if score > 70 {
            ReasonTier::Strong
        } else if breakdown.geo_fit > 80 {
            ReasonTier::Corridor
        } else {
            ReasonTier::Baseline
        }
    }
}

impl fmt::Display for ReasonTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReasonTier::Exceptional => write!(f, "exceptional"),
            ReasonTier::Strong => write!(f, "strong"),
            ReasonTier::Corridor => write!(f, "corridor"),
            ReasonTier::Baseline => write!(f, "baseline"),
        }
    }
}

/// Template slot for a candidate id, stable across runs and platforms
pub fn template_index(candidate_id: &str) -> usize {
    (id_checksum(candidate_id) % TEMPLATES_PER_TIER) as usize
}

/// Human-readable explanation for a scored candidate
pub fn generate_reason(score: u8, breakdown: &ScoreBreakdown, candidate: &Profile) -> String {
    let tier = ReasonTier::select(score, breakdown);
    let industry = candidate.industry.as_deref().unwrap_or("sector");
    let country = candidate.country.as_deref().unwrap_or("region");

    render(tier, template_index(&candidate.id), industry, country)
}

fn render(tier: ReasonTier, index: usize, industry: &str, country: &str) -> String {
    match (tier, index) {
        (ReasonTier::Exceptional, 0) => format!(
            "Exceptional match: demand volume and trade corridor line up closely for {} out of {}.",
            industry, country
        ),
        (ReasonTier::Exceptional, 1) => format!(
            "Prime connection: strong overlap across the {} market in {}.",
            industry, country
        ),
        (ReasonTier::Exceptional, 2) => format!(
            "Top-tier partner in {}: behavior and scale both fit your {} profile.",
            country, industry
        ),
        (ReasonTier::Exceptional, _) => format!(
            "Maximum fit: capacity and reliability agree on nearly every axis for this {} partner in {}.",
            industry, country
        ),
        (ReasonTier::Strong, 0) => format!(
            "Strong synergy: reliable {} partner in {} showing active buying intent.",
            industry, country
        ),
        (ReasonTier::Strong, 1) => format!(
            "Solid match: operating scales in {} trade are compatible with {}.",
            industry, country
        ),
        (ReasonTier::Strong, 2) => format!(
            "Strategic fit: your demand aligns with verified {} capacity serving {}.",
            industry, country
        ),
        (ReasonTier::Strong, _) => format!(
            "High potential: stable conditions in {} support this {} partner.",
            country, industry
        ),
        (ReasonTier::Corridor, 0) => format!(
            "Corridor direct: established {} export lane into {}.",
            industry, country
        ),
        (ReasonTier::Corridor, 1) => format!(
            "Geo advantage: proven {} trade routes to {} keep logistics simple.",
            industry, country
        ),
        (ReasonTier::Corridor, 2) => format!(
            "Regional match: short shipping paths for {} between you and {}.",
            industry, country
        ),
        (ReasonTier::Corridor, _) => format!(
            "Location synergy: fast turnaround expected on {} corridors for {}.",
            country, industry
        ),
        (ReasonTier::Baseline, 0) => format!(
            "Verified lead: standard compatibility with a neutral risk profile in {} ({}).",
            industry, country
        ),
        (ReasonTier::Baseline, 1) => format!(
            "Baseline fit: meets the core criteria for {} trade with {}.",
            industry, country
        ),
        (ReasonTier::Baseline, 2) => format!(
            "Market lead: general {} match in {}, suited to broad outreach.",
            industry, country
        ),
        (ReasonTier::Baseline, _) => format!(
            "Active profile: ongoing engagement in {} keeps this {} lead viable.",
            country, industry
        ),
    }
}
