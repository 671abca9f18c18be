use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Normalized set of certification names (ISO 9001, CE, FDA, ...)
pub type CertificationSet = BTreeSet<String>;

/// Which side of a trade a profile sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeRole {
    Exporter,
    Importer,
}

impl TradeRole {
    /// The role candidates must hold when ranking for an anchor of this role
    pub fn opposite(self) -> Self {
        match self {
            TradeRole::Exporter => TradeRole::Importer,
            TradeRole::Importer => TradeRole::Exporter,
        }
    }
}

impl fmt::Display for TradeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeRole::Exporter => write!(f, "exporter"),
            TradeRole::Importer => write!(f, "importer"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown trade role: {0}")]
pub struct ParseRoleError(pub String);

impl FromStr for TradeRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "exporter" | "seller" | "supplier" => Ok(TradeRole::Exporter),
            "importer" | "buyer" => Ok(TradeRole::Importer),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// Canonical view of one trade entity, produced by the normalizer
///
/// Every numeric field is already default-filled; only `capacity`/`need`
/// stay optional because their presence encodes the role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub industry: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    /// Exporter manufacturing volume in tons
    pub capacity: Option<f64>,
    /// Importer average order volume in tons
    pub need: Option<f64>,
    #[serde(rename = "revenueUSD")]
    pub revenue_usd: f64,
    pub team_size: f64,
    pub certifications: CertificationSet,
    pub intent_score: f64,
    pub payment_terms_score: f64,
    pub prompt_response_score: f64,
    pub response_probability: f64,
    pub engagement_spike: f64,
    pub decision_maker_change_score: f64,
    pub hiring_growth: f64,
    #[serde(rename = "shipmentValueUSD")]
    pub shipment_value_usd: f64,
    pub quantity_tons: f64,
    pub war_risk_score: f64,
    pub war_event_score: f64,
    /// Registered small-enterprise program participant
    pub msme_registered: bool,
}

impl Profile {
    /// A profile acts as the exporter side when it carries a capacity
    pub fn is_exporter(&self) -> bool {
        self.capacity.is_some()
    }
}

/// Severity bucket attached to a news event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ImpactLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl ImpactLevel {
    pub fn weight(self) -> f64 {
        match self {
            ImpactLevel::High => 1.0,
            ImpactLevel::Medium => 0.6,
            ImpactLevel::Low => 0.3,
        }
    }

    /// Unrecognised labels weigh as `Low`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "high" => ImpactLevel::High,
            "medium" => ImpactLevel::Medium,
            _ => ImpactLevel::Low,
        }
    }
}

impl<'de> Deserialize<'de> for ImpactLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.map(|s| ImpactLevel::from_label(&s)).unwrap_or_default())
    }
}

fn default_event_industry() -> String {
    "General".to_string()
}

/// Read-only news/event record feeding the risk aggregator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsEvent {
    #[serde(default = "default_event_industry", alias = "Affected_Industry")]
    pub industry: String,
    #[serde(default, alias = "Impact_Level")]
    pub impact_level: ImpactLevel,
    #[serde(default, alias = "Tariff_Change")]
    pub tariff_change: Option<f64>,
    #[serde(default, alias = "War_Flag")]
    pub war_flag: Option<f64>,
    #[serde(default, alias = "Natural_Calamity_Flag")]
    pub natural_calamity_flag: Option<f64>,
    #[serde(default, alias = "date", alias = "Date")]
    pub published_at: Option<String>,
}

impl NewsEvent {
    pub fn new(industry: impl Into<String>, impact_level: ImpactLevel) -> Self {
        Self {
            industry: industry.into(),
            impact_level,
            tariff_change: None,
            war_flag: None,
            natural_calamity_flag: None,
            published_at: None,
        }
    }

    pub fn with_published_at(mut self, published_at: impl Into<String>) -> Self {
        self.published_at = Some(published_at.into());
        self
    }

    pub fn with_tariff_change(mut self, tariff_change: f64) -> Self {
        self.tariff_change = Some(tariff_change);
        self
    }

    pub fn with_war(mut self) -> Self {
        self.war_flag = Some(1.0);
        self
    }

    pub fn with_natural_calamity(mut self) -> Self {
        self.natural_calamity_flag = Some(1.0);
        self
    }
}

/// Industry name -> aggregated risk scalar in [0, 1]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskMap(BTreeMap<String, f64>);

/// Risk assumed for industries with no events in the snapshot
pub const DEFAULT_INDUSTRY_RISK: f64 = 0.3;

impl RiskMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, industry: impl Into<String>, risk: f64) {
        self.0.insert(industry.into(), risk);
    }

    pub fn get(&self, industry: &str) -> Option<f64> {
        self.0.get(industry).copied()
    }

    /// Risk for an industry, falling back to [`DEFAULT_INDUSTRY_RISK`]
    pub fn risk_for(&self, industry: Option<&str>) -> f64 {
        industry
            .and_then(|name| self.get(name))
            .unwrap_or(DEFAULT_INDUSTRY_RISK)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &f64)> {
        self.0.iter()
    }
}

/// Trade-lane tier reported alongside a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeoLabel {
    Premium,
    Strong,
}

/// Sub-scores as integer percentages, independent of weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub demand_fit: u8,
    pub geo_fit: u8,
    pub behavioral_fit: u8,
    pub reliability: u8,
    pub scale_fit: u8,
    pub outreach_receptiveness: u8,
    pub momentum: u8,
    pub trade_signal: u8,
    pub safety_score: u8,
}

impl ScoreBreakdown {
    pub fn entries(&self) -> [(&'static str, u8); 9] {
        [
            ("demand_fit", self.demand_fit),
            ("geo_fit", self.geo_fit),
            ("behavioral_fit", self.behavioral_fit),
            ("reliability", self.reliability),
            ("scale_fit", self.scale_fit),
            ("outreach_receptiveness", self.outreach_receptiveness),
            ("momentum", self.momentum),
            ("trade_signal", self.trade_signal),
            ("safety_score", self.safety_score),
        ]
    }
}

/// Scored candidate returned by the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub candidate_id: String,
    /// Compatibility index, always within 45..=98
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub geo_label: GeoLabel,
    pub reason: String,
}

/// Per-component scoring weights
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
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

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.entries().iter().map(|(_, w)| w).sum()
    }

    pub fn entries(&self) -> [(&'static str, f64); 9] {
        [
            ("demand_fit", self.demand_fit),
            ("geo_fit", self.geo_fit),
            ("behavioral_fit", self.behavioral_fit),
            ("reliability", self.reliability),
            ("scale_fit", self.scale_fit),
            ("outreach_receptiveness", self.outreach_receptiveness),
            ("momentum", self.momentum),
            ("trade_signal", self.trade_signal),
            ("safety_score", self.safety_score),
        ]
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            demand_fit: 0.18,
            geo_fit: 0.15,
            behavioral_fit: 0.17,
            reliability: 0.15,
            scale_fit: 0.12,
            outreach_receptiveness: 0.10,
            momentum: 0.08,
            trade_signal: 0.03,
            safety_score: 0.02,
        }
    }
}
