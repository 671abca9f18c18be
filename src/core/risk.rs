use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::core::similarity::{clamp_unit, recency_weight};
use crate::models::{NewsEvent, RiskMap};

const TARIFF_WEIGHT: f64 = 0.25;
const WAR_WEIGHT: f64 = 0.30;
const CALAMITY_WEIGHT: f64 = 0.10;

/// Risk reported for an industry whose events all decayed to zero weight
const ZERO_WEIGHT_RISK: f64 = 0.5;

/// Unweighted risk of a single event, in [0, 0.65]
#[inline]
pub fn raw_event_risk(event: &NewsEvent) -> f64 {
    let tariff = clamp_unit(event.tariff_change.unwrap_or(0.0).abs());
    let war = clamp_unit(event.war_flag.unwrap_or(0.0));
    let calamity = clamp_unit(event.natural_calamity_flag.unwrap_or(0.0));

    TARIFF_WEIGHT * tariff + WAR_WEIGHT * war + CALAMITY_WEIGHT * calamity
}

/// Reduce an event snapshot into per-industry risk
///
/// Each event contributes `rawRisk * impact * recency` to its industry's
/// weighted sum and `impact * recency` to its weight; the industry's risk is
/// the weighted mean. Industries with no events are absent from the map.
pub fn compute_industry_risk(events: &[NewsEvent], reference: NaiveDate) -> RiskMap {
    let mut accumulated: BTreeMap<&str, (f64, f64)> = BTreeMap::new();

    for event in events {
        let weight = event.impact_level.weight() * recency_weight(event.published_at.as_deref(), reference);
        let entry = accumulated.entry(event.industry.as_str()).or_insert((0.0, 0.0));
        entry.0 += raw_event_risk(event) * weight;
        entry.1 += weight;
    }

    let mut risk_map = RiskMap::new();
    for (industry, (sum, weight)) in accumulated {
        let risk = if weight > 0.0 { sum / weight } else { ZERO_WEIGHT_RISK };
        risk_map.insert(industry, clamp_unit(risk));
    }

    tracing::trace!("Aggregated risk for {} industries from {} events", risk_map.len(), events.len());

    risk_map
}
