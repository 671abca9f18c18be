use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::CertificationSet;

/// Width of the log-ratio bell curve
const LOG_RATIO_SIGMA: f64 = 1.5;

/// Decay constant for record age, in days
const RECENCY_DECAY_DAYS: f64 = 730.0;

/// Value returned when a comparison has nothing meaningful to compare
pub const NEUTRAL_SIMILARITY: f64 = 0.5;

/// Bound a real to `[lo, hi]`
///
/// NaN collapses to `lo`, so downstream arithmetic never sees it.
#[inline]
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// [`clamp`] to the unit interval
#[inline]
pub fn clamp_unit(v: f64) -> f64 {
    clamp(v, 0.0, 1.0)
}

/// Jaccard overlap of two sets
///
/// Returns 0.5 when either side is absent and 1.0 when both are empty.
pub fn jaccard_similarity(a: Option<&CertificationSet>, b: Option<&CertificationSet>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return NEUTRAL_SIMILARITY,
    };

    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;

    intersection / union
}

/// Similarity of two magnitudes in log space
///
/// `exp(-0.5 * (ln(x/y) / 1.5)^2)`: 1.0 at equal values, ~0.65 at a 4x gap.
/// Missing (NaN) or non-positive operands give 0.5.
#[inline]
pub fn log_ratio_similarity(x: f64, y: f64) -> f64 {
    if !(x > 0.0 && y > 0.0) || !x.is_finite() || !y.is_finite() {
        return NEUTRAL_SIMILARITY;
    }

    let ratio = (x / y).ln() / LOG_RATIO_SIGMA;
    (-0.5 * ratio * ratio).exp()
}

/// Linear rescale of `v` from `[lo, hi]` into `[0, 1]`, clamped
#[inline]
pub fn norm_linear(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        clamp_unit((v - lo) / (hi - lo))
    } else {
        NEUTRAL_SIMILARITY
    }
}

/// Parse the date formats seen in event feeds and datasets
pub fn parse_event_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Exponential age decay `exp(-daysOld / 730)` relative to `reference`
///
/// Future dates count as age zero. Missing or unparseable dates give 0.5.
pub fn recency_weight(date: Option<&str>, reference: NaiveDate) -> f64 {
    let Some(published) = date.and_then(parse_event_date) else {
        return NEUTRAL_SIMILARITY;
    };
    let Some(reference) = reference.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()) else {
        return NEUTRAL_SIMILARITY;
    };

    let days_old = ((reference - published).num_seconds() as f64 / 86_400.0).max(0.0);
    (-days_old / RECENCY_DECAY_DAYS).exp()
}
