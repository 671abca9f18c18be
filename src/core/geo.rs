use std::collections::HashMap;

use crate::core::similarity::clamp_unit;
use crate::models::GeoLabel;

/// Strength assumed for an industry/country pair missing from the table
pub const DEFAULT_CORRIDOR_STRENGTH: f64 = 0.40;

/// Destination country assumed when the importer has none
const DEFAULT_DESTINATION: &str = "India";

const CORRIDOR_WEIGHT: f64 = 0.40;

// Reserved sub-factors, fixed until per-lane signals exist
const LOGISTICS: (f64, f64) = (0.30, 0.5);
const REGULATORY_EASE: (f64, f64) = (0.20, 0.6);
const HISTORICAL_VOLUME: (f64, f64) = (0.10, 0.6);

const PREMIUM_THRESHOLD: f64 = 0.7;

/// Corridor strengths keyed by `"{industry}-{country}"`
#[derive(Debug, Clone, PartialEq)]
pub struct CorridorTable {
    strengths: HashMap<String, f64>,
}

impl CorridorTable {
    pub fn new(strengths: HashMap<String, f64>) -> Self {
        Self { strengths }
    }

    pub fn key(industry: &str, country: &str) -> String {
        format!("{}-{}", industry, country)
    }

    /// Strength of a lane, [`DEFAULT_CORRIDOR_STRENGTH`] when unknown
    pub fn strength(&self, industry: Option<&str>, country: &str) -> f64 {
        industry
            .and_then(|industry| self.strengths.get(&Self::key(industry, country)))
            .copied()
            .unwrap_or(DEFAULT_CORRIDOR_STRENGTH)
    }

    pub fn len(&self) -> usize {
        self.strengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
    }

    /// Built-in lanes shipped with the service
    pub fn builtin_strengths() -> HashMap<String, f64> {
        [
            ("Textiles-USA", 1.0),
            ("Textiles-UK", 0.9),
            ("Chemicals-Germany", 0.95),
            ("Pharmaceuticals-USA", 1.0),
            ("Engineering-Germany", 0.95),
            ("Auto Parts-Germany", 0.95),
            ("Electronics-Japan", 0.95),
            ("IT Software-USA", 1.0),
            ("Solar-Australia", 0.95),
            ("Machinery-Germany", 0.95),
            ("Medical Devices-USA", 1.0),
        ]
        .into_iter()
        .map(|(lane, strength)| (lane.to_string(), strength))
        .collect()
    }
}

impl Default for CorridorTable {
    fn default() -> Self {
        Self::new(Self::builtin_strengths())
    }
}

/// Trade-lane attractiveness for one exporter/importer pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoScore {
    pub score: f64,
    pub corridor: f64,
    pub label: GeoLabel,
}

/// Rate the lane from the exporter's region to the importer's country
///
/// The exporter region is part of the lane identity; logistics, regulatory
/// ease and historical volume are fixed until per-lane signals exist.
pub fn compute_geo_score(
    exporter_region: Option<&str>,
    importer_country: Option<&str>,
    industry: Option<&str>,
    corridors: &CorridorTable,
) -> GeoScore {
    let country = importer_country.unwrap_or(DEFAULT_DESTINATION);
    let corridor = corridors.strength(industry, country);

    let score = clamp_unit(
        CORRIDOR_WEIGHT * corridor
            + LOGISTICS.0 * LOGISTICS.1
            + REGULATORY_EASE.0 * REGULATORY_EASE.1
            + HISTORICAL_VOLUME.0 * HISTORICAL_VOLUME.1,
    );

    let label = if score > PREMIUM_THRESHOLD {
        GeoLabel::Premium
    } else {
        GeoLabel::Strong
    };

    tracing::trace!(
        "Geo lane {:?} -> {} ({:?}): corridor {:.2}, score {:.3}",
        exporter_region,
        country,
        industry,
        corridor,
        score
    );

    GeoScore { score, corridor, label }
}
