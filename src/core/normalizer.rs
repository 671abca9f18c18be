use crate::core::similarity::clamp_unit;
use crate::models::{
    AccountRecord, CertificationList, CertificationSet, DatasetRow, LooseNumber, Profile, SourceRecord,
    TradeRole,
};

/// Country whose profiles keep their state/region
pub const DEFAULT_HOME_COUNTRY: &str = "India";

/// Region assigned to profiles outside the home country
pub const UNKNOWN_REGION: &str = "Unknown";

pub const DEFAULT_CAPACITY_TONS: f64 = 1000.0;
pub const DEFAULT_NEED_TONS: f64 = 50.0;
pub const DEFAULT_REVENUE_USD: f64 = 1_000_000.0;
pub const DEFAULT_TEAM_SIZE: f64 = 50.0;

/// Fill values for fields a source record did not carry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDefaults {
    pub intent_score: f64,
    pub payment_terms_score: f64,
    pub prompt_response_score: f64,
    pub response_probability: f64,
    pub engagement_spike: f64,
    pub decision_maker_change_score: f64,
    pub hiring_growth: f64,
    pub shipment_value_usd: f64,
    pub quantity_tons: f64,
}

impl FieldDefaults {
    /// Platform accounts carry no behavioral signals of their own
    pub const ACCOUNT: FieldDefaults = FieldDefaults {
        intent_score: 0.85,
        payment_terms_score: 0.9,
        prompt_response_score: 0.9,
        response_probability: 0.8,
        engagement_spike: 0.2,
        decision_maker_change_score: 0.1,
        hiring_growth: 0.5,
        shipment_value_usd: 500_000.0,
        quantity_tons: 100.0,
    };

    pub const DATASET_EXPORTER: FieldDefaults = FieldDefaults {
        intent_score: 0.7,
        payment_terms_score: 0.9,
        prompt_response_score: 0.8,
        response_probability: 0.6,
        engagement_spike: 0.1,
        decision_maker_change_score: 0.05,
        hiring_growth: 0.5,
        shipment_value_usd: 100_000.0,
        quantity_tons: 50.0,
    };

    pub const DATASET_IMPORTER: FieldDefaults = FieldDefaults {
        intent_score: 0.6,
        payment_terms_score: 0.5,
        prompt_response_score: 0.5,
        response_probability: 0.6,
        engagement_spike: 0.1,
        decision_maker_change_score: 0.05,
        hiring_growth: 0.3,
        shipment_value_usd: 100_000.0,
        quantity_tons: 50.0,
    };

    pub fn for_dataset(role: TradeRole) -> Self {
        match role {
            TradeRole::Exporter => Self::DATASET_EXPORTER,
            TradeRole::Importer => Self::DATASET_IMPORTER,
        }
    }
}

/// Maps account records and dataset rows onto one [`Profile`] shape
#[derive(Debug, Clone)]
pub struct Normalizer {
    home_country: String,
}

impl Normalizer {
    pub fn new(home_country: impl Into<String>) -> Self {
        Self {
            home_country: home_country.into(),
        }
    }

    pub fn home_country(&self) -> &str {
        &self.home_country
    }

    /// Normalize any supported record for the declared role
    pub fn normalize(&self, record: &SourceRecord, role: TradeRole) -> Profile {
        match record {
            SourceRecord::Account(account) => self.normalize_account(account, role),
            SourceRecord::Dataset(row) => self.normalize_dataset_row(row, role),
        }
    }

    pub fn normalize_account(&self, account: &AccountRecord, role: TradeRole) -> Profile {
        let trade = account.trade_profile.clone().unwrap_or_default();
        let defaults = FieldDefaults::ACCOUNT;

        let (capacity, need) = role_volumes(
            role,
            trade.capacity.as_ref().and_then(LooseNumber::value),
            trade.quantity_required.as_ref().and_then(LooseNumber::value),
        );

        let certifications = [&trade.certifications, &trade.certification_required]
            .into_iter()
            .flatten()
            .map(CertificationList::to_set)
            .find(|set| !set.is_empty())
            .unwrap_or_default();

        let country = non_blank(trade.country);
        let region = self.home_region(country.as_deref(), trade.region);

        Profile {
            id: account.id.clone(),
            industry: non_blank(trade.industry),
            country,
            region,
            capacity,
            need,
            revenue_usd: positive_or(trade.budget_max.as_ref().and_then(LooseNumber::value), DEFAULT_REVENUE_USD),
            team_size: DEFAULT_TEAM_SIZE,
            certifications,
            intent_score: defaults.intent_score,
            payment_terms_score: defaults.payment_terms_score,
            prompt_response_score: defaults.prompt_response_score,
            response_probability: defaults.response_probability,
            engagement_spike: defaults.engagement_spike,
            decision_maker_change_score: defaults.decision_maker_change_score,
            hiring_growth: defaults.hiring_growth,
            shipment_value_usd: defaults.shipment_value_usd,
            quantity_tons: defaults.quantity_tons,
            war_risk_score: 0.0,
            war_event_score: 0.0,
            msme_registered: false,
        }
    }

    pub fn normalize_dataset_row(&self, row: &DatasetRow, role: TradeRole) -> Profile {
        let defaults = FieldDefaults::for_dataset(role);

        let id = match role {
            TradeRole::Exporter => row.exporter_id.clone().or_else(|| row.buyer_id.clone()),
            TradeRole::Importer => row.buyer_id.clone().or_else(|| row.exporter_id.clone()),
        }
        .unwrap_or_default();

        let (capacity, need) = role_volumes(role, row.manufacturing_capacity_tons, row.avg_order_tons);

        // Exporter rows describe home-country manufacturers and rarely carry a country column
        let country = match (non_blank(row.country.clone()), role) {
            (Some(country), _) => Some(country),
            (None, TradeRole::Exporter) => Some(self.home_country.clone()),
            (None, TradeRole::Importer) => None,
        };
        let region = self.home_region(country.as_deref(), row.state.clone());

        let (payment, prompt, hiring) = match role {
            TradeRole::Exporter => (
                row.good_payment_terms.or(row.good_payment_history),
                row.prompt_response_score.or(row.prompt_response),
                row.hiring_signal.or(row.hiring_growth),
            ),
            TradeRole::Importer => (
                row.good_payment_history.or(row.good_payment_terms),
                row.prompt_response.or(row.prompt_response_score),
                row.hiring_growth.or(row.hiring_signal),
            ),
        };

        Profile {
            id,
            industry: non_blank(row.industry.clone()),
            country,
            region,
            capacity,
            need,
            revenue_usd: positive_or(row.revenue_size_usd, DEFAULT_REVENUE_USD),
            team_size: positive_or(row.team_size, DEFAULT_TEAM_SIZE),
            certifications: row
                .certification
                .as_ref()
                .map(CertificationList::to_set)
                .unwrap_or_else(CertificationSet::new),
            intent_score: unit_or(row.intent_score, defaults.intent_score),
            payment_terms_score: unit_or(payment, defaults.payment_terms_score),
            prompt_response_score: unit_or(prompt, defaults.prompt_response_score),
            response_probability: unit_or(row.response_probability, defaults.response_probability),
            engagement_spike: unit_or(row.engagement_spike, defaults.engagement_spike),
            decision_maker_change_score: unit_or(
                row.decision_maker_change,
                defaults.decision_maker_change_score,
            ),
            hiring_growth: unit_or(hiring, defaults.hiring_growth),
            shipment_value_usd: positive_or(row.shipment_value_usd, defaults.shipment_value_usd),
            quantity_tons: positive_or(row.quantity_tons, defaults.quantity_tons),
            war_risk_score: unit_or(row.war_risk, 0.0),
            war_event_score: unit_or(row.war_event, 0.0),
            msme_registered: row.msme_udyam.as_ref().is_some_and(|flag| flag.is_set()),
        }
    }

    fn home_region(&self, country: Option<&str>, region: Option<String>) -> Option<String> {
        if country == Some(self.home_country.as_str()) {
            non_blank(region)
        } else {
            Some(UNKNOWN_REGION.to_string())
        }
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_HOME_COUNTRY)
    }
}

/// Normalize a record with the default home country
pub fn normalize(record: &SourceRecord, role: TradeRole) -> Profile {
    Normalizer::default().normalize(record, role)
}

/// Exactly one of capacity/need is populated; the other stays `None`
fn role_volumes(role: TradeRole, capacity: Option<f64>, need: Option<f64>) -> (Option<f64>, Option<f64>) {
    match role {
        TradeRole::Exporter => (Some(positive_or(capacity, DEFAULT_CAPACITY_TONS)), None),
        TradeRole::Importer => (None, Some(positive_or(need, DEFAULT_NEED_TONS))),
    }
}

fn positive_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

fn unit_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite()).map(clamp_unit).unwrap_or(default)
}

/// Blank text counts as absent; anything else is kept verbatim
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
