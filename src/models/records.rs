//! Source record shapes accepted by the normalizer.
//!
//! Records come from two places: platform accounts (nested trade profile,
//! free-form numeric text) and flat dataset rows (original CSV column names).
//! Every field is optional here; defaults are applied once in
//! [`crate::core::normalizer`].

use serde::{Deserialize, Serialize};

use crate::models::domain::CertificationSet;

/// Numeric field that may arrive as a number or as text like `"50,000 units/month"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    pub fn value(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => n.is_finite().then_some(*n),
            LooseNumber::Text(text) => parse_leading_number(text),
        }
    }
}

/// Leading numeric prefix of `text`, ignoring thousands separators
fn parse_leading_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',' && *c != '_').collect();

    let mut seen_dot = false;
    let end = cleaned
        .char_indices()
        .take_while(|(i, c)| match c {
            '0'..='9' => true,
            '.' if !seen_dot => {
                seen_dot = true;
                true
            }
            '-' | '+' => *i == 0,
            _ => false,
        })
        .map(|(i, c)| i + c.len_utf8())
        .last()?;

    cleaned[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Certification field: comma-separated text or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CertificationList {
    List(Vec<String>),
    Text(String),
}

impl CertificationList {
    pub fn to_set(&self) -> CertificationSet {
        match self {
            CertificationList::List(items) => items
                .iter()
                .map(|item| item.trim())
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect(),
            CertificationList::Text(text) => parse_certifications(text),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_set().is_empty()
    }
}

/// Split a comma-separated certification string into a set
pub fn parse_certifications(text: &str) -> CertificationSet {
    text.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Boolean-ish flag (`1`, `true`, `"True"`, `"yes"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FlagValue {
    pub fn is_set(&self) -> bool {
        match self {
            FlagValue::Bool(b) => *b,
            FlagValue::Number(n) => (*n - 1.0).abs() < f64::EPSILON,
            FlagValue::Text(text) => matches!(
                text.trim().to_lowercase().as_str(),
                "1" | "true" | "yes"
            ),
        }
    }
}

/// Trade profile nested inside a platform account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountTradeProfile {
    pub industry: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub capacity: Option<LooseNumber>,
    pub quantity_required: Option<LooseNumber>,
    pub budget_max: Option<LooseNumber>,
    pub certifications: Option<CertificationList>,
    pub certification_required: Option<CertificationList>,
}

/// Platform account record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub role: Option<String>,
    pub trade_profile: Option<AccountTradeProfile>,
}

/// Flat dataset row using the bulk-export column names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetRow {
    #[serde(rename = "Exporter_ID")]
    pub exporter_id: Option<String>,
    #[serde(rename = "Buyer_ID")]
    pub buyer_id: Option<String>,
    #[serde(rename = "Industry")]
    pub industry: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Manufacturing_Capacity_Tons")]
    pub manufacturing_capacity_tons: Option<f64>,
    #[serde(rename = "Avg_Order_Tons")]
    pub avg_order_tons: Option<f64>,
    #[serde(rename = "Revenue_Size_USD")]
    pub revenue_size_usd: Option<f64>,
    #[serde(rename = "Team_Size")]
    pub team_size: Option<f64>,
    #[serde(rename = "Certification")]
    pub certification: Option<CertificationList>,
    #[serde(rename = "Intent_Score")]
    pub intent_score: Option<f64>,
    #[serde(rename = "Good_Payment_Terms")]
    pub good_payment_terms: Option<f64>,
    #[serde(rename = "Good_Payment_History")]
    pub good_payment_history: Option<f64>,
    #[serde(rename = "Prompt_Response_Score")]
    pub prompt_response_score: Option<f64>,
    #[serde(rename = "Prompt_Response")]
    pub prompt_response: Option<f64>,
    #[serde(rename = "Hiring_Signal")]
    pub hiring_signal: Option<f64>,
    #[serde(rename = "Hiring_Growth")]
    pub hiring_growth: Option<f64>,
    #[serde(rename = "Response_Probability")]
    pub response_probability: Option<f64>,
    #[serde(rename = "Engagement_Spike")]
    pub engagement_spike: Option<f64>,
    #[serde(rename = "DecisionMaker_Change")]
    pub decision_maker_change: Option<f64>,
    #[serde(rename = "Shipment_Value_USD")]
    pub shipment_value_usd: Option<f64>,
    #[serde(rename = "Quantity_Tons")]
    pub quantity_tons: Option<f64>,
    #[serde(rename = "War_Risk")]
    pub war_risk: Option<f64>,
    #[serde(rename = "War_Event")]
    pub war_event: Option<f64>,
    #[serde(rename = "MSME_Udyam")]
    pub msme_udyam: Option<FlagValue>,
}

/// Any record the normalizer understands, tagged by `source`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
pub enum SourceRecord {
    Account(AccountRecord),
    Dataset(DatasetRow),
}

impl From<AccountRecord> for SourceRecord {
    fn from(record: AccountRecord) -> Self {
        SourceRecord::Account(record)
    }
}

impl From<DatasetRow> for SourceRecord {
    fn from(row: DatasetRow) -> Self {
        SourceRecord::Dataset(row)
    }
}
