// Service exports
pub mod risk_cache;

pub use risk_cache::{RiskCache, RiskCacheError};
