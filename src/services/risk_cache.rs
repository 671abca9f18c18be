use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::core::matcher::Matcher;
use crate::models::{NewsEvent, RiskMap};

/// Errors that can occur with risk cache operations
#[derive(Debug, Error)]
pub enum RiskCacheError {
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// In-memory cache of aggregated risk maps
///
/// Keys are content fingerprints of the event snapshot plus the reference
/// date, so a changed snapshot always misses.
#[derive(Clone)]
pub struct RiskCache {
    cache: moka::future::Cache<String, Arc<RiskMap>>,
}

impl RiskCache {
    pub fn new(capacity: u64, ttl_secs: u64) -> Self {
        let cache = moka::future::CacheBuilder::new(capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// SHA-256 of the serialized snapshot and reference date, hex encoded
    pub fn fingerprint(events: &[NewsEvent], reference: NaiveDate) -> Result<String, RiskCacheError> {
        let mut hasher = Sha256::new();
        hasher.update(serde_json::to_vec(events)?);
        hasher.update(reference.to_string().as_bytes());
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Cached risk map for `events`, computing it with `matcher` on a miss
    pub async fn get_or_compute(
        &self,
        matcher: &Matcher,
        events: &[NewsEvent],
    ) -> Result<Arc<RiskMap>, RiskCacheError> {
        let key = Self::fingerprint(events, matcher.reference_date())?;

        if let Some(risk) = self.cache.get(&key).await {
            tracing::trace!("Risk cache hit: {}", key);
            return Ok(risk);
        }

        let risk = Arc::new(matcher.risk_map(events));
        self.cache.insert(key.clone(), Arc::clone(&risk)).await;

        tracing::debug!("Risk cache miss: {} ({} industries)", key, risk.len());
        Ok(risk)
    }

    pub async fn contains(&self, events: &[NewsEvent], reference: NaiveDate) -> Result<bool, RiskCacheError> {
        let key = Self::fingerprint(events, reference)?;
        Ok(self.cache.get(&key).await.is_some())
    }

    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}
