// Cached access to the Odds API
// Author: kelexine (https://github.com/kelexine)

use super::{OddsClient, OddsRequest};
use crate::cache::{AdaptiveCache, QuotaState};
use crate::error::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Result of a cached fetch.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub payload: Arc<Value>,
    /// Whether the payload came from the cache.
    pub cache_hit: bool,
    /// Quota snapshot after the fetch.
    pub quota: QuotaState,
}

/// Puts the adaptive cache in front of [`OddsClient`].
///
/// Flow per request: fresh entry → serve it; otherwise call upstream, store
/// the payload, then record the response's quota headers. Failed upstream
/// calls leave both the cache and the quota untouched.
pub struct OddsService {
    cache: Arc<AdaptiveCache<Arc<Value>>>,
    client: OddsClient,
}

impl OddsService {
    pub fn new(cache: Arc<AdaptiveCache<Arc<Value>>>, client: OddsClient) -> Self {
        Self { cache, client }
    }

    pub fn cache(&self) -> &Arc<AdaptiveCache<Arc<Value>>> {
        &self.cache
    }

    pub fn client(&self) -> &OddsClient {
        &self.client
    }

    pub async fn fetch(&self, request: &OddsRequest) -> Result<Fetched> {
        request.validate()?;
        let key = request.cache_key();

        if self.cache.should_use_cache(&key) {
            if let Some(payload) = self.cache.get(&key) {
                debug!("Cache hit: {}", key);
                crate::metrics::record_cache_hit();
                return Ok(Fetched {
                    payload,
                    cache_hit: true,
                    quota: self.cache.quota_info(),
                });
            }
        }

        debug!("Cache miss: {}", key);
        crate::metrics::record_cache_miss();

        let response = self.client.fetch(request).await?;
        let payload = Arc::new(response.payload);

        // TTL is decided by the quota known before this response.
        self.cache.set(key, payload.clone());
        crate::metrics::record_cache_store();
        self.cache.update_quota(response.telemetry);

        let quota = self.cache.quota_info();
        crate::metrics::update_quota(&quota);
        crate::metrics::update_cache_entries(self.cache.len());

        if self.cache.is_quota_low() {
            info!(
                "Fetched {} with {} upstream requests remaining",
                request.resource(),
                quota.remaining
            );
        }

        Ok(Fetched {
            payload,
            cache_hit: false,
            quota,
        })
    }
}
