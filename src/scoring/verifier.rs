use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::types::{Verification, VerificationVerdict};
use crate::cache::VerdictCacheHandle;
use crate::hashing::hash_pair;
use crate::judge::prompts::{VERIFY_SYSTEM_PROMPT, pair_message};
use crate::judge::{JudgmentService, RetryPolicy};
use crate::limiter::RateLimiter;

/// Asks the judgment service whether a vendor unit substantially satisfies a client unit.
///
/// Verdicts are memoized in the shared [`VerdictCacheHandle`]; every outbound call goes
/// through the shared [`RateLimiter`] and is retried per the [`RetryPolicy`].
#[derive(Clone)]
pub struct PairVerifier {
    judge: Arc<dyn JudgmentService>,
    limiter: RateLimiter,
    cache: VerdictCacheHandle,
    retry: RetryPolicy,
}

impl std::fmt::Debug for PairVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairVerifier")
            .field("judge", &self.judge.name())
            .field("limiter", &self.limiter)
            .field("cache", &*self.cache)
            .field("retry", &self.retry)
            .finish()
    }
}

impl PairVerifier {
    pub fn new(
        judge: Arc<dyn JudgmentService>,
        limiter: RateLimiter,
        cache: VerdictCacheHandle,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            judge,
            limiter,
            cache,
            retry,
        }
    }

    pub fn cache(&self) -> &VerdictCacheHandle {
        &self.cache
    }

    pub fn judge(&self) -> &Arc<dyn JudgmentService> {
        &self.judge
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the cached or freshly obtained verdict, or [`Verification::Unavailable`]
    /// when the service cannot produce one.
    #[instrument(skip_all, fields(client_len = client_text.len(), vendor_len = vendor_text.len()))]
    pub async fn verify(&self, client_text: &str, vendor_text: &str) -> Verification {
        let key = hash_pair(client_text, vendor_text);

        if let Some(verdict) = self.cache.get_by_key(&key) {
            debug!(is_match = verdict.is_match, "Verdict cache hit");
            return Verification::Verdict(verdict);
        }

        let user = pair_message(client_text, vendor_text);
        let (judge, limiter, user) = (&self.judge, &self.limiter, user.as_str());

        let result = self
            .retry
            .run(move |_| async move {
                limiter.acquire().await;
                let raw = judge.complete(VERIFY_SYSTEM_PROMPT, user).await?;
                VerificationVerdict::parse(&raw)
            })
            .await;

        match result {
            Ok(verdict) => {
                debug!(
                    is_match = verdict.is_match,
                    similarity = verdict.similarity_score,
                    gap_type = verdict.gap_type.map(|g| g.as_str()),
                    "Verdict received"
                );
                let verdict = Arc::new(verdict);
                self.cache.insert_by_key(key, Arc::clone(&verdict));
                Verification::Verdict(verdict)
            }
            Err(e) => {
                warn!(error = %e, judge = self.judge.name(), "Verification unavailable");
                Verification::Unavailable
            }
        }
    }
}
