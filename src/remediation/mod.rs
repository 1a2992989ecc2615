//! Minimal vendor-clause rewrites for detected gaps.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::constants::NO_VENDOR_TEXT;
use crate::judge::prompts::{REMEDIATION_SYSTEM_PROMPT, pair_message, strip_code_fence};
use crate::judge::{JudgmentService, RetryPolicy};
use crate::limiter::RateLimiter;

/// Proposes vendor text that would close a gap. Failures yield `None`.
#[derive(Clone)]
pub struct RemediationSuggester {
    judge: Arc<dyn JudgmentService>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl std::fmt::Debug for RemediationSuggester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemediationSuggester")
            .field("judge", &self.judge.name())
            .finish()
    }
}

impl RemediationSuggester {
    pub fn new(judge: Arc<dyn JudgmentService>, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self {
            judge,
            limiter,
            retry,
        }
    }

    /// Rewrites `vendor_text` so it covers `client_text`. A missing vendor text is replaced
    /// by a fixed placeholder before the call.
    #[instrument(skip_all, fields(client_len = client_text.len()))]
    pub async fn suggest(&self, client_text: &str, vendor_text: Option<&str>) -> Option<String> {
        let vendor_text = vendor_text
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(NO_VENDOR_TEXT);
        let user = pair_message(client_text, vendor_text);
        let (judge, limiter, user) = (&self.judge, &self.limiter, user.as_str());

        let result = self
            .retry
            .run(move |_| async move {
                limiter.acquire().await;
                judge.complete(REMEDIATION_SYSTEM_PROMPT, user).await
            })
            .await;

        match result {
            Ok(raw) => {
                let suggestion = strip_code_fence(&raw).to_string();
                if suggestion.is_empty() {
                    warn!("Remediation suggestion was empty");
                    return None;
                }
                debug!(suggestion_len = suggestion.len(), "Remediation suggested");
                Some(suggestion)
            }
            Err(e) => {
                warn!(error = %e, "Remediation unavailable");
                None
            }
        }
    }
}
