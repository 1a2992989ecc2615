use std::sync::Arc;

use crate::cache::VerdictCacheHandle;
use crate::classify::{DomainClassifier, default_domains};
use crate::config::Config;
use crate::constants::DEFAULT_MAX_ATTEMPTS;
use crate::document::ComplianceDomain;
use crate::embedding::Embedder;
use crate::judge::{JudgmentService, RetryPolicy};
use crate::limiter::RateLimiter;
use crate::matcher::{DocumentMatcher, MatcherConfig};
use crate::remediation::RemediationSuggester;
use crate::scoring::PairVerifier;

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<DomainClassifier>,

    pub matcher: Arc<DocumentMatcher>,

    pub domains: Arc<Vec<ComplianceDomain>>,

    pub judge_name: String,
}

impl AppState {
    pub fn new(
        classifier: Arc<DomainClassifier>,
        matcher: Arc<DocumentMatcher>,
        domains: Vec<ComplianceDomain>,
        judge_name: impl Into<String>,
    ) -> Self {
        Self {
            classifier,
            matcher,
            domains: Arc::new(domains),
            judge_name: judge_name.into(),
        }
    }

    /// Wires the pipeline around one embedder and one judgment service.
    ///
    /// Every judgment call (verification, remediation, classification) shares one rate
    /// limiter, one retry policy and one verdict cache.
    pub fn from_parts(
        embedder: Arc<dyn Embedder>,
        judge: Arc<dyn JudgmentService>,
        config: &Config,
    ) -> Self {
        let limiter = RateLimiter::new(config.min_call_interval);
        let retry = RetryPolicy::new(DEFAULT_MAX_ATTEMPTS, config.retry_backoff);
        let cache = VerdictCacheHandle::with_capacity(config.verdict_cache_capacity);

        let verifier = PairVerifier::new(judge.clone(), limiter.clone(), cache, retry);
        let suggester = RemediationSuggester::new(judge.clone(), limiter.clone(), retry);
        let matcher = DocumentMatcher::new(
            embedder.clone(),
            verifier,
            suggester,
            MatcherConfig::from_config(config),
        );
        let classifier = DomainClassifier::standard(embedder, judge.clone(), limiter, retry);

        Self::new(
            Arc::new(classifier),
            Arc::new(matcher),
            default_domains(),
            judge.name(),
        )
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("judge", &self.judge_name)
            .field("domains", &self.domains.len())
            .finish()
    }
}
