//! Test fixtures for integration tests.

use std::sync::Arc;
use std::time::Duration;

use policyalign::{
    DocumentMatcher, MatcherConfig, MockJudge, PairVerifier, ParagraphRecord, RateLimiter,
    RemediationSuggester, RetryPolicy, SentenceEmbedder, VerdictCacheHandle,
};

pub const ENCRYPTION: &str = "The vendor shall encrypt customer data at rest.";

pub const BREACH_NOTICE: &str =
    "The vendor shall notify the client within 24 hours of a security breach.";

pub const BADGES: &str = "The vendor shall maintain visitor badges at all sites.";

pub const TWO_SHALL: &str = "The vendor shall encrypt data at rest and shall notify the client within 24 hours of a breach.";

pub fn records(prefix: &str, texts: &[&str]) -> Vec<ParagraphRecord> {
    texts
        .iter()
        .enumerate()
        .map(|(n, text)| ParagraphRecord::new(format!("{prefix}{n}"), *text))
        .collect()
}

/// Pipeline on the stub embedder with every judgment call going through `judge`.
pub struct Pipeline {
    pub judge: Arc<MockJudge>,
    pub cache: VerdictCacheHandle,
    pub matcher: DocumentMatcher,
}

impl Pipeline {
    pub fn new(config: MatcherConfig) -> Self {
        Self::with_judge(Arc::new(MockJudge::new()), config)
    }

    pub fn with_judge(judge: Arc<MockJudge>, config: MatcherConfig) -> Self {
        let limiter = RateLimiter::unlimited();
        let retry = RetryPolicy::new(3, Duration::ZERO);
        let cache = VerdictCacheHandle::new();

        let verifier = PairVerifier::new(judge.clone(), limiter.clone(), cache.clone(), retry);
        let suggester = RemediationSuggester::new(judge.clone(), limiter, retry);
        let matcher = DocumentMatcher::new(
            Arc::new(SentenceEmbedder::stub()),
            verifier,
            suggester,
            config,
        );

        Self {
            judge,
            cache,
            matcher,
        }
    }
}
