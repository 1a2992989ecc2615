//! Domain pre-classification of paragraphs.
//!
//! A [`DomainClassifier`] runs an ordered chain of [`ClassificationStage`]s (keyword
//! rules, then embedding similarity, then the judgment service). The first stage to
//! return [`StageOutcome::Decided`] wins. If none does, the earliest best guess is
//! returned labelled `low-confidence`.
//!
//! Classification happens before matching; the matcher only reads the stored label.

pub mod stages;
pub mod taxonomy;


pub use stages::{ClassificationStage, EmbeddingStage, JudgeStage, KeywordStage, StageOutcome};
pub use taxonomy::{DEFAULT_DOMAINS, RULE_KEYWORDS, default_domains};

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::document::{Classification, ComplianceDomain};
use crate::embedding::Embedder;
use crate::judge::{JudgmentService, RetryPolicy};
use crate::limiter::RateLimiter;

pub const RULE_CONFIDENCE: f32 = 0.92;
pub const EMBEDDING_ACCEPT_THRESHOLD: f32 = 0.60;
pub const AI_ACCEPT_THRESHOLD: f32 = 0.70;

pub const METHOD_RULE: &str = "rule-based";
pub const METHOD_EMBEDDING: &str = "embedding-based";
pub const METHOD_AI: &str = "ai-based";
pub const METHOD_LOW_CONFIDENCE: &str = "low-confidence";
pub const METHOD_UNCLASSIFIED: &str = "unclassified";

/// Ordered classification chain.
pub struct DomainClassifier {
    stages: Vec<Box<dyn ClassificationStage>>,
}

impl std::fmt::Debug for DomainClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomainClassifier")
            .field(
                "stages",
                &self.stages.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl DomainClassifier {
    pub fn new(stages: Vec<Box<dyn ClassificationStage>>) -> Self {
        Self { stages }
    }

    /// Keyword → embedding → judgment service.
    pub fn standard(
        embedder: Arc<dyn Embedder>,
        judge: Arc<dyn JudgmentService>,
        limiter: RateLimiter,
        retry: RetryPolicy,
    ) -> Self {
        Self::new(vec![
            Box::new(KeywordStage),
            Box::new(EmbeddingStage::new(embedder)),
            Box::new(JudgeStage::new(judge, limiter, retry)),
        ])
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    #[instrument(skip_all, fields(text_len = text.len(), domains = domains.len()))]
    pub async fn classify(&self, text: &str, domains: &[ComplianceDomain]) -> Classification {
        let mut fallback: Option<Classification> = None;

        for stage in &self.stages {
            match stage.classify(text, domains).await {
                StageOutcome::Decided(classification) => {
                    debug!(stage = stage.name(), domain = ?classification.domain, "Classified");
                    return classification;
                }
                StageOutcome::Deferred(hint) => {
                    if fallback.is_none() {
                        fallback = hint;
                    }
                }
            }
        }

        match fallback {
            Some(hint) => Classification {
                method: METHOD_LOW_CONFIDENCE.to_string(),
                ..hint
            },
            None => Classification {
                domain: None,
                confidence: 0.0,
                method: METHOD_UNCLASSIFIED.to_string(),
            },
        }
    }

    /// Classifies several paragraphs in order.
    pub async fn classify_all<'a, I>(&self, texts: I, domains: &[ComplianceDomain]) -> Vec<Classification>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut out = Vec::new();
        for text in texts {
            out.push(self.classify(text, domains).await);
        }
        out
    }
}
