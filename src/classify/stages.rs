use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Deserialize;
use tracing::{debug, warn};

use super::taxonomy::{RULE_KEYWORDS, contains_phrase};
use super::{
    AI_ACCEPT_THRESHOLD, EMBEDDING_ACCEPT_THRESHOLD, METHOD_AI, METHOD_EMBEDDING, METHOD_RULE,
    RULE_CONFIDENCE,
};
use crate::constants::round_to;
use crate::document::{Classification, ComplianceDomain};
use crate::embedding::{Embedder, cosine_similarity, l2_normalize};
use crate::hashing::hash_to_u64;
use crate::judge::prompts::{classify_system_prompt, strip_code_fence};
use crate::judge::{JudgeError, JudgmentService, RetryPolicy};
use crate::limiter::RateLimiter;

#[derive(Debug, Clone, PartialEq)]
/// Result of one stage.
pub enum StageOutcome {
    /// Confident label; the chain stops here.
    Decided(Classification),
    /// Not confident. May carry the stage's best guess for the low-confidence fallback.
    Deferred(Option<Classification>),
}

#[async_trait]
/// One step of the classification chain.
pub trait ClassificationStage: Send + Sync {
    fn name(&self) -> &'static str;

    async fn classify(&self, text: &str, domains: &[ComplianceDomain]) -> StageOutcome;
}

/// Keyword rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordStage;

#[async_trait]
impl ClassificationStage for KeywordStage {
    fn name(&self) -> &'static str {
        METHOD_RULE
    }

    async fn classify(&self, text: &str, domains: &[ComplianceDomain]) -> StageOutcome {
        let lower = text.to_lowercase();

        for (domain, keywords) in RULE_KEYWORDS {
            if !domains.iter().any(|d| d.name == *domain) {
                continue;
            }
            if let Some(keyword) = keywords.iter().find(|k| contains_phrase(&lower, k)) {
                debug!(domain, keyword, "Keyword rule matched");
                return StageOutcome::Decided(Classification {
                    domain: Some(domain.to_string()),
                    confidence: RULE_CONFIDENCE,
                    method: METHOD_RULE.to_string(),
                });
            }
        }

        StageOutcome::Deferred(None)
    }
}

struct DescriptionEmbeddings {
    fingerprint: u64,
    vectors: Arc<Vec<Vec<f32>>>,
}

/// Cosine similarity between the text and each domain description.
pub struct EmbeddingStage {
    embedder: Arc<dyn Embedder>,
    cache: RwLock<Option<DescriptionEmbeddings>>,
}

impl std::fmt::Debug for EmbeddingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmbeddingStage")
            .field("dimension", &self.embedder.dimension())
            .field("cached", &self.cache.read().is_some())
            .finish()
    }
}

impl EmbeddingStage {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            cache: RwLock::new(None),
        }
    }

    /// Description embeddings for `domains`, computed once per distinct domain list.
    fn description_vectors(
        &self,
        domains: &[ComplianceDomain],
    ) -> Result<Arc<Vec<Vec<f32>>>, crate::embedding::EmbeddingError> {
        let fingerprint = fingerprint(domains);

        if let Some(cached) = self.cache.read().as_ref()
            && cached.fingerprint == fingerprint
        {
            return Ok(Arc::clone(&cached.vectors));
        }

        let descriptions: Vec<&str> = domains.iter().map(|d| d.description.as_str()).collect();
        let mut vectors = self.embedder.embed_batch(&descriptions)?;
        for v in &mut vectors {
            l2_normalize(v);
        }
        let vectors = Arc::new(vectors);

        *self.cache.write() = Some(DescriptionEmbeddings {
            fingerprint,
            vectors: Arc::clone(&vectors),
        });
        debug!(domains = domains.len(), "Domain description embeddings cached");

        Ok(vectors)
    }
}

fn fingerprint(domains: &[ComplianceDomain]) -> u64 {
    let mut bytes = Vec::new();
    for domain in domains {
        bytes.extend_from_slice(domain.name.as_bytes());
        bytes.push(0x1f);
        bytes.extend_from_slice(domain.description.as_bytes());
        bytes.push(0x1e);
    }
    hash_to_u64(&bytes)
}

#[async_trait]
impl ClassificationStage for EmbeddingStage {
    fn name(&self) -> &'static str {
        METHOD_EMBEDDING
    }

    async fn classify(&self, text: &str, domains: &[ComplianceDomain]) -> StageOutcome {
        if domains.is_empty() {
            return StageOutcome::Deferred(None);
        }

        let vectors = match self.description_vectors(domains) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Domain description embedding failed");
                return StageOutcome::Deferred(None);
            }
        };
        let query = match self.embedder.embed(text) {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "Paragraph embedding failed");
                return StageOutcome::Deferred(None);
            }
        };

        let best = vectors
            .iter()
            .enumerate()
            .map(|(i, v)| (i, cosine_similarity(&query, v)))
            .fold(None, |best: Option<(usize, f32)>, (i, score)| match best {
                Some((_, top)) if top >= score => best,
                _ => Some((i, score)),
            });

        let Some((index, score)) = best else {
            return StageOutcome::Deferred(None);
        };

        let classification = Classification {
            domain: Some(domains[index].name.clone()),
            confidence: round_to(score, 3),
            method: METHOD_EMBEDDING.to_string(),
        };

        debug!(
            domain = %domains[index].name,
            score,
            "Embedding classification"
        );

        if score >= EMBEDDING_ACCEPT_THRESHOLD {
            StageOutcome::Decided(classification)
        } else {
            StageOutcome::Deferred(Some(classification))
        }
    }
}

#[derive(Deserialize)]
struct DomainPrediction {
    domain: Option<String>,
    #[serde(default)]
    confidence: f64,
}

/// Asks the judgment service to pick a domain.
pub struct JudgeStage {
    judge: Arc<dyn JudgmentService>,
    limiter: RateLimiter,
    retry: RetryPolicy,
}

impl std::fmt::Debug for JudgeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeStage")
            .field("judge", &self.judge.name())
            .finish()
    }
}

impl JudgeStage {
    pub fn new(judge: Arc<dyn JudgmentService>, limiter: RateLimiter, retry: RetryPolicy) -> Self {
        Self {
            judge,
            limiter,
            retry,
        }
    }

    async fn predict(
        &self,
        text: &str,
        domains: &[ComplianceDomain],
    ) -> Result<DomainPrediction, JudgeError> {
        let system = classify_system_prompt(domains);
        let (judge, limiter, system) = (&self.judge, &self.limiter, system.as_str());

        let raw = self
            .retry
            .run(move |_| async move {
                limiter.acquire().await;
                judge.complete(system, text).await
            })
            .await?;

        serde_json::from_str(strip_code_fence(&raw)).map_err(|e| JudgeError::Malformed {
            reason: format!("classification is not valid JSON: {}", e),
        })
    }
}

#[async_trait]
impl ClassificationStage for JudgeStage {
    fn name(&self) -> &'static str {
        METHOD_AI
    }

    async fn classify(&self, text: &str, domains: &[ComplianceDomain]) -> StageOutcome {
        let prediction = match self.predict(text, domains).await {
            Ok(p) => p,
            Err(e) => {
                warn!(error = %e, "AI classification unavailable");
                return StageOutcome::Deferred(None);
            }
        };

        let Some(domain) = prediction
            .domain
            .filter(|name| domains.iter().any(|d| &d.name == name))
        else {
            debug!("AI classification returned an unknown domain");
            return StageOutcome::Deferred(None);
        };

        let confidence = round_to(prediction.confidence.clamp(0.0, 1.0) as f32, 3);
        if confidence < AI_ACCEPT_THRESHOLD {
            debug!(%domain, confidence, "AI classification below threshold");
            return StageOutcome::Deferred(None);
        }

        StageOutcome::Decided(Classification {
            domain: Some(domain),
            confidence,
            method: METHOD_AI.to_string(),
        })
    }
}
