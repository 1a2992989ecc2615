use std::cmp::Ordering;

use tracing::{debug, instrument};

use super::config::MatcherConfig;
use super::types::{MatchRecord, ParagraphResolution};
use crate::constants::round_to;
use crate::document::TextUnit;
use crate::index::{Candidate, VectorIndex};
use crate::scoring::{PairVerifier, Verification};

/// Paragraph-level resolution: retrieve, verify, fuse.
#[derive(Debug, Clone)]
pub struct ScoreFusionMatcher {
    verifier: PairVerifier,
    config: MatcherConfig,
}

impl ScoreFusionMatcher {
    pub fn new(verifier: PairVerifier, config: MatcherConfig) -> Self {
        Self { verifier, config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Domain-scoped candidates (when the client has a domain) merged with unscoped ones.
    /// A unit returned by both keeps its domain-scoped (boosted) score.
    pub fn candidates(&self, client: &TextUnit, index: &VectorIndex) -> Vec<Candidate> {
        let mut merged: Vec<Candidate> = match client.domain.as_deref() {
            Some(domain) => index.search(&client.text, Some(domain), self.config.top_k_domain),
            None => Vec::new(),
        };

        for candidate in index.search(&client.text, None, self.config.top_k_global) {
            if !merged.iter().any(|c| c.unit_id == candidate.unit_id) {
                merged.push(candidate);
            }
        }

        merged
    }

    #[instrument(skip_all, fields(client_id = %client.id, domain = client.domain.as_deref().unwrap_or("-")))]
    pub async fn resolve(&self, client: &TextUnit, index: &VectorIndex) -> ParagraphResolution {
        let candidates = self.candidates(client, index);
        let mut accepted: Vec<MatchRecord> = Vec::new();

        for candidate in &candidates {
            if candidate.embedding_score < self.config.retrieval_floor {
                debug!(
                    vendor_id = %candidate.unit_id,
                    embedding_score = candidate.embedding_score,
                    "Candidate below retrieval floor, skipping verification"
                );
                continue;
            }

            let verification = self.verifier.verify(&client.text, &candidate.text).await;
            let Verification::Verdict(verdict) = &verification else {
                debug!(vendor_id = %candidate.unit_id, "Verification unavailable, treating as non-match");
                continue;
            };

            let mismatch = client
                .domain
                .as_deref()
                .is_some_and(|d| candidate.domain.as_deref() != Some(d));
            let fused = self
                .config
                .fused_score(candidate.embedding_score, verdict.similarity_score, mismatch);

            debug!(
                vendor_id = %candidate.unit_id,
                embedding_score = candidate.embedding_score,
                ai_score = verdict.similarity_score,
                fused,
                is_match = verdict.is_match,
                "Candidate verified"
            );

            if !verdict.is_match || fused < self.config.paragraph_accept_threshold {
                continue;
            }

            accepted.push(MatchRecord::paragraph(client, candidate, verdict, &self.config));
        }

        accepted.sort_by(|a, b| {
            b.final_score()
                .partial_cmp(&a.final_score())
                .unwrap_or(Ordering::Equal)
        });

        let confidence = accepted.first().map_or(0.0, MatchRecord::final_score);

        ParagraphResolution {
            client_unit_id: client.id.clone(),
            client_text: client.text.clone(),
            domain: client.domain.clone(),
            confidence: round_to(confidence, 3),
            matches: accepted,
        }
    }
}
