use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::config::MatcherConfig;
use super::types::{AtomicAnalysis, Gap, MatchRecord};
use crate::document::TextUnit;
use crate::embedding::Embedder;
use crate::index::{Candidate, IndexError, VectorIndex};
use crate::remediation::RemediationSuggester;
use crate::scoring::{PairVerifier, Verification, VerificationVerdict};

/// Atomic-level fallback: splits the client paragraph into obligations and checks each
/// against atomically split vendor text.
#[derive(Debug, Clone)]
pub struct GapAnalyzer {
    verifier: PairVerifier,
    suggester: RemediationSuggester,
    config: MatcherConfig,
}

impl GapAnalyzer {
    pub fn new(
        verifier: PairVerifier,
        suggester: RemediationSuggester,
        config: MatcherConfig,
    ) -> Self {
        Self {
            verifier,
            suggester,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Index over the atomic units of every vendor paragraph. Units keep their parent's
    /// id prefix and domain.
    pub fn build_atomic_index(
        embedder: Arc<dyn Embedder>,
        vendor_paragraphs: &[TextUnit],
    ) -> Result<VectorIndex, IndexError> {
        let units: Vec<TextUnit> = vendor_paragraphs.iter().flat_map(TextUnit::atomize).collect();
        VectorIndex::build(embedder, units)
    }

    /// Checks every atomic obligation of `client`. `first_vendor_text` is the sample
    /// handed to the remediation suggester for each gap.
    #[instrument(skip_all, fields(client_id = %client.id))]
    pub async fn analyze(
        &self,
        client: &TextUnit,
        index: &VectorIndex,
        first_vendor_text: Option<&str>,
    ) -> AtomicAnalysis {
        let mut analysis = AtomicAnalysis::default();

        for atomic in client.atomize() {
            let candidates = index.search(&atomic.text, None, self.config.top_k_atomic);
            let outcome = self.check_atomic(&atomic, &candidates).await;

            match outcome.accepted(&self.config) {
                Some((candidate, verdict)) => {
                    analysis
                        .matched
                        .push(MatchRecord::atomic(&atomic, candidate, verdict));
                }
                None => {
                    let suggestion = self.suggester.suggest(&atomic.text, first_vendor_text).await;
                    analysis.gaps.push(Gap::new(
                        &atomic,
                        outcome.best_verdict(),
                        outcome.closest,
                        suggestion,
                    ));
                }
            }
        }

        info!(
            matched = analysis.matched.len(),
            gaps = analysis.gaps.len(),
            "Atomic gap analysis complete"
        );

        analysis
    }

    async fn check_atomic<'c>(
        &self,
        atomic: &TextUnit,
        candidates: &'c [Candidate],
    ) -> AtomicOutcome<'c> {
        let mut outcome = AtomicOutcome::default();
        let gate = self.config.atomic_verification_gate();

        for candidate in candidates {
            let closest_score = outcome.closest.map_or(0.0, |c| c.embedding_score);
            if candidate.embedding_score > closest_score {
                outcome.closest = Some(candidate);
            }

            if candidate.embedding_score < gate {
                continue;
            }

            let Verification::Verdict(verdict) =
                self.verifier.verify(&atomic.text, &candidate.text).await
            else {
                continue;
            };

            debug!(
                atomic_id = %atomic.id,
                vendor_id = %candidate.unit_id,
                is_match = verdict.is_match,
                similarity = verdict.similarity_score,
                "Atomic candidate verified"
            );

            let improves = outcome
                .best
                .as_ref()
                .is_none_or(|(_, best)| verdict.similarity_score > best.similarity_score);
            let confident = verdict.is_match_at(self.config.confident_match_threshold);

            if improves {
                outcome.best = Some((candidate, verdict));
            }
            if confident {
                break;
            }
        }

        outcome
    }
}

#[derive(Default)]
struct AtomicOutcome<'c> {
    closest: Option<&'c Candidate>,
    best: Option<(&'c Candidate, Arc<VerificationVerdict>)>,
}

impl<'c> AtomicOutcome<'c> {
    fn best_verdict(&self) -> Option<&VerificationVerdict> {
        self.best.as_ref().map(|(_, v)| v.as_ref())
    }

    /// The best verdict, if it is a match at or above the strict threshold.
    fn accepted(&self, config: &MatcherConfig) -> Option<(&'c Candidate, &VerificationVerdict)> {
        self.best
            .as_ref()
            .filter(|(_, v)| v.is_match_at(config.strict_threshold))
            .map(|(c, v)| (*c, v.as_ref()))
    }
}
