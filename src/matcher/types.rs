use serde::Serialize;

use super::config::MatcherConfig;
use crate::constants::{NO_MATCH_REASON, round_to};
use crate::document::{Granularity, TextUnit};
use crate::index::Candidate;
use crate::scoring::{GapType, VerificationVerdict};

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A resolved client-to-vendor pairing.
///
/// Built only through [`MatchRecord::paragraph`] or [`MatchRecord::atomic`], so
/// `final_score` is always derived from the component scores.
pub struct MatchRecord {
    pub client_unit_id: String,
    pub client_text: String,
    pub client_domain: Option<String>,
    pub vendor_unit_id: String,
    pub vendor_text: String,
    pub vendor_domain: Option<String>,
    pub embedding_score: f32,
    pub ai_score: f32,
    final_score: f32,
    pub reason: String,
    pub granularity: Granularity,
}

impl MatchRecord {
    /// Paragraph-level fusion of embedding and AI scores, rounded to 3 decimals.
    pub fn paragraph(
        client: &TextUnit,
        candidate: &Candidate,
        verdict: &VerificationVerdict,
        config: &MatcherConfig,
    ) -> Self {
        let fused = config.fused_score(
            candidate.embedding_score,
            verdict.similarity_score,
            domain_mismatch(client, candidate),
        );

        Self {
            client_unit_id: client.id.clone(),
            client_text: client.text.clone(),
            client_domain: client.domain.clone(),
            vendor_unit_id: candidate.unit_id.clone(),
            vendor_text: candidate.text.clone(),
            vendor_domain: candidate.domain.clone(),
            embedding_score: round_to(candidate.embedding_score, 3),
            ai_score: round_to(verdict.similarity_score, 3),
            final_score: round_to(fused, 3),
            reason: verdict.reason.clone(),
            granularity: Granularity::Paragraph,
        }
    }

    /// Atomic-level match; the final score is the AI similarity.
    pub fn atomic(client: &TextUnit, candidate: &Candidate, verdict: &VerificationVerdict) -> Self {
        Self {
            client_unit_id: client.id.clone(),
            client_text: client.text.clone(),
            client_domain: client.domain.clone(),
            vendor_unit_id: candidate.unit_id.clone(),
            vendor_text: candidate.text.clone(),
            vendor_domain: candidate.domain.clone(),
            embedding_score: round_to(candidate.embedding_score, 3),
            ai_score: round_to(verdict.similarity_score, 3),
            final_score: round_to(verdict.similarity_score, 3),
            reason: verdict.reason.clone(),
            granularity: Granularity::Atomic,
        }
    }

    pub fn final_score(&self) -> f32 {
        self.final_score
    }

    /// Confidence reported for this match (the final score).
    pub fn confidence(&self) -> f32 {
        self.final_score
    }

    /// Lowers the final score by `penalty` (floored at zero).
    pub(crate) fn apply_penalty(&mut self, penalty: f32) {
        self.final_score = round_to((self.final_score - penalty).max(0.0), 3);
    }
}

fn domain_mismatch(client: &TextUnit, candidate: &Candidate) -> bool {
    match client.domain.as_deref() {
        Some(domain) => candidate.domain.as_deref() != Some(domain),
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A client obligation with no vendor text that substantially satisfies it.
pub struct Gap {
    pub client_unit_id: String,
    pub client_text: String,
    pub gap_type: Option<GapType>,
    /// Never empty.
    pub reason: String,
    pub closest_vendor_unit_id: Option<String>,
    pub closest_vendor_text: Option<String>,
    pub closest_embedding_score: f32,
    pub ai_similarity_score: Option<f32>,
    pub suggested_vendor_text: Option<String>,
}

impl Gap {
    /// Builds a gap from the best verdict seen (if any) and the closest candidate.
    pub fn new(
        client: &TextUnit,
        verdict: Option<&VerificationVerdict>,
        closest: Option<&Candidate>,
        suggestion: Option<String>,
    ) -> Self {
        let gap_type = match verdict {
            Some(v) => v.gap_type,
            None => Some(GapType::CompletelyAbsentObligation),
        };
        let reason = verdict
            .map(|v| v.reason.trim())
            .filter(|r| !r.is_empty())
            .unwrap_or(NO_MATCH_REASON)
            .to_string();

        Self {
            client_unit_id: client.id.clone(),
            client_text: client.text.clone(),
            gap_type,
            reason,
            closest_vendor_unit_id: closest.map(|c| c.unit_id.clone()),
            closest_vendor_text: closest.map(|c| c.text.clone()),
            closest_embedding_score: round_to(closest.map_or(0.0, |c| c.embedding_score), 3),
            ai_similarity_score: verdict.map(|v| round_to(v.similarity_score, 3)),
            suggested_vendor_text: suggestion,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Matched atomic units and gaps for one client paragraph.
pub struct AtomicAnalysis {
    pub matched: Vec<MatchRecord>,
    pub gaps: Vec<Gap>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Paragraph-level outcome for one client paragraph.
pub struct ParagraphResolution {
    pub client_unit_id: String,
    pub client_text: String,
    pub domain: Option<String>,
    /// Top accepted final score, or `0.0`.
    pub confidence: f32,
    /// Accepted matches, best first.
    pub matches: Vec<MatchRecord>,
}

impl ParagraphResolution {
    pub fn best(&self) -> Option<&MatchRecord> {
        self.matches.first()
    }

    pub fn is_matched(&self) -> bool {
        !self.matches.is_empty()
    }
}
