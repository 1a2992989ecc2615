use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use futures_util::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

use super::config::{MatcherConfig, ReusePolicy};
use super::gap::GapAnalyzer;
use super::paragraph::ScoreFusionMatcher;
use super::types::{AtomicAnalysis, MatchRecord, ParagraphResolution};
use crate::document::{Granularity, Origin, ParagraphRecord, TextUnit, parent_paragraph_id};
use crate::embedding::Embedder;
use crate::index::VectorIndex;
use crate::remediation::RemediationSuggester;
use crate::report::{ComparisonReport, build_report};
use crate::scoring::PairVerifier;

enum ParagraphOutcome {
    Matched(ParagraphResolution),
    Fallback {
        client_unit_id: String,
        analysis: AtomicAnalysis,
    },
}

/// Atomic vendor index shared by every paragraph of one comparison, built on first use.
struct AtomicFallback<'a> {
    index: &'a OnceLock<VectorIndex>,
    vendor_units: &'a [TextUnit],
    first_vendor_text: Option<&'a str>,
}

/// Document-level driver: paragraph resolution first, atomic gap analysis for whatever
/// stays unmatched.
#[derive(Clone)]
pub struct DocumentMatcher {
    embedder: Arc<dyn Embedder>,
    paragraphs: ScoreFusionMatcher,
    gaps: GapAnalyzer,
    config: MatcherConfig,
}

impl std::fmt::Debug for DocumentMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentMatcher")
            .field("dimension", &self.embedder.dimension())
            .field("config", &self.config)
            .finish()
    }
}

impl DocumentMatcher {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        verifier: PairVerifier,
        suggester: RemediationSuggester,
        config: MatcherConfig,
    ) -> Self {
        Self {
            paragraphs: ScoreFusionMatcher::new(verifier.clone(), config.clone()),
            gaps: GapAnalyzer::new(verifier, suggester, config.clone()),
            embedder,
            config,
        }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Compares every client paragraph against the vendor corpus.
    ///
    /// An empty vendor corpus, or one that cannot be indexed, yields an empty report.
    /// Per-pair failures are absorbed as non-matches.
    #[instrument(skip_all, fields(client = client.len(), vendor = vendor.len()))]
    pub async fn compare(
        &self,
        client: &[ParagraphRecord],
        vendor: &[ParagraphRecord],
    ) -> ComparisonReport {
        let vendor_units: Vec<TextUnit> = vendor
            .iter()
            .map(|r| TextUnit::paragraph(r, Origin::Vendor))
            .collect();

        if vendor_units.is_empty() {
            warn!("No vendor paragraphs supplied; returning empty report");
            return ComparisonReport::empty();
        }

        let index = match VectorIndex::build(self.embedder.clone(), vendor_units.clone()) {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "Vendor index could not be built; returning empty report");
                return ComparisonReport::empty();
            }
        };

        let client_units: Vec<TextUnit> = client
            .iter()
            .map(|r| TextUnit::paragraph(r, Origin::Client))
            .collect();

        let atomic_index: OnceLock<VectorIndex> = OnceLock::new();
        let first_vendor_text = vendor_units.first().map(|u| u.text.as_str());

        let fallback = AtomicFallback {
            index: &atomic_index,
            vendor_units: &vendor_units,
            first_vendor_text,
        };
        let (index, fallback) = (&index, &fallback);

        // Owned units keep the per-paragraph futures `Send` for the HTTP layer.
        let outcomes: Vec<ParagraphOutcome> = stream::iter(client_units)
            .map(move |unit| async move { self.resolve_paragraph(&unit, index, fallback).await })
            .buffered(self.config.paragraph_concurrency.max(1))
            .collect()
            .await;

        let mut matched = Vec::new();
        let mut gaps = Vec::new();
        let mut unmatched = Vec::new();

        for outcome in outcomes {
            match outcome {
                ParagraphOutcome::Matched(resolution) => {
                    if let Some(best) = resolution.best() {
                        matched.push(best.clone());
                    }
                }
                ParagraphOutcome::Fallback {
                    client_unit_id,
                    analysis,
                } => {
                    unmatched.push(client_unit_id);
                    matched.extend(analysis.matched);
                    gaps.extend(analysis.gaps);
                }
            }
        }

        let penalized = apply_reuse_policy(&mut matched, &self.config.reuse);
        let report = build_report(matched, gaps).with_unmatched(unmatched);

        info!(
            comparison_id = %report.comparison_id,
            matched = report.document_summary.matched_count,
            gaps = report.document_summary.gap_count,
            coverage = report.document_summary.coverage_percentage,
            risk = %report.document_summary.risk_level,
            penalized,
            "Comparison complete"
        );

        report
    }

    /// Atomic gap analysis of a single client paragraph against a vendor paragraph list.
    ///
    /// With no vendor text every obligation is reported as a gap.
    #[instrument(skip_all, fields(client_id = %client.id, vendor = vendor.len()))]
    pub async fn analyze_paragraph(
        &self,
        client: &ParagraphRecord,
        vendor: &[ParagraphRecord],
    ) -> ComparisonReport {
        let client_unit = TextUnit::paragraph(client, Origin::Client);
        let vendor_units: Vec<TextUnit> = vendor
            .iter()
            .map(|r| TextUnit::paragraph(r, Origin::Vendor))
            .collect();

        let index = self.atomic_index(&vendor_units);
        let first_vendor_text = vendor_units.first().map(|u| u.text.as_str());
        let analysis = self
            .gaps
            .analyze(&client_unit, &index, first_vendor_text)
            .await;

        build_report(analysis.matched, analysis.gaps)
    }

    /// Paragraph-level resolution, falling back to atomic gap analysis when nothing
    /// is accepted.
    async fn resolve_paragraph(
        &self,
        unit: &TextUnit,
        index: &VectorIndex,
        fallback: &AtomicFallback<'_>,
    ) -> ParagraphOutcome {
        let resolution = self.paragraphs.resolve(unit, index).await;
        if resolution.is_matched() {
            return ParagraphOutcome::Matched(resolution);
        }

        let atomic = fallback
            .index
            .get_or_init(|| self.atomic_index(fallback.vendor_units));
        ParagraphOutcome::Fallback {
            client_unit_id: unit.id.clone(),
            analysis: self
                .gaps
                .analyze(unit, atomic, fallback.first_vendor_text)
                .await,
        }
    }

    fn atomic_index(&self, vendor_units: &[TextUnit]) -> VectorIndex {
        GapAnalyzer::build_atomic_index(self.embedder.clone(), vendor_units).unwrap_or_else(|e| {
            warn!(error = %e, "Atomic vendor index could not be built; every obligation becomes a gap");
            VectorIndex::empty(self.embedder.clone())
        })
    }
}

/// Applies the reuse penalty to atomic matches in document order. Returns how many
/// matches were penalised.
pub fn apply_reuse_policy(matches: &mut [MatchRecord], policy: &ReusePolicy) -> usize {
    if !policy.enabled {
        return 0;
    }

    let mut uses: HashMap<String, usize> = HashMap::new();
    let mut penalized = 0;

    for record in matches
        .iter_mut()
        .filter(|m| m.granularity == Granularity::Atomic)
    {
        let count = uses
            .entry(parent_paragraph_id(&record.vendor_unit_id).to_string())
            .or_default();
        *count += 1;

        if *count > policy.limit {
            record.apply_penalty(policy.penalty);
            penalized += 1;
        }
    }

    penalized
}
