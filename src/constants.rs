//! Scoring weights, thresholds and retrieval sizes shared across the pipeline.
//!
//! Runtime overrides live in [`MatcherConfig`](crate::matcher::MatcherConfig); these are
//! the defaults it starts from.

/// Weight of the embedding similarity in the fused paragraph score.
pub const EMBEDDING_WEIGHT: f32 = 0.3;

/// Weight of the AI similarity in the fused paragraph score.
pub const AI_WEIGHT: f32 = 0.7;

/// Subtracted from the fused score when client and candidate domains differ.
pub const DOMAIN_MISMATCH_PENALTY: f32 = 0.05;

/// Candidates below this embedding score are never verified.
pub const RETRIEVAL_FLOOR: f32 = 0.50;

/// Minimum fused score for a paragraph-level match to be accepted.
pub const PARAGRAPH_ACCEPT_THRESHOLD: f32 = 0.60;

/// Minimum embedding score before an atomic candidate is sent to the verifier.
pub const AI_CALL_THRESHOLD: f32 = 0.80;

/// Verdict similarity at which the atomic candidate loop stops early.
pub const CONFIDENT_MATCH_THRESHOLD: f32 = 0.80;

/// Minimum verdict similarity for an atomic unit to count as matched.
pub const STRICT_THRESHOLD: f32 = 0.65;

/// Domain-scoped candidates per client paragraph.
pub const DEFAULT_TOP_K_DOMAIN: usize = 2;

/// Unscoped candidates per client paragraph.
pub const DEFAULT_TOP_K_GLOBAL: usize = 1;

/// Candidates per client atomic unit.
pub const DEFAULT_TOP_K_ATOMIC: usize = 2;

/// Oversampling factor applied before domain boosting.
pub const SEARCH_OVERSAMPLE: usize = 5;

/// Multiplicative boost for in-domain candidates.
pub const DOMAIN_BOOST: f32 = 1.05;

/// A vendor paragraph matched more often than this is penalised (when enabled).
pub const REUSE_LIMIT: usize = 5;

/// Penalty applied to over-used vendor paragraphs (when enabled).
pub const REUSE_PENALTY: f32 = 0.05;

/// Coverage at or above which risk is `Low`.
pub const LOW_RISK_COVERAGE: f32 = 80.0;

/// Coverage at or above which risk is `Medium`.
pub const MEDIUM_RISK_COVERAGE: f32 = 60.0;

/// Maximum attempts for a throttled judgment call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default reason attached to gaps without an AI explanation.
pub const NO_MATCH_REASON: &str = "No substantial match found.";

/// Vendor text handed to the remediation suggester when the vendor document is empty.
pub const NO_VENDOR_TEXT: &str = "No vendor text available";

/// Rounds to `places` decimal places.
#[inline]
pub fn round_to(value: f32, places: i32) -> f32 {
    let factor = 10f32.powi(places);
    (value * factor).round() / factor
}
