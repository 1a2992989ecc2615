use crate::config::Config;
use crate::constants::{
    AI_CALL_THRESHOLD, AI_WEIGHT, CONFIDENT_MATCH_THRESHOLD, DEFAULT_TOP_K_ATOMIC,
    DEFAULT_TOP_K_DOMAIN, DEFAULT_TOP_K_GLOBAL, DOMAIN_MISMATCH_PENALTY, EMBEDDING_WEIGHT,
    PARAGRAPH_ACCEPT_THRESHOLD, RETRIEVAL_FLOOR, REUSE_LIMIT, REUSE_PENALTY, STRICT_THRESHOLD,
};

/// Client paragraphs resolved concurrently within one comparison.
pub const DEFAULT_PARAGRAPH_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq)]
/// Penalty for vendor paragraphs that back too many atomic matches.
pub struct ReusePolicy {
    pub enabled: bool,
    /// Uses allowed before the penalty applies.
    pub limit: usize,
    /// Subtracted from the match confidence of each use past `limit`.
    pub penalty: f32,
}

impl ReusePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            limit: REUSE_LIMIT,
            penalty: REUSE_PENALTY,
        }
    }

    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::disabled()
        }
    }
}

impl Default for ReusePolicy {
    fn default() -> Self {
        Self::disabled()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Thresholds, weights and retrieval sizes for both matching paths.
///
/// Paragraph acceptance (`paragraph_accept_threshold`, on the fused score) and atomic
/// acceptance (`strict_threshold`, on the AI similarity) are independent.
pub struct MatcherConfig {
    pub top_k_domain: usize,
    pub top_k_global: usize,
    pub top_k_atomic: usize,
    /// Paragraph candidates below this embedding score are never verified.
    pub retrieval_floor: f32,
    pub paragraph_accept_threshold: f32,
    /// Atomic candidates below this embedding score (or the retrieval floor) are never
    /// verified.
    pub ai_call_threshold: f32,
    /// A verdict at or above this similarity ends the atomic candidate loop.
    pub confident_match_threshold: f32,
    pub strict_threshold: f32,
    pub embedding_weight: f32,
    pub ai_weight: f32,
    pub domain_mismatch_penalty: f32,
    pub reuse: ReusePolicy,
    pub paragraph_concurrency: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k_domain: DEFAULT_TOP_K_DOMAIN,
            top_k_global: DEFAULT_TOP_K_GLOBAL,
            top_k_atomic: DEFAULT_TOP_K_ATOMIC,
            retrieval_floor: RETRIEVAL_FLOOR,
            paragraph_accept_threshold: PARAGRAPH_ACCEPT_THRESHOLD,
            ai_call_threshold: AI_CALL_THRESHOLD,
            confident_match_threshold: CONFIDENT_MATCH_THRESHOLD,
            strict_threshold: STRICT_THRESHOLD,
            embedding_weight: EMBEDDING_WEIGHT,
            ai_weight: AI_WEIGHT,
            domain_mismatch_penalty: DOMAIN_MISMATCH_PENALTY,
            reuse: ReusePolicy::default(),
            paragraph_concurrency: DEFAULT_PARAGRAPH_CONCURRENCY,
        }
    }
}

impl MatcherConfig {
    /// Defaults with the thresholds and reuse toggle taken from server config.
    pub fn from_config(config: &Config) -> Self {
        Self {
            paragraph_accept_threshold: config.paragraph_accept_threshold,
            strict_threshold: config.atomic_strict_threshold,
            ai_call_threshold: config.ai_call_threshold,
            reuse: if config.reuse_penalty {
                ReusePolicy::enabled()
            } else {
                ReusePolicy::disabled()
            },
            ..Self::default()
        }
    }

    pub fn with_reuse(mut self, reuse: ReusePolicy) -> Self {
        self.reuse = reuse;
        self
    }

    /// Lowest embedding score an atomic candidate needs before it is verified. Never
    /// below the retrieval floor, whatever `ai_call_threshold` is set to.
    pub fn atomic_verification_gate(&self) -> f32 {
        self.ai_call_threshold.max(self.retrieval_floor)
    }

    /// `embedding × w_e + ai × w_a`, minus the mismatch penalty, floored at zero.
    pub fn fused_score(&self, embedding_score: f32, ai_score: f32, domain_mismatch: bool) -> f32 {
        let fused = embedding_score * self.embedding_weight + ai_score * self.ai_weight;
        if domain_mismatch {
            (fused - self.domain_mismatch_penalty).max(0.0)
        } else {
            fused
        }
    }
}
