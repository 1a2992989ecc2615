//! PolicyAlign library crate (used by the server and integration tests).
//!
//! Compares a client policy document against a vendor's, paragraph by paragraph, and
//! reports which client obligations the vendor satisfies and which are gaps.
//!
//! # Public API Surface
//!
//! ## Pipeline
//! - [`AtomicSplitter`](splitter) - obligation-level splitting
//! - [`VectorIndex`] - similarity retrieval over vendor text units
//! - [`PairVerifier`] - AI verification, behind [`RateLimiter`] and [`VerdictCache`]
//! - [`ScoreFusionMatcher`], [`GapAnalyzer`], [`DocumentMatcher`] - matching
//! - [`RemediationSuggester`] - rewrites for gaps
//! - [`build_report`], [`ComparisonReport`] - coverage and risk
//!
//! ## Services
//! - [`Embedder`], [`SentenceEmbedder`] - embedding generation
//! - [`JudgmentService`], [`GenaiJudge`], [`LexicalJudge`] - language model access
//! - [`DomainClassifier`] - domain pre-classification
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod cache;
pub mod classify;
pub mod config;
pub mod constants;
pub mod document;
pub mod embedding;
pub mod gateway;
pub mod hashing;
pub mod index;
pub mod judge;
pub mod limiter;
pub mod matcher;
pub mod remediation;
pub mod report;
pub mod scoring;
pub mod splitter;

pub use cache::{VerdictCache, VerdictCacheHandle};
pub use classify::{ClassificationStage, DomainClassifier, StageOutcome, default_domains};
pub use config::{Config, ConfigError};
pub use document::{
    Classification, ComplianceDomain, Granularity, Origin, ParagraphRecord, TextUnit,
};
#[cfg(any(test, feature = "mock"))]
pub use embedding::MockEmbedder;
pub use embedding::{Embedder, EmbeddingError, SentenceEmbedder, SentenceEmbedderConfig};
pub use hashing::{hash_pair, hash_to_u64, normalize_text};
pub use index::{Candidate, IndexError, VectorIndex};
#[cfg(any(test, feature = "mock"))]
pub use judge::MockJudge;
pub use judge::{GenaiJudge, JudgeError, JudgmentService, LexicalJudge, RetryPolicy};
pub use limiter::RateLimiter;
pub use matcher::{
    DocumentMatcher, Gap, GapAnalyzer, MatchRecord, MatcherConfig, ReusePolicy,
    ScoreFusionMatcher,
};
pub use remediation::RemediationSuggester;
pub use report::{ComparisonReport, DocumentSummary, RiskLevel, build_report};
pub use scoring::{GapType, PairVerifier, Verification, VerificationVerdict};
pub use splitter::split_into_atomic;
