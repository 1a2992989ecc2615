//! Client-to-vendor matching.
//!
//! Two granularities:
//! - [`ScoreFusionMatcher`] resolves whole client paragraphs by fusing embedding and AI
//!   similarity.
//! - [`GapAnalyzer`] splits an unmatched paragraph into atomic obligations and reports
//!   each one as matched or as a [`Gap`] with a remediation suggestion.
//!
//! [`DocumentMatcher`] drives both over a full client/vendor pair of documents.

pub mod config;
pub mod document;
pub mod gap;
pub mod paragraph;
pub mod types;


pub use config::{DEFAULT_PARAGRAPH_CONCURRENCY, MatcherConfig, ReusePolicy};
pub use document::{DocumentMatcher, apply_reuse_policy};
pub use gap::GapAnalyzer;
pub use paragraph::ScoreFusionMatcher;
pub use types::{AtomicAnalysis, Gap, MatchRecord, ParagraphResolution};
