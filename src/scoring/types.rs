use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::judge::JudgeError;
use crate::judge::prompts::strip_code_fence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Why a client obligation is not satisfied by the vendor text.
pub enum GapType {
    #[serde(rename = "Missing scope")]
    MissingScope,
    #[serde(rename = "Missing enforcement")]
    MissingEnforcement,
    #[serde(rename = "Missing implementation detail")]
    MissingImplementationDetail,
    #[serde(rename = "Missing regulatory reference")]
    MissingRegulatoryReference,
    #[serde(rename = "Vague language")]
    VagueLanguage,
    #[serde(rename = "Completely absent obligation")]
    CompletelyAbsentObligation,
}

impl GapType {
    pub const ALL: [GapType; 6] = [
        GapType::MissingScope,
        GapType::MissingEnforcement,
        GapType::MissingImplementationDetail,
        GapType::MissingRegulatoryReference,
        GapType::VagueLanguage,
        GapType::CompletelyAbsentObligation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GapType::MissingScope => "Missing scope",
            GapType::MissingEnforcement => "Missing enforcement",
            GapType::MissingImplementationDetail => "Missing implementation detail",
            GapType::MissingRegulatoryReference => "Missing regulatory reference",
            GapType::VagueLanguage => "Vague language",
            GapType::CompletelyAbsentObligation => "Completely absent obligation",
        }
    }

    /// Case- and whitespace-insensitive match against the display names.
    pub fn parse_lenient(value: &str) -> Option<Self> {
        let wanted = value
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        Self::ALL
            .into_iter()
            .find(|gap| gap.as_str().to_lowercase() == wanted)
    }
}

impl std::fmt::Display for GapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The judgment service's verdict for one client/vendor pair. Immutable once cached.
pub struct VerificationVerdict {
    #[serde(rename = "match")]
    pub is_match: bool,
    /// In `[0, 1]`.
    pub similarity_score: f32,
    /// Set only on a mismatch.
    pub gap_type: Option<GapType>,
    pub reason: String,
}

#[derive(Deserialize)]
struct RawVerdict {
    #[serde(rename = "match")]
    is_match: bool,
    similarity_score: f64,
    #[serde(default)]
    gap_type: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

impl VerificationVerdict {
    /// Parses the service's JSON answer (a surrounding code fence is tolerated).
    /// Scores are clamped to `[0, 1]`; unknown gap types are dropped.
    pub fn parse(raw: &str) -> Result<Self, JudgeError> {
        let parsed: RawVerdict =
            serde_json::from_str(strip_code_fence(raw)).map_err(|e| JudgeError::Malformed {
                reason: format!("verdict is not valid JSON: {}", e),
            })?;

        if !parsed.similarity_score.is_finite() {
            return Err(JudgeError::Malformed {
                reason: "similarity_score is not a finite number".to_string(),
            });
        }

        let gap_type = if parsed.is_match {
            None
        } else {
            parsed.gap_type.as_deref().and_then(GapType::parse_lenient)
        };

        Ok(Self {
            is_match: parsed.is_match,
            similarity_score: parsed.similarity_score.clamp(0.0, 1.0) as f32,
            gap_type,
            reason: parsed.reason.unwrap_or_default().trim().to_string(),
        })
    }

    /// A match at or above `threshold`.
    pub fn is_match_at(&self, threshold: f32) -> bool {
        self.is_match && self.similarity_score >= threshold
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcome of [`PairVerifier::verify`](super::PairVerifier::verify).
pub enum Verification {
    /// The service produced a verdict (possibly from cache).
    Verdict(Arc<VerificationVerdict>),
    /// No verdict could be obtained. Treated as a non-match; never cached.
    Unavailable,
}

impl Verification {
    pub fn verdict(&self) -> Option<&VerificationVerdict> {
        match self {
            Verification::Verdict(v) => Some(&**v),
            Verification::Unavailable => None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.verdict().is_some_and(|v| v.is_match)
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Verification::Verdict(_))
    }

    /// AI similarity, `0.0` when unavailable.
    pub fn similarity(&self) -> f32 {
        self.verdict().map_or(0.0, |v| v.similarity_score)
    }

    pub fn debug_status(&self) -> &'static str {
        match self {
            Verification::Verdict(v) if v.is_match => "MATCH",
            Verification::Verdict(_) => "NO_MATCH",
            Verification::Unavailable => "UNAVAILABLE",
        }
    }
}

impl std::fmt::Display for Verification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verification::Verdict(v) => write!(
                f,
                "{} (similarity: {:.3})",
                self.debug_status(),
                v.similarity_score
            ),
            Verification::Unavailable => write!(f, "UNAVAILABLE"),
        }
    }
}
