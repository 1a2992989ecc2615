use std::collections::HashSet;

use async_trait::async_trait;
use serde_json::json;

use super::JudgmentService;
use super::error::JudgeError;
use super::prompts::{
    CLASSIFY_PREAMBLE, REMEDIATION_SYSTEM_PROMPT, VERIFY_SYSTEM_PROMPT, split_pair_message,
};
use crate::constants::{NO_VENDOR_TEXT, round_to};

/// Word overlap at which the lexical judge reports a match.
const MATCH_OVERLAP: f32 = 0.75;

/// Deterministic, offline judgment service.
///
/// Scores verification prompts by the share of the client's words found in the vendor
/// text, declines every classification, and remediates by appending the client
/// obligation to the vendor clause. Used when `POLICYALIGN_MOCK_PROVIDER` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalJudge;

impl LexicalJudge {
    pub fn new() -> Self {
        Self
    }

    /// Answers a prompt without any I/O.
    pub fn respond(&self, system: &str, user: &str) -> Result<String, JudgeError> {
        if system == VERIFY_SYSTEM_PROMPT {
            let (client, vendor) = split_pair_message(user).ok_or_else(|| JudgeError::Malformed {
                reason: "verification message without CLIENT/VENDOR sections".to_string(),
            })?;
            return Ok(verify(client, vendor));
        }

        if system == REMEDIATION_SYSTEM_PROMPT {
            let (client, vendor) = split_pair_message(user).ok_or_else(|| JudgeError::Malformed {
                reason: "remediation message without CLIENT/VENDOR sections".to_string(),
            })?;
            return Ok(remediate(client, vendor));
        }

        if system.starts_with(CLASSIFY_PREAMBLE) {
            return Ok(json!({ "domain": null, "confidence": 0.0 }).to_string());
        }

        Ok(format!("Mock response for: {}", user.trim()))
    }
}

#[async_trait]
impl JudgmentService for LexicalJudge {
    async fn complete(&self, system: &str, user: &str) -> Result<String, JudgeError> {
        self.respond(system, user)
    }

    fn name(&self) -> &str {
        "lexical"
    }
}

fn words(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.len() > 2)
        .map(str::to_lowercase)
        .collect()
}

/// Share of client words present in the vendor text.
pub fn word_overlap(client: &str, vendor: &str) -> f32 {
    let client_words = words(client);
    if client_words.is_empty() {
        return 0.0;
    }
    let vendor_words = words(vendor);
    let shared = client_words.intersection(&vendor_words).count();
    shared as f32 / client_words.len() as f32
}

fn verify(client: &str, vendor: &str) -> String {
    let overlap = round_to(word_overlap(client, vendor), 3);
    let is_match = overlap >= MATCH_OVERLAP;

    let (gap_type, reason) = if is_match {
        (None, "Vendor clause restates the client obligation.".to_string())
    } else if overlap < 0.2 {
        (
            Some("Completely absent obligation"),
            "Vendor clause does not address the client obligation.".to_string(),
        )
    } else {
        (
            Some("Missing implementation detail"),
            format!(
                "Vendor clause covers only {:.0}% of the client obligation's terms.",
                overlap * 100.0
            ),
        )
    };

    json!({
        "match": is_match,
        "similarity_score": overlap,
        "gap_type": gap_type,
        "reason": reason,
    })
    .to_string()
}

fn remediate(client: &str, vendor: &str) -> String {
    let vendor = vendor.trim();
    let client = client.trim();
    if vendor.is_empty() || vendor == NO_VENDOR_TEXT {
        return client.to_string();
    }
    let separator = if vendor.ends_with(['.', ';']) { " " } else { ". " };
    format!("{vendor}{separator}{client}")
}
