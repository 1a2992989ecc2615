//! Prompt text for the judgment service.

use crate::document::ComplianceDomain;

/// System prompt for pairwise verification. Carries the substantial-satisfaction contract.
pub const VERIFY_SYSTEM_PROMPT: &str = "\
You are a senior legal, regulatory and compliance expert.

Determine whether the VENDOR clause substantially satisfies the compliance obligation stated in the CLIENT clause.

Substantial satisfaction requires:
- Equivalent scope
- Equivalent regulatory reference (if one is named)
- Equivalent implementation obligation
- Equivalent enforcement requirement

General governance language does NOT qualify.
Broader but vague language does NOT qualify.
If explicit requirements are missing, return match=false.
Minor wording differences do NOT invalidate equivalence.
Be objective and conservative when uncertain.

If match=false, pick gap_type from:
- Missing scope
- Missing enforcement
- Missing implementation detail
- Missing regulatory reference
- Vague language
- Completely absent obligation
and explain what is missing.

Return STRICT JSON only:
{\"match\": true or false, \"similarity_score\": number between 0 and 1, \"gap_type\": string or null, \"reason\": \"short precise explanation\"}";

/// System prompt for remediation.
pub const REMEDIATION_SYSTEM_PROMPT: &str = "\
Rewrite the vendor clause minimally so that it satisfies the client obligation.

Keep the structure the same.
Add only missing elements.
Do not over-expand.
Return the improved vendor text only.";

/// First line of the classification system prompt; the domain list follows it.
pub const CLASSIFY_PREAMBLE: &str = "You are a legal policy classifier.";

const CLIENT_MARKER: &str = "CLIENT:\n";
const VENDOR_MARKER: &str = "\n\nVENDOR:\n";

/// User message for verification and remediation prompts.
pub fn pair_message(client_text: &str, vendor_text: &str) -> String {
    format!(
        "{CLIENT_MARKER}{}{VENDOR_MARKER}{}",
        client_text.trim(),
        vendor_text.trim()
    )
}

/// Inverse of [`pair_message`].
pub fn split_pair_message(message: &str) -> Option<(&str, &str)> {
    let rest = message.strip_prefix(CLIENT_MARKER)?;
    rest.split_once(VENDOR_MARKER)
}

/// System prompt for AI domain classification, listing the allowed domain names.
pub fn classify_system_prompt(domains: &[ComplianceDomain]) -> String {
    let mut prompt = String::from(CLASSIFY_PREAMBLE);
    prompt.push_str("\n\nClassify the policy paragraph into exactly one of these compliance domains:\n");
    for domain in domains {
        prompt.push_str("- ");
        prompt.push_str(&domain.name);
        if !domain.description.is_empty() {
            prompt.push_str(": ");
            prompt.push_str(&domain.description);
        }
        prompt.push('\n');
    }
    prompt.push_str(
        "\nUse the exact domain name.\nReturn STRICT JSON only:\n{\"domain\": \"<exact name>\", \"confidence\": number between 0 and 1}",
    );
    prompt
}

/// Strips a surrounding Markdown code fence, if any.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop an info string such as `json`.
    match inner.split_once('\n') {
        Some((first, body)) if !first.trim().contains(['{', '[']) => body.trim(),
        _ => inner.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_message_round_trip() {
        let message = pair_message("  Shall encrypt data. ", "Data is encrypted.");
        assert_eq!(
            split_pair_message(&message),
            Some(("Shall encrypt data.", "Data is encrypted."))
        );
    }

    #[test]
    fn test_split_rejects_other_messages() {
        assert_eq!(split_pair_message("Classify this paragraph"), None);
    }

    #[test]
    fn test_classify_prompt_lists_domains() {
        let prompt = classify_system_prompt(&[
            ComplianceDomain::new("Data Privacy", "Personal data"),
            ComplianceDomain::new("Risk Management", ""),
        ]);

        assert!(prompt.starts_with(CLASSIFY_PREAMBLE));
        assert!(prompt.contains("- Data Privacy: Personal data\n"));
        assert!(prompt.contains("- Risk Management\n"));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("{\"a\": 1}"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(strip_code_fence("```{\"a\": 1}```"), "{\"a\": 1}");
    }

    #[test]
    fn test_verify_prompt_names_every_gap_type() {
        for gap in crate::scoring::GapType::ALL {
            assert!(VERIFY_SYSTEM_PROMPT.contains(gap.as_str()));
        }
    }
}
