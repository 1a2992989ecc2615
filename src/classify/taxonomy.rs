//! Built-in compliance domain taxonomy and keyword rules.

use crate::document::ComplianceDomain;

/// Default domains (name, description), used when a request supplies none.
pub const DEFAULT_DOMAINS: &[(&str, &str)] = &[
    (
        "Data Privacy",
        "Protection of personal and sensitive data, consent, and data subject rights",
    ),
    (
        "Information Security",
        "Confidentiality, integrity, and availability of information assets",
    ),
    (
        "Access Control & Identity Management",
        "Authentication, authorization, and identity access controls",
    ),
    (
        "Data Retention & Deletion",
        "Data lifecycle management, retention schedules, and secure deletion",
    ),
    (
        "Incident Response & Breach Management",
        "Security incident detection, reporting, and response",
    ),
    (
        "Compliance & Regulatory Obligations",
        "Adherence to laws, regulations, and compliance standards",
    ),
    (
        "Risk Management",
        "Risk identification, assessment, mitigation, and acceptance",
    ),
    (
        "Audit & Monitoring",
        "Logging, monitoring, audits, and compliance reviews",
    ),
    (
        "Business Continuity & Disaster Recovery",
        "Continuity planning, backups, and disaster recovery processes",
    ),
    (
        "Third-Party & Vendor Management",
        "Vendor risk management and third-party compliance controls",
    ),
    (
        "Operational Security",
        "Operational procedures ensuring secure system usage",
    ),
    (
        "Governance & Policy Management",
        "Policy ownership, approvals, governance, and updates",
    ),
    (
        "Legal & Contractual Terms",
        "Legal obligations, contracts, liabilities, and enforcement",
    ),
    (
        "Employee Awareness & Training",
        "Security awareness programs and employee responsibilities",
    ),
    (
        "Ethics & Code of Conduct",
        "Ethical standards, integrity, and professional conduct",
    ),
];

/// Keyword rules, checked in order. The first domain with a keyword present wins.
pub const RULE_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Data Privacy",
        &[
            "data protection",
            "privacy",
            "personal data",
            "data subject",
            "consent",
            "gdpr",
        ],
    ),
    (
        "Information Security",
        &[
            "information security",
            "confidentiality",
            "integrity",
            "availability",
            "cybersecurity",
            "threats",
        ],
    ),
    (
        "Access Control & Identity Management",
        &[
            "access control",
            "identity management",
            "authentication",
            "authorization",
            "iam",
        ],
    ),
    (
        "Data Retention & Deletion",
        &[
            "data retention",
            "data deletion",
            "data lifecycle",
            "retention schedule",
            "secure deletion",
        ],
    ),
    (
        "Incident Response & Breach Management",
        &[
            "incident response",
            "breach management",
            "security incident",
            "incident detection",
            "incident reporting",
        ],
    ),
    (
        "Compliance & Regulatory Obligations",
        &[
            "compliance",
            "regulatory obligations",
            "laws and regulations",
            "compliance standards",
        ],
    ),
    (
        "Risk Management",
        &[
            "risk management",
            "risk assessment",
            "risk mitigation",
            "risk acceptance",
        ],
    ),
    (
        "Audit & Monitoring",
        &["audit", "monitoring", "logging", "compliance reviews"],
    ),
    (
        "Business Continuity & Disaster Recovery",
        &[
            "business continuity",
            "disaster recovery",
            "continuity planning",
            "backups",
        ],
    ),
    (
        "Third-Party & Vendor Management",
        &[
            "third-party management",
            "vendor management",
            "vendor risk management",
            "third-party compliance controls",
        ],
    ),
    (
        "Operational Security",
        &[
            "operational security",
            "operational procedures",
            "secure system usage",
        ],
    ),
];

/// The built-in domain list as owned values.
pub fn default_domains() -> Vec<ComplianceDomain> {
    DEFAULT_DOMAINS
        .iter()
        .map(|(name, description)| ComplianceDomain::new(*name, *description))
        .collect()
}

/// Returns `true` if `phrase` occurs in `haystack` on word boundaries.
/// Both arguments are expected in lowercase.
pub fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }

    let is_word = |c: char| c.is_alphanumeric();
    let mut from = 0;
    while let Some(offset) = haystack[from..].find(phrase) {
        let start = from + offset;
        let end = start + phrase.len();

        let before_ok = haystack[..start].chars().next_back().is_none_or(|c| !is_word(c));
        let after_ok = haystack[end..].chars().next().is_none_or(|c| !is_word(c));
        if before_ok && after_ok {
            return true;
        }

        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    false
}
