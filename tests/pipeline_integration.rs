//! End-to-end comparisons on the stub embedder and the lexical fallback judge.

mod common;

use std::sync::Arc;

use common::fixtures::{BADGES, BREACH_NOTICE, ENCRYPTION, Pipeline, TWO_SHALL, records};
use policyalign::judge::prompts::{REMEDIATION_SYSTEM_PROMPT, VERIFY_SYSTEM_PROMPT};
use policyalign::{
    GapType, Granularity, JudgeError, MatcherConfig, MockJudge, RiskLevel, split_into_atomic,
};

#[tokio::test]
async fn test_identical_documents_are_fully_covered() {
    let pipeline = Pipeline::new(MatcherConfig::default());
    let texts = [ENCRYPTION, BREACH_NOTICE];

    let report = pipeline
        .matcher
        .compare(&records("c", &texts), &records("v", &texts))
        .await;

    assert_eq!(report.matched.len(), 2);
    assert!(report.gaps.is_empty());
    assert_eq!(report.matched[0].vendor_unit_id, "v0");
    assert_eq!(report.matched[1].vendor_unit_id, "v1");
    assert!(report.matched.iter().all(|m| m.granularity == Granularity::Paragraph));
    assert_eq!(report.document_summary.coverage_percentage, 100.0);
    assert_eq!(report.document_summary.average_confidence, 1.0);
    assert_eq!(report.document_summary.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn test_missing_obligation_becomes_gap_with_suggestion() {
    let pipeline = Pipeline::new(MatcherConfig::default());

    let report = pipeline
        .matcher
        .compare(
            &records("c", &[ENCRYPTION, BADGES]),
            &records("v", &[ENCRYPTION]),
        )
        .await;

    assert_eq!(report.matched.len(), 1);
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.unmatched_client_paragraphs, vec!["c1".to_string()]);

    let gap = &report.gaps[0];
    assert_eq!(gap.client_unit_id, "c1#0");
    assert!(!gap.reason.is_empty());
    let suggestion = gap.suggested_vendor_text.as_deref().unwrap();
    assert!(suggestion.starts_with(ENCRYPTION));
    assert_eq!(report.document_summary.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_single_paragraph_analysis_without_vendor() {
    let pipeline = Pipeline::new(MatcherConfig::default());
    assert_eq!(split_into_atomic(TWO_SHALL).len(), 2);

    let report = pipeline
        .matcher
        .analyze_paragraph(&records("c", &[TWO_SHALL])[0], &[])
        .await;

    assert_eq!(report.gaps.len(), 2);
    for gap in &report.gaps {
        assert_eq!(gap.gap_type, Some(GapType::CompletelyAbsentObligation));
        assert_eq!(gap.reason, "No substantial match found.");
        assert!(gap.suggested_vendor_text.is_some());
    }
    assert_eq!(pipeline.judge.calls_with_system(VERIFY_SYSTEM_PROMPT), 0);
    assert_eq!(pipeline.judge.calls_with_system(REMEDIATION_SYSTEM_PROMPT), 2);
}

#[tokio::test]
async fn test_repeat_comparison_is_served_from_cache() {
    let pipeline = Pipeline::new(MatcherConfig::default());
    let client = records("c", &[ENCRYPTION]);
    let vendor = records("v", &[ENCRYPTION]);

    let first = pipeline.matcher.compare(&client, &vendor).await;
    let calls_after_first = pipeline.judge.calls_with_system(VERIFY_SYSTEM_PROMPT);
    let second = pipeline.matcher.compare(&client, &vendor).await;

    assert_eq!(calls_after_first, 1);
    assert_eq!(pipeline.judge.calls_with_system(VERIFY_SYSTEM_PROMPT), 1);
    assert!(pipeline.cache.contains(ENCRYPTION, ENCRYPTION));
    assert_eq!(
        first.matched[0].final_score(),
        second.matched[0].final_score()
    );
    assert_ne!(first.comparison_id, second.comparison_id);
}

#[tokio::test]
async fn test_provider_outage_degrades_to_gaps() {
    let judge = Arc::new(MockJudge::new());
    for _ in 0..8 {
        judge.push_error(JudgeError::Provider {
            message: "connection refused".to_string(),
        });
    }
    let pipeline = Pipeline::with_judge(judge, MatcherConfig::default());

    let report = pipeline
        .matcher
        .compare(&records("c", &[ENCRYPTION]), &records("v", &[ENCRYPTION]))
        .await;

    assert!(report.matched.is_empty());
    assert_eq!(report.gaps.len(), 1);
    assert_eq!(report.document_summary.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_report_serializes_for_consumers() {
    let pipeline = Pipeline::new(MatcherConfig::default());

    let report = pipeline
        .matcher
        .compare(
            &records("c", &[ENCRYPTION, BADGES]),
            &records("v", &[ENCRYPTION]),
        )
        .await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["matched"][0]["granularity"], "paragraph");
    assert!(json["matched"][0]["final_score"].is_number());
    assert!(json["gaps"][0]["suggested_vendor_text"].is_string());
    assert_eq!(json["document_summary"]["total_client_units"], 2);
    assert_eq!(json["document_summary"]["risk_level"], "High");
}
