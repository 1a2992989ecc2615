//! Coverage summary and risk tier for a comparison.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::constants::{LOW_RISK_COVERAGE, MEDIUM_RISK_COVERAGE, round_to};
use crate::matcher::{Gap, MatchRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    /// Nothing was analysed.
    #[serde(rename = "No data")]
    NoData,
}

impl RiskLevel {
    /// Low at ≥ 80% coverage, Medium at ≥ 60%, High below. `NoData` when `total` is zero.
    pub fn from_coverage(coverage: f32, total: usize) -> Self {
        if total == 0 {
            RiskLevel::NoData
        } else if coverage >= LOW_RISK_COVERAGE {
            RiskLevel::Low
        } else if coverage >= MEDIUM_RISK_COVERAGE {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
            RiskLevel::NoData => "No data",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSummary {
    pub total_client_units: usize,
    pub matched_count: usize,
    pub gap_count: usize,
    /// `matched / total × 100`, 2 decimals.
    pub coverage_percentage: f32,
    /// Mean matched confidence, 3 decimals.
    pub average_confidence: f32,
    pub risk_level: RiskLevel,
}

impl DocumentSummary {
    pub fn from_confidences(confidences: &[f32], gap_count: usize) -> Self {
        let matched_count = confidences.len();
        let total = matched_count + gap_count;

        let coverage = if total > 0 {
            matched_count as f32 / total as f32 * 100.0
        } else {
            0.0
        };
        let average = if matched_count > 0 {
            confidences.iter().sum::<f32>() / matched_count as f32
        } else {
            0.0
        };

        Self {
            total_client_units: total,
            matched_count,
            gap_count,
            coverage_percentage: round_to(coverage, 2),
            average_confidence: round_to(average, 3),
            risk_level: RiskLevel::from_coverage(coverage, total),
        }
    }

    pub fn empty() -> Self {
        Self::from_confidences(&[], 0)
    }
}

#[derive(Debug, Clone, Serialize)]
/// Full comparison output handed to the report consumer.
pub struct ComparisonReport {
    pub comparison_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub matched: Vec<MatchRecord>,
    pub gaps: Vec<Gap>,
    /// Client paragraphs with no paragraph-level match (resolved through atomic analysis).
    pub unmatched_client_paragraphs: Vec<String>,
    pub document_summary: DocumentSummary,
}

impl ComparisonReport {
    /// Well-formed report with nothing in it.
    pub fn empty() -> Self {
        build_report(Vec::new(), Vec::new())
    }

    pub fn with_unmatched(mut self, unmatched: Vec<String>) -> Self {
        self.unmatched_client_paragraphs = unmatched;
        self
    }
}

/// Aggregates matches and gaps into a report. Each match counts its confidence.
pub fn build_report(matched: Vec<MatchRecord>, gaps: Vec<Gap>) -> ComparisonReport {
    let confidences: Vec<f32> = matched.iter().map(MatchRecord::confidence).collect();
    let document_summary = DocumentSummary::from_confidences(&confidences, gaps.len());

    ComparisonReport {
        comparison_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        matched,
        gaps,
        unmatched_client_paragraphs: Vec::new(),
        document_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_matched_is_low_risk() {
        let summary = DocumentSummary::from_confidences(&[0.9, 0.7], 0);

        assert_eq!(summary.coverage_percentage, 100.0);
        assert_eq!(summary.average_confidence, 0.8);
        assert_eq!(summary.risk_level, RiskLevel::Low);
        assert_eq!(summary.total_client_units, 2);
    }

    #[test]
    fn test_all_gaps_is_high_risk() {
        let summary = DocumentSummary::from_confidences(&[], 3);

        assert_eq!(summary.coverage_percentage, 0.0);
        assert_eq!(summary.average_confidence, 0.0);
        assert_eq!(summary.risk_level, RiskLevel::High);
        assert_eq!(summary.gap_count, 3);
    }

    #[test]
    fn test_risk_boundaries() {
        assert_eq!(RiskLevel::from_coverage(80.0, 5), RiskLevel::Low);
        assert_eq!(RiskLevel::from_coverage(79.99, 5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_coverage(60.0, 5), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_coverage(59.99, 5), RiskLevel::High);
    }

    #[test]
    fn test_mixed_coverage_rounding() {
        let summary = DocumentSummary::from_confidences(&[0.9, 0.8], 1);
        assert_eq!(summary.coverage_percentage, 66.67);
        assert_eq!(summary.risk_level, RiskLevel::Medium);
        assert_eq!(summary.average_confidence, 0.85);
    }

    #[test]
    fn test_empty_is_no_data() {
        let summary = DocumentSummary::empty();
        assert_eq!(summary.coverage_percentage, 0.0);
        assert_eq!(summary.risk_level, RiskLevel::NoData);
    }

    #[test]
    fn test_risk_serialization() {
        assert_eq!(serde_json::to_string(&RiskLevel::NoData).unwrap(), "\"No data\"");
        assert_eq!(serde_json::to_string(&RiskLevel::Medium).unwrap(), "\"Medium\"");
    }

    #[test]
    fn test_empty_report_shape() {
        let report = ComparisonReport::empty();
        let value = serde_json::to_value(&report).unwrap();

        assert!(value["matched"].as_array().unwrap().is_empty());
        assert!(value["gaps"].as_array().unwrap().is_empty());
        assert_eq!(value["document_summary"]["risk_level"], "No data");
        assert!(value["comparison_id"].is_string());
    }
}
