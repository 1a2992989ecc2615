use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use crate::document::{ComplianceDomain, ParagraphRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
    /// Overrides the server's domain taxonomy for this call.
    #[serde(default)]
    pub domains: Option<Vec<ComplianceDomain>>,
}

impl ClassifyRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.text.trim().is_empty() {
            return Err(GatewayError::InvalidRequest("text must not be empty".to_string()));
        }
        if self.domains.as_ref().is_some_and(Vec::is_empty) {
            return Err(GatewayError::InvalidRequest(
                "domains must not be an empty list".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
/// One client paragraph checked against a list of vendor paragraphs.
pub struct AnalyzeRequest {
    pub client_paragraph: String,
    #[serde(default)]
    pub vendor_paragraphs: Vec<String>,
}

impl AnalyzeRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.client_paragraph.trim().is_empty() {
            return Err(GatewayError::InvalidRequest(
                "client_paragraph must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn client_record(&self) -> ParagraphRecord {
        ParagraphRecord::new("client", self.client_paragraph.trim())
    }

    /// Vendor paragraphs as records `v0`, `v1`, ...; blank entries are dropped.
    pub fn vendor_records(&self) -> Vec<ParagraphRecord> {
        self.vendor_paragraphs
            .iter()
            .map(|text| text.trim())
            .filter(|text| !text.is_empty())
            .enumerate()
            .map(|(n, text)| ParagraphRecord::new(format!("v{n}"), text))
            .collect()
    }
}

fn default_classify_missing() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
/// Document-level comparison request.
pub struct CompareRequest {
    pub client: Vec<ParagraphRecord>,
    pub vendor: Vec<ParagraphRecord>,
    /// Classify paragraphs that arrive without a persisted classification.
    #[serde(default = "default_classify_missing")]
    pub classify_missing: bool,
}

impl CompareRequest {
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.client.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "client document has no paragraphs".to_string(),
            ));
        }

        for (side, records) in [("client", &self.client), ("vendor", &self.vendor)] {
            let mut seen = HashSet::new();
            for record in records.iter() {
                if record.id.trim().is_empty() {
                    return Err(GatewayError::InvalidRequest(format!(
                        "{side} paragraph with empty id"
                    )));
                }
                if record.id.contains('#') {
                    return Err(GatewayError::InvalidRequest(format!(
                        "{side} paragraph id '{}' must not contain '#'",
                        record.id
                    )));
                }
                if record.text.trim().is_empty() {
                    return Err(GatewayError::InvalidRequest(format!(
                        "{side} paragraph '{}' has empty text",
                        record.id
                    )));
                }
                if !seen.insert(record.id.as_str()) {
                    return Err(GatewayError::InvalidRequest(format!(
                        "duplicate {side} paragraph id '{}'",
                        record.id
                    )));
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainsResponse {
    pub domains: Vec<ComplianceDomain>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_records_skip_blank_entries() {
        let request = AnalyzeRequest {
            client_paragraph: "Vendor shall log access.".to_string(),
            vendor_paragraphs: vec!["First.".to_string(), "  ".to_string(), "Second.".to_string()],
        };

        let records = request.vendor_records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "v0");
        assert_eq!(records[1].id, "v1");
        assert_eq!(records[1].text, "Second.");
    }

    #[test]
    fn test_compare_rejects_duplicate_ids() {
        let request = CompareRequest {
            client: vec![
                ParagraphRecord::new("p1", "One."),
                ParagraphRecord::new("p1", "Two."),
            ],
            vendor: Vec::new(),
            classify_missing: false,
        };

        let err = request.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate client paragraph id 'p1'"));
    }

    #[test]
    fn test_compare_rejects_atomic_separator_in_id() {
        let request = CompareRequest {
            client: vec![ParagraphRecord::new("p#1", "One.")],
            vendor: Vec::new(),
            classify_missing: false,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_compare_defaults_to_classifying() {
        let request: CompareRequest = serde_json::from_value(serde_json::json!({
            "client": [{"id": "c1", "text": "Vendor shall encrypt data."}],
            "vendor": []
        }))
        .unwrap();

        assert!(request.classify_missing);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_classify_rejects_blank_text() {
        let request = ClassifyRequest {
            text: "   ".to_string(),
            domains: None,
        };
        assert!(request.validate().is_err());
    }
}
