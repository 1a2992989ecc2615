//! Paragraph records and text units handed to the pipeline.
//!
//! The persistence collaborator owns paragraphs and their domain classification;
//! the pipeline only reads them. [`TextUnit`]s are built per analysis call.

use serde::{Deserialize, Serialize};

/// Which side of the comparison a unit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Client,
    Vendor,
}

/// Granularity a unit or a match was resolved at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Paragraph,
    Atomic,
}

/// Persisted domain classification of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Domain name, or `None` when the classifier produced an unknown label.
    pub domain: Option<String>,
    pub confidence: f32,
    /// Which classification stage produced the label (`rule-based`, `embedding-based`, ...).
    pub method: String,
}

/// A paragraph as supplied by the paragraph source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphRecord {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub classification: Option<Classification>,
}

impl ParagraphRecord {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            classification: None,
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.classification = Some(Classification {
            domain: Some(domain.into()),
            confidence: 1.0,
            method: "provided".to_string(),
        });
        self
    }

    /// Domain label from the persisted classification, if any.
    pub fn domain(&self) -> Option<&str> {
        self.classification
            .as_ref()
            .and_then(|c| c.domain.as_deref())
    }
}

/// A compliance subject-matter category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceDomain {
    pub name: String,
    pub description: String,
}

impl ComplianceDomain {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Immutable passage of text at paragraph or atomic granularity.
#[derive(Debug, Clone, PartialEq)]
pub struct TextUnit {
    pub id: String,
    pub text: String,
    pub domain: Option<String>,
    pub origin: Origin,
    pub granularity: Granularity,
}

impl TextUnit {
    /// Builds a paragraph-level unit, taking the domain from persisted classification.
    pub fn paragraph(record: &ParagraphRecord, origin: Origin) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            domain: record.domain().map(str::to_string),
            origin,
            granularity: Granularity::Paragraph,
        }
    }

    /// Derives atomic units from this paragraph. Ids are `{paragraph_id}#{n}`;
    /// the parent's domain is inherited.
    pub fn atomize(&self) -> Vec<TextUnit> {
        crate::splitter::split_into_atomic(&self.text)
            .into_iter()
            .enumerate()
            .map(|(n, text)| TextUnit {
                id: format!("{}#{}", self.id, n),
                text,
                domain: self.domain.clone(),
                origin: self.origin,
                granularity: Granularity::Atomic,
            })
            .collect()
    }

    /// Id of the paragraph this unit was derived from.
    pub fn parent_id(&self) -> &str {
        match self.granularity {
            Granularity::Paragraph => &self.id,
            Granularity::Atomic => parent_paragraph_id(&self.id),
        }
    }
}

/// Strips the atomic suffix from a unit id.
pub fn parent_paragraph_id(unit_id: &str) -> &str {
    unit_id
        .rsplit_once('#')
        .map(|(parent, _)| parent)
        .unwrap_or(unit_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_unit_takes_persisted_domain() {
        let record = ParagraphRecord::new("p1", "Vendor shall log access.").with_domain("Audit & Monitoring");
        let unit = TextUnit::paragraph(&record, Origin::Vendor);

        assert_eq!(unit.domain.as_deref(), Some("Audit & Monitoring"));
        assert_eq!(unit.granularity, Granularity::Paragraph);
    }

    #[test]
    fn test_unclassified_paragraph_has_no_domain() {
        let record = ParagraphRecord::new("p1", "text");
        assert!(record.domain().is_none());
        assert!(TextUnit::paragraph(&record, Origin::Client).domain.is_none());
    }

    #[test]
    fn test_classification_without_domain() {
        let record = ParagraphRecord {
            id: "p1".into(),
            text: "text".into(),
            classification: Some(Classification {
                domain: None,
                confidence: 0.3,
                method: "invalid-domain".into(),
            }),
        };
        assert!(record.domain().is_none());
    }

    #[test]
    fn test_atomize_ids_and_domain() {
        let record = ParagraphRecord::new(
            "v7",
            "The vendor shall encrypt data and shall rotate keys. Backups are kept.",
        )
        .with_domain("Information Security");
        let atoms = TextUnit::paragraph(&record, Origin::Vendor).atomize();

        assert_eq!(atoms.len(), 3);
        assert_eq!(atoms[0].id, "v7#0");
        assert_eq!(atoms[2].id, "v7#2");
        assert!(atoms.iter().all(|a| a.granularity == Granularity::Atomic));
        assert!(
            atoms
                .iter()
                .all(|a| a.domain.as_deref() == Some("Information Security"))
        );
        assert_eq!(atoms[1].parent_id(), "v7");
    }

    #[test]
    fn test_parent_paragraph_id() {
        assert_eq!(parent_paragraph_id("p1#3"), "p1");
        assert_eq!(parent_paragraph_id("p1"), "p1");
        assert_eq!(parent_paragraph_id("doc#p1#0"), "doc#p1");
    }

    #[test]
    fn test_record_deserializes_without_classification() {
        let record: ParagraphRecord =
            serde_json::from_str(r#"{"id":"c1","text":"Client text"}"#).unwrap();
        assert!(record.classification.is_none());
    }
}
