//! In-memory similarity index over vendor text units.
//!
//! Distances are squared Euclidean over a flat exact scan. Scores handed to callers are
//! `1 / (1 + distance)`, optionally boosted when the candidate shares the query's domain.

pub mod error;


pub use error::IndexError;

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::constants::{DOMAIN_BOOST, SEARCH_OVERSAMPLE, round_to};
use crate::document::TextUnit;
use crate::embedding::Embedder;

/// A retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub unit_id: String,
    pub text: String,
    pub domain: Option<String>,
    /// Bounded similarity in `[0, 1]`, rounded to 4 decimals.
    pub embedding_score: f32,
}

struct IndexedUnit {
    unit: TextUnit,
    vector: Vec<f32>,
}

/// Flat vector index. Built once per comparison and shared across its queries.
pub struct VectorIndex {
    embedder: Arc<dyn Embedder>,
    entries: Vec<IndexedUnit>,
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("len", &self.entries.len())
            .field("dimension", &self.embedder.dimension())
            .finish()
    }
}

impl VectorIndex {
    /// Embeds every unit once. An empty corpus yields an unusable index, not an error.
    pub fn build(embedder: Arc<dyn Embedder>, units: Vec<TextUnit>) -> Result<Self, IndexError> {
        if units.is_empty() {
            debug!("Building empty vector index");
            return Ok(Self::empty(embedder));
        }

        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
        let vectors = embedder.embed_batch(&texts)?;
        let expected = embedder.dimension();

        let entries = units
            .into_iter()
            .zip(vectors)
            .map(|(unit, vector)| {
                if vector.len() != expected {
                    return Err(IndexError::InvalidDimension {
                        unit_id: unit.id.clone(),
                        expected,
                        actual: vector.len(),
                    });
                }
                Ok(IndexedUnit { unit, vector })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(units = entries.len(), dimension = expected, "Vector index built");

        Ok(Self { embedder, entries })
    }

    /// An unusable index; every search returns nothing.
    pub fn empty(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    /// Returns `false` for an index built from zero units.
    pub fn is_usable(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k nearest units to `query`.
    ///
    /// Oversamples `SEARCH_OVERSAMPLE × top_k` by raw distance, then applies the domain
    /// boost, clamps to 1.0, rounds, re-sorts and truncates. Never fails: an unusable
    /// index or a query embedding failure yields an empty list.
    pub fn search(&self, query: &str, domain: Option<&str>, top_k: usize) -> Vec<Candidate> {
        if !self.is_usable() || top_k == 0 {
            return Vec::new();
        }

        let query_vector = match self.embedder.embed(query) {
            Ok(v) if v.len() == self.embedder.dimension() => v,
            Ok(v) => {
                warn!(
                    expected = self.embedder.dimension(),
                    actual = v.len(),
                    "Query embedding has wrong dimension; retrieval unavailable"
                );
                return Vec::new();
            }
            Err(e) => {
                warn!(error = %e, "Query embedding failed; retrieval unavailable");
                return Vec::new();
            }
        };

        let mut pool: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, squared_l2(&query_vector, &entry.vector)))
            .collect();

        pool.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));
        pool.truncate(top_k.saturating_mul(SEARCH_OVERSAMPLE));

        let mut candidates: Vec<Candidate> = pool
            .into_iter()
            .map(|(i, distance)| {
                let unit = &self.entries[i].unit;
                let boost = match (domain, unit.domain.as_deref()) {
                    (Some(wanted), Some(actual)) if wanted == actual => DOMAIN_BOOST,
                    _ => 1.0,
                };
                let score = (distance_to_similarity(distance) * boost).min(1.0);

                Candidate {
                    unit_id: unit.id.clone(),
                    text: unit.text.clone(),
                    domain: unit.domain.clone(),
                    embedding_score: round_to(score, 4),
                }
            })
            .collect();

        candidates.sort_by(|a, b| {
            b.embedding_score
                .partial_cmp(&a.embedding_score)
                .unwrap_or(Ordering::Equal)
        });
        candidates.truncate(top_k);

        debug!(
            query_len = query.len(),
            domain = domain.unwrap_or("-"),
            returned = candidates.len(),
            top_score = candidates.first().map(|c| c.embedding_score),
            "Vector search complete"
        );

        candidates
    }
}

/// Maps a non-negative distance to `(0, 1]`.
#[inline]
pub fn distance_to_similarity(distance: f32) -> f32 {
    1.0 / (1.0 + distance.max(0.0))
}

#[inline]
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}
