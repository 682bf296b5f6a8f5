//! Mapping engine implementation.

use std::collections::BTreeSet;

use rapidfuzz::distance::jaro_winkler::similarity as jaro_similarity;
use tracing::debug;

use roster_model::{ColumnMapping, FieldSchema, FieldSpec, MappingSuggestion, MatchKind};

use crate::utils::{compact_text, token_set};

/// Minimum Jaro-Winkler similarity for a fuzzy header match.
pub const DEFAULT_MIN_SIMILARITY: f64 = 0.88;
const TOKEN_MATCH_CONFIDENCE: f32 = 0.9;

/// Result of auto-mapping a header list.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingResult {
    /// Proposed mapping; unmatched fields are unset.
    pub mapping: ColumnMapping,
    /// One suggestion per matched field, in schema order.
    pub suggestions: Vec<MappingSuggestion>,
    /// Headers not claimed by any field, in column order.
    pub unmapped_columns: Vec<String>,
}

impl MappingResult {
    pub fn suggestion_for(&self, field: &str) -> Option<&MappingSuggestion> {
        self.suggestions
            .iter()
            .find(|suggestion| suggestion.field == field)
    }
}

/// Engine proposing which source column feeds each canonical field.
///
/// Matching is a heuristic and runs in three passes over the fields in schema
/// order, each pass scanning headers in column order:
///
/// 1. exact or alias match on the compacted text (case and separators ignored),
/// 2. word containment (header words include every word of the id, label or
///    an alias),
/// 3. Jaro-Winkler similarity at or above the configured minimum.
///
/// A header is claimed by at most one field. Earlier passes finish for every
/// field before a later pass starts, so a header that is an exact match for
/// one field cannot be taken by a fuzzy match for another.
#[derive(Debug, Clone)]
pub struct MappingEngine {
    schema: FieldSchema,
    min_similarity: f64,
}

struct HeaderKey<'a> {
    header: &'a String,
    compact: String,
    tokens: BTreeSet<String>,
}

struct FieldKeys {
    exact: Vec<String>,
    alias: Vec<String>,
    token_sets: Vec<BTreeSet<String>>,
}

impl FieldKeys {
    fn new(field: &FieldSpec) -> Self {
        let mut exact = vec![compact_text(&field.id), compact_text(&field.label)];
        exact.dedup();
        let alias = field
            .aliases
            .iter()
            .map(String::as_str)
            .map(compact_text)
            .collect();
        let token_sets = std::iter::once(field.id.as_str())
            .chain(std::iter::once(field.label.as_str()))
            .chain(field.aliases.iter().map(String::as_str))
            .map(token_set)
            .filter(|tokens| !tokens.is_empty())
            .collect();
        Self {
            exact,
            alias,
            token_sets,
        }
    }

    fn similarity(&self, header: &str) -> f64 {
        self.exact
            .iter()
            .chain(&self.alias)
            .map(|candidate| jaro_similarity(header.chars(), candidate.chars()))
            .fold(0.0, f64::max)
    }
}

impl MappingEngine {
    pub fn new(schema: FieldSchema) -> Self {
        Self {
            schema,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }

    /// Override the fuzzy-match threshold (0.0 to 1.0).
    #[must_use]
    pub fn with_min_similarity(mut self, min_similarity: f64) -> Self {
        self.min_similarity = min_similarity.clamp(0.0, 1.0);
        self
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Propose a mapping for `headers`.
    pub fn suggest(&self, headers: &[String]) -> MappingResult {
        let keys: Vec<HeaderKey<'_>> = headers
            .iter()
            .map(|header| HeaderKey {
                header,
                compact: compact_text(header),
                tokens: token_set(header),
            })
            .collect();
        let fields: Vec<(&FieldSpec, FieldKeys)> = self
            .schema
            .fields()
            .iter()
            .map(|field| (field, FieldKeys::new(field)))
            .collect();

        let mut claimed: Vec<Option<MappingSuggestion>> = vec![None; fields.len()];
        let mut used_headers: BTreeSet<usize> = BTreeSet::new();

        // Pass 1: exact and alias.
        for (slot, (field, field_keys)) in fields.iter().enumerate() {
            for (idx, key) in keys.iter().enumerate() {
                if used_headers.contains(&idx) || key.compact.is_empty() {
                    continue;
                }
                let kind = if field_keys.exact.contains(&key.compact) {
                    MatchKind::Exact
                } else if field_keys.alias.contains(&key.compact) {
                    MatchKind::Alias
                } else {
                    continue;
                };
                used_headers.insert(idx);
                claimed[slot] = Some(suggestion(field, key.header, 1.0, kind));
                break;
            }
        }

        // Pass 2: word containment.
        for (slot, (field, field_keys)) in fields.iter().enumerate() {
            if claimed[slot].is_some() {
                continue;
            }
            let found = keys.iter().enumerate().find(|(idx, key)| {
                !used_headers.contains(idx)
                    && field_keys
                        .token_sets
                        .iter()
                        .any(|tokens| tokens.is_subset(&key.tokens))
            });
            if let Some((idx, key)) = found {
                used_headers.insert(idx);
                claimed[slot] = Some(suggestion(
                    field,
                    key.header,
                    TOKEN_MATCH_CONFIDENCE,
                    MatchKind::Token,
                ));
            }
        }

        // Pass 3: fuzzy similarity, best score wins, ties go to the earlier column.
        for (slot, (field, field_keys)) in fields.iter().enumerate() {
            if claimed[slot].is_some() {
                continue;
            }
            let mut best: Option<(usize, f64)> = None;
            for (idx, key) in keys.iter().enumerate() {
                if used_headers.contains(&idx) || key.compact.is_empty() {
                    continue;
                }
                let score = field_keys.similarity(&key.compact);
                if score < self.min_similarity {
                    continue;
                }
                if best.is_none_or(|(_, best_score)| score > best_score) {
                    best = Some((idx, score));
                }
            }
            if let Some((idx, score)) = best {
                used_headers.insert(idx);
                claimed[slot] = Some(suggestion(
                    field,
                    keys[idx].header,
                    score as f32,
                    MatchKind::Fuzzy,
                ));
            }
        }

        let mut mapping = ColumnMapping::unset(&self.schema);
        let mut suggestions = Vec::new();
        for found in claimed.into_iter().flatten() {
            // Field and header both come from the inputs, so assignment succeeds.
            if mapping
                .assign(&found.field, Some(found.column.as_str()), headers)
                .is_ok()
            {
                debug!(
                    field = %found.field,
                    column = %found.column,
                    kind = %found.kind,
                    confidence = found.confidence,
                    "auto-mapped field"
                );
                suggestions.push(found);
            }
        }

        let unmapped_columns = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !used_headers.contains(idx))
            .map(|(_, header)| header.clone())
            .collect();

        MappingResult {
            mapping,
            suggestions,
            unmapped_columns,
        }
    }
}

fn suggestion(field: &FieldSpec, column: &str, confidence: f32, kind: MatchKind) -> MappingSuggestion {
    MappingSuggestion {
        field: field.id.clone(),
        column: column.to_string(),
        confidence,
        kind,
    }
}
