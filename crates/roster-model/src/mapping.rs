//! Column mapping types for source-column to canonical-field assignment.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use crate::field::FieldSchema;

/// One canonical field and the source column chosen for it, if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub field: String,
    pub column: Option<String>,
}

/// Association from every canonical field to an optional source column.
///
/// There is exactly one entry per schema field, in schema order. Changing one
/// entry never touches another; the same column may be chosen for several
/// fields when the user asks for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    entries: Vec<MappingEntry>,
}

impl ColumnMapping {
    /// A mapping with every field of `schema` unset.
    pub fn unset(schema: &FieldSchema) -> Self {
        Self {
            entries: schema
                .ids()
                .map(|id| MappingEntry {
                    field: id.to_string(),
                    column: None,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|entry| (entry.field.as_str(), entry.column.as_deref()))
    }

    /// Source column assigned to `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entry(field).and_then(|entry| entry.column.as_deref())
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.entry(field).is_some()
    }

    /// Assign `column` (or clear with `None`) for `field`.
    ///
    /// `headers` is the header list of the active upload; a column that is
    /// not one of them is rejected. Returns the previously assigned column.
    pub fn assign(
        &mut self,
        field: &str,
        column: Option<&str>,
        headers: &[String],
    ) -> Result<Option<String>> {
        if let Some(column) = column
            && !headers.iter().any(|header| header == column)
        {
            return Err(ModelError::ColumnNotFound(column.to_string()));
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|entry| entry.field == field)
            .ok_or_else(|| ModelError::FieldNotFound(field.to_string()))?;
        Ok(std::mem::replace(
            &mut entry.column,
            column.map(str::to_string),
        ))
    }

    pub fn is_column_used(&self, column: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.column.as_deref() == Some(column))
    }

    pub fn mapped_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.column.is_some())
            .count()
    }

    pub fn unmapped_fields(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.column.is_none())
            .map(|entry| entry.field.as_str())
    }

    fn entry(&self, field: &str) -> Option<&MappingEntry> {
        self.entries.iter().find(|entry| entry.field == field)
    }
}

/// How an auto-mapping suggestion was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Header equals the field id or label.
    Exact,
    /// Header equals one of the field's aliases.
    Alias,
    /// Header words contain the field id or label.
    Token,
    /// Header is textually close to the field id, label or an alias.
    Fuzzy,
}

impl MatchKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Alias => "alias",
            Self::Token => "token",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested source column for a canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingSuggestion {
    pub field: String,
    pub column: String,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    pub kind: MatchKind,
}
