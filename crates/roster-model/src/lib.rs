//! Data model shared by the roster import crates.

pub mod error;
pub mod field;
pub mod mapping;
pub mod participant;
pub mod row;
pub mod validation;

pub use error::{ModelError, Result};
pub use field::{FieldKind, FieldRules, FieldSchema, FieldSpec};
pub use mapping::{ColumnMapping, MappingEntry, MappingSuggestion, MatchKind};
pub use participant::{FieldValue, MappedParticipant};
pub use row::RawRow;
pub use validation::{
    IssueReason, ValidationIssue, ValidationReport, ValidationSummary, ValidationWarning,
};
