//! Validation results for mapped participant records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a field value failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueReason {
    /// Required field is unmapped or blank.
    Missing,
    InvalidEmail,
    InvalidPhone,
    InvalidDate,
    InvalidNumber,
    OutOfRange {
        min: Option<f64>,
        max: Option<f64>,
    },
    PatternMismatch {
        message: String,
    },
}

impl fmt::Display for IssueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required value is missing"),
            Self::InvalidEmail => f.write_str("not a valid email address"),
            Self::InvalidPhone => f.write_str("not a valid phone number"),
            Self::InvalidDate => f.write_str("not a valid date"),
            Self::InvalidNumber => f.write_str("not a valid number"),
            Self::OutOfRange { min, max } => match (min, max) {
                (Some(min), Some(max)) => write!(f, "must be between {min} and {max}"),
                (Some(min), None) => write!(f, "must be at least {min}"),
                (None, Some(max)) => write!(f, "must be at most {max}"),
                (None, None) => f.write_str("out of range"),
            },
            Self::PatternMismatch { message } => f.write_str(message),
        }
    }
}

/// A single problem found on one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Zero-based record index.
    pub record_index: usize,
    pub field: String,
    pub reason: IssueReason,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "record {}: {}: {}",
            self.record_index + 1,
            self.field,
            self.reason
        )
    }
}

/// Dataset-level notice. Warnings never make a record invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    RequiredFieldUnmapped { field: String },
    ColumnUnmapped { column: String },
    /// The same value appears on several records; indexes are zero-based.
    DuplicateValue { field: String, records: Vec<usize> },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RequiredFieldUnmapped { field } => {
                write!(f, "required field '{field}' is not mapped to any column")
            }
            Self::ColumnUnmapped { column } => {
                write!(f, "column '{column}' is not mapped and will be skipped")
            }
            Self::DuplicateValue { field, records } => {
                let list = records
                    .iter()
                    .map(|index| (index + 1).to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "duplicate {field} on records {list}")
            }
        }
    }
}

/// Aggregate record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total_records: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
}

impl ValidationSummary {
    /// Count records with at least one issue among `total` records.
    pub fn from_issues(total: usize, issues: &[ValidationIssue]) -> Self {
        let mut invalid: Vec<usize> = issues.iter().map(|issue| issue.record_index).collect();
        invalid.sort_unstable();
        invalid.dedup();
        let invalid_count = invalid.len().min(total);
        Self {
            total_records: total,
            valid_count: total - invalid_count,
            invalid_count,
        }
    }
}

/// Full validation outcome for a set of mapped records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationWarning>,
    pub summary: ValidationSummary,
}

impl ValidationReport {
    pub fn issues_for(&self, record_index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(move |issue| issue.record_index == record_index)
    }

    pub fn is_valid(&self, record_index: usize) -> bool {
        self.issues_for(record_index).next().is_none()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(record_index: usize, field: &str) -> ValidationIssue {
        ValidationIssue {
            record_index,
            field: field.to_string(),
            reason: IssueReason::Missing,
        }
    }

    #[test]
    fn summary_counts_records_not_issues() {
        let issues = vec![issue(0, "name"), issue(0, "email"), issue(2, "email")];
        let summary = ValidationSummary::from_issues(4, &issues);
        assert_eq!(
            summary,
            ValidationSummary {
                total_records: 4,
                valid_count: 2,
                invalid_count: 2,
            }
        );
    }

    #[test]
    fn issue_display_is_one_based() {
        let text = ValidationIssue {
            record_index: 2,
            field: "email".to_string(),
            reason: IssueReason::InvalidEmail,
        }
        .to_string();
        assert_eq!(text, "record 3: email: not a valid email address");
    }

    #[test]
    fn range_reason_display() {
        let reason = IssueReason::OutOfRange {
            min: Some(18.0),
            max: None,
        };
        assert_eq!(reason.to_string(), "must be at least 18");
    }
}
