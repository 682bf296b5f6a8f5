use std::collections::BTreeMap;

use tracing::{debug, info};

use roster_model::{
    ColumnMapping, FieldKind, MappedParticipant, ValidationIssue, ValidationReport,
    ValidationSummary, ValidationWarning,
};

use crate::rules::RuleSet;

/// Validate mapped records against `rules`.
///
/// Issues are ordered by record, then by field in schema order, with at most
/// one issue per field per record. Warnings cover required fields without a
/// column, upload columns no field uses, and email addresses shared by
/// several records. The result depends only on the inputs.
pub fn validate(
    rules: &RuleSet,
    mapping: &ColumnMapping,
    headers: &[String],
    records: &[MappedParticipant],
) -> ValidationReport {
    let mut issues = Vec::new();
    for (position, record) in records.iter().enumerate() {
        for rule in rules.rules() {
            if let Some(reason) = rule.check(record.get(&rule.field)) {
                issues.push(ValidationIssue {
                    record_index: position,
                    field: rule.field.clone(),
                    reason,
                });
            }
        }
    }

    let mut warnings: Vec<ValidationWarning> = rules
        .rules()
        .iter()
        .filter(|rule| rule.required && mapping.get(&rule.field).is_none())
        .map(|rule| ValidationWarning::RequiredFieldUnmapped {
            field: rule.field.clone(),
        })
        .collect();
    warnings.extend(
        headers
            .iter()
            .filter(|header| !mapping.is_column_used(header))
            .map(|header| ValidationWarning::ColumnUnmapped {
                column: header.clone(),
            }),
    );
    for rule in rules
        .rules()
        .iter()
        .filter(|rule| rule.kind == FieldKind::Email)
    {
        warnings.extend(duplicate_values(&rule.field, records));
    }

    let summary = ValidationSummary::from_issues(records.len(), &issues);
    info!(
        total = summary.total_records,
        valid = summary.valid_count,
        invalid = summary.invalid_count,
        warnings = warnings.len(),
        "validated records"
    );
    debug!(issues = issues.len(), "validation issues");

    ValidationReport {
        issues,
        warnings,
        summary,
    }
}

/// Groups of records sharing the same case-insensitive value of `field`,
/// ordered by first occurrence.
fn duplicate_values(field: &str, records: &[MappedParticipant]) -> Vec<ValidationWarning> {
    let mut groups: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (position, record) in records.iter().enumerate() {
        if let Some(value) = record.get(field).map(str::trim).filter(|v| !v.is_empty()) {
            groups
                .entry(value.to_lowercase())
                .or_default()
                .push(position);
        }
    }
    let mut duplicates: Vec<Vec<usize>> = groups
        .into_values()
        .filter(|positions| positions.len() > 1)
        .collect();
    duplicates.sort_by_key(|positions| positions[0]);
    duplicates
        .into_iter()
        .map(|records| ValidationWarning::DuplicateValue {
            field: field.to_string(),
            records,
        })
        .collect()
}
