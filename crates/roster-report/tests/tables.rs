use proptest::prelude::*;

use roster_model::{
    ColumnMapping, FieldSchema, FieldValue, IssueReason, MappedParticipant, MappingSuggestion,
    MatchKind, ValidationIssue, ValidationReport, ValidationSummary,
};
use roster_report::{
    PREVIEW_LIMIT, Preview, issue_table, mapping_table, preview_table, summary_table,
};

fn participants(count: usize) -> Vec<MappedParticipant> {
    (0..count)
        .map(|index| {
            MappedParticipant::new(
                index,
                vec![
                    FieldValue {
                        field: "name".to_string(),
                        value: Some(format!("Participant {}", index + 1)),
                    },
                    FieldValue {
                        field: "email".to_string(),
                        value: Some(format!("p{}@example.com", index + 1)),
                    },
                    FieldValue {
                        field: "phone".to_string(),
                        value: None,
                    },
                ],
            )
        })
        .collect()
}

fn clean_report(total: usize) -> ValidationReport {
    ValidationReport {
        summary: ValidationSummary::from_issues(total, &[]),
        ..ValidationReport::default()
    }
}

#[test]
fn fifteen_records_preview_ten_with_indicator() {
    let records = participants(15);
    let preview = Preview::build(&records, PREVIEW_LIMIT).expect("preview");
    assert_eq!(preview.total, 15);
    assert_eq!(preview.indicator().as_deref(), Some("Showing first 10 of 15"));

    let mut table = preview_table(&FieldSchema::default(), &preview, &clean_report(15));
    table.force_no_tty();
    assert_eq!(table.row_iter().count(), 10);
    let rendered = table.to_string();
    assert!(rendered.contains("Participant 10"));
    assert!(!rendered.contains("Participant 11"));
}

#[test]
fn preview_marks_invalid_records() {
    let records = participants(2);
    let issues = vec![ValidationIssue {
        record_index: 1,
        field: "email".to_string(),
        reason: IssueReason::InvalidEmail,
    }];
    let report = ValidationReport {
        summary: ValidationSummary::from_issues(2, &issues),
        issues,
        warnings: Vec::new(),
    };
    let preview = Preview::build(&records, PREVIEW_LIMIT).expect("preview");

    let mut table = preview_table(&FieldSchema::default(), &preview, &report);
    table.force_no_tty();
    let rendered = table.to_string();
    assert!(rendered.contains('✓'));
    assert!(rendered.contains('✗'));

    let mut issues = issue_table(&report).expect("issue table");
    issues.force_no_tty();
    assert!(issues.to_string().contains("not a valid email address"));
    assert!(issue_table(&clean_report(2)).is_none());
}

#[test]
fn mapping_table_lists_every_field() {
    let schema = FieldSchema::default();
    let headers = vec!["Name".to_string(), "Contact".to_string()];
    let mut mapping = ColumnMapping::unset(&schema);
    mapping.assign("name", Some("Name"), &headers).unwrap();
    mapping.assign("email", Some("Contact"), &headers).unwrap();
    let suggestions = vec![MappingSuggestion {
        field: "name".to_string(),
        column: "Name".to_string(),
        confidence: 1.0,
        kind: MatchKind::Exact,
    }];

    let mut table = mapping_table(&schema, &mapping, &suggestions);
    table.force_no_tty();
    assert_eq!(table.row_iter().count(), 3);
    let rendered = table.to_string();
    assert!(rendered.contains("exact (100%)"));
    assert!(rendered.contains("manual"));
    assert!(rendered.contains("(unmapped)"));
}

#[test]
fn summary_table_shows_counts() {
    let mut table = summary_table(&ValidationSummary {
        total_records: 4,
        valid_count: 3,
        invalid_count: 1,
    });
    table.force_no_tty();
    let rendered = table.to_string();
    for label in ["Total", "Valid", "Invalid"] {
        assert!(rendered.contains(label));
    }
}

proptest! {
    #[test]
    fn preview_is_bounded(total in 0usize..40) {
        let records = participants(total);
        match Preview::build(&records, PREVIEW_LIMIT) {
            None => prop_assert_eq!(total, 0),
            Some(preview) => {
                prop_assert_eq!(preview.shown(), total.min(PREVIEW_LIMIT));
                prop_assert_eq!(preview.total, total);
                prop_assert_eq!(preview.indicator().is_some(), total > PREVIEW_LIMIT);
            }
        }
    }
}
