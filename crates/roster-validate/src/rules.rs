//! Per-field rules compiled from a field schema.

use regex::Regex;

use roster_model::{FieldKind, FieldSchema, FieldSpec, IssueReason};

use crate::checks::{is_valid_date, is_valid_email, is_valid_phone, parse_number};
use crate::error::{Result, ValidationError};

const DEFAULT_PATTERN_MESSAGE: &str = "does not match the expected format";

/// Compiled checks for one canonical field.
#[derive(Debug, Clone)]
pub struct FieldRule {
    pub field: String,
    pub kind: FieldKind,
    pub required: bool,
    min: Option<f64>,
    max: Option<f64>,
    pattern: Option<Regex>,
    message: String,
}

impl FieldRule {
    fn compile(spec: &FieldSpec) -> Result<Self> {
        let pattern = spec
            .rules
            .pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                    ValidationError::InvalidPattern {
                        field: spec.id.clone(),
                        source,
                    }
                })
            })
            .transpose()?;
        Ok(Self {
            field: spec.id.clone(),
            kind: spec.kind,
            required: spec.required,
            min: spec.rules.min,
            max: spec.rules.max,
            pattern,
            message: spec
                .rules
                .message
                .clone()
                .unwrap_or_else(|| DEFAULT_PATTERN_MESSAGE.to_string()),
        })
    }

    /// First failing check for `value`, if any.
    ///
    /// Checks run in order: presence, kind, range (numbers only), pattern.
    pub fn check(&self, value: Option<&str>) -> Option<IssueReason> {
        let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
            return self.required.then_some(IssueReason::Missing);
        };

        match self.kind {
            FieldKind::Text => {}
            FieldKind::Email if !is_valid_email(value) => return Some(IssueReason::InvalidEmail),
            FieldKind::Phone if !is_valid_phone(value) => return Some(IssueReason::InvalidPhone),
            FieldKind::Date if !is_valid_date(value) => return Some(IssueReason::InvalidDate),
            FieldKind::Number => {
                let Some(number) = parse_number(value) else {
                    return Some(IssueReason::InvalidNumber);
                };
                let below = self.min.is_some_and(|min| number < min);
                let above = self.max.is_some_and(|max| number > max);
                if below || above {
                    return Some(IssueReason::OutOfRange {
                        min: self.min,
                        max: self.max,
                    });
                }
            }
            FieldKind::Email | FieldKind::Phone | FieldKind::Date => {}
        }

        match &self.pattern {
            Some(pattern) if !pattern.is_match(value) => Some(IssueReason::PatternMismatch {
                message: self.message.clone(),
            }),
            _ => None,
        }
    }
}

/// Rules for every field of a schema, in schema order.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldRule>,
}

impl RuleSet {
    /// Compile the rules for `schema`; fails only on an invalid custom pattern.
    pub fn from_schema(schema: &FieldSchema) -> Result<Self> {
        let rules = schema
            .fields()
            .iter()
            .map(FieldRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn get(&self, field: &str) -> Option<&FieldRule> {
        self.rules.iter().find(|rule| rule.field == field)
    }
}

#[cfg(test)]
mod tests {
    use roster_model::FieldRules;

    use super::*;

    fn rule(spec: FieldSpec) -> FieldRule {
        FieldRule::compile(&spec).expect("compile rule")
    }

    #[test]
    fn presence_depends_on_required() {
        let name = rule(FieldSpec::new("name", "Name", FieldKind::Text).required());
        assert_eq!(name.check(None), Some(IssueReason::Missing));
        assert_eq!(name.check(Some("   ")), Some(IssueReason::Missing));
        assert_eq!(name.check(Some("Ada")), None);

        let phone = rule(FieldSpec::new("phone", "Phone", FieldKind::Phone));
        assert_eq!(phone.check(None), None);
        assert_eq!(phone.check(Some("nope")), Some(IssueReason::InvalidPhone));
    }

    #[test]
    fn range_applies_to_numbers() {
        let age = rule(
            FieldSpec::new("age", "Age", FieldKind::Number).with_rules(FieldRules {
                min: Some(18.0),
                max: Some(99.0),
                ..FieldRules::default()
            }),
        );
        assert_eq!(age.check(Some("42")), None);
        assert_eq!(age.check(Some("abc")), Some(IssueReason::InvalidNumber));
        assert_eq!(
            age.check(Some("12")),
            Some(IssueReason::OutOfRange {
                min: Some(18.0),
                max: Some(99.0),
            })
        );
    }

    #[test]
    fn pattern_is_anchored_and_reports_message() {
        let zip = rule(
            FieldSpec::new("zip", "ZIP", FieldKind::Text).with_rules(FieldRules {
                pattern: Some(r"\d{5}".to_string()),
                message: Some("must be a five digit ZIP code".to_string()),
                ..FieldRules::default()
            }),
        );
        assert_eq!(zip.check(Some("02139")), None);
        assert_eq!(
            zip.check(Some("021390")),
            Some(IssueReason::PatternMismatch {
                message: "must be a five digit ZIP code".to_string(),
            })
        );
    }

    #[test]
    fn kind_failure_hides_pattern_failure() {
        let email = rule(
            FieldSpec::new("email", "Email", FieldKind::Email).with_rules(FieldRules {
                pattern: Some(r".*@example\.org".to_string()),
                ..FieldRules::default()
            }),
        );
        assert_eq!(email.check(Some("bad")), Some(IssueReason::InvalidEmail));
        assert_eq!(
            email.check(Some("a@example.com")),
            Some(IssueReason::PatternMismatch {
                message: DEFAULT_PATTERN_MESSAGE.to_string(),
            })
        );
    }

    #[test]
    fn invalid_pattern_is_a_compile_error() {
        let schema = FieldSchema::new(vec![
            FieldSpec::new("code", "Code", FieldKind::Text).with_rules(FieldRules {
                pattern: Some("(".to_string()),
                ..FieldRules::default()
            }),
        ])
        .unwrap();
        let err = RuleSet::from_schema(&schema).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidPattern { ref field, .. } if field == "code"));
    }
}
