//! Canonical participant fields and the schema that orders them.
//!
//! The schema is what the wizard's data-requirements step hands to the
//! import step: which fields exist, which are required, and how their values
//! are checked. Uploaded columns are mapped onto these fields.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Value shape expected for a canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text; only presence is checked.
    #[default]
    Text,
    /// Basic `local@domain.tld` shape.
    Email,
    /// Loose phone number shape.
    Phone,
    /// Calendar date.
    Date,
    /// Decimal number.
    Number,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Date => "date",
            Self::Number => "number",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional extra checks configured for a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldRules {
    /// Regular expression the whole value must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Message reported when `pattern` does not match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Inclusive lower bound (number fields only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Inclusive upper bound (number fields only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

impl FieldRules {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_none() && self.min.is_none() && self.max.is_none()
    }
}

/// Definition of a single canonical field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Canonical name (e.g. `email`).
    pub id: String,
    /// Display label, also used as the template header.
    pub label: String,
    #[serde(default)]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    /// Field defined by the program rather than the standard set.
    #[serde(default)]
    pub custom: bool,
    /// Additional header spellings recognised by auto-mapping.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "FieldRules::is_empty")]
    pub rules: FieldRules,
}

impl FieldSpec {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            required: false,
            custom: false,
            aliases: Vec::new(),
            rules: FieldRules::default(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn custom(mut self) -> Self {
        self.custom = true;
        self
    }

    #[must_use]
    pub fn with_aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: FieldRules) -> Self {
        self.rules = rules;
        self
    }
}

/// Ordered, non-empty set of canonical fields with unique ids.
///
/// Order matters: auto-mapping visits fields in this order, mapped records
/// list values in this order, and the template header follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>")]
pub struct FieldSchema {
    fields: Vec<FieldSpec>,
}

impl FieldSchema {
    /// Build a schema, rejecting empty or duplicate ids.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self> {
        if fields.is_empty() {
            return Err(ModelError::EmptySchema);
        }
        let mut seen = BTreeSet::new();
        for field in &fields {
            let id = field.id.trim();
            if id.is_empty() {
                return Err(ModelError::EmptyFieldId);
            }
            if !seen.insert(id.to_lowercase()) {
                return Err(ModelError::DuplicateField(field.id.clone()));
            }
        }
        Ok(Self { fields })
    }

    /// The participant schema used when no data requirements are supplied:
    /// required name, required email, optional phone.
    #[must_use]
    pub fn participant_default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new("name", "Name", FieldKind::Text)
                    .required()
                    .with_aliases(["full name", "participant name", "participant"]),
                FieldSpec::new("email", "Email", FieldKind::Email)
                    .required()
                    .with_aliases(["email address", "e mail", "e mail address", "mail"]),
                FieldSpec::new("phone", "Phone", FieldKind::Phone).with_aliases([
                    "phone number",
                    "mobile",
                    "cell",
                    "telephone",
                    "tel",
                ]),
            ],
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false for a constructed schema; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.id.as_str())
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }

    pub fn standard_ids(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| !field.custom)
            .map(|field| field.id.clone())
            .collect()
    }

    pub fn custom_ids(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|field| field.custom)
            .map(|field| field.id.clone())
            .collect()
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::participant_default()
    }
}

impl TryFrom<Vec<FieldSpec>> for FieldSchema {
    type Error = ModelError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self> {
        Self::new(fields)
    }
}

impl From<FieldSchema> for Vec<FieldSpec> {
    fn from(schema: FieldSchema) -> Self {
        schema.fields
    }
}
