use serde::{Deserialize, Serialize};

/// A canonical field value on a mapped record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValue {
    pub field: String,
    pub value: Option<String>,
}

/// A participant record derived by applying a column mapping to a raw row.
///
/// Holds one value slot per schema field, in schema order. A slot is `None`
/// when the field is unmapped or the mapped cell is blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappedParticipant {
    /// Zero-based position of the source row among the data rows.
    pub index: usize,
    pub values: Vec<FieldValue>,
}

impl MappedParticipant {
    pub fn new(index: usize, values: Vec<FieldValue>) -> Self {
        Self { index, values }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|slot| slot.field == field)
            .and_then(|slot| slot.value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|slot| (slot.field.as_str(), slot.value.as_deref()))
    }
}
