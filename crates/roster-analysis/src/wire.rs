//! JSON bodies exchanged with the analysis endpoint.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use roster_model::{ColumnMapping, FieldSchema, RawRow};

/// Path of the analysis endpoint, relative to the configured base URL.
pub const ANALYZE_ENDPOINT: &str = "/api/ai/analyze-qr-wizard";

/// Position of the participant upload in the setup wizard.
pub const WIZARD_STEP: u8 = 4;

/// Number of raw rows sent as a sample.
pub const SAMPLE_ROWS: usize = 3;

/// Request body: `{ "step": 4, "data": { ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub step: u8,
    pub data: AnalysisData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub participant_count: usize,
    pub headers: Vec<String>,
    pub sample_data: Vec<RawRow>,
    pub standard_fields: Vec<String>,
    pub custom_fields: Vec<String>,
    pub mapping: MappingPayload,
}

/// Field-to-column assignments as a JSON object in schema order, with
/// unmapped fields as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingPayload(Vec<(String, Option<String>)>);

impl MappingPayload {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == field)
            .and_then(|(_, column)| column.as_deref())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn mapped_count(&self) -> usize {
        self.0.iter().filter(|(_, column)| column.is_some()).count()
    }

    pub fn unmapped_fields(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, column)| column.is_none())
            .map(|(field, _)| field.as_str())
    }
}

impl From<&ColumnMapping> for MappingPayload {
    fn from(mapping: &ColumnMapping) -> Self {
        Self(
            mapping
                .iter()
                .map(|(field, column)| (field.to_string(), column.map(str::to_string)))
                .collect(),
        )
    }
}

impl Serialize for MappingPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, column) in &self.0 {
            map.serialize_entry(field, column)?;
        }
        map.end()
    }
}

impl AnalysisRequest {
    /// Build the request for an upload.
    ///
    /// Only the first [`SAMPLE_ROWS`] raw rows are included; the participant
    /// count covers every row.
    pub fn new(
        schema: &FieldSchema,
        headers: &[String],
        rows: &[RawRow],
        mapping: &ColumnMapping,
    ) -> Self {
        Self {
            step: WIZARD_STEP,
            data: AnalysisData {
                participant_count: rows.len(),
                headers: headers.to_vec(),
                sample_data: rows.iter().take(SAMPLE_ROWS).cloned().collect(),
                standard_fields: schema.standard_ids(),
                custom_fields: schema.custom_ids(),
                mapping: MappingPayload::from(mapping),
            },
        }
    }
}

/// Response body: `{ "success": bool, "analysis"?: string, "error"?: string }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    #[serde(default)]
    pub analysis: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(count: usize) -> Vec<RawRow> {
        (0..count)
            .map(|idx| {
                [("Name", format!("P{idx}")), ("Email", format!("p{idx}@example.com"))]
                    .into_iter()
                    .collect()
            })
            .collect()
    }

    #[test]
    fn request_serializes_in_camel_case() {
        let schema = FieldSchema::default();
        let headers = vec!["Name".to_string(), "Email".to_string()];
        let mut mapping = ColumnMapping::unset(&schema);
        mapping.assign("name", Some("Name"), &headers).unwrap();

        let request = AnalysisRequest::new(&schema, &headers, &rows(5), &mapping);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["step"], 4);
        assert_eq!(json["data"]["participantCount"], 5);
        assert_eq!(json["data"]["sampleData"].as_array().unwrap().len(), 3);
        assert_eq!(json["data"]["sampleData"][2]["Name"], "P2");
        assert_eq!(
            json["data"]["standardFields"],
            serde_json::json!(["name", "email", "phone"])
        );
        assert_eq!(json["data"]["customFields"], serde_json::json!([]));
        assert_eq!(
            json["data"]["mapping"],
            serde_json::json!({"name": "Name", "email": null, "phone": null})
        );
    }

    #[test]
    fn mapping_keys_keep_schema_order() {
        let schema = FieldSchema::default();
        let payload = MappingPayload::from(&ColumnMapping::unset(&schema));
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(text, r#"{"name":null,"email":null,"phone":null}"#);
    }

    #[test]
    fn response_fields_are_optional() {
        let response: AnalysisResponse = serde_json::from_str(r#"{"success":false}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.analysis, None);
    }
}
