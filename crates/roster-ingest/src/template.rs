use csv::{Terminator, WriterBuilder};

use roster_model::FieldSchema;

use crate::error::{IngestError, Result};

/// Suggested file name for the downloadable template.
pub const TEMPLATE_FILE_NAME: &str = "participant_template.csv";

/// Render the header-only CSV template for `schema`, one column per field
/// label, in schema order.
pub fn template_csv(schema: &FieldSchema) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(schema.fields().iter().map(|field| field.label.as_str()))
        .map_err(|error| IngestError::Template(error.to_string()))?;
    let bytes = writer
        .into_inner()
        .map_err(|error| IngestError::Template(error.to_string()))?;
    String::from_utf8(bytes).map_err(|error| IngestError::Template(error.to_string()))
}
