use roster_model::{
    ColumnMapping, MappedParticipant, MappingSuggestion, RawRow, ValidationReport,
};

/// Everything derived from one uploaded file.
///
/// Created when a file is accepted and replaced wholesale by the next one.
/// `participants` and `report` are re-derived whenever `mapping` changes.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub file_name: String,
    /// SHA-256 of the uploaded bytes, hex encoded.
    pub fingerprint: String,
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
    pub mapping: ColumnMapping,
    /// Auto-mapping proposals made at upload time.
    pub suggestions: Vec<MappingSuggestion>,
    pub participants: Vec<MappedParticipant>,
    pub report: ValidationReport,
}

impl UploadSession {
    pub fn record_count(&self) -> usize {
        self.participants.len()
    }

    /// True when the file had no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
