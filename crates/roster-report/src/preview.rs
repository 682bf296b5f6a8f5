use serde::Serialize;

use roster_model::MappedParticipant;

/// Maximum number of records shown in a preview.
pub const PREVIEW_LIMIT: usize = 10;

/// The leading records of an import, plus the total they were taken from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Preview {
    pub rows: Vec<MappedParticipant>,
    pub total: usize,
}

impl Preview {
    /// Take at most `limit` records from `participants`.
    ///
    /// Returns `None` when there are no records, so no preview is shown.
    pub fn build(participants: &[MappedParticipant], limit: usize) -> Option<Self> {
        if participants.is_empty() {
            return None;
        }
        let shown = participants.len().min(limit);
        Some(Self {
            rows: participants[..shown].to_vec(),
            total: participants.len(),
        })
    }

    pub fn shown(&self) -> usize {
        self.rows.len()
    }

    pub fn is_truncated(&self) -> bool {
        self.total > self.rows.len()
    }

    /// Truncation notice, present only when records were left out.
    pub fn indicator(&self) -> Option<String> {
        self.is_truncated()
            .then(|| format!("Showing first {} of {}", self.shown(), self.total))
    }
}
