use crate::wire::AnalysisRequest;

/// Locally computed assessment shown when the analysis endpoint fails.
pub fn fallback_assessment(request: &AnalysisRequest) -> String {
    let data = &request.data;
    let participants = plural(data.participant_count, "participant", "participants");
    let columns = plural(data.headers.len(), "column", "columns");
    let mut text = format!("Local assessment: {participants} across {columns}.");

    let mapped = data.mapping.mapped_count();
    let total = data.mapping.len();
    let unmapped: Vec<&str> = data.mapping.unmapped_fields().collect();
    if unmapped.is_empty() {
        text.push_str(&format!(" All {total} fields are mapped."));
    } else {
        text.push_str(&format!(
            " {mapped} of {total} fields are mapped; review the mapping for: {}.",
            unmapped.join(", ")
        ));
    }
    if data.participant_count == 0 {
        text.push_str(" The upload has no data rows; check that the file has content below the header.");
    }
    text
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}
