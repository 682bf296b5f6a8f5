use roster_model::{ColumnMapping, FieldValue, MappedParticipant, RawRow};

/// Derive one participant record per raw row.
///
/// Values follow mapping (schema) order. Unmapped fields and blank cells
/// produce `None`. The output always has exactly `rows.len()` records.
pub fn apply_mapping(mapping: &ColumnMapping, rows: &[RawRow]) -> Vec<MappedParticipant> {
    rows.iter()
        .enumerate()
        .map(|(index, row)| {
            let values = mapping
                .iter()
                .map(|(field, column)| FieldValue {
                    field: field.to_string(),
                    value: column
                        .and_then(|column| row.get(column))
                        .map(str::trim)
                        .filter(|value| !value.is_empty())
                        .map(str::to_string),
                })
                .collect();
            MappedParticipant::new(index, values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use roster_model::FieldSchema;

    use super::*;

    #[test]
    fn applies_mapping_in_schema_order() {
        let headers = vec!["E".to_string(), "N".to_string()];
        let mut mapping = ColumnMapping::unset(&FieldSchema::default());
        mapping.assign("name", Some("N"), &headers).unwrap();
        mapping.assign("email", Some("E"), &headers).unwrap();
        let rows = vec![
            [("E", "a@b.co"), ("N", "Ada")].into_iter().collect::<RawRow>(),
            [("E", "  "), ("N", "Bo")].into_iter().collect::<RawRow>(),
        ];

        let records = apply_mapping(&mapping, &rows);
        assert_eq!(records.len(), 2);
        let fields: Vec<&str> = records[0].iter().map(|(field, _)| field).collect();
        assert_eq!(fields, vec!["name", "email", "phone"]);
        assert_eq!(records[0].get("name"), Some("Ada"));
        assert_eq!(records[0].get("email"), Some("a@b.co"));
        assert_eq!(records[1].get("email"), None);
        assert_eq!(records[1].get("phone"), None);
        assert_eq!(records[1].index, 1);
    }
}
