use proptest::prelude::*;

use roster_map::{MappingEngine, apply_mapping};
use roster_model::{ColumnMapping, FieldSchema, MatchKind, RawRow};

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

#[test]
fn participant_headers_map_onto_default_fields() {
    let result = MappingEngine::new(FieldSchema::default()).suggest(&headers(&[
        "Name", "Email", "Phone",
    ]));
    assert_eq!(result.mapping.get("name"), Some("Name"));
    assert_eq!(result.mapping.get("email"), Some("Email"));
    assert_eq!(result.mapping.get("phone"), Some("Phone"));
}

#[test]
fn missing_phone_column_leaves_phone_unset() {
    let result = MappingEngine::new(FieldSchema::default()).suggest(&headers(&["Name", "Email"]));
    assert_eq!(result.mapping.get("phone"), None);
    assert_eq!(result.mapping.mapped_count(), 2);
    assert!(result.suggestion_for("phone").is_none());
}

#[test]
fn alias_headers_are_recognised() {
    let result = MappingEngine::new(FieldSchema::default()).suggest(&headers(&[
        "Full Name",
        "E-mail Address",
        "Mobile",
    ]));
    assert_eq!(result.mapping.get("name"), Some("Full Name"));
    assert_eq!(result.mapping.get("email"), Some("E-mail Address"));
    assert_eq!(result.mapping.get("phone"), Some("Mobile"));
    assert!(
        result
            .suggestions
            .iter()
            .all(|suggestion| suggestion.kind == MatchKind::Alias)
    );
}

#[test]
fn applying_a_mapping_preserves_record_count() {
    let columns = headers(&["Name", "Email"]);
    let mapping = MappingEngine::new(FieldSchema::default())
        .suggest(&columns)
        .mapping;
    let rows: Vec<RawRow> = (0..7)
        .map(|idx| {
            [("Name", format!("P{idx}")), ("Email", String::new())]
                .into_iter()
                .collect()
        })
        .collect();
    let records = apply_mapping(&mapping, &rows);
    assert_eq!(records.len(), rows.len());
    assert_eq!(records[6].get("name"), Some("P6"));
}

proptest! {
    #[test]
    fn reassigning_one_field_leaves_others_alone(
        initial in prop::collection::vec(prop::option::of(0usize..4), 3),
        field_idx in 0usize..3,
        choice in prop::option::of(0usize..4),
    ) {
        let schema = FieldSchema::default();
        let columns = headers(&["A", "B", "C", "D"]);
        let ids: Vec<String> = schema.ids().map(str::to_string).collect();

        let mut mapping = ColumnMapping::unset(&schema);
        for (id, column) in ids.iter().zip(&initial) {
            let column = column.map(|idx| columns[idx].as_str());
            mapping.assign(id, column, &columns).unwrap();
        }
        let before = mapping.clone();

        let target = &ids[field_idx];
        let column = choice.map(|idx| columns[idx].as_str());
        mapping.assign(target, column, &columns).unwrap();

        prop_assert_eq!(mapping.get(target), column);
        for id in ids.iter().filter(|id| *id != target) {
            prop_assert_eq!(mapping.get(id), before.get(id));
        }
    }
}
