use std::fs;

use proptest::prelude::*;

use roster_ingest::{
    IngestError, IngestLimits, UploadFile, ingest_upload, parse_csv_text, sha256_hex,
};

fn csv_upload(text: &str) -> UploadFile {
    UploadFile::new("participants.csv", Some("text/csv"), text.as_bytes().to_vec())
}

#[test]
fn reads_participant_upload() {
    let file = csv_upload(
        "Name,Email,Phone\nJohn Doe,john@example.com,555-0100\nJane Smith,jane@example.com,555-0101",
    );
    let table = ingest_upload(&file, &IngestLimits::default()).expect("ingest");
    assert_eq!(table.headers, vec!["Name", "Email", "Phone"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[1].get("Name"), Some("Jane Smith"));
    assert_eq!(table.rows[1].get("Phone"), Some("555-0101"));
}

#[test]
fn quoted_cells_keep_delimiters_and_newlines() {
    let text = "Name,Notes\n\"Doe, John\",\"line one\nline two\"\nJane,\"says \"\"hi\"\"\"\n";
    let table = ingest_upload(&csv_upload(text), &IngestLimits::default()).expect("ingest");
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows[0].get("Name"), Some("Doe, John"));
    assert_eq!(table.rows[0].get("Notes"), Some("line one\nline two"));
    assert_eq!(table.rows[1].get("Notes"), Some("says \"hi\""));
}

#[test]
fn empty_upload_is_not_an_error() {
    let table = ingest_upload(&csv_upload(""), &IngestLimits::default()).expect("ingest");
    assert!(table.is_empty());
    assert_eq!(table.row_count(), 0);
}

#[test]
fn plain_text_upload_is_rejected_before_parsing() {
    // Not even valid UTF-8: rejection must happen on the media type alone.
    let file = UploadFile::new("notes.txt", Some("text/plain"), vec![0xff, 0xfe]);
    let err = ingest_upload(&file, &IngestLimits::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedMediaType { .. }));
}

#[test]
fn oversized_upload_is_rejected() {
    let limits = IngestLimits {
        max_bytes: 8,
        ..IngestLimits::default()
    };
    let err = ingest_upload(&csv_upload("Name\nSomeone Long\n"), &limits).unwrap_err();
    assert!(matches!(err, IngestError::TooLarge { size: 18, limit: 8 }));
}

#[test]
fn reads_upload_from_disk() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("roster.csv");
    fs::write(&path, "\u{feff}Name,Email\nAda,ada@example.com\n").expect("write file");

    let file = UploadFile::from_path(&path).expect("read upload");
    assert_eq!(file.file_name, "roster.csv");
    assert_eq!(file.effective_media_type().as_deref(), Some("text/csv"));
    assert_eq!(sha256_hex(&file.bytes).len(), 64);

    let table = ingest_upload(&file, &IngestLimits::default()).expect("ingest");
    assert_eq!(table.headers, vec!["Name", "Email"]);
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.csv");
    let err = UploadFile::from_path(&path).unwrap_err();
    assert!(matches!(err, IngestError::Io { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

fn table_strategy() -> impl Strategy<Value = (Vec<String>, Vec<Vec<String>>)> {
    (1usize..5).prop_flat_map(|width| {
        let headers = prop::collection::vec("[A-Z][a-z]{1,6}", width).prop_map(|names| {
            names
                .into_iter()
                .enumerate()
                .map(|(idx, name)| format!("{name}{idx}"))
                .collect::<Vec<_>>()
        });
        // A lone blank cell serialises as a whitespace-only line, which is
        // skipped, so single-column rows always carry a value.
        let first = if width == 1 { "[a-z0-9]{1,6}" } else { "[a-z0-9 ]{0,6}" };
        let row = (first, prop::collection::vec("[a-z0-9 ,\"\n]{0,8}", width - 1))
            .prop_map(|(first, rest)| {
                let mut cells = vec![first];
                cells.extend(rest);
                cells
            });
        (headers, prop::collection::vec(row, 0..30))
    })
}

proptest! {
    #[test]
    fn every_data_line_becomes_one_row((headers, rows) in table_strategy()) {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&headers).unwrap();
        for row in &rows {
            writer.write_record(row).unwrap();
        }
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let table = parse_csv_text(&text, &IngestLimits::default()).unwrap();
        prop_assert_eq!(&table.headers, &headers);
        prop_assert_eq!(table.rows.len(), rows.len());
        for (parsed, source) in table.rows.iter().zip(&rows) {
            prop_assert_eq!(parsed.get(&headers[0]), Some(source[0].trim()));
        }
    }
}
