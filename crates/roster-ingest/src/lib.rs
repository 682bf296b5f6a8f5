pub mod csv_table;
pub mod error;
pub mod hash;
pub mod template;
pub mod upload;

pub use csv_table::{CsvTable, ingest_upload, parse_csv_text};
pub use error::{IngestError, Result};
pub use hash::sha256_hex;
pub use template::{TEMPLATE_FILE_NAME, template_csv};
pub use upload::{
    ACCEPTED_MEDIA_TYPES, CSV_MEDIA_TYPE, IngestLimits, UploadFile, check_media_type,
    decode_text, infer_media_type, media_type_essence,
};
