//! Preview and summary rendering for roster imports.

pub mod preview;
pub mod tables;

pub use preview::{PREVIEW_LIMIT, Preview};
pub use tables::{
    apply_table_style, issue_table, mapping_table, preview_table, summary_table, warning_table,
};
