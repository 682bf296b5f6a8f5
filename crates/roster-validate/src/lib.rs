//! Record validation for mapped roster uploads.
//!
//! A [`RuleSet`] is compiled once from the active field schema and then
//! applied to every mapped record. Bad values become issues on the report;
//! validation itself only fails when the schema carries an unusable pattern.

pub mod checks;
pub mod error;
pub mod rules;
pub mod validator;

pub use checks::{is_valid_date, is_valid_email, is_valid_phone, parse_number};
pub use error::{Result, ValidationError};
pub use rules::{FieldRule, RuleSet};
pub use validator::validate;
