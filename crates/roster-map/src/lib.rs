#![deny(unsafe_code)]

//! Auto-mapping of uploaded columns onto canonical participant fields.

mod apply;
mod engine;
mod utils;

pub use apply::apply_mapping;
pub use engine::{DEFAULT_MIN_SIMILARITY, MappingEngine, MappingResult};
pub use utils::{compact_text, normalize_text, token_set};
