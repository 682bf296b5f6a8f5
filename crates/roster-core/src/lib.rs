//! The participant import step.
//!
//! [`ImportStep`] owns the current upload session and the analysis panel
//! state. Every user action goes through it: uploading a file, changing a
//! field's column, clearing, and running the advisory analysis.

pub mod config;
pub mod error;
pub mod session;
pub mod step;

pub use config::{CONFIG_FILENAME, RosterConfig, config_path, load_config, resolve_config};
pub use error::{ConfigError, StepError};
pub use session::UploadSession;
pub use step::{AnalysisJob, AnalysisOutcome, AnalysisPanel, ImportReport, ImportStep, MappingRow, StepView};
