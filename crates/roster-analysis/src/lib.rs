//! Advisory analysis of an import through an external HTTP endpoint.
//!
//! The call never affects the import itself. Callers run it through an
//! [`AnalysisTrigger`], which refuses a second request while one is pending,
//! and show [`fallback_assessment`] text when it fails.

pub mod client;
pub mod error;
pub mod fallback;
pub mod trigger;
pub mod wire;

pub use client::{AnalysisBackend, AnalysisClient, AnalysisSettings};
pub use error::{AnalysisError, Result};
pub use fallback::fallback_assessment;
pub use trigger::{AnalysisTrigger, InFlightGuard};
pub use wire::{
    ANALYZE_ENDPOINT, AnalysisData, AnalysisRequest, AnalysisResponse, MappingPayload,
    SAMPLE_ROWS, WIZARD_STEP,
};
