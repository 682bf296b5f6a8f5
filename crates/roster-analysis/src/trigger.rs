//! Single-flight guard for analysis requests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, warn};

use crate::client::AnalysisBackend;
use crate::error::{AnalysisError, Result};
use crate::wire::AnalysisRequest;

/// Shared flag allowing at most one outstanding analysis request.
///
/// Clones share the same flag, so a clone moved to a worker thread still
/// blocks triggers made through the original.
#[derive(Debug, Clone, Default)]
pub struct AnalysisTrigger {
    pending: Arc<AtomicBool>,
}

/// Marks a request as outstanding until dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    pending: Arc<AtomicBool>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl AnalysisTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    /// Claim the flag, or fail with [`AnalysisError::InFlight`] if it is taken.
    pub fn try_begin(&self) -> Result<InFlightGuard> {
        self.pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AnalysisError::InFlight)?;
        Ok(InFlightGuard {
            pending: Arc::clone(&self.pending),
        })
    }

    /// Send `request` through `backend` unless another request is pending.
    ///
    /// The flag is released when the call returns, fails, or panics.
    pub fn run<B>(&self, backend: &B, request: &AnalysisRequest) -> Result<String>
    where
        B: AnalysisBackend + ?Sized,
    {
        let _guard = self.try_begin().inspect_err(|_| {
            debug!("analysis already in progress, ignoring trigger");
        })?;
        backend.analyze(request).inspect_err(|error| {
            warn!(%error, "analysis failed");
        })
    }
}
