//! Core state and logic of the Showcase service.
//!
//! [`Showcase`] owns the retry and operation registries; the operation registry
//! reads time from an injected [`Clock`]. The gRPC crate routes every RPC onto
//! it or onto the stateless helpers in [`echo`] and [`pagination`].

use std::sync::Arc;

pub mod clock;
pub mod config;
pub mod echo;
pub mod error;
pub mod operation;
pub mod pagination;
pub mod retry;
pub mod status;
pub mod telemetry;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::ShowcaseConfig;
pub use error::ShowcaseError;
pub use operation::{
    OperationOutcome, OperationRegistry, OperationSnapshot, OperationSpec, OperationState,
};
pub use pagination::{Page, PageRequest};
pub use retry::RetryRegistry;
pub use status::{Code, StatusSpec};

// Re-export logging macros for consistent usage across the crate
pub use log::{debug, error, info, trace, warn};

// =============================================================================
// SERVICE STATE
// =============================================================================

/// In-memory state of one Showcase service instance.
///
/// Instances are fully independent; nothing is shared between them and nothing
/// survives a restart.
pub struct Showcase {
    config: ShowcaseConfig,
    retries: RetryRegistry,
    operations: OperationRegistry,
}

impl Default for Showcase {
    fn default() -> Self {
        Self::new()
    }
}

impl Showcase {
    pub fn new() -> Self {
        Self::with_config(ShowcaseConfig::default())
    }

    pub fn with_config(config: ShowcaseConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: ShowcaseConfig, clock: Arc<dyn Clock>) -> Self {
        Showcase {
            config,
            operations: OperationRegistry::new(clock),
            retries: RetryRegistry::new(),
        }
    }

    pub fn config(&self) -> &ShowcaseConfig {
        &self.config
    }

    // -------------------------------------------------------------------------
    // Retry
    // -------------------------------------------------------------------------

    pub fn setup_retry(&self, responses: Vec<StatusSpec>) -> String {
        self.retries.setup(responses)
    }

    pub fn retry(&self, id: &str) -> Result<(), ShowcaseError> {
        self.retries.next(id)
    }

    // -------------------------------------------------------------------------
    // Long-running operations
    // -------------------------------------------------------------------------

    pub fn start_operation(&self, spec: OperationSpec) -> OperationSnapshot {
        self.operations.start(spec)
    }

    pub fn get_operation(&self, name: &str) -> Result<OperationSnapshot, ShowcaseError> {
        self.operations.get(name)
    }

    pub fn list_operations(
        &self,
        page_size: i32,
        page_token: &str,
    ) -> Result<(Vec<OperationSnapshot>, String), ShowcaseError> {
        self.operations.list(page_size, page_token)
    }

    pub fn cancel_operation(&self, name: &str) -> Result<OperationSnapshot, ShowcaseError> {
        self.operations.cancel(name)
    }

    pub fn delete_operation(&self, name: &str) -> Result<(), ShowcaseError> {
        self.operations.delete(name)
    }

    // -------------------------------------------------------------------------
    // Pagination
    // -------------------------------------------------------------------------

    pub fn paginate(&self, request: &PageRequest) -> Result<Page, ShowcaseError> {
        pagination::paginate(request, self.config.default_page_size)
    }
}
