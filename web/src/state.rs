//! Application state shared across handlers.

use async_trait::async_trait;
use eventadmin_core::codes::SpecialCodeManager;
use eventadmin_core::waiting_queue::{WaitingQueueManager, WaitingQueueStatusService};
use eventadmin_core::EventDirectory;
use std::sync::Arc;

/// Answers the readiness probe, typically by pinging the database.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// `true` when the backing services accept requests.
    async fn is_ready(&self) -> bool;
}

/// Probe for deployments without external dependencies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysReady;

#[async_trait]
impl ReadinessProbe for AlwaysReady {
    async fn is_ready(&self) -> bool {
        true
    }
}

/// Services used by the administrative handlers.
#[derive(Clone)]
pub struct AppState {
    /// Special-code lifecycle
    pub codes: SpecialCodeManager,
    /// Subscriber administration
    pub queue: WaitingQueueManager,
    /// Open/paused state
    pub status: WaitingQueueStatusService,
    /// Event lookups scoped to the caller
    pub events: EventDirectory,
    /// Readiness check
    pub readiness: Arc<dyn ReadinessProbe>,
}

impl AppState {
    /// Create the state.
    #[must_use]
    pub fn new(
        codes: SpecialCodeManager,
        queue: WaitingQueueManager,
        status: WaitingQueueStatusService,
        events: EventDirectory,
        readiness: Arc<dyn ReadinessProbe>,
    ) -> Self {
        Self {
            codes,
            queue,
            status,
            events,
            readiness,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        fn assert_clone<T: Clone + Send + Sync + 'static>() {}
        assert_clone::<AppState>();
    }
}
