use std::time::Duration;

use crate::controllers::worker::{DEFAULT_TERMINATION_GRACE, WorkerOptions};
use crate::core::actions::cancellation::CancellationToken;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Per-operation settings shared by the dispatcher and the sweep orchestrator.
#[derive(Debug, Clone)]
pub struct DispatchOptions {
    /// Measured from submission. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub cancel: Option<CancellationToken>,
    /// How long termination waits for an uncooperative kernel.
    pub termination_grace: Duration,
    /// Upper bound on how long a waiting caller goes without checking the
    /// deadline and the cancellation token.
    pub poll_interval: Duration,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            timeout: None,
            cancel: None,
            termination_grace: DEFAULT_TERMINATION_GRACE,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl DispatchOptions {
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_cancel_token(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    #[must_use]
    pub fn with_termination_grace(mut self, grace: Duration) -> Self {
        self.termination_grace = grace;
        self
    }

    pub(crate) fn worker_options(&self) -> WorkerOptions {
        WorkerOptions {
            termination_grace: self.termination_grace,
        }
    }
}
