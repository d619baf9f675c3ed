use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::controllers::worker::{ProgressSink, RequestId, WorkerChannel, WorkerOutcome};
use crate::core::actions::cancellation::CancelToken;
use crate::core::data::compute_request::{ComputeRequest, RequestKind};
use crate::core::data::compute_response::ComputeResponse;
use crate::core::data::sweep_point::SweepPoint;
use crate::core::kernel::ports::KernelLoader;

use super::errors::DispatchError;
use super::options::DispatchOptions;

/// Extracts the caller-facing value from a response of the expected kind.
pub(crate) type Reconcile<T> = fn(ComputeResponse) -> Option<T>;

/// A computation in flight on its own worker channel.
///
/// The channel is terminated exactly once, as soon as the computation
/// resolves, times out or is cancelled. Dropping an unresolved handle
/// terminates it as well.
pub struct PendingResult<T> {
    channel: WorkerChannel,
    outcomes: Receiver<(RequestId, WorkerOutcome)>,
    request_id: RequestId,
    expected: RequestKind,
    reconcile: Reconcile<T>,
    options: DispatchOptions,
    deadline: Option<Instant>,
    resolved: bool,
}

impl<T> PendingResult<T> {
    #[must_use]
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Blocks until the computation resolves.
    pub fn wait(mut self) -> Result<T, DispatchError> {
        loop {
            if let Some(result) = self.poll(self.options.poll_interval) {
                return result;
            }
        }
    }

    /// Returns the result if it is available now, `None` otherwise.
    /// After it has returned `Some` once, every later call reports
    /// [`DispatchError::ChannelClosed`].
    pub fn try_wait(&mut self) -> Option<Result<T, DispatchError>> {
        self.poll(Duration::ZERO)
    }

    fn poll(&mut self, wait: Duration) -> Option<Result<T, DispatchError>> {
        if self.resolved {
            return Some(Err(DispatchError::ChannelClosed));
        }

        if self
            .options
            .cancel
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
        {
            debug!("request {} cancelled by caller", self.request_id);
            return Some(self.resolve(Err(DispatchError::Cancelled)));
        }

        let wait = match (self.deadline, self.options.timeout) {
            (Some(deadline), Some(after)) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    warn!("request {} timed out after {:?}", self.request_id, after);
                    return Some(self.resolve(Err(DispatchError::Timeout { after })));
                }
                wait.min(remaining)
            }
            _ => wait,
        };

        match self.outcomes.recv_timeout(wait) {
            Ok((request_id, outcome)) => {
                let result = self.reconcile_outcome(request_id, outcome);
                Some(self.resolve(result))
            }
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                Some(self.resolve(Err(DispatchError::ChannelClosed)))
            }
        }
    }

    fn reconcile_outcome(
        &self,
        request_id: RequestId,
        outcome: WorkerOutcome,
    ) -> Result<T, DispatchError> {
        let mismatch = |got: RequestKind| DispatchError::UnexpectedResponse {
            request_id: self.request_id,
            expected: self.expected,
            got_id: request_id,
            got,
        };

        if request_id != self.request_id {
            let got = outcome.as_ref().map_or(self.expected, |r| r.kind());
            return Err(mismatch(got));
        }

        let response = outcome?;
        let got = response.kind();
        if got != self.expected {
            return Err(mismatch(got));
        }

        (self.reconcile)(response).ok_or_else(|| mismatch(got))
    }

    fn resolve(&mut self, result: Result<T, DispatchError>) -> Result<T, DispatchError> {
        self.resolved = true;
        self.channel.terminate();

        match &result {
            Ok(_) => debug!("request {} resolved", self.request_id),
            Err(e) => debug!("request {} failed: {}", self.request_id, e),
        }

        result
    }
}

/// Spawns a channel for `loader`, sends `request` and hands back the handle.
/// Any failure before the request is accepted terminates the channel.
pub(crate) fn start<L, T>(
    loader: L,
    request: ComputeRequest,
    options: &DispatchOptions,
    progress: Option<Arc<dyn ProgressSink>>,
    reconcile: Reconcile<T>,
) -> Result<PendingResult<T>, DispatchError>
where
    L: KernelLoader + Send + 'static,
{
    let submitted_at = Instant::now();
    let mut channel = WorkerChannel::spawn_with_options(loader, options.worker_options());

    let (outcome_tx, outcomes) = mpsc::channel();
    channel.on_result(move |request_id: RequestId, outcome: WorkerOutcome| {
        // The handle may already be gone after a timeout.
        let _ = outcome_tx.send((request_id, outcome));
    });

    if let Some(sink) = progress {
        channel.on_progress(move |request_id: RequestId, point: &SweepPoint| {
            sink.point_completed(request_id, point);
        });
    }

    if request.kind() == RequestKind::Sweep {
        channel.preload()?;
    }

    let request_id = channel.send(request)?;

    Ok(PendingResult {
        channel,
        outcomes,
        request_id,
        expected: request.kind(),
        reconcile,
        options: options.clone(),
        deadline: options
            .timeout
            .and_then(|after| submitted_at.checked_add(after)),
        resolved: false,
    })
}
