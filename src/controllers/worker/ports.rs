use crate::controllers::worker::RequestId;
use crate::controllers::worker::errors::WorkerError;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::data::sweep_point::SweepPoint;

pub type WorkerOutcome = Result<ComputeResponse, WorkerError>;

/// Receives the single outcome of every request sent on a channel.
/// Called on the worker thread.
pub trait ResultSink: Send + Sync {
    fn deliver(&self, request_id: RequestId, outcome: WorkerOutcome);
}

impl<F> ResultSink for F
where
    F: Fn(RequestId, WorkerOutcome) + Send + Sync,
{
    fn deliver(&self, request_id: RequestId, outcome: WorkerOutcome) {
        self(request_id, outcome)
    }
}

/// Receives sweep points as they complete, before the final result.
pub trait ProgressSink: Send + Sync {
    fn point_completed(&self, request_id: RequestId, point: &SweepPoint);
}

impl<F> ProgressSink for F
where
    F: Fn(RequestId, &SweepPoint) + Send + Sync,
{
    fn point_completed(&self, request_id: RequestId, point: &SweepPoint) {
        self(request_id, point)
    }
}
