use std::time::Duration;

/// One measurement of a sweep.
///
/// `started_ms` and `finished_ms` are offsets from the start of the sweep,
/// taken from the same monotonic clock as `duration_ms`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    pub niter: u64,
    pub pi: f64,
    pub duration_ms: f64,
    pub started_ms: f64,
    pub finished_ms: f64,
}

impl SweepPoint {
    #[must_use]
    pub fn from_window(niter: u64, pi: f64, started: Duration, finished: Duration) -> Self {
        let finished = finished.max(started);

        Self {
            niter,
            pi,
            duration_ms: duration_to_ms(finished - started),
            started_ms: duration_to_ms(started),
            finished_ms: duration_to_ms(finished),
        }
    }
}

#[must_use]
pub fn duration_to_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
