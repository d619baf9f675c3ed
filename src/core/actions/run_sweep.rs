use std::error::Error;
use std::fmt;
use std::time::Instant;

use crate::core::actions::calculate_pi::calculate_pi;
use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::data::sweep_point::SweepPoint;
use crate::core::data::sweep_range::SweepRange;
use crate::core::data::sweep_series::{SeriesError, SweepSeries};
use crate::core::kernel::errors::KernelError;
use crate::core::kernel::ports::KernelModule;

#[derive(Debug, Clone, PartialEq)]
pub enum SweepError {
    /// The point at `niter` failed; the rest of the range was not computed.
    Point { niter: u64, source: KernelError },
    Series(SeriesError),
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point { niter, source } => {
                write!(f, "sweep point niter {} failed: {}", niter, source)
            }
            Self::Series(e) => write!(f, "sweep series error: {}", e),
        }
    }
}

impl Error for SweepError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Point { source, .. } => Some(source),
            Self::Series(e) => Some(e),
        }
    }
}

impl From<SeriesError> for SweepError {
    fn from(value: SeriesError) -> Self {
        Self::Series(value)
    }
}

/// Upper bound on the series capacity reserved before the first point runs.
/// Larger sweeps grow the series as points complete.
pub const MAX_PREALLOCATED_POINTS: usize = 4096;

/// Computes every point of `range` in ascending order, one at a time.
///
/// Each point gets its own calculator and its own timing window; windows of
/// consecutive points never overlap. The first failing point aborts the sweep
/// and the points collected so far are dropped.
pub fn run_sweep<M, F>(
    module: &M,
    range: &SweepRange,
    cancel: &dyn CancelToken,
    mut on_point: F,
) -> Result<SweepSeries, SweepError>
where
    M: KernelModule,
    F: FnMut(&SweepPoint),
{
    let mut series = SweepSeries::with_capacity(range.len().min(MAX_PREALLOCATED_POINTS));
    let sweep_start = Instant::now();

    for niter in range {
        if cancel.is_cancelled() {
            return Err(SweepError::Point {
                niter,
                source: KernelError::Cancelled(Cancelled),
            });
        }

        let started = Instant::now();
        let pi = calculate_pi(module, niter, cancel)
            .map_err(|source| SweepError::Point { niter, source })?;
        let finished = Instant::now();

        let point = SweepPoint::from_window(
            niter,
            pi,
            started.duration_since(sweep_start),
            finished.duration_since(sweep_start),
        );

        series.push(point)?;
        on_point(&point);
    }

    Ok(series)
}
