use std::sync::Arc;

use log::info;

use crate::controllers::dispatch::{DispatchError, DispatchOptions, PendingResult, start};
use crate::controllers::worker::ProgressSink;
use crate::core::data::compute_request::ComputeRequest;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::data::sweep_range::SweepRange;
use crate::core::data::sweep_series::SweepSeries;
use crate::core::kernel::ports::KernelLoader;

/// Runs one sweep on a dedicated channel whose module is loaded once and
/// reused for every point.
pub struct SweepOrchestrator<L> {
    loader: Option<L>,
    options: DispatchOptions,
    progress: Option<Arc<dyn ProgressSink>>,
}

impl<L> SweepOrchestrator<L>
where
    L: KernelLoader + Send + 'static,
{
    pub fn new(loader: L) -> Self {
        Self::with_options(loader, DispatchOptions::default())
    }

    pub fn with_options(loader: L, options: DispatchOptions) -> Self {
        Self {
            loader: Some(loader),
            options,
            progress: None,
        }
    }

    /// Reports each point as soon as it completes.
    #[must_use]
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Some(Arc::new(sink));
        self
    }

    pub fn submit(
        &mut self,
        min: i64,
        max: i64,
        step: i64,
    ) -> Result<PendingResult<SweepSeries>, DispatchError> {
        let range = SweepRange::new(min, max, step)?;
        self.submit_range(range)
    }

    pub fn submit_range(
        &mut self,
        range: SweepRange,
    ) -> Result<PendingResult<SweepSeries>, DispatchError> {
        let loader = self.loader.take().ok_or(DispatchError::ChannelClosed)?;

        info!(
            "starting sweep of {} points from {} to {} step {}",
            range.len(),
            range.min(),
            range.max(),
            range.step()
        );

        start(
            loader,
            ComputeRequest::Sweep { range },
            &self.options,
            self.progress.clone(),
            sweep_series,
        )
    }

    pub fn run(&mut self, min: i64, max: i64, step: i64) -> Result<SweepSeries, DispatchError> {
        self.submit(min, max, step)?.wait()
    }
}

fn sweep_series(response: ComputeResponse) -> Option<SweepSeries> {
    match response {
        ComputeResponse::Sweep { series } => Some(series),
        ComputeResponse::Single { .. } => None,
    }
}
