mod controllers;
mod core;
mod presenters;
mod storage;

#[cfg(test)]
mod test_support;

pub use crate::controllers::cli::config::{CliConfig, Command, OutputFormat};
pub use crate::controllers::cli::controller::CliController;
pub use crate::controllers::dispatch::{
    DispatchError, DispatchOptions, Dispatcher, PendingResult, dispatch_batch, dispatch_request,
};
pub use crate::controllers::ports::presenter::{PresenterPort, ResultView};
pub use crate::controllers::sweep::SweepOrchestrator;
pub use crate::controllers::worker::{
    ProgressSink, RequestId, ResultSink, WorkerChannel, WorkerError, WorkerOptions, WorkerOutcome,
    WorkerState,
};
pub use crate::core::actions::cancellation::{CancelToken, CancellationToken, Cancelled, NeverCancel};
pub use crate::core::data::compute_request::{ComputeRequest, RequestKind};
pub use crate::core::data::compute_response::ComputeResponse;
pub use crate::core::data::niter::NiterError;
pub use crate::core::data::sweep_point::SweepPoint;
pub use crate::core::data::sweep_range::{RangeError, SweepRange};
pub use crate::core::data::sweep_series::{SeriesError, SweepSeries};
pub use crate::core::kernel::errors::{KernelError, ModuleLoadError};
pub use crate::core::kernel::monte_carlo::{MonteCarloLoader, MonteCarloCalculator, MonteCarloModule};
pub use crate::core::kernel::ports::{Calculator, KernelLoader, KernelModule};
pub use crate::core::protocol::codec::{
    decode_request, decode_response, encode_error, encode_request, encode_response,
};
pub use crate::core::protocol::errors::ProtocolError;
pub use crate::presenters::json::JsonPresenter;
pub use crate::presenters::text::TextPresenter;
pub use crate::storage::write_series_csv::write_series_csv;
