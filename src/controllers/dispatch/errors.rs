use std::error::Error;
use std::fmt;
use std::time::Duration;

use crate::controllers::worker::{RequestId, WorkerError};
use crate::core::actions::run_sweep::SweepError;
use crate::core::data::compute_request::RequestKind;
use crate::core::data::niter::NiterError;
use crate::core::data::sweep_range::RangeError;
use crate::core::data::sweep_series::SeriesError;
use crate::core::kernel::errors::{KernelError, ModuleLoadError};

/// Every way a dispatched computation can fail. All of them end the
/// operation; none is retried.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchError {
    InvalidParameter(NiterError),
    InvalidRange(RangeError),
    ModuleLoad(ModuleLoadError),
    ProtocolViolation { outstanding: RequestId },
    ChannelClosed,
    SweepPoint { niter: u64, source: KernelError },
    Timeout { after: Duration },
    Cancelled,
    Kernel(KernelError),
    KernelPanicked { message: String },
    InvalidSeries(SeriesError),
    UnexpectedResponse {
        request_id: RequestId,
        expected: RequestKind,
        got_id: RequestId,
        got: RequestKind,
    },
}

impl DispatchError {
    /// Stable code used in `ERROR` wire messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::InvalidRange(_) => "INVALID_RANGE",
            Self::ModuleLoad(_) => "MODULE_LOAD",
            Self::ProtocolViolation { .. } => "PROTOCOL_VIOLATION",
            Self::ChannelClosed => "CHANNEL_CLOSED",
            Self::SweepPoint { .. } => "SWEEP_POINT",
            Self::Timeout { .. } => "TIMEOUT",
            Self::Cancelled => "CANCELLED",
            Self::Kernel(_) | Self::KernelPanicked { .. } => "KERNEL",
            Self::InvalidSeries(_) | Self::UnexpectedResponse { .. } => "UNEXPECTED_RESPONSE",
        }
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Self::InvalidRange(e) => write!(f, "invalid range: {}", e),
            Self::ModuleLoad(e) => write!(f, "{}", e),
            Self::ProtocolViolation { outstanding } => {
                write!(f, "protocol violation: request {} is still outstanding", outstanding)
            }
            Self::ChannelClosed => write!(f, "worker channel is closed"),
            Self::SweepPoint { niter, source } => {
                write!(f, "sweep failed at niter {}: {}", niter, source)
            }
            Self::Timeout { after } => write!(f, "no response within {:?}", after),
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::Kernel(e) => write!(f, "kernel error: {}", e),
            Self::KernelPanicked { message } => write!(f, "kernel panicked: {}", message),
            Self::InvalidSeries(e) => write!(f, "worker produced an invalid series: {}", e),
            Self::UnexpectedResponse {
                request_id,
                expected,
                got_id,
                got,
            } => write!(
                f,
                "response {} ({}) does not answer request {} ({})",
                got_id,
                got.name(),
                request_id,
                expected.name()
            ),
        }
    }
}

impl Error for DispatchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidParameter(e) => Some(e),
            Self::InvalidRange(e) => Some(e),
            Self::ModuleLoad(e) => Some(e),
            Self::SweepPoint { source, .. } => Some(source),
            Self::Kernel(e) => Some(e),
            Self::InvalidSeries(e) => Some(e),
            _ => None,
        }
    }
}

impl From<NiterError> for DispatchError {
    fn from(value: NiterError) -> Self {
        Self::InvalidParameter(value)
    }
}

impl From<RangeError> for DispatchError {
    fn from(value: RangeError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<WorkerError> for DispatchError {
    fn from(value: WorkerError) -> Self {
        match value {
            WorkerError::ProtocolViolation { outstanding } => Self::ProtocolViolation { outstanding },
            WorkerError::ChannelClosed => Self::ChannelClosed,
            WorkerError::ModuleLoad(e) => Self::ModuleLoad(e),
            WorkerError::Kernel(KernelError::Cancelled(_)) => Self::Cancelled,
            WorkerError::Kernel(e) => Self::Kernel(e),
            WorkerError::KernelPanicked { message } => Self::KernelPanicked { message },
            WorkerError::Sweep(SweepError::Point {
                source: KernelError::Cancelled(_),
                ..
            }) => Self::Cancelled,
            WorkerError::Sweep(SweepError::Point { niter, source }) => {
                Self::SweepPoint { niter, source }
            }
            WorkerError::Sweep(SweepError::Series(e)) => Self::InvalidSeries(e),
        }
    }
}
