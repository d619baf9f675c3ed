use std::error::Error;
use std::fmt;

use crate::core::actions::run_sweep::SweepError;
use crate::core::kernel::errors::{KernelError, ModuleLoadError};

use super::RequestId;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerError {
    /// A request was sent while `outstanding` had not been answered yet.
    ProtocolViolation { outstanding: RequestId },
    ChannelClosed,
    ModuleLoad(ModuleLoadError),
    Kernel(KernelError),
    KernelPanicked { message: String },
    Sweep(SweepError),
}

impl fmt::Display for WorkerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProtocolViolation { outstanding } => {
                write!(
                    f,
                    "request {} is still outstanding on this channel",
                    outstanding
                )
            }
            Self::ChannelClosed => write!(f, "worker channel is closed"),
            Self::ModuleLoad(e) => write!(f, "{}", e),
            Self::Kernel(e) => write!(f, "kernel error: {}", e),
            Self::KernelPanicked { message } => write!(f, "kernel panicked: {}", message),
            Self::Sweep(e) => write!(f, "{}", e),
        }
    }
}

impl Error for WorkerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ModuleLoad(e) => Some(e),
            Self::Kernel(e) => Some(e),
            Self::Sweep(e) => Some(e),
            Self::ProtocolViolation { .. } | Self::ChannelClosed | Self::KernelPanicked { .. } => {
                None
            }
        }
    }
}
