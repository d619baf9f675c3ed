use std::error::Error;
use std::fmt;

use crate::core::actions::cancellation::Cancelled;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLoadError {
    message: String,
}

impl ModuleLoadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ModuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kernel module failed to load: {}", self.message)
    }
}

impl Error for ModuleLoadError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    InvalidParameter { niter: u64 },
    Calculation { niter: u64, message: String },
    Cancelled(Cancelled),
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { niter } => {
                write!(f, "kernel rejected iteration count {}", niter)
            }
            Self::Calculation { niter, message } => {
                write!(f, "calculation with niter {} failed: {}", niter, message)
            }
            Self::Cancelled(c) => write!(f, "{}", c),
        }
    }
}

impl Error for KernelError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Cancelled(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Cancelled> for KernelError {
    fn from(value: Cancelled) -> Self {
        Self::Cancelled(value)
    }
}
