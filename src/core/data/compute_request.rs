use crate::core::data::niter::{NiterError, positive_niter};
use crate::core::data::sweep_range::{RangeError, SweepRange};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Single,
    Sweep,
}

impl RequestKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Single => "SINGLE",
            Self::Sweep => "SWEEP",
        }
    }
}

/// A validated computation request.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ComputeRequest {
    Single { niter: u64 },
    Sweep { range: SweepRange },
}

impl ComputeRequest {
    pub fn single(niter: i64) -> Result<Self, NiterError> {
        Ok(Self::Single {
            niter: positive_niter(niter)?,
        })
    }

    pub fn sweep(min: i64, max: i64, step: i64) -> Result<Self, RangeError> {
        Ok(Self::Sweep {
            range: SweepRange::new(min, max, step)?,
        })
    }

    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Single { .. } => RequestKind::Single,
            Self::Sweep { .. } => RequestKind::Sweep,
        }
    }
}
