use std::io::{self, Write};

use crate::controllers::dispatch::DispatchError;
use crate::core::data::sweep_series::SweepSeries;

/// What a front end shows for one computation.
#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    NotSubmitted,
    InProgress { description: String },
    Failed { kind: &'static str, reason: String },
    Pi { niter: u64, pi: f64 },
    Series(SweepSeries),
}

impl ResultView {
    #[must_use]
    pub fn failed(error: &DispatchError) -> Self {
        Self::Failed {
            kind: error.kind(),
            reason: error.to_string(),
        }
    }
}

impl From<&DispatchError> for ResultView {
    fn from(error: &DispatchError) -> Self {
        Self::failed(error)
    }
}

pub trait PresenterPort {
    fn present(&self, view: &ResultView, out: &mut dyn Write) -> io::Result<()>;
}
