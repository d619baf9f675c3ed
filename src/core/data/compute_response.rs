use crate::core::data::compute_request::RequestKind;
use crate::core::data::sweep_series::SweepSeries;

#[derive(Debug, Clone, PartialEq)]
pub enum ComputeResponse {
    Single { pi: f64 },
    Sweep { series: SweepSeries },
}

impl ComputeResponse {
    #[must_use]
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Single { .. } => RequestKind::Single,
            Self::Sweep { .. } => RequestKind::Sweep,
        }
    }
}
