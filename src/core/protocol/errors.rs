use std::error::Error;
use std::fmt;

use crate::core::data::niter::NiterError;
use crate::core::data::sweep_range::RangeError;
use crate::core::data::sweep_series::SeriesError;

#[derive(Debug)]
pub enum ProtocolError {
    Malformed(serde_json::Error),
    UnexpectedType {
        expected: &'static str,
        got: &'static str,
    },
    InvalidParameter(NiterError),
    InvalidRange(RangeError),
    InvalidSeries(SeriesError),
    /// The peer answered with an `ERROR` message.
    Remote {
        kind: String,
        message: String,
    },
}

impl ProtocolError {
    /// Code reported in `ERROR` messages sent back to the peer.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Malformed(_) | Self::UnexpectedType { .. } => "MALFORMED",
            Self::InvalidParameter(_) => "INVALID_PARAMETER",
            Self::InvalidRange(_) => "INVALID_RANGE",
            Self::InvalidSeries(_) => "UNEXPECTED_RESPONSE",
            Self::Remote { .. } => "REMOTE",
        }
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed message: {}", e),
            Self::UnexpectedType { expected, got } => {
                write!(f, "expected {} message, got {}", expected, got)
            }
            Self::InvalidParameter(e) => write!(f, "invalid parameter: {}", e),
            Self::InvalidRange(e) => write!(f, "invalid range: {}", e),
            Self::InvalidSeries(e) => write!(f, "invalid series: {}", e),
            Self::Remote { kind, message } => write!(f, "{}: {}", kind, message),
        }
    }
}

impl Error for ProtocolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(e) => Some(e),
            Self::InvalidParameter(e) => Some(e),
            Self::InvalidRange(e) => Some(e),
            Self::InvalidSeries(e) => Some(e),
            Self::UnexpectedType { .. } | Self::Remote { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

impl From<NiterError> for ProtocolError {
    fn from(value: NiterError) -> Self {
        Self::InvalidParameter(value)
    }
}

impl From<RangeError> for ProtocolError {
    fn from(value: RangeError) -> Self {
        Self::InvalidRange(value)
    }
}

impl From<SeriesError> for ProtocolError {
    fn from(value: SeriesError) -> Self {
        Self::InvalidSeries(value)
    }
}
