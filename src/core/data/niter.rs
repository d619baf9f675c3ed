use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NiterError {
    NotPositive { niter: i64 },
    NotInteger { value: f64 },
}

impl fmt::Display for NiterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotPositive { niter } => {
                write!(f, "niter must be a positive integer, got {}", niter)
            }
            Self::NotInteger { value } => {
                write!(f, "niter must be an integer, got {}", value)
            }
        }
    }
}

impl Error for NiterError {}

/// Validates an iteration count for a single computation.
pub fn positive_niter(niter: i64) -> Result<u64, NiterError> {
    if niter <= 0 {
        return Err(NiterError::NotPositive { niter });
    }

    Ok(niter as u64)
}

/// Converts a JSON-style number to an integer when it carries no fractional part.
///
/// Browser forms submit plain numbers, so `5e8` arrives as a float but still
/// names a whole iteration count.
#[must_use]
pub fn integral_value(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }

    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }

    Some(value as i64)
}
