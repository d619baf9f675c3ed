use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangeError {
    NegativeBound { field: &'static str, value: i64 },
    MinGreaterThanMax { min: i64, max: i64 },
    NonPositiveStep { step: i64 },
    NotInteger { field: &'static str, value: f64 },
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeBound { field, value } => {
                write!(f, "range {} must not be negative, got {}", field, value)
            }
            Self::MinGreaterThanMax { min, max } => {
                write!(f, "range min {} is greater than max {}", min, max)
            }
            Self::NonPositiveStep { step } => {
                write!(f, "range step must be greater than zero, got {}", step)
            }
            Self::NotInteger { field, value } => {
                write!(f, "range {} must be an integer, got {}", field, value)
            }
        }
    }
}

impl Error for RangeError {}

/// Inclusive, ascending range of iteration counts.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SweepRange {
    min: u64,
    max: u64,
    step: u64,
}

impl SweepRange {
    pub fn new(min: i64, max: i64, step: i64) -> Result<Self, RangeError> {
        if min < 0 {
            return Err(RangeError::NegativeBound { field: "min", value: min });
        }

        if max < 0 {
            return Err(RangeError::NegativeBound { field: "max", value: max });
        }

        if step <= 0 {
            return Err(RangeError::NonPositiveStep { step });
        }

        if min > max {
            return Err(RangeError::MinGreaterThanMax { min, max });
        }

        Ok(Self {
            min: min as u64,
            max: max as u64,
            step: step as u64,
        })
    }

    #[must_use]
    pub fn min(&self) -> u64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> u64 {
        self.max
    }

    #[must_use]
    pub fn step(&self) -> u64 {
        self.step
    }

    /// Number of points the sweep produces: `floor((max - min) / step) + 1`,
    /// saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        usize::try_from(self.point_count()).unwrap_or(usize::MAX)
    }

    /// Exact point count, independent of the platform's pointer width.
    #[must_use]
    pub fn point_count(&self) -> u64 {
        (self.max - self.min) / self.step + 1
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[must_use]
    pub fn iter(&self) -> SweepRangeIter {
        SweepRangeIter {
            next: Some(self.min),
            max: self.max,
            step: self.step,
        }
    }
}

impl IntoIterator for &SweepRange {
    type Item = u64;
    type IntoIter = SweepRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Debug, Clone)]
pub struct SweepRangeIter {
    next: Option<u64>,
    max: u64,
    step: u64,
}

impl Iterator for SweepRangeIter {
    type Item = u64;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;

        self.next = current
            .checked_add(self.step)
            .filter(|next| *next <= self.max);

        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_range_new_valid() {
        let range = SweepRange::new(100, 300, 100).unwrap();

        assert_eq!(range.min(), 100);
        assert_eq!(range.max(), 300);
        assert_eq!(range.step(), 100);
    }

    #[test]
    fn test_sweep_range_rejects_invalid_bounds() {
        assert_eq!(
            SweepRange::new(5, 4, 1),
            Err(RangeError::MinGreaterThanMax { min: 5, max: 4 })
        );
        assert_eq!(
            SweepRange::new(0, 10, 0),
            Err(RangeError::NonPositiveStep { step: 0 })
        );
        assert_eq!(
            SweepRange::new(0, 10, -2),
            Err(RangeError::NonPositiveStep { step: -2 })
        );
        assert_eq!(
            SweepRange::new(-1, 10, 1),
            Err(RangeError::NegativeBound { field: "min", value: -1 })
        );
        assert_eq!(
            SweepRange::new(0, -10, 1),
            Err(RangeError::NegativeBound { field: "max", value: -10 })
        );
    }

    #[test]
    fn test_degenerate_range_yields_single_point() {
        let range = SweepRange::new(0, 0, 1).unwrap();

        assert_eq!(range.len(), 1);
        assert_eq!(range.iter().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_range_iterates_inclusive_ascending() {
        let range = SweepRange::new(100_000_000, 300_000_000, 100_000_000).unwrap();

        assert_eq!(
            range.iter().collect::<Vec<_>>(),
            vec![100_000_000, 200_000_000, 300_000_000]
        );
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_range_len_matches_iteration_when_step_overshoots() {
        let range = SweepRange::new(3, 20, 7).unwrap();

        assert_eq!(range.iter().collect::<Vec<_>>(), vec![3, 10, 17]);
        assert_eq!(range.len(), 3);
    }

    #[test]
    fn test_range_iteration_does_not_overflow_near_max() {
        let max = i64::MAX;
        let range = SweepRange::new(max - 1, max, max).unwrap();

        assert_eq!(range.iter().collect::<Vec<_>>(), vec![(max - 1) as u64]);
        assert_eq!(range.len(), 1);
    }

    #[test]
    fn test_point_count_of_huge_range() {
        let range = SweepRange::new(0, 1_000_000_000_000_000, 1).unwrap();

        assert_eq!(range.point_count(), 1_000_000_000_000_001);
        assert_eq!(
            range.len(),
            usize::try_from(1_000_000_000_000_001u64).unwrap_or(usize::MAX)
        );

        let full = SweepRange::new(0, i64::MAX, 1).unwrap();
        assert_eq!(full.point_count(), i64::MAX as u64 + 1);
    }

    #[test]
    fn test_range_error_display() {
        assert_eq!(
            RangeError::MinGreaterThanMax { min: 5, max: 4 }.to_string(),
            "range min 5 is greater than max 4"
        );
        assert_eq!(
            RangeError::NotInteger { field: "step", value: 0.5 }.to_string(),
            "range step must be an integer, got 0.5"
        );
    }
}
