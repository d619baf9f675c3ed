use std::error::Error;
use std::fmt;

use crate::core::data::sweep_point::SweepPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesError {
    OutOfOrder { previous: u64, niter: u64 },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfOrder { previous, niter } => {
                write!(
                    f,
                    "sweep point niter {} does not follow previous niter {}",
                    niter, previous
                )
            }
        }
    }
}

impl Error for SeriesError {}

/// Append-only sweep result series.
///
/// Insertion order, ascending `niter` order and emission order are the same.
/// Points are never deduplicated or reordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepSeries {
    points: Vec<SweepPoint>,
}

impl SweepSeries {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: SweepPoint) -> Result<(), SeriesError> {
        if let Some(last) = self.points.last() {
            if point.niter <= last.niter {
                return Err(SeriesError::OutOfOrder {
                    previous: last.niter,
                    niter: point.niter,
                });
            }
        }

        self.points.push(point);
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[SweepPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SweepPoint> {
        self.points.iter()
    }

    #[must_use]
    pub fn niters(&self) -> Vec<u64> {
        self.points.iter().map(|point| point.niter).collect()
    }

    #[must_use]
    pub fn into_points(self) -> Vec<SweepPoint> {
        self.points
    }
}

impl TryFrom<Vec<SweepPoint>> for SweepSeries {
    type Error = SeriesError;

    fn try_from(points: Vec<SweepPoint>) -> Result<Self, Self::Error> {
        let mut series = Self::with_capacity(points.len());

        for point in points {
            series.push(point)?;
        }

        Ok(series)
    }
}

impl<'a> IntoIterator for &'a SweepSeries {
    type Item = &'a SweepPoint;
    type IntoIter = std::slice::Iter<'a, SweepPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
