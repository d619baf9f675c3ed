use std::io::{self, Write};

use crate::controllers::ports::presenter::{PresenterPort, ResultView};

/// Human-readable output, one line per value and a table for sweeps.
#[derive(Debug, Default)]
pub struct TextPresenter {}

impl TextPresenter {
    pub fn new() -> Self {
        Self {}
    }
}

impl PresenterPort for TextPresenter {
    fn present(&self, view: &ResultView, out: &mut dyn Write) -> io::Result<()> {
        match view {
            ResultView::NotSubmitted => writeln!(out, "Not submitted"),
            ResultView::InProgress { description } => writeln!(out, "Calculating {}...", description),
            ResultView::Failed { kind, reason } => writeln!(out, "Error [{}]: {}", kind, reason),
            ResultView::Pi { niter, pi } => {
                writeln!(out, "niter = {}", niter)?;
                writeln!(out, "PI = {}", pi)
            }
            ResultView::Series(series) => {
                writeln!(out, "{:>14}  {:<20}  {:>14}", "niter", "pi", "duration (ms)")?;
                for point in series {
                    writeln!(
                        out,
                        "{:>14}  {:<20}  {:>14.3}",
                        point.niter, point.pi, point.duration_ms
                    )?;
                }
                Ok(())
            }
        }
    }
}
