use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::data::sweep_series::SweepSeries;

pub const CSV_HEADER: &str = "niter,pi,duration_ms,started_ms,finished_ms";

pub fn write_series_csv(series: &SweepSeries, filepath: impl AsRef<Path>) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(filepath)?);

    write_series(series, &mut file)?;
    file.flush()
}

/// One header line, then one row per point in sweep order.
pub fn write_series(series: &SweepSeries, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "{}", CSV_HEADER)?;

    for point in series {
        writeln!(
            out,
            "{},{},{},{},{}",
            point.niter, point.pi, point.duration_ms, point.started_ms, point.finished_ms
        )?;
    }

    Ok(())
}
