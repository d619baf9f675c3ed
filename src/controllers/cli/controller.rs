use std::error::Error;
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Instant;

use log::{info, warn};

use crate::controllers::dispatch::{
    DispatchError, DispatchOptions, Dispatcher, dispatch_batch, dispatch_request,
};
use crate::controllers::ports::presenter::{PresenterPort, ResultView};
use crate::controllers::sweep::SweepOrchestrator;
use crate::controllers::worker::RequestId;
use crate::core::data::sweep_point::SweepPoint;
use crate::core::kernel::ports::KernelLoader;
use crate::core::protocol::codec::{decode_request, encode_error, encode_response};
use crate::storage::write_series_csv::write_series_csv;

use super::config::Command;

/// Runs CLI commands against a kernel and hands every outcome to a presenter.
pub struct CliController<P: PresenterPort, L> {
    presenter: P,
    loader: L,
    options: DispatchOptions,
}

impl<P, L> CliController<P, L>
where
    P: PresenterPort,
    L: KernelLoader + Clone + Send + Sync + 'static,
{
    pub fn new(presenter: P, loader: L, options: DispatchOptions) -> Self {
        Self {
            presenter,
            loader,
            options,
        }
    }

    pub fn run(
        &self,
        command: &Command,
        input: &mut dyn BufRead,
        out: &mut dyn Write,
    ) -> Result<(), Box<dyn Error>> {
        match command {
            Command::Single { niters } => match niters.as_slice() {
                [niter] => self.single(*niter, out),
                _ => self.batch(niters, out),
            },
            Command::Sweep {
                min,
                max,
                step,
                csv,
            } => self.sweep(*min, *max, *step, csv.as_deref(), out),
            Command::Serve => self.serve(input, out),
        }
    }

    pub fn single(&self, niter: i64, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        self.presenter.present(
            &ResultView::InProgress {
                description: format!("pi with niter {}", niter),
            },
            out,
        )?;

        let start = Instant::now();
        let result = Dispatcher::with_options(self.loader.clone(), self.options.clone())
            .dispatch(niter);
        info!("single calculation finished in {:?}", start.elapsed());

        match result {
            Ok(pi) => {
                // Validated by the dispatcher, so the count is positive.
                let niter = niter.unsigned_abs();
                self.presenter.present(&ResultView::Pi { niter, pi }, out)?;
                Ok(())
            }
            Err(e) => self.fail(e, out),
        }
    }

    /// Runs one independent computation per entry in parallel and presents
    /// the results in input order. Reports the first failure after all of
    /// them are presented.
    pub fn batch(&self, niters: &[i64], out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        self.presenter.present(
            &ResultView::InProgress {
                description: format!("pi for {} iteration counts", niters.len()),
            },
            out,
        )?;

        let start = Instant::now();
        let results = dispatch_batch(&self.loader, niters, &self.options);
        info!("batch of {} finished in {:?}", niters.len(), start.elapsed());

        let mut first_error = None;
        for (&niter, result) in niters.iter().zip(results) {
            match result {
                Ok(pi) => {
                    let niter = niter.unsigned_abs();
                    self.presenter.present(&ResultView::Pi { niter, pi }, out)?;
                }
                Err(e) => {
                    self.presenter.present(&ResultView::failed(&e), out)?;
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn sweep(
        &self,
        min: i64,
        max: i64,
        step: i64,
        csv: Option<&Path>,
        out: &mut dyn Write,
    ) -> Result<(), Box<dyn Error>> {
        self.presenter.present(
            &ResultView::InProgress {
                description: format!("sweep from {} to {} step {}", min, max, step),
            },
            out,
        )?;

        let start = Instant::now();
        let result = SweepOrchestrator::with_options(self.loader.clone(), self.options.clone())
            .with_progress(|_: RequestId, point: &SweepPoint| {
                info!(
                    "niter {} -> pi {} in {:.3} ms",
                    point.niter, point.pi, point.duration_ms
                );
            })
            .run(min, max, step);
        info!("sweep finished in {:?}", start.elapsed());

        match result {
            Ok(series) => {
                if let Some(path) = csv {
                    write_series_csv(&series, path)?;
                    info!("wrote {} points to {}", series.len(), path.display());
                }
                self.presenter.present(&ResultView::Series(series), out)?;
                Ok(())
            }
            Err(e) => self.fail(e, out),
        }
    }

    /// Answers one `CALCULATE` message per input line until end of input.
    /// Failures are answered with an `ERROR` message and do not stop the loop.
    pub fn serve(&self, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        let mut served = 0usize;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let reply = match decode_request(&line) {
                Ok(request) => {
                    match dispatch_request(self.loader.clone(), request, &self.options) {
                        Ok(response) => encode_response(&response)?,
                        Err(e) => {
                            warn!("request failed: {}", e);
                            encode_error(e.kind(), &e.to_string())?
                        }
                    }
                }
                Err(e) => {
                    warn!("rejected request: {}", e);
                    encode_error(e.kind(), &e.to_string())?
                }
            };

            writeln!(out, "{}", reply)?;
            out.flush()?;
            served += 1;
        }

        info!("served {} requests", served);
        Ok(())
    }

    fn fail(&self, error: DispatchError, out: &mut dyn Write) -> Result<(), Box<dyn Error>> {
        self.presenter.present(&ResultView::failed(&error), out)?;
        Err(error.into())
    }
}
