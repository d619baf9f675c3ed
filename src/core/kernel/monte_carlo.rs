use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::core::actions::cancellation::{CANCEL_CHECK_INTERVAL_ITERATIONS, CancelToken, Cancelled};
use crate::core::kernel::errors::{KernelError, ModuleLoadError};
use crate::core::kernel::ports::{Calculator, KernelLoader, KernelModule};

pub const SEED: u64 = 35_791_246;

/// Largest iteration count whose `f64` conversion is exact.
pub const MAX_NITER: u64 = 1 << 53;

#[derive(Debug, Clone, Copy)]
pub struct MonteCarloLoader {
    seed: u64,
}

impl MonteCarloLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(SEED)
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self { seed }
    }
}

impl Default for MonteCarloLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelLoader for MonteCarloLoader {
    type Module = MonteCarloModule;

    fn load(&self) -> Result<Self::Module, ModuleLoadError> {
        debug!("loading monte carlo kernel, seed {}", self.seed);

        Ok(MonteCarloModule { seed: self.seed })
    }
}

#[derive(Debug)]
pub struct MonteCarloModule {
    seed: u64,
}

impl KernelModule for MonteCarloModule {
    type Calculator = MonteCarloCalculator;

    fn create_calculator(&self, niter: u64) -> Result<Self::Calculator, KernelError> {
        if niter > MAX_NITER {
            return Err(KernelError::InvalidParameter { niter });
        }

        Ok(MonteCarloCalculator {
            niter,
            seed: self.seed,
        })
    }
}

/// Estimates π by sampling the unit square and counting hits inside the
/// quarter circle. Every calculator restarts from the module seed, so equal
/// `niter` values give equal results.
///
/// With `niter == 0` there are no samples and the estimate is `0.0` rather
/// than the NaN that `hits / niter * 4` would give, so a sweep starting at
/// zero still yields a plottable series.
#[derive(Debug)]
pub struct MonteCarloCalculator {
    niter: u64,
    seed: u64,
}

impl Calculator for MonteCarloCalculator {
    fn niter(&self) -> u64 {
        self.niter
    }

    fn calculate_cancelable(self, cancel: &dyn CancelToken) -> Result<f64, KernelError> {
        debug!("iterations: {}", self.niter);

        if self.niter == 0 {
            return Ok(0.0);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut hits: u64 = 0;

        for i in 0..self.niter {
            if i % CANCEL_CHECK_INTERVAL_ITERATIONS == 0 && cancel.is_cancelled() {
                return Err(KernelError::Cancelled(Cancelled));
            }

            let x: f64 = rng.random();
            let y: f64 = rng.random();

            if x * x + y * y <= 1.0 {
                hits += 1;
            }
        }

        Ok(hits as f64 / self.niter as f64 * 4.0)
    }
}
