//! Deterministic stand-in kernels for tests.

use std::f64::consts::PI;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::core::actions::cancellation::{CancelToken, Cancelled};
use crate::core::kernel::errors::{KernelError, ModuleLoadError};
use crate::core::kernel::ports::{Calculator, KernelLoader, KernelModule};

/// The value a stub calculator returns for `niter`: approaches π as `niter` grows.
pub fn stub_pi(niter: u64) -> f64 {
    PI + 1.0 / (niter as f64 + 1.0)
}

/// Shared counters observing what the worker did with a stub kernel.
#[derive(Debug, Default)]
pub struct KernelProbe {
    loads: AtomicUsize,
    modules_released: AtomicUsize,
    calculators_created: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    unblock: AtomicBool,
}

impl KernelProbe {
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn modules_released(&self) -> usize {
        self.modules_released.load(Ordering::SeqCst)
    }

    pub fn calculators_created(&self) -> usize {
        self.calculators_created.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_calculations(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    /// Lets calculators stuck in an uncancellable hang return.
    pub fn unblock(&self) {
        self.unblock.store(true, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Default)]
pub struct StubKernelLoader {
    probe: Arc<KernelProbe>,
    fail_load: bool,
    fail_at: Option<u64>,
    panic_at: Option<u64>,
    hang_at: Option<u64>,
    ignore_cancel: bool,
    delay: Duration,
}

impl StubKernelLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_load(mut self) -> Self {
        self.fail_load = true;
        self
    }

    pub fn failing_at(mut self, niter: u64) -> Self {
        self.fail_at = Some(niter);
        self
    }

    pub fn panicking_at(mut self, niter: u64) -> Self {
        self.panic_at = Some(niter);
        self
    }

    /// Never finishes calculating `niter` unless cancelled.
    pub fn hanging_at(mut self, niter: u64) -> Self {
        self.hang_at = Some(niter);
        self
    }

    /// Hanging calculators ignore cancellation until [`KernelProbe::unblock`].
    pub fn ignoring_cancel(mut self) -> Self {
        self.ignore_cancel = true;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn probe(&self) -> Arc<KernelProbe> {
        Arc::clone(&self.probe)
    }
}

impl KernelLoader for StubKernelLoader {
    type Module = StubModule;

    fn load(&self) -> Result<Self::Module, ModuleLoadError> {
        if self.fail_load {
            return Err(ModuleLoadError::new("stub artifact unavailable"));
        }

        self.probe.loads.fetch_add(1, Ordering::SeqCst);

        Ok(StubModule {
            config: self.clone(),
        })
    }
}

#[derive(Debug)]
pub struct StubModule {
    config: StubKernelLoader,
}

impl KernelModule for StubModule {
    type Calculator = StubCalculator;

    fn create_calculator(&self, niter: u64) -> Result<Self::Calculator, KernelError> {
        self.config
            .probe
            .calculators_created
            .fetch_add(1, Ordering::SeqCst);

        Ok(StubCalculator {
            niter,
            config: self.config.clone(),
        })
    }
}

impl Drop for StubModule {
    fn drop(&mut self) {
        self.config
            .probe
            .modules_released
            .fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug)]
pub struct StubCalculator {
    niter: u64,
    config: StubKernelLoader,
}

impl StubCalculator {
    fn run(&self, cancel: &dyn CancelToken) -> Result<f64, KernelError> {
        if cancel.is_cancelled() {
            return Err(KernelError::Cancelled(Cancelled));
        }

        if self.config.hang_at == Some(self.niter) {
            loop {
                if self.config.probe.unblock.load(Ordering::SeqCst) {
                    return Err(KernelError::Cancelled(Cancelled));
                }
                if !self.config.ignore_cancel && cancel.is_cancelled() {
                    return Err(KernelError::Cancelled(Cancelled));
                }
                thread::sleep(Duration::from_millis(1));
            }
        }

        if self.config.panic_at == Some(self.niter) {
            panic!("stub kernel crashed at niter {}", self.niter);
        }

        if self.config.fail_at == Some(self.niter) {
            return Err(KernelError::Calculation {
                niter: self.niter,
                message: "stub failure".to_string(),
            });
        }

        if !self.config.delay.is_zero() {
            thread::sleep(self.config.delay);
        }

        Ok(stub_pi(self.niter))
    }
}

impl Calculator for StubCalculator {
    fn niter(&self) -> u64 {
        self.niter
    }

    fn calculate_cancelable(self, cancel: &dyn CancelToken) -> Result<f64, KernelError> {
        let probe = &self.config.probe;
        let active = probe.active.fetch_add(1, Ordering::SeqCst) + 1;
        probe.max_active.fetch_max(active, Ordering::SeqCst);

        let result = self.run(cancel);

        probe.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Polls `condition` until it holds or `timeout` elapses.
pub fn wait_for(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    loop {
        if condition() {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
}
