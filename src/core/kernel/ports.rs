use crate::core::actions::cancellation::{CancelToken, NeverCancel};
use crate::core::kernel::errors::{KernelError, ModuleLoadError};

/// Produces a kernel module instance. Runs on the worker thread that will own
/// the module.
pub trait KernelLoader {
    type Module: KernelModule;

    fn load(&self) -> Result<Self::Module, ModuleLoadError>;
}

/// A loaded kernel. One instance serves any number of calculators.
pub trait KernelModule {
    type Calculator: Calculator;

    fn create_calculator(&self, niter: u64) -> Result<Self::Calculator, KernelError>;
}

/// Single-use computation bound to one iteration count.
pub trait Calculator {
    fn niter(&self) -> u64;

    /// Runs the computation, polling `cancel` while it iterates.
    fn calculate_cancelable(self, cancel: &dyn CancelToken) -> Result<f64, KernelError>;

    fn calculate(self) -> Result<f64, KernelError>
    where
        Self: Sized,
    {
        self.calculate_cancelable(&NeverCancel)
    }
}
