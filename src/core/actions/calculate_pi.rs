use crate::core::actions::cancellation::CancelToken;
use crate::core::kernel::errors::KernelError;
use crate::core::kernel::ports::{Calculator, KernelModule};

/// Creates a fresh calculator for `niter` and runs it to completion.
pub fn calculate_pi<M: KernelModule>(
    module: &M,
    niter: u64,
    cancel: &dyn CancelToken,
) -> Result<f64, KernelError> {
    let calculator = module.create_calculator(niter)?;

    calculator.calculate_cancelable(cancel)
}
