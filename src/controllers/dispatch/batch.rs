use log::info;
use rayon::prelude::*;

use crate::core::kernel::ports::KernelLoader;

use super::dispatcher::Dispatcher;
use super::errors::DispatchError;
use super::options::DispatchOptions;

/// Runs one independent dispatcher per entry of `niters` on rayon's pool.
/// Results come back in input order; a failure affects only its own entry.
pub fn dispatch_batch<L>(
    loader: &L,
    niters: &[i64],
    options: &DispatchOptions,
) -> Vec<Result<f64, DispatchError>>
where
    L: KernelLoader + Clone + Send + Sync + 'static,
{
    info!("dispatching batch of {} calculations", niters.len());

    niters
        .par_iter()
        .map(|&niter| Dispatcher::with_options(loader.clone(), options.clone()).dispatch(niter))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::data::niter::NiterError;
    use crate::test_support::{StubKernelLoader, stub_pi};
    use std::time::Duration;

    #[test]
    fn test_batch_preserves_input_order() {
        let niters = [50, 10, 40, 20, 30];

        let results = dispatch_batch(&StubKernelLoader::new(), &niters, &DispatchOptions::default());

        let values: Vec<f64> = results.into_iter().map(Result::unwrap).collect();
        let expected: Vec<f64> = niters.iter().map(|&n| stub_pi(n as u64)).collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_batch_uses_one_channel_per_entry() {
        let loader = StubKernelLoader::new().with_delay(Duration::from_millis(5));
        let probe = loader.probe();

        dispatch_batch(&loader, &[1, 2, 3, 4], &DispatchOptions::default());

        assert_eq!(probe.loads(), 4);
        assert_eq!(probe.modules_released(), 4);
    }

    #[test]
    fn test_batch_failures_are_isolated() {
        let loader = StubKernelLoader::new().failing_at(2);

        let results = dispatch_batch(&loader, &[1, 2, 0, 3], &DispatchOptions::default());

        assert_eq!(results[0], Ok(stub_pi(1)));
        assert_eq!(results[1].as_ref().unwrap_err().kind(), "KERNEL");
        assert_eq!(
            results[2],
            Err(DispatchError::InvalidParameter(NiterError::NotPositive { niter: 0 }))
        );
        assert_eq!(results[3], Ok(stub_pi(3)));
    }

    #[test]
    fn test_empty_batch() {
        let results = dispatch_batch(&StubKernelLoader::new(), &[], &DispatchOptions::default());
        assert!(results.is_empty());
    }
}
