use log::info;

use crate::core::data::compute_request::ComputeRequest;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::kernel::ports::KernelLoader;

use super::errors::DispatchError;
use super::options::DispatchOptions;
use super::pending::{PendingResult, start};

/// Computes one π estimate on a dedicated worker channel.
///
/// A dispatcher drives exactly one computation; its channel lives from
/// `submit` until the result resolves. Later submissions fail with
/// [`DispatchError::ChannelClosed`].
pub struct Dispatcher<L> {
    loader: Option<L>,
    options: DispatchOptions,
}

impl<L> Dispatcher<L>
where
    L: KernelLoader + Send + 'static,
{
    pub fn new(loader: L) -> Self {
        Self::with_options(loader, DispatchOptions::default())
    }

    pub fn with_options(loader: L, options: DispatchOptions) -> Self {
        Self {
            loader: Some(loader),
            options,
        }
    }

    /// Validates `niter` and starts the computation. An invalid count is
    /// rejected before any worker is spawned and leaves the dispatcher usable.
    pub fn submit(&mut self, niter: i64) -> Result<PendingResult<f64>, DispatchError> {
        let request = ComputeRequest::single(niter)?;
        let loader = self.loader.take().ok_or(DispatchError::ChannelClosed)?;

        info!("dispatching pi calculation with niter {}", niter);

        start(loader, request, &self.options, None, single_pi)
    }

    pub fn dispatch(&mut self, niter: i64) -> Result<f64, DispatchError> {
        self.submit(niter)?.wait()
    }
}

fn single_pi(response: ComputeResponse) -> Option<f64> {
    match response {
        ComputeResponse::Single { pi } => Some(pi),
        ComputeResponse::Sweep { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::actions::cancellation::CancellationToken;
    use crate::core::data::niter::NiterError;
    use crate::core::kernel::errors::KernelError;
    use crate::core::kernel::monte_carlo::MonteCarloLoader;
    use crate::test_support::{StubKernelLoader, stub_pi};
    use std::f64::consts::PI;
    use std::thread;
    use std::time::{Duration, Instant};

    #[test]
    fn test_dispatch_returns_kernel_value() {
        let loader = StubKernelLoader::new();
        let probe = loader.probe();

        let pi = Dispatcher::new(loader).dispatch(500_000_000).unwrap();

        assert_eq!(pi, stub_pi(500_000_000));
        assert_eq!(probe.loads(), 1);
        assert_eq!(probe.calculators_created(), 1);
        assert_eq!(probe.modules_released(), 1);
    }

    #[test]
    fn test_dispatch_with_monte_carlo_kernel() {
        let pi = Dispatcher::new(MonteCarloLoader::new())
            .dispatch(200_000)
            .unwrap();

        assert!((pi - PI).abs() < 0.05, "estimate {} too far from pi", pi);
    }

    #[test]
    fn test_repeated_dispatches_are_deterministic() {
        let first = Dispatcher::new(MonteCarloLoader::new())
            .dispatch(10_000)
            .unwrap();
        let second = Dispatcher::new(MonteCarloLoader::new())
            .dispatch(10_000)
            .unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_niter_is_rejected_before_spawn() {
        let loader = StubKernelLoader::new();
        let probe = loader.probe();
        let mut dispatcher = Dispatcher::new(loader);

        assert_eq!(
            dispatcher.dispatch(0).unwrap_err(),
            DispatchError::InvalidParameter(NiterError::NotPositive { niter: 0 })
        );
        assert_eq!(
            dispatcher.dispatch(-5).unwrap_err(),
            DispatchError::InvalidParameter(NiterError::NotPositive { niter: -5 })
        );
        assert_eq!(probe.loads(), 0);

        // Still usable after a rejected request.
        assert_eq!(dispatcher.dispatch(10).unwrap(), stub_pi(10));
    }

    #[test]
    fn test_second_use_reports_channel_closed() {
        let mut dispatcher = Dispatcher::new(StubKernelLoader::new());

        dispatcher.dispatch(10).unwrap();

        assert_eq!(
            dispatcher.dispatch(10).unwrap_err(),
            DispatchError::ChannelClosed
        );
    }

    #[test]
    fn test_module_load_failure_is_reported() {
        let loader = StubKernelLoader::new().failing_load();
        let probe = loader.probe();

        let err = Dispatcher::new(loader).dispatch(10).unwrap_err();

        assert!(matches!(err, DispatchError::ModuleLoad(_)));
        assert_eq!(err.kind(), "MODULE_LOAD");
        assert_eq!(probe.loads(), 0);
        assert_eq!(probe.modules_released(), 0);
    }

    #[test]
    fn test_kernel_failure_is_reported_and_module_released() {
        let loader = StubKernelLoader::new().failing_at(42);
        let probe = loader.probe();

        let err = Dispatcher::new(loader).dispatch(42).unwrap_err();

        assert_eq!(
            err,
            DispatchError::Kernel(KernelError::Calculation {
                niter: 42,
                message: "stub failure".to_string(),
            })
        );
        assert_eq!(probe.modules_released(), 1);
    }

    #[test]
    fn test_kernel_panic_becomes_error() {
        let err = Dispatcher::new(StubKernelLoader::new().panicking_at(9))
            .dispatch(9)
            .unwrap_err();

        assert!(
            matches!(&err, DispatchError::KernelPanicked { message } if message.contains("niter 9"))
        );
    }

    #[test]
    fn test_timeout_terminates_channel() {
        let loader = StubKernelLoader::new().hanging_at(7);
        let probe = loader.probe();
        let options = DispatchOptions::default().with_timeout(Duration::from_millis(50));

        let started = Instant::now();
        let err = Dispatcher::with_options(loader, options)
            .dispatch(7)
            .unwrap_err();

        assert_eq!(
            err,
            DispatchError::Timeout {
                after: Duration::from_millis(50)
            }
        );
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(probe.modules_released(), 1);
    }

    #[test]
    fn test_timeout_detaches_uncooperative_kernel() {
        let loader = StubKernelLoader::new().hanging_at(7).ignoring_cancel();
        let probe = loader.probe();
        let options = DispatchOptions::default()
            .with_timeout(Duration::from_millis(30))
            .with_termination_grace(Duration::from_millis(20));

        let started = Instant::now();
        let err = Dispatcher::with_options(loader, options)
            .dispatch(7)
            .unwrap_err();

        assert!(matches!(err, DispatchError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(2));

        probe.unblock();
    }

    #[test]
    fn test_cancel_token_resolves_with_cancelled() {
        let loader = StubKernelLoader::new().hanging_at(7);
        let probe = loader.probe();
        let token = CancellationToken::new();
        let options = DispatchOptions::default().with_cancel_token(token.clone());

        let canceller = thread::spawn(move || {
            thread::sleep(Duration::from_millis(30));
            token.cancel();
        });

        let err = Dispatcher::with_options(loader, options)
            .dispatch(7)
            .unwrap_err();
        canceller.join().unwrap();

        assert_eq!(err, DispatchError::Cancelled);
        assert_eq!(probe.modules_released(), 1);
    }

    #[test]
    fn test_already_cancelled_token_resolves_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        let options = DispatchOptions::default().with_cancel_token(token);

        let err = Dispatcher::with_options(StubKernelLoader::new().hanging_at(3), options)
            .dispatch(3)
            .unwrap_err();

        assert_eq!(err, DispatchError::Cancelled);
    }

    #[test]
    fn test_try_wait_polls_without_blocking() {
        let loader = StubKernelLoader::new().with_delay(Duration::from_millis(50));
        let mut pending = Dispatcher::new(loader).submit(11).unwrap();

        assert!(pending.try_wait().is_none());

        let deadline = Instant::now() + Duration::from_secs(5);
        let result = loop {
            if let Some(result) = pending.try_wait() {
                break result;
            }
            assert!(Instant::now() < deadline, "result never arrived");
            thread::sleep(Duration::from_millis(5));
        };

        assert_eq!(result.unwrap(), stub_pi(11));
        assert_eq!(
            pending.try_wait().unwrap().unwrap_err(),
            DispatchError::ChannelClosed
        );
    }

    #[test]
    fn test_dropping_pending_result_releases_module() {
        let loader = StubKernelLoader::new().hanging_at(5);
        let probe = loader.probe();

        let pending = Dispatcher::new(loader).submit(5).unwrap();
        assert_eq!(pending.request_id(), 1);
        drop(pending);

        assert_eq!(probe.modules_released(), probe.loads());
    }
}
