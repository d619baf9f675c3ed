use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, warn};

use crate::controllers::worker::RequestId;
use crate::controllers::worker::errors::WorkerError;
use crate::controllers::worker::ports::{ProgressSink, ResultSink, WorkerOutcome};
use crate::controllers::worker::state::WorkerState;
use crate::core::actions::calculate_pi::calculate_pi;
use crate::core::actions::cancellation::CancelToken;
use crate::core::actions::run_sweep::run_sweep;
use crate::core::data::compute_request::ComputeRequest;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::kernel::errors::ModuleLoadError;
use crate::core::kernel::ports::{KernelLoader, KernelModule};

pub const DEFAULT_TERMINATION_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerOptions {
    /// How long `terminate` waits for the worker thread to acknowledge
    /// shutdown before detaching it.
    pub termination_grace: Duration,
}

impl Default for WorkerOptions {
    fn default() -> Self {
        Self {
            termination_grace: DEFAULT_TERMINATION_GRACE,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }

    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }

    "unknown panic".to_string()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Default)]
struct Inbox {
    request: Option<(RequestId, ComputeRequest)>,
    preload: bool,
}

enum Wake {
    Shutdown,
    Preload,
    Job(RequestId, ComputeRequest),
}

struct SharedState {
    inbox: Mutex<Inbox>,
    wake: Condvar,
    state: Mutex<WorkerState>,
    in_flight: AtomicBool,
    shutdown: AtomicBool,
    result_sink: Mutex<Option<Arc<dyn ResultSink>>>,
    progress_sink: Mutex<Option<Arc<dyn ProgressSink>>>,
}

impl SharedState {
    fn set_state(&self, state: WorkerState) {
        *lock(&self.state) = state;
    }
}

/// An isolated worker thread reachable only through messages.
///
/// The channel owns at most one kernel module, loaded lazily by the first
/// request or eagerly by [`WorkerChannel::preload`]. Only one request may be
/// outstanding at a time; its outcome goes to the sink registered with
/// [`WorkerChannel::on_result`].
pub struct WorkerChannel {
    shared: Arc<SharedState>,
    worker: Option<JoinHandle<()>>,
    exited: Receiver<()>,
    last_request_id: RequestId,
    termination_grace: Duration,
    terminated: bool,
}

impl WorkerChannel {
    pub fn spawn<L>(loader: L) -> Self
    where
        L: KernelLoader + Send + 'static,
    {
        Self::spawn_with_options(loader, WorkerOptions::default())
    }

    pub fn spawn_with_options<L>(loader: L, options: WorkerOptions) -> Self
    where
        L: KernelLoader + Send + 'static,
    {
        let shared = Arc::new(SharedState {
            inbox: Mutex::new(Inbox::default()),
            wake: Condvar::new(),
            state: Mutex::new(WorkerState::Unstarted),
            in_flight: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            result_sink: Mutex::new(None),
            progress_sink: Mutex::new(None),
        });

        let worker_shared = Arc::clone(&shared);
        let (exit_tx, exited) = mpsc::channel();

        let worker = thread::spawn(move || {
            Self::worker_loop(loader, &worker_shared, exit_tx);
        });

        debug!("worker channel spawned");

        Self {
            shared,
            worker: Some(worker),
            exited,
            last_request_id: 0,
            termination_grace: options.termination_grace,
            terminated: false,
        }
    }

    /// Registers the sink that receives every request's outcome, replacing
    /// any previous one.
    pub fn on_result(&self, sink: impl ResultSink + 'static) {
        *lock(&self.shared.result_sink) = Some(Arc::new(sink));
    }

    pub fn on_progress(&self, sink: impl ProgressSink + 'static) {
        *lock(&self.shared.progress_sink) = Some(Arc::new(sink));
    }

    /// Asks the worker to load its module before the first request arrives.
    pub fn preload(&self) -> Result<(), WorkerError> {
        if self.terminated {
            return Err(WorkerError::ChannelClosed);
        }

        lock(&self.shared.inbox).preload = true;
        self.shared.wake.notify_one();

        Ok(())
    }

    pub fn send(&mut self, request: ComputeRequest) -> Result<RequestId, WorkerError> {
        if self.terminated {
            return Err(WorkerError::ChannelClosed);
        }

        if self.shared.in_flight.swap(true, Ordering::AcqRel) {
            return Err(WorkerError::ProtocolViolation {
                outstanding: self.last_request_id,
            });
        }

        self.last_request_id += 1;
        let request_id = self.last_request_id;

        lock(&self.shared.inbox).request = Some((request_id, request));
        self.shared.wake.notify_one();

        debug!("sent {} request {}", request.kind().name(), request_id);

        Ok(request_id)
    }

    #[must_use]
    pub fn state(&self) -> WorkerState {
        *lock(&self.shared.state)
    }

    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Stops the worker and releases its module. Only the first call does
    /// anything; it returns `true`, later calls return `false`.
    ///
    /// The kernel is asked to cancel. A worker that does not stop within the
    /// termination grace is detached and finishes on its own; its outcome is
    /// never delivered.
    pub fn terminate(&mut self) -> bool {
        if self.terminated {
            return false;
        }
        self.terminated = true;

        {
            let _inbox = lock(&self.shared.inbox);
            self.shared.shutdown.store(true, Ordering::Release);
        }
        self.shared.wake.notify_all();

        match self.exited.recv_timeout(self.termination_grace) {
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "worker did not stop within {:?}, detaching it",
                    self.termination_grace
                );
                self.worker.take();
            }
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                if let Some(handle) = self.worker.take() {
                    if handle.join().is_err() {
                        warn!("worker thread panicked");
                    }
                }
            }
        }

        self.shared.set_state(WorkerState::Terminated);
        debug!("worker channel terminated");

        true
    }

    fn worker_loop<L: KernelLoader>(loader: L, shared: &SharedState, exit_tx: Sender<()>) {
        let mut module: Option<L::Module> = None;
        let mut load_error: Option<ModuleLoadError> = None;

        loop {
            let wake = {
                let mut inbox = lock(&shared.inbox);
                loop {
                    if shared.shutdown.load(Ordering::Acquire) {
                        break Wake::Shutdown;
                    }

                    if let Some((request_id, request)) = inbox.request.take() {
                        break Wake::Job(request_id, request);
                    }

                    if inbox.preload {
                        inbox.preload = false;
                        break Wake::Preload;
                    }

                    inbox = shared
                        .wake
                        .wait(inbox)
                        .unwrap_or_else(PoisonError::into_inner);
                }
            };

            match wake {
                Wake::Shutdown => break,
                Wake::Preload => {
                    if module.is_none() && load_error.is_none() {
                        match Self::load_module(&loader, shared) {
                            Ok(loaded) => module = Some(loaded),
                            Err(err) => load_error = Some(err),
                        }
                    }
                }
                Wake::Job(request_id, request) => {
                    if module.is_none() {
                        let loaded = match load_error.take() {
                            Some(err) => Err(err),
                            None => Self::load_module(&loader, shared),
                        };

                        match loaded {
                            Ok(loaded) => module = Some(loaded),
                            Err(err) => {
                                Self::finish(shared, request_id, Err(WorkerError::ModuleLoad(err)));
                                continue;
                            }
                        }
                    }

                    if let Some(module) = module.as_ref() {
                        shared.set_state(WorkerState::Busy);

                        let cancel_token = || shared.shutdown.load(Ordering::Relaxed);
                        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                            Self::execute(module, request_id, &request, &cancel_token, shared)
                        }))
                        .unwrap_or_else(|payload| {
                            Err(WorkerError::KernelPanicked {
                                message: panic_message(payload.as_ref()),
                            })
                        });

                        shared.set_state(WorkerState::Ready);
                        Self::finish(shared, request_id, outcome);
                    }
                }
            }
        }

        if module.take().is_some() {
            debug!("worker released kernel module");
        }
        shared.set_state(WorkerState::Terminated);

        drop(exit_tx);
    }

    fn load_module<L: KernelLoader>(
        loader: &L,
        shared: &SharedState,
    ) -> Result<L::Module, ModuleLoadError> {
        shared.set_state(WorkerState::ModuleLoading);

        match loader.load() {
            Ok(module) => {
                shared.set_state(WorkerState::Ready);
                debug!("kernel module loaded");
                Ok(module)
            }
            Err(err) => {
                shared.set_state(WorkerState::Unstarted);
                warn!("{}", err);
                Err(err)
            }
        }
    }

    fn execute<M: KernelModule>(
        module: &M,
        request_id: RequestId,
        request: &ComputeRequest,
        cancel: &dyn CancelToken,
        shared: &SharedState,
    ) -> WorkerOutcome {
        match request {
            ComputeRequest::Single { niter } => calculate_pi(module, *niter, cancel)
                .map(|pi| ComputeResponse::Single { pi })
                .map_err(WorkerError::Kernel),
            ComputeRequest::Sweep { range } => {
                let progress = lock(&shared.progress_sink).clone();

                run_sweep(module, range, cancel, |point| {
                    if let Some(sink) = &progress {
                        sink.point_completed(request_id, point);
                    }
                })
                .map(|series| ComputeResponse::Sweep { series })
                .map_err(WorkerError::Sweep)
            }
        }
    }

    fn finish(shared: &SharedState, request_id: RequestId, outcome: WorkerOutcome) {
        if shared.shutdown.load(Ordering::Acquire) {
            debug!("discarding outcome of request {} after termination", request_id);
            return;
        }

        shared.in_flight.store(false, Ordering::Release);

        let sink = lock(&shared.result_sink).clone();
        match sink {
            Some(sink) => sink.deliver(request_id, outcome),
            None => warn!("no result sink registered, dropping outcome of request {}", request_id),
        }
    }
}

impl Drop for WorkerChannel {
    fn drop(&mut self) {
        self.terminate();
    }
}
