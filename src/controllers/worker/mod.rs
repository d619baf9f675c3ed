//! Worker channel: an isolated thread that owns a kernel module and is
//! driven only through request/response messages.

mod channel;
pub mod errors;
pub mod ports;
pub mod state;

/// Identifies one request on one channel. Increases with every send.
pub type RequestId = u64;

pub use channel::{DEFAULT_TERMINATION_GRACE, WorkerChannel, WorkerOptions};
pub use errors::WorkerError;
pub use ports::{ProgressSink, ResultSink, WorkerOutcome};
pub use state::WorkerState;
