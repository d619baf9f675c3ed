//! Single-shot dispatch: one validated request, one worker channel, one
//! result.

mod batch;
mod dispatcher;
pub mod errors;
pub mod options;
mod pending;
mod request;

pub use batch::dispatch_batch;
pub use dispatcher::Dispatcher;
pub use errors::DispatchError;
pub use options::{DEFAULT_POLL_INTERVAL, DispatchOptions};
pub use pending::PendingResult;
pub use request::dispatch_request;
pub(crate) use pending::start;
