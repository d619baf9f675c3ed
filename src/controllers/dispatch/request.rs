use log::info;

use crate::core::data::compute_request::ComputeRequest;
use crate::core::data::compute_response::ComputeResponse;
use crate::core::kernel::ports::KernelLoader;

use super::errors::DispatchError;
use super::options::DispatchOptions;
use super::pending::start;

/// Runs an already validated request, single or sweep, on its own channel
/// and waits for the response.
pub fn dispatch_request<L>(
    loader: L,
    request: ComputeRequest,
    options: &DispatchOptions,
) -> Result<ComputeResponse, DispatchError>
where
    L: KernelLoader + Send + 'static,
{
    info!("dispatching {} request", request.kind().name());

    start(loader, request, options, None, Some)?.wait()
}
