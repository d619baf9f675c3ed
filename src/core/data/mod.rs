pub mod compute_request;
pub mod compute_response;
pub mod niter;
pub mod sweep_point;
pub mod sweep_range;
pub mod sweep_series;
