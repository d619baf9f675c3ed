pub mod calculate_pi;
pub mod cancellation;
pub mod run_sweep;
