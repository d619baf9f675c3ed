//! Compute kernel binding.
//!
//! The worker only sees the kernel through the ports in [`ports`]: a loader
//! producing a reusable module, and single-use calculators created from it.
//! [`monte_carlo`] is the built-in implementation.

pub mod errors;
pub mod monte_carlo;
pub mod ports;
