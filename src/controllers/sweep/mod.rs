//! Sweep orchestration: a whole range of iteration counts computed in
//! sequence on one worker channel.

mod orchestrator;

pub use orchestrator::SweepOrchestrator;
