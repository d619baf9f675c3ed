/// Lifecycle of a worker channel.
///
/// `Unstarted → ModuleLoading → Ready → Busy → Ready | Terminated`. A failed
/// module load returns the channel to `Unstarted`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WorkerState {
    Unstarted,
    ModuleLoading,
    Ready,
    Busy,
    Terminated,
}

impl WorkerState {
    /// Whether a module instance is currently held.
    #[must_use]
    pub fn has_module(&self) -> bool {
        matches!(self, Self::Ready | Self::Busy)
    }
}

#[cfg(test)]
mod tests {
    use super::WorkerState;

    #[test]
    fn module_is_held_only_when_ready_or_busy() {
        assert!(!WorkerState::Unstarted.has_module());
        assert!(!WorkerState::ModuleLoading.has_module());
        assert!(WorkerState::Ready.has_module());
        assert!(WorkerState::Busy.has_module());
        assert!(!WorkerState::Terminated.has_module());
    }
}
