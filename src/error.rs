/// Scheduler errors.
///
/// Per spec §7, the scheduler reports no *recoverable* errors to reaction
/// bodies: a `done_with_reaction` invariant violation is a `panic!` (see
/// [`crate::Reaction::mark_done`]), not a variant here. This enum covers
/// only the two places the spec calls out as fatal-but-reportable: resource
/// exhaustion at [`crate::Scheduler::new`], and a worker thread panicking
/// during [`crate::Scheduler::run_to_completion`] (the idiomatic Rust
/// analogue of the original's "semaphore destroy failure at teardown").
#[derive(Debug, thiserror::Error)]
pub enum SchedError {
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(String),

    #[error("worker thread {worker_id} panicked during shutdown")]
    WorkerPanicked { worker_id: usize },
}
