use std::sync::Arc;

use reactor_core::Tag;

use crate::Reaction;

/// The external tag-advance / event-horizon collaborator.
///
/// Implementations own the event queue and `current_tag`/`stop_tag`
/// state; the scheduler only calls into this trait while holding its own
/// [`crate::scheduler::Scheduler`] global lock (see §5 CONCURRENCY &
/// RESOURCE MODEL), so implementations do not need to be reentrant with
/// respect to other calls on this trait, only `Send + Sync` so an
/// `Arc<dyn TagSource>` can be shared across worker threads.
pub trait TagSource: Send + Sync {
    /// The tag currently being executed.
    fn current_tag(&self) -> Tag;

    /// The distinguished tag at which execution should halt.
    fn stop_tag(&self) -> Tag;

    /// Advance to the next tag and return the reactions it makes ready.
    ///
    /// May block on wall-clock time or on an event queue. The scheduler
    /// enqueues each returned reaction through its own enqueue path (so the
    /// usual dedup-by-status CAS still applies), rather than this trait
    /// touching scheduler-internal queues directly.
    fn next(&self) -> Vec<Arc<Reaction>>;

    /// Federation hook, called once per tag after every level of that tag
    /// has executed. A non-federated implementation is typically a no-op.
    fn logical_tag_complete(&self, tag: Tag);
}

/// The external reaction-body collaborator: whatever a worker actually runs
/// between [`crate::Scheduler::get_ready_reaction`] and
/// [`crate::Scheduler::done_with_reaction`].
///
/// Kept as a trait rather than a concrete closure type so reaction bodies
/// that themselves call back into [`crate::Scheduler::trigger`] (to enqueue
/// same-level follow-up work, e.g. a network-input control reaction) are
/// free to hold an `Arc<Scheduler>` and do so.
pub trait ReactionBody: Send + Sync {
    fn run(&self, reaction: &Reaction, worker_id: usize);
}

impl<F> ReactionBody for F
where
    F: Fn(&Reaction, usize) + Send + Sync,
{
    fn run(&self, reaction: &Reaction, worker_id: usize) {
        self(reaction, worker_id)
    }
}
