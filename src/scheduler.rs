use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use reactor_core::Level;

use crate::{
    collab::{ReactionBody, TagSource},
    error::SchedError,
    rqa::ReactionQueueArray,
    semaphore::Semaphore,
    Reaction,
};

/// Compile-time-parameter analogue: scheduler construction parameters.
///
/// The original C scheduler takes these as preprocessor defines
/// (`NUMBER_OF_WORKERS`, `MAX_REACTION_LEVEL`, `INITIAL_REACT_QUEUE_SIZE`).
/// A Rust port makes them runtime configuration instead, in the
/// builder-style already used elsewhere in this codebase
/// (`with_number_of_workers`, …).
#[derive(Debug, Clone)]
pub struct Config {
    /// Total number of worker threads. Fixed after [`Scheduler::new`].
    pub number_of_workers: usize,
    /// The highest precedence level any reaction may have; the RQA
    /// allocates `max_reaction_level + 1` queues.
    pub max_reaction_level: usize,
    /// Initial capacity reserved in each per-level priority queue.
    pub initial_queue_capacity: usize,
    /// Whether `max_reaction_level` was set explicitly via
    /// [`Self::with_max_reaction_level`]. While `false`,
    /// [`Self::with_initial_queue_capacity`] keeps `max_reaction_level`
    /// tracking `initial_queue_capacity`, mirroring the C original's
    /// `#define MAX_REACTION_LEVEL INITIAL_REACT_QUEUE_SIZE` default.
    max_reaction_level_explicit: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            number_of_workers: 1,
            max_reaction_level: 16,
            initial_queue_capacity: 16,
            max_reaction_level_explicit: false,
        }
    }
}

impl Config {
    pub fn with_number_of_workers(mut self, n: usize) -> Self {
        self.number_of_workers = n;
        self
    }

    pub fn with_max_reaction_level(mut self, max_level: usize) -> Self {
        self.max_reaction_level = max_level;
        self.max_reaction_level_explicit = true;
        self
    }

    /// Sets the initial per-level queue capacity.
    ///
    /// Until [`Self::with_max_reaction_level`] is called, `max_reaction_level`
    /// tracks this value, the same default relationship the C original
    /// expresses as `#define MAX_REACTION_LEVEL INITIAL_REACT_QUEUE_SIZE` --
    /// without this, `Config::default().with_initial_queue_capacity(64)`
    /// would silently leave `max_reaction_level` at its unrelated default of
    /// 16 and any reaction at a higher level would hit the panic in
    /// [`crate::rqa::ReactionQueueArray::insert`].
    pub fn with_initial_queue_capacity(mut self, capacity: usize) -> Self {
        self.initial_queue_capacity = capacity;
        if !self.max_reaction_level_explicit {
            self.max_reaction_level = capacity;
        }
        self
    }
}

/// The GEDF-NP scheduler core.
///
/// Encapsulates every piece of state described in spec §3 as a single
/// object passed by `Arc` reference to worker threads -- the idiomatic
/// Rust rendering of the original's process-wide globals (spec §9
/// "Global mutable state").
pub struct Scheduler {
    rqa: ReactionQueueArray,
    n_workers: usize,
    /// Atomic count of idle workers, range `[0, n_workers]`.
    n_idle: AtomicUsize,
    /// The Executing Queue Pointer: the RQA slot workers currently drain.
    /// Mutated only by the sole elected advancer; see [`Self::try_advance`].
    eqp: AtomicUsize,
    /// Scan cursor used while looking for the next non-empty level, and the
    /// "is this tag fully drained" sentinel once it reaches `rqa.len()`
    /// ("MAX_LEVEL+1"). While a level is being drained,
    /// `next_level == eqp + 1`. Mutated only by the sole elected advancer.
    next_level: AtomicUsize,
    /// Set once during shutdown; checked, unsynchronized with respect to
    /// anything but itself, at the head of every `get_ready_reaction` loop.
    should_stop: AtomicBool,
    /// True once at least one level of the current tag has executed; gates
    /// the `logical_tag_complete` call so the very first tag doesn't
    /// report a tag that never ran.
    tag_completed: AtomicBool,
    /// Workers not elected advancer park here.
    semaphore: Semaphore,
    /// Serializes tag advancement and the external event queue, per spec
    /// §5's lock-order rule `global_mutex ⊐ exec_q_mutex`.
    global_mutex: Mutex<()>,
    tag_source: Arc<dyn TagSource>,
}

impl Scheduler {
    /// Initialize the scheduler. Must be called before any worker thread is
    /// spawned.
    #[tracing::instrument(skip(config, tag_source))]
    pub fn new(config: Config, tag_source: Arc<dyn TagSource>) -> Result<Self, SchedError> {
        if config.number_of_workers == 0 {
            return Err(SchedError::InvalidConfig(
                "number_of_workers must be at least 1".into(),
            ));
        }
        tracing::debug!(
            workers = config.number_of_workers,
            max_level = config.max_reaction_level,
            "initializing scheduler"
        );
        Ok(Self {
            rqa: ReactionQueueArray::new(
                Level(config.max_reaction_level),
                config.initial_queue_capacity,
            ),
            n_workers: config.number_of_workers,
            n_idle: AtomicUsize::new(0),
            eqp: AtomicUsize::new(0),
            next_level: AtomicUsize::new(0),
            should_stop: AtomicBool::new(false),
            tag_completed: AtomicBool::new(false),
            semaphore: Semaphore::new(0),
            global_mutex: Mutex::new(()),
            tag_source,
        })
    }

    pub fn number_of_workers(&self) -> usize {
        self.n_workers
    }

    /// The Enqueue Path: attempt to trigger `reaction` at the current tag.
    ///
    /// `worker_id = None` corresponds to the original's `worker_number =
    /// -1`: an anonymous caller outside any worker thread. It only affects
    /// diagnostics, never scheduling.
    #[tracing::instrument(skip(self, reaction), fields(name = reaction.name()))]
    pub fn trigger(&self, reaction: Arc<Reaction>, worker_id: Option<usize>) {
        if !reaction.try_mark_queued() {
            tracing::trace!(?worker_id, "duplicate trigger absorbed");
            return;
        }
        let level = reaction.index().level();
        tracing::debug!(?worker_id, %level, "enqueuing reaction");
        self.rqa.insert(level, reaction);
    }

    /// The Worker Loop Contract: fetch the next ready reaction, or `None`
    /// when the worker should exit.
    pub fn get_ready_reaction(&self, worker_id: usize) -> Option<Arc<Reaction>> {
        while !self.should_stop.load(Ordering::Acquire) {
            let level = self.eqp.load(Ordering::SeqCst);
            if level < self.rqa.len() {
                if let Some(reaction) = self.rqa.pop_min(level) {
                    return Some(reaction);
                }
            }
            tracing::trace!(worker_id, "no ready reaction, waiting for work");
            self.wait_for_work(worker_id);
        }
        None
    }

    /// Report that `worker_id` has finished executing `reaction`.
    pub fn done_with_reaction(&self, worker_id: usize, reaction: &Reaction) {
        tracing::trace!(worker_id, name = reaction.name(), "reaction done");
        reaction.mark_done();
    }

    /// Worker Idle Tracker: increment the idle count; if this worker is the
    /// last to go idle, it is elected to advance the schedule. Otherwise it
    /// parks on the semaphore until woken.
    fn wait_for_work(&self, worker_id: usize) {
        let prev = self.n_idle.fetch_add(1, Ordering::SeqCst);
        if prev == self.n_workers - 1 {
            tracing::trace!(worker_id, "elected as advancer");
            self.try_advance();
        } else {
            self.semaphore.acquire();
        }
    }

    /// Level Advancer: called by exactly one worker (the elected advancer)
    /// with no locks held. Either distributes the next non-empty level or
    /// advances the tag, looping until one succeeds or the stop tag is
    /// reached.
    fn try_advance(&self) {
        loop {
            if self.next_level.load(Ordering::SeqCst) == self.rqa.len() {
                self.next_level.store(0, Ordering::SeqCst);
                let _guard = self.global_mutex.lock().unwrap();
                tracing::debug!("advancing tag");
                if self.advance_tag_locked() {
                    tracing::debug!("reached stop tag");
                    self.signal_stop();
                    drop(_guard);
                    return;
                }
            }

            let k = self.distribute_ready_reactions();
            if k > 0 {
                self.notify_workers(k);
                return;
            }
        }
    }

    /// Scan the RQA starting at `next_level` for the next non-empty slot.
    /// When one is found, it becomes the new [`Self::eqp`] (the slot
    /// workers now drain) and `next_level` settles one past it, preserving
    /// the invariant `next_level == eqp + 1` while a level is draining.
    fn distribute_ready_reactions(&self) -> usize {
        loop {
            let level = self.next_level.load(Ordering::SeqCst);
            if level >= self.rqa.len() {
                return 0;
            }
            let k = self.rqa.size(level);
            self.next_level.store(level + 1, Ordering::SeqCst);
            if k > 0 {
                self.eqp.store(level, Ordering::SeqCst);
                return k;
            }
        }
    }

    /// Tag-Advance Gateway: called with `global_mutex` held.
    ///
    /// Returns `true` if the scheduler should stop.
    fn advance_tag_locked(&self) -> bool {
        if self.tag_completed.load(Ordering::SeqCst) {
            let current = self.tag_source.current_tag();
            self.tag_source.logical_tag_complete(current);
            if reactor_core::compare_tags(current, self.tag_source.stop_tag())
                != std::cmp::Ordering::Less
            {
                return true;
            }
        }
        self.tag_completed.store(true, Ordering::SeqCst);

        for reaction in self.tag_source.next() {
            self.trigger(reaction, None);
        }
        false
    }

    /// Worker Notification: wake at most `k` idle workers (the advancer
    /// itself does not park, so it self-dispatches without an extra
    /// wait/post pair).
    fn notify_workers(&self, k: usize) {
        let idle = self.n_idle.load(Ordering::SeqCst);
        let to_wake = idle.min(k);
        tracing::trace!(to_wake, "notifying workers");
        self.n_idle.fetch_sub(to_wake, Ordering::SeqCst);
        if to_wake > 1 {
            self.semaphore.release(to_wake - 1);
        }
    }

    /// Stop Protocol: signal every worker to stop and wake any still
    /// parked.
    pub fn signal_stop(&self) {
        self.should_stop.store(true, Ordering::Release);
        self.semaphore.release(self.n_workers.saturating_sub(1));
    }

    pub fn should_stop(&self) -> bool {
        self.should_stop.load(Ordering::Acquire)
    }

    /// Run the worker loop for `worker_id` until the scheduler stops,
    /// dispatching each ready reaction to `body`.
    pub fn run_worker(&self, worker_id: usize, body: &dyn ReactionBody) {
        while let Some(reaction) = self.get_ready_reaction(worker_id) {
            body.run(&reaction, worker_id);
            self.done_with_reaction(worker_id, &reaction);
        }
    }

    /// Spawn `number_of_workers` OS threads, each running [`Self::run_worker`],
    /// and block until they all exit. A convenience wrapper around the
    /// Worker Loop Contract for callers that don't need to manage their own
    /// thread pool.
    pub fn run_to_completion(self: &Arc<Self>, body: Arc<dyn ReactionBody>) -> Result<(), SchedError> {
        let handles: Vec<_> = (0..self.n_workers)
            .map(|worker_id| {
                let scheduler = Arc::clone(self);
                let body = Arc::clone(&body);
                std::thread::Builder::new()
                    .name(format!("gedf-worker-{worker_id}"))
                    .spawn(move || scheduler.run_worker(worker_id, body.as_ref()))
                    .expect("failed to spawn worker thread")
            })
            .collect();

        for (worker_id, handle) in handles.into_iter().enumerate() {
            handle
                .join()
                .map_err(|_| SchedError::WorkerPanicked { worker_id })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct NoReactionsSource {
        stop_tag: reactor_core::Tag,
    }

    impl TagSource for NoReactionsSource {
        fn current_tag(&self) -> reactor_core::Tag {
            self.stop_tag
        }
        fn stop_tag(&self) -> reactor_core::Tag {
            self.stop_tag
        }
        fn next(&self) -> Vec<Arc<Reaction>> {
            Vec::new()
        }
        fn logical_tag_complete(&self, _tag: reactor_core::Tag) {}
    }

    #[test]
    fn zero_workers_is_rejected_at_construction() {
        let source = Arc::new(NoReactionsSource {
            stop_tag: reactor_core::Tag::zero(),
        });
        let err = Scheduler::new(Config::default().with_number_of_workers(0), source)
            .expect_err("zero workers must be rejected");
        assert!(matches!(err, SchedError::InvalidConfig(_)));
    }

    #[test]
    fn max_reaction_level_tracks_initial_queue_capacity_by_default() {
        let config = Config::default().with_initial_queue_capacity(64);
        assert_eq!(config.initial_queue_capacity, 64);
        assert_eq!(config.max_reaction_level, 64);
    }

    #[test]
    fn explicit_max_reaction_level_is_not_overridden_by_queue_capacity() {
        let config = Config::default()
            .with_max_reaction_level(8)
            .with_initial_queue_capacity(64);
        assert_eq!(config.initial_queue_capacity, 64);
        assert_eq!(config.max_reaction_level, 8);
    }

    #[test]
    fn queue_capacity_after_explicit_level_in_either_order_keeps_level() {
        let config = Config::default()
            .with_initial_queue_capacity(64)
            .with_max_reaction_level(8);
        assert_eq!(config.initial_queue_capacity, 64);
        assert_eq!(config.max_reaction_level, 8);
    }
}
