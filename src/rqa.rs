use std::sync::{Arc, Mutex};

use reactor_core::Level;

use crate::{pqueue::PriorityQueue, Reaction};

/// The Reaction Queue Array: one priority queue per precedence level in
/// `[0, max_level]`, allocated at init and reused across tags.
///
/// Per spec §5, only the slot currently being drained needs mutual
/// exclusion with the enqueue path, and all other slots are quiescent
/// while a tag is in flight. We give every slot its own `Mutex` rather than
/// replicating the C original's single `exec_q_mutex` that is conditionally
/// taken: since tag-advancement only ever happens once every worker is
/// idle (see [`crate::scheduler::Scheduler::wait_for_work`]), a slot other
/// than the one being drained is never contended, so locking it
/// unconditionally costs nothing in practice while being trivially safe in
/// Rust -- no unsafe aliasing of a raw pointer into a shared array is
/// needed. The level currently being drained and the level a same-level
/// trigger targets are, by construction, the same `Vec` index, so they
/// still serialize through the same `Mutex` the design calls for.
pub struct ReactionQueueArray {
    levels: Vec<Mutex<PriorityQueue>>,
}

impl ReactionQueueArray {
    pub fn new(max_level: Level, initial_capacity: usize) -> Self {
        let levels = (0..=max_level.0)
            .map(|_| Mutex::new(PriorityQueue::with_capacity(initial_capacity)))
            .collect();
        Self { levels }
    }

    /// One past the highest valid level index; `next_level` reaching this
    /// value means the current tag is fully drained.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Insert a reaction into its level's queue.
    ///
    /// # Panics
    /// Panics if `level` is out of range; this indicates a reaction whose
    /// level exceeds the configured `max_level`, a construction-time bug in
    /// the caller rather than a runtime condition the scheduler should
    /// recover from.
    pub fn insert(&self, level: Level, reaction: Arc<Reaction>) {
        self.levels[level.0].lock().unwrap().insert(reaction);
    }

    /// Pop the minimum-index reaction from `level`, if any.
    pub fn pop_min(&self, level: usize) -> Option<Arc<Reaction>> {
        self.levels[level].lock().unwrap().pop_min()
    }

    /// Size of the queue at `level`, without removing anything.
    pub fn size(&self, level: usize) -> usize {
        self.levels[level].lock().unwrap().size()
    }
}
