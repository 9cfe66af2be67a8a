use std::sync::atomic::{AtomicU8, Ordering};

use reactor_core::Index;

/// A reaction's dispatch status.
///
/// The scheduler enforces a strict cycle `Inactive -> Queued -> Inactive`;
/// no other transition is permitted. `Running` is observed by external
/// collaborators (e.g. a federated coordinator inspecting in-flight work)
/// but the scheduler itself never writes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Inactive = 0,
    Queued = 1,
    Running = 2,
}

impl Status {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Status::Inactive,
            1 => Status::Queued,
            2 => Status::Running,
            other => unreachable!("invalid reaction status byte {other}"),
        }
    }
}

/// An opaque unit of dispatchable work.
///
/// `Reaction` carries only what the scheduler core needs: an ordering
/// [`Index`], a dedup-guarding [`Status`], and a diagnostic name. The
/// reaction body itself -- what actually runs between
/// [`crate::Scheduler::get_ready_reaction`] and
/// [`crate::Scheduler::done_with_reaction`] -- is owned by the
/// [`crate::ReactionBody`] collaborator, not by this type.
///
/// Invariant: `status == Queued` iff this reaction currently occupies
/// exactly one slot of one [`crate::rqa::ReactionQueueArray`] priority
/// queue.
#[derive(Debug)]
pub struct Reaction {
    name: String,
    index: Index,
    status: AtomicU8,
}

impl Reaction {
    pub fn new(name: impl Into<String>, index: Index) -> Self {
        Self {
            name: name.into(),
            index,
            status: AtomicU8::new(Status::Inactive as u8),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Index {
        self.index
    }

    pub fn status(&self) -> Status {
        Status::from_u8(self.status.load(Ordering::Acquire))
    }

    /// The enqueue-path CAS: `Inactive -> Queued`.
    ///
    /// Returns `true` if this call performed the transition (the caller
    /// must insert the reaction into its level's queue). Returns `false`
    /// if the reaction was already queued for this tag -- the dedup
    /// invariant from spec EP: a duplicate trigger is silently absorbed.
    pub(crate) fn try_mark_queued(&self) -> bool {
        self.status
            .compare_exchange(
                Status::Inactive as u8,
                Status::Queued as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }

    /// The completion CAS: `Queued -> Inactive`.
    ///
    /// # Panics
    /// Panics if the observed status was not `Queued`. Per spec §7, this is
    /// a fatal invariant violation: the runtime aborts rather than silently
    /// continuing with inconsistent scheduler state.
    pub(crate) fn mark_done(&self) {
        self.status
            .compare_exchange(
                Status::Queued as u8,
                Status::Inactive as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .unwrap_or_else(|observed| {
                panic!(
                    "scheduler invariant violation: reaction '{}' had status {:?}, expected Queued",
                    self.name,
                    Status::from_u8(observed)
                )
            });
    }
}
