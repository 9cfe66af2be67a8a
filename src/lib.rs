//! A level-stratified, multi-worker scheduler implementing Global Earliest
//! Deadline First, Non-Preemptive (GEDF-NP) dispatch for a fixed set of
//! reactions.
//!
//! This crate is the CORE of a discrete-event reactive runtime: it
//! partitions the ready set by precedence level, orders reactions within a
//! level by a deadline/precedence index, and coordinates N worker threads
//! via idle-counting plus a counting semaphore. Everything outside that --
//! the event horizon that converts timed events into reactions at a new
//! tag, a federated coordinator, reaction bodies themselves -- is a
//! collaborator the scheduler consumes only through the [`TagSource`] and
//! [`ReactionBody`] traits.
//! ## Feature flags
#![doc = document_features::document_features!()]
#![deny(clippy::all)]

mod collab;
mod error;
mod pqueue;
mod reaction;
mod rqa;
mod scheduler;
mod semaphore;

pub use collab::{ReactionBody, TagSource};
pub use error::SchedError;
pub use reaction::{Reaction, Status};
pub use scheduler::{Config, Scheduler};

pub use reactor_core::{Index, Level, Tag, Timestamp};
