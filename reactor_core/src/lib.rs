//! Core time and ordering types shared by the GEDF-NP reaction scheduler.
//!
//! This crate owns nothing about scheduling policy: it is the "external tag
//! subsystem" data that the scheduler reads and compares but never mutates
//! directly.

mod level;
mod time;

pub use level::{Index, Level};
pub use time::{compare_tags, Tag, Timestamp};
