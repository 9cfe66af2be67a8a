//! Test-only [`gedf_scheduler::TagSource`] that replays a fixed script of
//! (tag, ready-reactions) events, the way a real event horizon would, but
//! without any wall-clock or network dependency.

use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use gedf_scheduler::{Reaction, Tag, TagSource};

pub struct ScriptedTagSource {
    current_tag: Mutex<Tag>,
    stop_tag: Tag,
    events: Mutex<VecDeque<(Tag, Vec<Arc<Reaction>>)>>,
    completed: Mutex<Vec<Tag>>,
}

impl ScriptedTagSource {
    /// `events` is the sequence of (tag, reactions-ready-at-that-tag) the
    /// scheduler will advance through. `stop_tag` is the last tag in the
    /// script; once it's reached and reported complete, the scheduler
    /// halts.
    pub fn new(stop_tag: Tag, events: Vec<(Tag, Vec<Arc<Reaction>>)>) -> Self {
        Self {
            current_tag: Mutex::new(Tag::zero()),
            stop_tag,
            events: Mutex::new(events.into()),
            completed: Mutex::new(Vec::new()),
        }
    }

    pub fn completed_tags(&self) -> Vec<Tag> {
        self.completed.lock().unwrap().clone()
    }
}

impl TagSource for ScriptedTagSource {
    fn current_tag(&self) -> Tag {
        *self.current_tag.lock().unwrap()
    }

    fn stop_tag(&self) -> Tag {
        self.stop_tag
    }

    fn next(&self) -> Vec<Arc<Reaction>> {
        let mut events = self.events.lock().unwrap();
        match events.pop_front() {
            Some((tag, reactions)) => {
                *self.current_tag.lock().unwrap() = tag;
                reactions
            }
            None => {
                // No more scripted events: jump straight to the stop tag so
                // the scheduler halts instead of spinning forever.
                *self.current_tag.lock().unwrap() = self.stop_tag;
                Vec::new()
            }
        }
    }

    fn logical_tag_complete(&self, tag: Tag) {
        self.completed.lock().unwrap().push(tag);
    }
}

/// A [`gedf_scheduler::ReactionBody`] that records, in dispatch order, the
/// name of every reaction it runs.
pub struct RecordingBody {
    pub log: Mutex<Vec<String>>,
}

impl Default for RecordingBody {
    fn default() -> Self {
        Self {
            log: Mutex::new(Vec::new()),
        }
    }
}

impl gedf_scheduler::ReactionBody for RecordingBody {
    fn run(&self, reaction: &Reaction, _worker_id: usize) {
        self.log.lock().unwrap().push(reaction.name().to_string());
    }
}
