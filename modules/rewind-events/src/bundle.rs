use chrono::{DateTime, Utc};
use rewind_common::EventKind;

use crate::event::Event;

/// One or more events recorded together as a single undo/redo unit.
///
/// Never empty. Only the leading event of a primary bundle is undone or
/// redone independently; the members of a secondary bundle unwind as a group
/// with the primary bundle they follow.
#[derive(Debug)]
pub struct EventBundle {
    events: Vec<Event>,
    secondary: bool,
    frame: u64,
    committed_at: DateTime<Utc>,
}

impl EventBundle {
    pub fn new(first: Event, secondary: bool, frame: u64) -> Self {
        Self {
            events: vec![first],
            secondary,
            frame,
            committed_at: Utc::now(),
        }
    }

    /// The leading event's kind.
    pub fn kind(&self) -> EventKind {
        self.events[0].kind()
    }

    pub fn leading(&self) -> &Event {
        &self.events[0]
    }

    pub fn leading_mut(&mut self) -> &mut Event {
        &mut self.events[0]
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut [Event] {
        &mut self.events
    }

    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn is_secondary(&self) -> bool {
        self.secondary
    }

    /// The flush counter at the time this bundle was created.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }
}
