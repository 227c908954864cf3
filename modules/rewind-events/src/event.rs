use std::fmt;

use rewind_common::{EventKind, Result};
use rewind_stores::StoreRegistry;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::action::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Undo,
    Redo,
}

impl Direction {
    pub fn kind(self) -> EventKind {
        match self {
            Direction::Undo => EventKind::UNDO,
            Direction::Redo => EventKind::REDO,
        }
    }

    pub fn from_kind(kind: EventKind) -> Option<Self> {
        match kind {
            EventKind::UNDO => Some(Direction::Undo),
            EventKind::REDO => Some(Direction::Redo),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

/// Instance of an Undo or Redo event. `target` is the History index the step
/// resolved to, filled in when it executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStep {
    pub direction: Direction,
    pub target: Option<usize>,
}

#[derive(Debug)]
pub enum EventBody {
    Step(HistoryStep),
    Action(Box<dyn Action>),
}

/// A tagged unit of change: a kind plus its instance.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    body: EventBody,
}

impl Event {
    pub fn action(kind: EventKind, action: Box<dyn Action>) -> Self {
        Self {
            kind,
            body: EventBody::Action(action),
        }
    }

    pub fn step(direction: Direction) -> Self {
        Self {
            kind: direction.kind(),
            body: EventBody::Step(HistoryStep {
                direction,
                target: None,
            }),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn body(&self) -> &EventBody {
        &self.body
    }

    pub fn is_priority(&self) -> bool {
        matches!(self.body, EventBody::Step(_))
    }

    pub fn as_action(&self) -> Option<&dyn Action> {
        match &self.body {
            EventBody::Action(action) => Some(action.as_ref()),
            EventBody::Step(_) => None,
        }
    }

    pub fn as_action_mut(&mut self) -> Option<&mut dyn Action> {
        match &mut self.body {
            EventBody::Action(action) => Some(action.as_mut()),
            EventBody::Step(_) => None,
        }
    }

    pub fn as_step(&self) -> Option<&HistoryStep> {
        match &self.body {
            EventBody::Step(step) => Some(step),
            EventBody::Action(_) => None,
        }
    }

    pub fn as_step_mut(&mut self) -> Option<&mut HistoryStep> {
        match &mut self.body {
            EventBody::Step(step) => Some(step),
            EventBody::Action(_) => None,
        }
    }

    /// Run the action. Undo/Redo steps resolve against History and are
    /// executed by the transaction system, so here they report `false`.
    pub fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        match &mut self.body {
            EventBody::Action(action) => action.execute(stores),
            EventBody::Step(_) => Ok(false),
        }
    }

    pub fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        match &mut self.body {
            EventBody::Action(action) => action.undo(stores),
            EventBody::Step(_) => Ok(()),
        }
    }

    /// Merge a just-executed continuation into this event.
    pub fn merge(&mut self, next: &Event) -> bool {
        match (&mut self.body, &next.body) {
            (EventBody::Action(existing), EventBody::Action(next)) => {
                existing.merge(next.as_ref())
            }
            _ => false,
        }
    }

    pub fn describe(&self) -> String {
        match &self.body {
            EventBody::Action(action) => action.describe(),
            EventBody::Step(step) => match step.target {
                Some(target) => format!("{} of #{target}", step.direction),
                None => step.direction.to_string(),
            },
        }
    }

    pub fn destroy(self) {
        trace!(kind = %self.kind, "Event destroyed");
    }
}
