//! Small dense kind tags for stores and events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies a registered store. Unique among live stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKind(pub u16);

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "store#{}", self.0)
    }
}

/// Identifies an event kind in the metadata registry.
///
/// Kinds 0, 1 and 2 are reserved by the core (NOOP, UNDO, REDO).
/// Application kinds start at [`EventKind::FIRST_APPLICATION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventKind(pub u16);

impl EventKind {
    pub const NOOP: EventKind = EventKind(0);
    pub const UNDO: EventKind = EventKind(1);
    pub const REDO: EventKind = EventKind(2);
    pub const FIRST_APPLICATION: EventKind = EventKind(3);

    /// UNDO and REDO. Constructed internally, never spawned by application code.
    pub fn is_priority(self) -> bool {
        self == Self::UNDO || self == Self::REDO
    }

    pub fn is_reserved(self) -> bool {
        self < Self::FIRST_APPLICATION
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NOOP => f.write_str("noop"),
            Self::UNDO => f.write_str("undo"),
            Self::REDO => f.write_str("redo"),
            EventKind(n) => write!(f, "event#{n}"),
        }
    }
}
