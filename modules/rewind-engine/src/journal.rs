use rewind_events::JournalEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Audit export of a session's History.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Journal {
    pub session_id: Uuid,
    pub frame: u64,
    pub entries: Vec<JournalEntry>,
}

impl Journal {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
