//! Serializable audit view of History.

use chrono::{DateTime, Utc};
use rewind_common::EventKind;
use serde::{Deserialize, Serialize};

use crate::bundle::EventBundle;
use crate::metadata::MetadataRegistry;

/// One History bundle, as exported for diagnostics and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub index: usize,
    pub frame: u64,
    pub committed_at: DateTime<Utc>,
    pub kind: EventKind,
    pub description: String,
    pub secondary: bool,
    /// Kinds of every member event, in insertion order.
    pub events: Vec<EventKind>,
    /// `describe()` of every member event.
    pub details: Vec<String>,
    /// For Undo/Redo bundles: the index of the bundle the step resolved to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<usize>,
}

impl JournalEntry {
    pub fn from_bundle(index: usize, bundle: &EventBundle, registry: &MetadataRegistry) -> Self {
        Self {
            index,
            frame: bundle.frame(),
            committed_at: bundle.committed_at(),
            kind: bundle.kind(),
            description: registry.description(bundle.kind()).to_string(),
            secondary: bundle.is_secondary(),
            events: bundle.events().iter().map(|e| e.kind()).collect(),
            details: bundle.events().iter().map(|e| e.describe()).collect(),
            target: bundle.leading().as_step().and_then(|step| step.target),
        }
    }
}
