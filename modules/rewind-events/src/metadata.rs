//! Kind-indexed table describing how to spawn each event kind and how it
//! bundles.

use rewind_common::{EventKind, Result, TransactionError};

use crate::action::Action;

/// Allocates a fresh, default-initialized instance.
pub type Spawner = fn() -> Box<dyn Action>;

fn spawn_default<A: Action + Default>() -> Box<dyn Action> {
    Box::new(A::default())
}

#[derive(Debug, Clone)]
pub struct EventMetadata {
    pub kind: EventKind,
    pub description: &'static str,
    /// Consecutive commits of this kind fold into the most recent bundle.
    pub continuable: bool,
    /// A side effect, grouped with an immediately preceding secondary bundle.
    pub secondary: bool,
    spawner: Option<Spawner>,
}

impl EventMetadata {
    /// Metadata for an application kind spawning `A::default()`.
    pub fn of<A: Action + Default>(kind: EventKind, description: &'static str) -> Self {
        Self::with_spawner(kind, description, spawn_default::<A>)
    }

    pub fn with_spawner(kind: EventKind, description: &'static str, spawner: Spawner) -> Self {
        Self {
            kind,
            description,
            continuable: false,
            secondary: false,
            spawner: Some(spawner),
        }
    }

    fn reserved(kind: EventKind, description: &'static str) -> Self {
        Self {
            kind,
            description,
            continuable: false,
            secondary: false,
            spawner: None,
        }
    }

    pub fn with_continuable(mut self, continuable: bool) -> Self {
        self.continuable = continuable;
        self
    }

    pub fn with_secondary(mut self, secondary: bool) -> Self {
        self.secondary = secondary;
        self
    }

    /// `None` for the reserved kinds, which are never spawned by application code.
    pub fn spawn(&self) -> Option<Box<dyn Action>> {
        self.spawner.map(|spawn| spawn())
    }
}

/// The metadata table. Reserved kinds 0..=2 are installed on construction.
#[derive(Debug, Clone)]
pub struct MetadataRegistry {
    table: Vec<Option<EventMetadata>>,
}

impl Default for MetadataRegistry {
    fn default() -> Self {
        Self {
            table: vec![
                Some(EventMetadata::reserved(EventKind::NOOP, "noop")),
                Some(EventMetadata::reserved(EventKind::UNDO, "undo")),
                Some(EventMetadata::reserved(EventKind::REDO, "redo")),
            ],
        }
    }
}

impl MetadataRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, metadata: EventMetadata) -> Result<()> {
        let kind = metadata.kind;
        if kind.is_reserved() {
            return Err(TransactionError::ReservedEventKind(kind));
        }
        if self.table.len() <= kind.index() {
            self.table.resize(kind.index() + 1, None);
        }
        let slot = &mut self.table[kind.index()];
        if slot.is_some() {
            return Err(TransactionError::DuplicateEventKind(kind));
        }
        *slot = Some(metadata);
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, metadata: EventMetadata) -> Result<Self> {
        self.register(metadata)?;
        Ok(self)
    }

    pub fn get(&self, kind: EventKind) -> Result<&EventMetadata> {
        self.table
            .get(kind.index())
            .and_then(Option::as_ref)
            .ok_or(TransactionError::UnknownEventKind(kind))
    }

    /// Metadata for a kind application code may spawn.
    pub fn spawnable(&self, kind: EventKind) -> Result<&EventMetadata> {
        if kind.is_reserved() {
            return Err(TransactionError::ReservedEventKind(kind));
        }
        self.get(kind)
    }

    pub fn description(&self, kind: EventKind) -> &'static str {
        self.get(kind).map(|m| m.description).unwrap_or("unregistered")
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventMetadata> {
        self.table.iter().flatten()
    }
}
