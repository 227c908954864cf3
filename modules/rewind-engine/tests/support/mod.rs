//! A small counter scene shared by the engine integration tests.
#![allow(dead_code)]

use rewind_engine::{
    downcast_action, Action, EngineConfig, EventKind, EventMetadata, MetadataRegistry, Result,
    StoreKind, StoreRegistry, TransactionSystem,
};

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

pub const COUNTER: StoreKind = StoreKind(0);
pub const AUDIT_LOG: StoreKind = StoreKind(1);
pub const TRAIL: StoreKind = StoreKind(2);

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Counter {
    pub value: i64,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AuditLog {
    pub lines: Vec<String>,
}

/// Order in which undos happened. Not part of the scene state.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Trail {
    pub undone: Vec<String>,
}

// ---------------------------------------------------------------------------
// Event kinds
// ---------------------------------------------------------------------------

pub const INCREMENT: EventKind = EventKind(3);
pub const SLIDE: EventKind = EventKind(4);
pub const AUDIT: EventKind = EventKind(5);
pub const BUMP: EventKind = EventKind(6);
pub const STRAY: EventKind = EventKind(7);
pub const FRAGILE: EventKind = EventKind(8);
pub const NUDGE: EventKind = EventKind(9);
pub const ONCE: EventKind = EventKind(10);
pub const ONCE_EFFECT: EventKind = EventKind(11);

/// Adds `delta` to the counter. A zero delta, or one that would overflow,
/// declines.
#[derive(Debug, Default, Clone)]
pub struct Increment {
    pub delta: i64,
}

impl Action for Increment {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        if self.delta == 0 {
            return Ok(false);
        }
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        match counter.value.checked_add(self.delta) {
            Some(value) => {
                counter.value = value;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        // Inverse of a checked add that succeeded.
        counter.value = counter.value.wrapping_sub(self.delta);
        Ok(())
    }
}

/// Drags the counter to `to`. Continuable: consecutive slides merge.
#[derive(Debug, Default, Clone)]
pub struct Slide {
    pub to: i64,
    before: Option<i64>,
}

impl Slide {
    pub fn to(to: i64) -> Self {
        Self { to, before: None }
    }
}

impl Action for Slide {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        if counter.value == self.to {
            return Ok(false);
        }
        self.before = Some(counter.value);
        counter.value = self.to;
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        if let Some(before) = self.before {
            stores.get_mut::<Counter>(COUNTER)?.value = before;
        }
        Ok(())
    }

    fn merge(&mut self, next: &dyn Action) -> bool {
        match downcast_action::<Slide>(next) {
            Some(next) => {
                self.to = next.to;
                true
            }
            None => false,
        }
    }
}

/// Appends a line to the audit log. Secondary: a side effect of the
/// preceding action.
#[derive(Debug, Default, Clone)]
pub struct Audit {
    pub line: String,
}

impl Audit {
    pub fn line(line: &str) -> Self {
        Self { line: line.into() }
    }
}

impl Action for Audit {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        stores.get_mut::<AuditLog>(AUDIT_LOG)?.lines.push(self.line.clone());
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        stores.get_mut::<AuditLog>(AUDIT_LOG)?.lines.pop();
        stores
            .get_mut::<Trail>(TRAIL)?
            .undone
            .push(format!("audit:{}", self.line));
        Ok(())
    }
}

/// Touches a store nobody registered.
#[derive(Debug, Default, Clone)]
pub struct Stray;

impl Action for Stray {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        stores.get_mut::<Counter>(StoreKind(99))?.value += 1;
        Ok(true)
    }

    fn undo(&mut self, _stores: &mut StoreRegistry) -> Result<()> {
        Ok(())
    }
}

/// Bumps the counter, but its undo touches a store nobody registered.
#[derive(Debug, Default, Clone)]
pub struct Fragile;

impl Action for Fragile {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        stores.get_mut::<Counter>(COUNTER)?.value += 1;
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        stores.get_mut::<Counter>(StoreKind(99))?.value -= 1;
        Ok(())
    }
}

/// Bumps the counter on its first `execute` only; every later run declines.
#[derive(Debug, Default, Clone)]
pub struct Once {
    runs: u32,
}

impl Action for Once {
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool> {
        if self.runs > 0 {
            return Ok(false);
        }
        self.runs += 1;
        stores.get_mut::<Counter>(COUNTER)?.value += 1;
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()> {
        stores.get_mut::<Counter>(COUNTER)?.value -= 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Scene construction
// ---------------------------------------------------------------------------

pub fn registry() -> MetadataRegistry {
    let mut registry = MetadataRegistry::new();
    registry
        .register(EventMetadata::of::<Increment>(INCREMENT, "increment counter"))
        .unwrap();
    registry
        .register(EventMetadata::of::<Slide>(SLIDE, "slide counter").with_continuable(true))
        .unwrap();
    registry
        .register(EventMetadata::of::<Audit>(AUDIT, "audit line").with_secondary(true))
        .unwrap();
    registry
        .register(EventMetadata::of::<Increment>(BUMP, "bump counter"))
        .unwrap();
    registry
        .register(EventMetadata::of::<Stray>(STRAY, "stray write"))
        .unwrap();
    registry
        .register(EventMetadata::of::<Fragile>(FRAGILE, "fragile bump"))
        .unwrap();
    // Continuable, but `Increment` never agrees to merge.
    registry
        .register(EventMetadata::of::<Increment>(NUDGE, "nudge counter").with_continuable(true))
        .unwrap();
    registry
        .register(EventMetadata::of::<Once>(ONCE, "one-shot bump"))
        .unwrap();
    registry
        .register(EventMetadata::of::<Once>(ONCE_EFFECT, "one-shot effect").with_secondary(true))
        .unwrap();
    registry
}

pub fn scene_with(config: EngineConfig) -> TransactionSystem {
    let mut system = TransactionSystem::new(config, registry());
    system.register_default_store::<Counter>(COUNTER).unwrap();
    system.register_default_store::<AuditLog>(AUDIT_LOG).unwrap();
    system.register_default_store::<Trail>(TRAIL).unwrap();
    system
}

pub fn scene() -> TransactionSystem {
    scene_with(EngineConfig::default())
}

// ---------------------------------------------------------------------------
// Frame helpers
// ---------------------------------------------------------------------------

pub fn counter(system: &TransactionSystem) -> i64 {
    system.store::<Counter>(COUNTER).unwrap().value
}

pub fn audit_lines(system: &TransactionSystem) -> Vec<String> {
    system.store::<AuditLog>(AUDIT_LOG).unwrap().lines.clone()
}

pub fn trail(system: &TransactionSystem) -> Vec<String> {
    system.store::<Trail>(TRAIL).unwrap().undone.clone()
}

/// Propose one event and flush the frame.
pub fn commit<A: Action>(system: &mut TransactionSystem, kind: EventKind, action: A) -> EventKind {
    system.context().propose(kind, action).unwrap();
    system.on_update().unwrap()
}

pub fn increment(system: &mut TransactionSystem, delta: i64) -> EventKind {
    commit(system, INCREMENT, Increment { delta })
}

pub fn undo(system: &mut TransactionSystem) -> EventKind {
    system.request_undo();
    system.on_update().unwrap()
}

pub fn redo(system: &mut TransactionSystem) -> EventKind {
    system.request_redo();
    system.on_update().unwrap()
}
