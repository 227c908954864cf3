//! Demo scene: a counter, a panel of audit lines, and three event kinds.

use anyhow::Result;
use rewind_engine::{
    downcast_action, Action, EventKind, EventMetadata, MetadataRegistry,
    StoreKind, StoreRegistry, TransactionSystem,
};

pub const COUNTER: StoreKind = StoreKind(0);
pub const PANEL: StoreKind = StoreKind(1);

pub const INCREMENT: EventKind = EventKind(3);
pub const SLIDE: EventKind = EventKind(4);
pub const AUDIT: EventKind = EventKind(5);

#[derive(Debug, Default)]
pub struct Counter {
    pub value: i64,
}

#[derive(Debug, Default)]
pub struct Panel {
    pub lines: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Increment {
    pub delta: i64,
}

impl Action for Increment {
    fn execute(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<bool> {
        if self.delta == 0 {
            return Ok(false);
        }
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        let Some(value) = counter.value.checked_add(self.delta) else {
            tracing::warn!(value = counter.value, delta = self.delta, "Increment would overflow");
            return Ok(false);
        };
        counter.value = value;
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<()> {
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        // Inverse of a checked add that succeeded.
        counter.value = counter.value.wrapping_sub(self.delta);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("increment by {}", self.delta)
    }
}

#[derive(Debug, Default)]
pub struct Slide {
    pub to: i64,
    from: Option<i64>,
}

impl Slide {
    pub fn to(to: i64) -> Self {
        Self { to, from: None }
    }
}

impl Action for Slide {
    fn execute(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<bool> {
        let counter = stores.get_mut::<Counter>(COUNTER)?;
        if counter.value == self.to {
            return Ok(false);
        }
        self.from = Some(counter.value);
        counter.value = self.to;
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<()> {
        if let Some(from) = self.from {
            stores.get_mut::<Counter>(COUNTER)?.value = from;
        }
        Ok(())
    }

    fn merge(&mut self, next: &dyn Action) -> bool {
        let Some(next) = downcast_action::<Slide>(next) else {
            return false;
        };
        self.to = next.to;
        true
    }

    fn describe(&self) -> String {
        match self.from {
            Some(from) => format!("slide {from} -> {}", self.to),
            None => format!("slide -> {}", self.to),
        }
    }
}

/// Records a committed increment on the panel.
#[derive(Debug, Default)]
pub struct Audit {
    pub line: String,
}

impl Action for Audit {
    fn execute(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<bool> {
        stores.get_mut::<Panel>(PANEL)?.lines.push(self.line.clone());
        Ok(true)
    }

    fn undo(&mut self, stores: &mut StoreRegistry) -> rewind_engine::Result<()> {
        stores.get_mut::<Panel>(PANEL)?.lines.pop();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("audit {:?}", self.line)
    }
}

pub fn registry() -> Result<MetadataRegistry> {
    let registry = MetadataRegistry::new()
        .with(EventMetadata::of::<Increment>(INCREMENT, "increment"))?
        .with(EventMetadata::of::<Slide>(SLIDE, "slide").with_continuable(true))?
        .with(EventMetadata::of::<Audit>(AUDIT, "audit").with_secondary(true))?;
    Ok(registry)
}

pub fn register_stores(system: &mut TransactionSystem) -> Result<()> {
    system.register_default_store::<Counter>(COUNTER)?;
    system.register_store(PANEL, Panel::default, |panel: Panel| {
        tracing::debug!(lines = panel.lines.len(), "Panel destroyed");
    })?;
    Ok(())
}

#[cfg(test)]
pub fn build(config: rewind_engine::EngineConfig) -> Result<TransactionSystem> {
    let mut system = TransactionSystem::new(config, registry()?);
    register_stores(&mut system)?;
    Ok(system)
}
