//! Append-only, never-truncated sequence of bundles.
//!
//! There is no stored cursor. Every Undo and Redo is appended as its own
//! bundle, and the next target in either direction is recomputed by a
//! backward count from the tail.

use rewind_common::{EventKind, Result};
use rewind_stores::StoreRegistry;
use tracing::{debug, warn};

use crate::bundle::EventBundle;
use crate::event::Direction;
use crate::journal::JournalEntry;
use crate::metadata::MetadataRegistry;

#[derive(Debug, Default)]
pub struct EventHistory {
    bundles: Vec<EventBundle>,
}

impl EventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bundle. Returns its index.
    pub fn push(&mut self, bundle: EventBundle) -> usize {
        self.bundles.push(bundle);
        self.bundles.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&EventBundle> {
        self.bundles.get(index)
    }

    pub fn last(&self) -> Option<&EventBundle> {
        self.bundles.last()
    }

    /// The tail bundle, for folding continuations and secondary events into.
    pub fn last_mut(&mut self) -> Option<&mut EventBundle> {
        self.bundles.last_mut()
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EventBundle> {
        self.bundles.iter()
    }

    /// Leading kinds of every bundle, oldest first.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.bundles.iter().map(EventBundle::kind).collect()
    }

    /// Find the bundle the next Undo (or Redo) applies to.
    ///
    /// Walks backwards, skipping secondary bundles, counting UNDO, REDO and
    /// real-action bundles. A real bundle is the Undo target once
    /// `real > undo - redo`, and the Redo target when `real == undo - redo`.
    /// Reaching a real bundle with `redo >= undo` and no match means nothing
    /// further back can be a candidate.
    pub fn resolve(&self, direction: Direction) -> Option<usize> {
        let mut undo_count: i64 = 0;
        let mut redo_count: i64 = 0;
        let mut real_count: i64 = 0;

        for (index, bundle) in self.bundles.iter().enumerate().rev() {
            if bundle.is_secondary() {
                continue;
            }
            match bundle.kind() {
                EventKind::UNDO => undo_count += 1,
                EventKind::REDO => redo_count += 1,
                _ => {
                    real_count += 1;
                    let outstanding = undo_count - redo_count;
                    let matched = match direction {
                        Direction::Undo => real_count > outstanding,
                        Direction::Redo => real_count == outstanding,
                    };
                    if matched {
                        return Some(index);
                    }
                    if redo_count >= undo_count {
                        return None;
                    }
                }
            }
        }

        None
    }

    /// Reverse bundle `target`: first the secondary bundle directly after it,
    /// newest member first, then its own leading event.
    ///
    /// Returns `false` if `target` does not exist.
    pub fn undo_bundle(&mut self, target: usize, stores: &mut StoreRegistry) -> Result<bool> {
        if target >= self.bundles.len() {
            return Ok(false);
        }

        if let Some(effects) = self.secondary_after(target) {
            debug!(target, effects = effects.len(), "Unwinding secondary effects");
            for event in effects.events_mut().iter_mut().rev() {
                event.undo(stores)?;
            }
        }

        self.bundles[target].leading_mut().undo(stores)?;
        Ok(true)
    }

    /// Re-apply bundle `target`: its leading event, then the secondary bundle
    /// directly after it in insertion order.
    ///
    /// Returns `false` if `target` does not exist or its leading event
    /// declines to execute; nothing is re-applied in that case.
    pub fn redo_bundle(&mut self, target: usize, stores: &mut StoreRegistry) -> Result<bool> {
        let Some(bundle) = self.bundles.get_mut(target) else {
            return Ok(false);
        };
        if !bundle.leading_mut().execute(stores)? {
            return Ok(false);
        }

        if let Some(effects) = self.secondary_after(target) {
            debug!(target, effects = effects.len(), "Re-applying secondary effects");
            for event in effects.events_mut() {
                if !event.execute(stores)? {
                    warn!(target, kind = %event.kind(), "Secondary effect declined on redo");
                }
            }
        }

        Ok(true)
    }

    /// Export every bundle as a [`JournalEntry`].
    pub fn journal(&self, registry: &MetadataRegistry) -> Vec<JournalEntry> {
        self.bundles
            .iter()
            .enumerate()
            .map(|(index, bundle)| JournalEntry::from_bundle(index, bundle, registry))
            .collect()
    }

    fn secondary_after(&mut self, target: usize) -> Option<&mut EventBundle> {
        self.bundles
            .get_mut(target + 1)
            .filter(|bundle| bundle.is_secondary())
    }
}
