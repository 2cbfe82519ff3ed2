use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use starknet_rs_core::types::Felt;
use tokio::sync::OwnedMutexGuard;

/// Serializes "check declared, then declare" per class hash, so that concurrent callers for the
/// same class observe each other's declaration instead of submitting twice.
///
/// Classes declared through the registry are remembered, since a node may not report a fresh
/// declaration until its block is built.
#[derive(Debug, Default)]
pub(crate) struct InFlightDeclarations {
    slots: Mutex<HashMap<Felt, Arc<tokio::sync::Mutex<()>>>>,
    declared: Mutex<HashSet<Felt>>,
}

/// Exclusive hold on a class hash; released on drop.
#[derive(Debug)]
pub(crate) struct DeclarationSlot<'a> {
    registry: &'a InFlightDeclarations,
    class_hash: Felt,
    guard: Option<OwnedMutexGuard<()>>,
}

impl InFlightDeclarations {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Waits until no other caller holds `class_hash`, then holds it.
    pub(crate) async fn acquire(&self, class_hash: Felt) -> DeclarationSlot<'_> {
        let slot = {
            let mut slots = self.slots.lock();
            // entries of waiters that were cancelled before getting their slot
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            slots.entry(class_hash).or_default().clone()
        };
        let guard = slot.lock_owned().await;

        DeclarationSlot { registry: self, class_hash, guard: Some(guard) }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DeclarationSlot<'_> {
    /// Whether the held class was declared earlier through this registry.
    pub(crate) fn is_declared(&self) -> bool {
        self.registry.declared.lock().contains(&self.class_hash)
    }

    pub(crate) fn mark_declared(&self) {
        self.registry.declared.lock().insert(self.class_hash);
    }
}

impl Drop for DeclarationSlot<'_> {
    fn drop(&mut self) {
        // the map lock is taken first so that no caller can clone the slot in between
        let mut slots = self.registry.slots.lock();
        drop(self.guard.take());

        if slots.get(&self.class_hash).is_some_and(|slot| Arc::strong_count(slot) == 1) {
            slots.remove(&self.class_hash);
        }
    }
}
