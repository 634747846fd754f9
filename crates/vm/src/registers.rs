//! Register bank: slot → value storage with no eviction.

use std::collections::BTreeMap;

use stackm_common::{Slot, Word};

/// Values captured by `store`, keyed by slot.
///
/// Registers live independently of the value stack: popping a value does
/// not clear a register that holds a copy of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterBank {
    slots: BTreeMap<Slot, Word>,
}

impl RegisterBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `slot` to `value`, overwriting any prior value.
    pub fn store(&mut self, slot: Slot, value: Word) {
        self.slots.insert(slot, value);
    }

    /// The value held at `slot`, if it was ever stored.
    pub fn load(&self, slot: Slot) -> Option<Word> {
        self.slots.get(&slot).copied()
    }

    pub fn contains(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Word)> + '_ {
        self.slots.iter().map(|(&slot, &value)| (slot, value))
    }
}
