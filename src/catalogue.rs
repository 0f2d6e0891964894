//! Per-container record of placed items, plus the priority and expiry
//! indexes that keep themselves consistent across add/remove/waste
//! transitions.
//!
//! The indexes are `rustc_hash::FxHashSet`s the same way
//! `examples/oinoom-blocker/src/solver.rs` uses an `FxHashSet` to
//! dedupe search states: these lookups are in a hot path (every
//! placement ranking pass walks the priority index) and don't need a
//! DoS-resistant hasher.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::item::{CalendarDay, ItemId, PlacedItem, Priority};

/// All items currently placed in one container, indexed for fast
/// priority/expiry queries.
#[derive(Debug, Default)]
pub struct Catalogue {
    items: FxHashMap<ItemId, PlacedItem>,
    by_priority: FxHashMap<PriorityKey, FxHashSet<ItemId>>,
    by_expiry: FxHashMap<CalendarDay, FxHashSet<ItemId>>,
}

/// `Priority` isn't `Hash`/`Eq` on its own merit (it's a tier, not a
/// value caller code should hash elsewhere), so the index keys on a
/// small copy type local to this module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PriorityKey {
    High,
    Medium,
    Low,
}

impl From<Priority> for PriorityKey {
    fn from(p: Priority) -> Self {
        match p {
            Priority::High => PriorityKey::High,
            Priority::Medium => PriorityKey::Medium,
            Priority::Low => PriorityKey::Low,
        }
    }
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&PlacedItem> {
        self.items.get(id)
    }

    pub fn get_mut(&mut self, id: &ItemId) -> Option<&mut PlacedItem> {
        self.items.get_mut(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedItem> {
        self.items.values()
    }

    pub fn insert(&mut self, item: PlacedItem) {
        let id = item.id.clone();
        self.by_priority.entry(item.priority.into()).or_default().insert(id.clone());
        if let Some(expiry) = item.expiry {
            self.by_expiry.entry(expiry).or_default().insert(id.clone());
        }
        self.items.insert(id, item);
    }

    /// Removes an item and scrubs it from every index. Returns the
    /// removed record, or `None` if `id` wasn't present.
    pub fn remove(&mut self, id: &ItemId) -> Option<PlacedItem> {
        let item = self.items.remove(id)?;
        if let Some(set) = self.by_priority.get_mut(&item.priority.into()) {
            set.remove(id);
        }
        if let Some(expiry) = item.expiry {
            if let Some(set) = self.by_expiry.get_mut(&expiry) {
                set.remove(id);
            }
        }
        Some(item)
    }

    pub fn ids_with_priority(&self, priority: Priority) -> impl Iterator<Item = &ItemId> {
        self.by_priority.get(&priority.into()).into_iter().flatten()
    }

    pub fn ids_expiring_on(&self, day: CalendarDay) -> impl Iterator<Item = &ItemId> {
        self.by_expiry.get(&day).into_iter().flatten()
    }

    /// Items whose expiry falls on or before `today + days`, sorted
    /// ascending by expiry date.
    pub fn expiring_within(&self, today: CalendarDay, days: u32) -> Vec<&PlacedItem> {
        let cutoff = today.plus_days(days);
        let mut matches: Vec<&PlacedItem> = self
            .items
            .values()
            .filter(|item| matches!(item.expiry, Some(e) if e <= cutoff))
            .collect();
        matches.sort_by_key(|item| item.expiry.unwrap());
        matches
    }
}
