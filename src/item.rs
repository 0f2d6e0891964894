//! Item value types: the input `Item` a caller submits, the `PlacedItem`
//! record a container keeps once it accepts one, and the small enums
//! (`Priority`) and newtypes (`ItemId`, `CalendarDay`) they're built
//! from.

use std::fmt;

use crate::error::{Result, StowageError};
use crate::geometry::{CellBox, Coordinate, Dimensions};
use crate::orientation::Orientation;

/// Opaque item identity. A newtype rather than a bare `String` so a
/// caller can't accidentally pass a zone name where an id is expected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub String);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId(s)
    }
}

/// An ordinal calendar day, monotonically comparable. The external
/// time-simulation collaborator is the source of truth for "today";
/// this engine only ever compares day numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDay(pub u32);

impl CalendarDay {
    pub fn plus_days(self, days: u32) -> Self {
        CalendarDay(self.0 + days)
    }
}

/// Priority tier. The spec also allows an integer 1..=100 at the
/// input boundary; `Priority::from_score` implements the documented
/// mapping (`>=67` high, `>=34` medium, else low).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn from_score(score: u8) -> Result<Self> {
        if score == 0 || score > 100 {
            return Err(StowageError::InvalidArgument(format!(
                "priority score {score} out of range 1..=100"
            )));
        }
        Ok(if score >= 67 {
            Priority::High
        } else if score >= 34 {
            Priority::Medium
        } else {
            Priority::Low
        })
    }

    /// Weight applied by the ranker (`mu` in spec 4.7), before the
    /// expiry bonus.
    pub fn base_multiplier(self) -> f64 {
        match self {
            Priority::High => 1.5,
            Priority::Medium => 1.0,
            Priority::Low => 0.8,
        }
    }
}

/// An item submitted by the caller, not yet placed.
#[derive(Debug, Clone)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub dims: Dimensions,
    pub mass: f64,
    pub priority: Priority,
    pub expiry: Option<CalendarDay>,
    pub usage_limit: Option<u32>,
    pub preferred_zone: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>, dims: Dimensions, mass: f64, priority: Priority) -> Result<Self> {
        if mass <= 0.0 {
            return Err(StowageError::InvalidArgument(format!("mass {mass} must be positive")));
        }
        Ok(Self {
            id: id.into(),
            name: name.into(),
            dims,
            mass,
            priority,
            expiry: None,
            usage_limit: None,
            preferred_zone: None,
        })
    }

    pub fn with_expiry(mut self, expiry: CalendarDay) -> Self {
        self.expiry = Some(expiry);
        self
    }

    pub fn with_usage_limit(mut self, limit: u32) -> Self {
        self.usage_limit = Some(limit);
        self
    }

    pub fn with_preferred_zone(mut self, zone: impl Into<String>) -> Self {
        self.preferred_zone = Some(zone.into());
        self
    }
}

/// An item a container has accepted, with its chosen position and
/// orientation plus mutable usage/waste state.
#[derive(Debug, Clone)]
pub struct PlacedItem {
    pub id: ItemId,
    pub name: String,
    pub orig_dims: Dimensions,
    pub orientation: Orientation,
    pub eff_dims: Dimensions,
    pub position: Coordinate,
    pub mass: f64,
    pub priority: Priority,
    pub expiry: Option<CalendarDay>,
    pub usage_limit: Option<u32>,
    pub usage_count: u32,
    pub preferred_zone: Option<String>,
    pub is_waste: bool,
}

impl PlacedItem {
    pub fn new(item: Item, position: Coordinate, orientation: Orientation) -> Self {
        let eff_dims = orientation.apply(item.dims);
        Self {
            id: item.id,
            name: item.name,
            orig_dims: item.dims,
            orientation,
            eff_dims,
            position,
            mass: item.mass,
            priority: item.priority,
            expiry: item.expiry,
            usage_limit: item.usage_limit,
            usage_count: 0,
            preferred_zone: item.preferred_zone,
            is_waste: false,
        }
    }

    pub fn cell_box(&self) -> CellBox {
        CellBox::new(self.position, self.eff_dims)
    }

    /// Records one use against the usage budget. Once `usage_count`
    /// reaches `usage_limit`, the item becomes waste; any use
    /// attempted after that point is rejected as `Exhausted`
    /// (invariant 5/6 in spec 3: `usage_count <= usage_limit`,
    /// `is_waste` never reverts to false).
    pub fn record_use(&mut self) -> Result<()> {
        if self.is_waste {
            return Err(StowageError::Exhausted(self.id.clone()));
        }
        if let Some(limit) = self.usage_limit {
            if self.usage_count >= limit {
                self.is_waste = true;
                return Err(StowageError::Exhausted(self.id.clone()));
            }
            self.usage_count += 1;
            if self.usage_count == limit {
                self.is_waste = true;
            }
        } else {
            self.usage_count += 1;
        }
        Ok(())
    }

    /// Marks the item waste (e.g. due to expiry). Idempotent.
    pub fn mark_waste(&mut self) {
        self.is_waste = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_from_score_matches_documented_thresholds() {
        assert!(matches!(Priority::from_score(100).unwrap(), Priority::High));
        assert!(matches!(Priority::from_score(67).unwrap(), Priority::High));
        assert!(matches!(Priority::from_score(66).unwrap(), Priority::Medium));
        assert!(matches!(Priority::from_score(34).unwrap(), Priority::Medium));
        assert!(matches!(Priority::from_score(33).unwrap(), Priority::Low));
        assert!(matches!(Priority::from_score(1).unwrap(), Priority::Low));
    }

    #[test]
    fn priority_from_score_rejects_out_of_range() {
        assert!(Priority::from_score(0).is_err());
        assert!(Priority::from_score(101).is_err());
    }

    #[test]
    fn usage_budget_transitions_to_waste_then_exhausted() {
        let item = Item::new("I1", "widget", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low)
            .unwrap()
            .with_usage_limit(3);
        let mut placed = PlacedItem::new(item, Coordinate::origin(), Orientation::identity());

        placed.record_use().unwrap();
        assert!(!placed.is_waste);
        placed.record_use().unwrap();
        assert!(!placed.is_waste);
        placed.record_use().unwrap();
        assert!(placed.is_waste, "third use should exhaust the budget and mark waste");

        let err = placed.record_use().unwrap_err();
        assert!(matches!(err, StowageError::Exhausted(_)));
    }

    #[test]
    fn waste_never_reverts() {
        let item = Item::new("I1", "widget", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low).unwrap();
        let mut placed = PlacedItem::new(item, Coordinate::origin(), Orientation::identity());
        placed.mark_waste();
        assert!(placed.is_waste);
        // no API reverts is_waste to false; record_use only ever exhausts further.
        assert!(placed.record_use().is_err());
        assert!(placed.is_waste);
    }
}
