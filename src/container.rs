//! The container aggregate: composition of an occupancy grid and an
//! item catalogue, plus the public API surface from spec section 6.
//!
//! Design Notes section 9 calls for re-modeling the source's
//! inheritance chain (spatial grid -> enhanced grid -> container) as
//! composition instead: a container owns a grid and a catalogue, and
//! visibility/ranking stay free functions over those two aggregates
//! rather than methods climbing an inheritance chain.

use log::{debug, trace};

use crate::cancellation::CancellationToken;
use crate::catalogue::Catalogue;
use crate::config::EngineConfig;
use crate::error::{Result, StowageError};
use crate::geometry::{Coordinate, Dimensions};
use crate::grid::OccupancyGrid;
use crate::item::{CalendarDay, Item, ItemId, PlacedItem};
use crate::metrics::{ExpiringItem, FragmentationReport, Recommendation};
use crate::orientation::Orientation;
use crate::placement::{find_valid_placements, PlacementCandidate};
use crate::ranker::{rank_candidates, PlacementMode};
use crate::retrieval::{self, RetrievalPlan};
use crate::visibility;

/// The single face through which items enter and leave a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenFace {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl OpenFace {
    /// The axis perpendicular to this face (0 = x, 1 = y, 2 = z).
    pub fn axis(self) -> usize {
        match self {
            OpenFace::Left | OpenFace::Right => 0,
            OpenFace::Front | OpenFace::Back => 1,
            OpenFace::Bottom | OpenFace::Top => 2,
        }
    }

    pub(crate) fn direction(self) -> visibility::Direction {
        match self {
            OpenFace::Front | OpenFace::Left | OpenFace::Bottom => visibility::Direction::Negative,
            OpenFace::Back | OpenFace::Right | OpenFace::Top => visibility::Direction::Positive,
        }
    }
}

/// The closed configuration record a caller passes to `place_item`.
/// Design Notes section 9: a dynamic "options bag" is replaced with an
/// explicit struct with optional fields — there is no way to pass an
/// unrecognized field since this is a plain Rust type, not a map.
#[derive(Debug, Clone, Default)]
pub struct PlaceOptions {
    pub mode: PlacementMode,
    pub preferred_pos: Option<Coordinate>,
    pub preferred_orientation: Option<Orientation>,
}

/// The chosen position/orientation for a successfully placed item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    pub position: Coordinate,
    pub orientation: Orientation,
    pub eff_dims: Dimensions,
}

/// A rectangular container: zone, dimensions, one open face, and the
/// occupancy grid + catalogue of whatever is currently stowed in it.
pub struct Container {
    pub id: String,
    pub zone: String,
    dims: Dimensions,
    open_face: OpenFace,
    grid: OccupancyGrid,
    catalogue: Catalogue,
    config: EngineConfig,
}

impl Container {
    pub fn new(id: impl Into<String>, zone: impl Into<String>, dims: Dimensions, open_face: OpenFace) -> Self {
        Self::with_config(id, zone, dims, open_face, EngineConfig::default())
    }

    pub fn with_config(
        id: impl Into<String>,
        zone: impl Into<String>,
        dims: Dimensions,
        open_face: OpenFace,
        config: EngineConfig,
    ) -> Self {
        Self {
            id: id.into(),
            zone: zone.into(),
            dims,
            open_face,
            grid: OccupancyGrid::new(dims),
            catalogue: Catalogue::new(),
            config,
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn open_face(&self) -> OpenFace {
        self.open_face
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.catalogue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalogue.is_empty()
    }

    pub fn get(&self, id: &ItemId) -> Option<&PlacedItem> {
        self.catalogue.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlacedItem> {
        self.catalogue.iter()
    }

    /// Enumerates every feasible `(position, orientation, eff_dims)`
    /// for a box of `dims`, across the six orientations in
    /// orientation-then-position order (spec 4.6).
    pub fn find_valid_placements(&self, dims: Dimensions) -> Vec<PlacementCandidate> {
        find_valid_placements(&self.grid, dims)
    }

    pub fn check_space_availability(&self, dims: Dimensions) -> bool {
        !self.find_valid_placements(dims).is_empty()
    }

    /// Finds a placement for `item` per `options.mode`, commits it to
    /// the grid and catalogue, and returns the chosen position and
    /// orientation.
    pub fn place_item(&mut self, item: Item, options: PlaceOptions) -> Result<PlacementOutcome> {
        if self.catalogue.contains(&item.id) {
            return Err(StowageError::Conflict(format!("item {} is already placed in this container", item.id)));
        }

        let chosen = match (options.preferred_pos, options.preferred_orientation) {
            (Some(pos), Some(orientation)) => {
                let eff_dims = orientation.apply(item.dims);
                if !self.grid.is_free(pos, eff_dims) {
                    return Err(StowageError::Conflict(format!(
                        "preferred position ({}, {}, {}) for item {} is not free",
                        pos.x, pos.y, pos.z, item.id
                    )));
                }
                PlacementCandidate { position: pos, orientation, eff_dims }
            }
            (None, None) => {
                let candidates = find_valid_placements(&self.grid, item.dims);
                rank_candidates(&self.grid, self.open_face, &self.config, &self.catalogue, &item, candidates, options.mode)
                    .ok_or_else(|| StowageError::Conflict(format!("no feasible placement for item {}", item.id)))?
            }
            _ => {
                return Err(StowageError::InvalidArgument(
                    "preferred_pos and preferred_orientation must be given together or not at all".into(),
                ))
            }
        };

        self.grid.occupy(chosen.position, chosen.eff_dims, item.id.clone())?;
        debug!(
            "placed item {} at ({}, {}, {}) orientation {:?}",
            item.id, chosen.position.x, chosen.position.y, chosen.position.z, chosen.orientation.axes()
        );
        let placed = PlacedItem::new(item, chosen.position, chosen.orientation);
        self.catalogue.insert(placed);

        Ok(PlacementOutcome {
            position: chosen.position,
            orientation: chosen.orientation,
            eff_dims: chosen.eff_dims,
        })
    }

    /// Removes an item, freeing its cells. Blocked by other items in
    /// its extraction corridor, in which case the retrieval plan to
    /// clear them is returned alongside the error.
    pub fn remove_item(&mut self, id: &ItemId) -> Result<PlacedItem> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        let blockers = visibility::find_blocking_items(&self.grid, self.open_face, id, item);
        if !blockers.is_empty() {
            let plan = RetrievalPlan { target: id.clone(), moves: blockers };
            return Err(StowageError::NotAccessible { id: id.clone(), plan });
        }

        self.grid.release(id);
        let removed = self.catalogue.remove(id).expect("already confirmed present above");
        trace!("removed item {id}");
        Ok(removed)
    }

    pub fn visibility_score(&self, id: &ItemId) -> Result<f64> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        Ok(visibility::visibility_score(&self.grid, self.open_face, id, item))
    }

    pub fn accessibility_score(&self, id: &ItemId) -> Result<f64> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        Ok(visibility::accessibility_score(&self.grid, self.open_face, id, item))
    }

    pub fn is_item_visible(&self, id: &ItemId) -> Result<bool> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        Ok(visibility::is_item_visible(self.open_face, self.dims, item))
    }

    pub fn blocking_items(&self, id: &ItemId) -> Result<Vec<ItemId>> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        Ok(visibility::find_blocking_items(&self.grid, self.open_face, id, item))
    }

    pub fn retrieval_plan(&self, id: &ItemId) -> Result<RetrievalPlan> {
        let item = self.catalogue.get(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        Ok(retrieval::retrieval_plan(&self.grid, self.open_face, id, item))
    }

    pub fn utilization(&self) -> f64 {
        crate::metrics::utilization(self.dims, &self.catalogue)
    }

    pub fn fragmentation(&self, cancel: &CancellationToken) -> Result<FragmentationReport> {
        crate::metrics::fragmentation_analysis(&self.grid, cancel)
    }

    pub fn expiring_within(&self, today: CalendarDay, days: u32) -> Vec<ExpiringItem> {
        crate::metrics::expiring_within(&self.grid, self.open_face, &self.catalogue, today, days)
    }

    pub fn recommendations(&self, today: CalendarDay, cancel: &CancellationToken) -> Result<Vec<Recommendation>> {
        crate::metrics::recommendations(&self.grid, self.open_face, &self.catalogue, &self.config, today, cancel)
    }

    /// Records one use of `id` against its usage budget, marking it
    /// waste once the budget is exhausted (spec 3 invariant 5/6).
    pub fn use_item(&mut self, id: &ItemId) -> Result<()> {
        let item = self.catalogue.get_mut(id).ok_or_else(|| StowageError::NotFound(id.clone()))?;
        item.record_use()
    }

    /// Marks every item whose expiry has passed `today` as waste,
    /// returning the ids newly marked.
    pub fn mark_expired(&mut self, today: CalendarDay) -> Vec<ItemId> {
        let mut newly_waste = Vec::new();
        for item in self.catalogue.iter() {
            if !item.is_waste && matches!(item.expiry, Some(e) if e <= today) {
                newly_waste.push(item.id.clone());
            }
        }
        for id in &newly_waste {
            if let Some(item) = self.catalogue.get_mut(id) {
                item.mark_waste();
            }
        }
        newly_waste
    }

}
