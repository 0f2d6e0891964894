//! Placement search: enumerates every feasible `(position,
//! orientation)` pair for a candidate item's dimensions.
//!
//! Adapted from `examples/oinoom-blocker/src/solver.rs`'s
//! `build_placement_table`, which enumerates every orientation of a
//! puzzle piece against every grid cell and keeps the ones that fit.
//! This engine enumerates against *free* positions only (there's no
//! backtracking search to prune later — `Container::place_item` picks
//! one candidate per call, it doesn't need to try combinations of
//! many items at once).

use crate::geometry::Dimensions;
use crate::grid::OccupancyGrid;
use crate::orientation::{all_orientations, Orientation};

/// One feasible way to place an item: where, in what orientation, and
/// at what effective dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementCandidate {
    pub position: crate::geometry::Coordinate,
    pub orientation: Orientation,
    pub eff_dims: Dimensions,
}

/// Enumerates every `(position, orientation, eff_dims)` a box of
/// `orig_dims` could occupy in `grid`. The six orientations are tried
/// in the fixed order from `orientation::ALL_ORIENTATIONS`; positions
/// within an orientation follow the grid's row-major order. Both
/// orderings are part of the contract: they determine placement
/// ranking's enumeration-order tie-break (spec 4.7).
pub fn find_valid_placements(grid: &OccupancyGrid, orig_dims: Dimensions) -> Vec<PlacementCandidate> {
    let mut candidates = Vec::new();
    for orientation in all_orientations() {
        let eff_dims = orientation.apply(orig_dims);
        for position in grid.find_empty_positions(eff_dims) {
            candidates.push(PlacementCandidate { position, orientation, eff_dims });
        }
    }
    candidates
}
