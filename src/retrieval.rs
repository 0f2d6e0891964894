//! Retrieval planning: turning a target item's current blockers into
//! an ordered list of moves the caller must perform before the target
//! can come out.
//!
//! Pinned design decision (Design Notes): a plan lists only the
//! target's *direct* blockers, not the blockers-of-blockers a fully
//! recursive unstow would need. `Container::remove_item` surfaces a
//! fresh plan on every call, so a caller that moves the reported
//! blockers and retries gets the next layer, if any, for free — there
//! is no need to precompute the whole chain up front.

use crate::container::OpenFace;
use crate::grid::OccupancyGrid;
use crate::item::{ItemId, PlacedItem};
use crate::visibility;

/// One step of working through a retrieval plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrievalStep {
    /// Temporarily relocate this item; it is blocking the target.
    Move(ItemId),
    /// The target itself, now reachable.
    Retrieve(ItemId),
}

/// An ordered plan for extracting `target`: every direct blocker, in
/// the order `visibility::find_blocking_items` reports them, followed
/// by the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalPlan {
    pub target: ItemId,
    pub moves: Vec<ItemId>,
}

impl RetrievalPlan {
    /// True iff the target has no blockers: a single `Retrieve` step.
    pub fn is_direct(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn steps(&self) -> Vec<RetrievalStep> {
        let mut steps: Vec<RetrievalStep> = self.moves.iter().cloned().map(RetrievalStep::Move).collect();
        steps.push(RetrievalStep::Retrieve(self.target.clone()));
        steps
    }
}

/// Builds the retrieval plan for `target`, currently at `item`'s
/// position in `grid`.
pub fn retrieval_plan(grid: &OccupancyGrid, open_face: OpenFace, target: &ItemId, item: &PlacedItem) -> RetrievalPlan {
    let moves = visibility::find_blocking_items(grid, open_face, target, item);
    RetrievalPlan { target: target.clone(), moves }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coordinate, Dimensions};
    use crate::item::{Item, Priority};
    use crate::orientation::Orientation;

    fn item_at(id: &str, pos: (i64, i64, i64), dims: (i64, i64, i64)) -> PlacedItem {
        let item = Item::new(id, id, Dimensions::new(dims.0, dims.1, dims.2).unwrap(), 1.0, Priority::Low).unwrap();
        PlacedItem::new(item, Coordinate::new(pos.0, pos.1, pos.2).unwrap(), Orientation::identity())
    }

    #[test]
    fn unblocked_item_yields_a_direct_plan() {
        let mut grid = OccupancyGrid::new(Dimensions::new(4, 4, 4).unwrap());
        let item = item_at("ITEM001", (0, 0, 0), (2, 2, 2));
        grid.occupy(item.position, item.eff_dims, item.id.clone()).unwrap();

        let plan = retrieval_plan(&grid, OpenFace::Front, &item.id, &item);
        assert!(plan.is_direct());
        assert_eq!(plan.steps(), vec![RetrievalStep::Retrieve(item.id.clone())]);
    }

    #[test]
    fn blocked_item_yields_moves_then_retrieve() {
        let mut grid = OccupancyGrid::new(Dimensions::new(4, 4, 4).unwrap());
        let item_a = item_at("ITEM_A", (0, 0, 0), (2, 2, 2));
        let item_b = item_at("ITEM_B", (0, 2, 0), (2, 2, 2));
        grid.occupy(item_a.position, item_a.eff_dims, item_a.id.clone()).unwrap();
        grid.occupy(item_b.position, item_b.eff_dims, item_b.id.clone()).unwrap();

        let plan = retrieval_plan(&grid, OpenFace::Front, &item_b.id, &item_b);
        assert!(!plan.is_direct());
        assert_eq!(
            plan.steps(),
            vec![RetrievalStep::Move(item_a.id.clone()), RetrievalStep::Retrieve(item_b.id.clone())]
        );
    }

    #[test]
    fn plan_does_not_recurse_into_blockers_of_blockers() {
        // ITEM_C blocks ITEM_B blocks ITEM_A (all stacked along the
        // extraction axis); the plan for ITEM_A lists only ITEM_B and
        // ITEM_C as direct occupants of its corridor, in one flat list,
        // never asking what blocks ITEM_B or ITEM_C in turn.
        let mut grid = OccupancyGrid::new(Dimensions::new(2, 6, 2).unwrap());
        let item_a = item_at("ITEM_A", (0, 0, 0), (2, 2, 2));
        let item_b = item_at("ITEM_B", (0, 2, 0), (2, 2, 2));
        let item_c = item_at("ITEM_C", (0, 4, 0), (2, 2, 2));
        grid.occupy(item_a.position, item_a.eff_dims, item_a.id.clone()).unwrap();
        grid.occupy(item_b.position, item_b.eff_dims, item_b.id.clone()).unwrap();
        grid.occupy(item_c.position, item_c.eff_dims, item_c.id.clone()).unwrap();

        let plan = retrieval_plan(&grid, OpenFace::Front, &item_a.id, &item_a);
        assert_eq!(plan.moves, vec![item_b.id.clone(), item_c.id.clone()]);
    }
}
