//! Visibility, blocking and accessibility scoring, tied to a
//! container's open face.
//!
//! These are free functions over an `OccupancyGrid` and an
//! `OpenFace` rather than methods on `Container` — Design Notes'
//! "re-model as composition" guidance: visibility/ranking have no
//! state of their own, they just read the grid.

use crate::container::OpenFace;
use crate::geometry::{overlaps, CellBox, Coordinate, Dimensions, Unit};
use crate::grid::OccupancyGrid;
use crate::item::{ItemId, PlacedItem};

/// True iff `item`'s box touches the container's open face.
///
/// The spec's source material compares the *near* face to `depth-1`
/// for "back", which is inconsistent with how the other five faces
/// are checked. This implementation picks the single consistent rule
/// Design Notes asks for: an item is visible iff its extraction-side
/// face sits flush with the open face's own coordinate, for every
/// face alike.
pub fn is_item_visible(open_face: OpenFace, dims: Dimensions, item: &PlacedItem) -> bool {
    let axis = open_face.axis();
    let axis_max = dims.on_axis(axis);
    touches_face(open_face, axis_max, item.cell_box())
}

fn touches_face(open_face: OpenFace, axis_max: Unit, b: CellBox) -> bool {
    let axis = open_face.axis();
    let (min, max) = b.axis_bounds(axis);
    match open_face.direction() {
        Direction::Negative => min == 0,
        Direction::Positive => max == axis_max,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    Negative,
    Positive,
}

/// True iff every cell strictly between `(x, y, z)` and the open face
/// along the extraction axis is either empty or owned by `id` itself
/// (an item may partially shadow itself).
pub fn is_cell_visible(grid: &OccupancyGrid, open_face: OpenFace, pos: Coordinate, id: &ItemId) -> bool {
    let axis = open_face.axis();
    let axis_max = grid.dims().on_axis(axis);
    let c_axis = pos.on_axis(axis);

    for between in cells_between(open_face.direction(), c_axis, axis_max) {
        let mut probe = pos;
        set_axis(&mut probe, axis, between);
        if let Some(occupant) = grid.cell_at(probe) {
            if &occupant != id {
                return false;
            }
        }
    }
    true
}

/// Range of axis coordinates strictly between `c_axis` and the open
/// face, not including `c_axis` itself.
fn cells_between(direction: Direction, c_axis: Unit, axis_max: Unit) -> std::ops::Range<Unit> {
    match direction {
        Direction::Negative => 0..c_axis,
        Direction::Positive => (c_axis + 1)..axis_max,
    }
}

fn set_axis(c: &mut Coordinate, axis: usize, value: Unit) {
    match axis {
        0 => c.x = value,
        1 => c.y = value,
        2 => c.z = value,
        _ => unreachable!("axis index out of range: {axis}"),
    }
}

/// `100 * visible_cells / total_cells`, iterating over the item's box.
pub fn visibility_score(grid: &OccupancyGrid, open_face: OpenFace, id: &ItemId, item: &PlacedItem) -> f64 {
    let b = item.cell_box();
    let (x0, x1) = b.axis_bounds(0);
    let (y0, y1) = b.axis_bounds(1);
    let (z0, z1) = b.axis_bounds(2);

    let mut total = 0u64;
    let mut visible = 0u64;
    for x in x0..x1 {
        for y in y0..y1 {
            for z in z0..z1 {
                total += 1;
                let pos = Coordinate { x, y, z };
                if is_cell_visible(grid, open_face, pos, id) {
                    visible += 1;
                }
            }
        }
    }

    if total == 0 {
        return 0.0;
    }
    100.0 * (visible as f64) / (total as f64)
}

/// The rectangular extraction corridor for `item`: its footprint on
/// the two axes perpendicular to the extraction axis, extruded from
/// its near face to the open face. `None` if the corridor has zero
/// length (e.g. the item already sits at the open face, or its near
/// face coordinate is exactly 0 under a negative-direction face —
/// the boundary case the spec calls out rather than treating as an
/// error).
fn corridor_box(grid: &OccupancyGrid, open_face: OpenFace, item: &PlacedItem) -> Option<CellBox> {
    let axis = open_face.axis();
    let axis_max = grid.dims().on_axis(axis);
    let b = item.cell_box();
    let (corridor_start, corridor_len) = match open_face.direction() {
        Direction::Negative => {
            let near = b.axis_bounds(axis).0;
            (0, near)
        }
        Direction::Positive => {
            let near = b.axis_bounds(axis).1;
            (near, axis_max - near)
        }
    };
    if corridor_len <= 0 {
        return None;
    }

    let mut pos = item.position;
    let mut dims = item.eff_dims;
    set_axis(&mut pos, axis, corridor_start);
    set_axis_dim(&mut dims, axis, corridor_len);
    Some(CellBox::new(pos, dims))
}

fn set_axis_dim(dims: &mut Dimensions, axis: usize, value: Unit) {
    match axis {
        0 => dims.w = value,
        1 => dims.d = value,
        2 => dims.h = value,
        _ => unreachable!("axis index out of range: {axis}"),
    }
}

/// Every distinct id (other than `id` itself) occupying at least one
/// cell of `item`'s extraction corridor. This is a *direct shadow*
/// model: only items inside the target's own projected footprint
/// block it, not items merely sharing the same depth plane outside
/// that footprint.
pub fn find_blocking_items(grid: &OccupancyGrid, open_face: OpenFace, id: &ItemId, item: &PlacedItem) -> Vec<ItemId> {
    let Some(corridor) = corridor_box(grid, open_face, item) else {
        return Vec::new();
    };
    grid.ids_in_box(&corridor).into_iter().filter(|occupant| occupant != id).collect()
}

/// Weighted accessibility score combining visibility, blocker count
/// and distance-to-face, per spec 4.5.
pub fn accessibility_score(grid: &OccupancyGrid, open_face: OpenFace, id: &ItemId, item: &PlacedItem) -> f64 {
    let visibility = visibility_score(grid, open_face, id, item);

    let blockers = find_blocking_items(grid, open_face, id, item).len() as f64;
    let blocker_component = (40.0 - 10.0 * blockers).max(0.0) / 40.0 * 100.0;

    let axis = open_face.axis();
    let axis_max = grid.dims().on_axis(axis) as f64;
    let b = item.cell_box();
    let distance = match open_face.direction() {
        Direction::Negative => b.axis_bounds(axis).0 as f64,
        Direction::Positive => axis_max - b.axis_bounds(axis).1 as f64,
    };
    let distance_component = (20.0 - 20.0 * distance / axis_max).max(0.0) / 20.0 * 100.0;

    0.40 * visibility + 0.40 * blocker_component + 0.20 * distance_component
}
