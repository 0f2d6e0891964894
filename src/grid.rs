//! The container-sized 3D occupancy grid: a flat row-major array
//! mapping each unit cell to the id of the item occupying it, or to
//! nothing.
//!
//! Adapted from `examples/oinoom-blocker/src/grid.rs`'s
//! `coord_to_idx`/`idx_to_coord` pair, generalized from a cube
//! (`DIM^3`, one const generic) to an arbitrary rectangular container
//! (`w * d * h`, runtime dimensions) since cargo containers are not
//! all cubes.

use crate::cancellation::CancellationToken;
use crate::error::{Result, StowageError};
use crate::geometry::{contains, CellBox, Coordinate, Dimensions, Unit};
use crate::item::ItemId;

/// Container-sized occupancy array. Each cell is either empty or holds
/// exactly one item id (invariant 1/2 in spec section 3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    dims: Dimensions,
    cells: Vec<Option<ItemId>>,
}

impl OccupancyGrid {
    pub fn new(dims: Dimensions) -> Self {
        let len = dims.volume() as usize;
        Self {
            dims,
            cells: vec![None; len],
        }
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn bounding_box(&self) -> CellBox {
        CellBox::new(Coordinate::origin(), self.dims)
    }

    /// Row-major index: x changes slowest, z fastest. This ordering is
    /// part of the contract — it's what makes `find_empty_positions`'s
    /// enumeration order, and therefore placement-search tie-breaks,
    /// deterministic.
    fn index(&self, c: Coordinate) -> Option<usize> {
        if c.x < 0 || c.y < 0 || c.z < 0 || c.x >= self.dims.w || c.y >= self.dims.d || c.z >= self.dims.h {
            return None;
        }
        let (x, y, z) = (c.x as usize, c.y as usize, c.z as usize);
        let (d, h) = (self.dims.d as usize, self.dims.h as usize);
        Some((x * d + y) * h + z)
    }

    /// True iff every cell of the box at `pos`/`dims` is inside the
    /// container and currently empty.
    pub fn is_free(&self, pos: Coordinate, dims: Dimensions) -> bool {
        let candidate = CellBox::new(pos, dims);
        if !contains(&self.bounding_box(), &candidate) {
            return false;
        }
        self.iter_cells(&candidate).all(|idx| self.cells[idx].is_none())
    }

    /// Fills the box with `id`. Precondition: `is_free(pos, dims)`.
    /// Returns `Conflict` if any target cell is occupied or out of
    /// bounds, leaving the grid unchanged.
    pub fn occupy(&mut self, pos: Coordinate, dims: Dimensions, id: ItemId) -> Result<()> {
        if !self.is_free(pos, dims) {
            return Err(StowageError::Conflict(format!(
                "box at ({}, {}, {}) sized ({}, {}, {}) is not free",
                pos.x, pos.y, pos.z, dims.w, dims.d, dims.h
            )));
        }
        let candidate = CellBox::new(pos, dims);
        let indices: Vec<usize> = self.iter_cells(&candidate).collect();
        for idx in indices {
            self.cells[idx] = Some(id.clone());
        }
        Ok(())
    }

    /// Clears every cell currently holding `id`. Returns `true` if any
    /// cell was cleared, `false` (not an error) if `id` was not
    /// present — idempotent for an unknown id.
    pub fn release(&mut self, id: &ItemId) -> bool {
        let mut released = false;
        for cell in &mut self.cells {
            if cell.as_ref() == Some(id) {
                *cell = None;
                released = true;
            }
        }
        released
    }

    pub fn cell_at(&self, pos: Coordinate) -> Option<ItemId> {
        self.index(pos).and_then(|idx| self.cells[idx].clone())
    }

    fn iter_cells<'a>(&'a self, b: &CellBox) -> impl Iterator<Item = usize> + 'a {
        let (x0, x1) = b.axis_bounds(0);
        let (y0, y1) = b.axis_bounds(1);
        let (z0, z1) = b.axis_bounds(2);
        let (d, h) = (self.dims.d as usize, self.dims.h as usize);
        (x0..x1).flat_map(move |x| {
            (y0..y1).flat_map(move |y| (z0..z1).map(move |z| ((x as usize) * d + (y as usize)) * h + z as usize))
        })
    }

    /// Lazily yields every position at which a box of `dims` is free,
    /// in row-major `(x, y, z)` order. This order is part of the
    /// public contract (spec section 4.3): it determines placement
    /// search's tie-breaks.
    pub fn find_empty_positions<'a>(&'a self, dims: Dimensions) -> impl Iterator<Item = Coordinate> + 'a {
        let max_x = self.dims.w - dims.w;
        let max_y = self.dims.d - dims.d;
        let max_z = self.dims.h - dims.h;

        let valid_range = max_x >= 0 && max_y >= 0 && max_z >= 0;
        let (max_x, max_y, max_z) = if valid_range { (max_x, max_y, max_z) } else { (-1, -1, -1) };

        (0..=max_x).flat_map(move |x| {
            (0..=max_y).flat_map(move |y| {
                (0..=max_z).filter_map(move |z| {
                    let pos = Coordinate { x, y, z };
                    if self.is_free(pos, dims) {
                        Some(pos)
                    } else {
                        None
                    }
                })
            })
        })
    }

    /// Finds a maximal empty axis-aligned box: a box such that no
    /// larger box of the same shape class fits. Ties are broken by
    /// smallest `(x, y, z)`, then largest width, then depth, then
    /// height.
    ///
    /// This is the "straightforward" implementation the spec
    /// explicitly allows: for each candidate origin in row-major
    /// order, greedily grow width, then depth (holding width fixed),
    /// then height (holding width/depth fixed), and keep the best
    /// candidate by volume. It is a pure function of the current grid.
    pub fn find_largest_empty_box(&self, cancel: &CancellationToken) -> Result<Option<(Coordinate, Dimensions)>> {
        let (w, d, h) = (self.dims.w, self.dims.d, self.dims.h);
        let mut best: Option<(Coordinate, Dimensions)> = None;
        let mut best_volume = 0u64;

        for x in 0..w {
            for y in 0..d {
                for z in 0..h {
                    if cancel.is_cancelled() {
                        return Err(StowageError::Cancelled);
                    }
                    let origin = Coordinate { x, y, z };
                    if self.cell_at(origin).is_some() {
                        continue;
                    }

                    let max_w = self.free_run(origin, 0, w - x);
                    if max_w == 0 {
                        continue;
                    }
                    let max_d = self.free_run_2d(origin, max_w, d - y);
                    if max_d == 0 {
                        continue;
                    }
                    let max_h = self.free_run_3d(origin, max_w, max_d, h - z);
                    if max_h == 0 {
                        continue;
                    }

                    let dims = Dimensions { w: max_w, d: max_d, h: max_h };
                    let volume = dims.volume();
                    let better = match &best {
                        None => true,
                        Some((best_pos, best_dims)) => {
                            volume > best_volume
                                || (volume == best_volume
                                    && is_better_tiebreak(origin, dims, *best_pos, *best_dims))
                        }
                    };
                    if better {
                        best = Some((origin, dims));
                        best_volume = volume;
                    }
                }
            }
        }

        Ok(best)
    }

    /// Longest free run along x starting at `origin`, capped at `limit`.
    fn free_run(&self, origin: Coordinate, _axis: usize, limit: Unit) -> Unit {
        let mut run = 0;
        while run < limit {
            let pos = Coordinate { x: origin.x + run, y: origin.y, z: origin.z };
            if self.cell_at(pos).is_some() {
                break;
            }
            run += 1;
        }
        run
    }

    /// Longest free run along y such that the full `width x run` strip
    /// at `origin` stays empty, capped at `limit`.
    fn free_run_2d(&self, origin: Coordinate, width: Unit, limit: Unit) -> Unit {
        let mut run = 0;
        'grow: while run < limit {
            for x_off in 0..width {
                let pos = Coordinate { x: origin.x + x_off, y: origin.y + run, z: origin.z };
                if self.cell_at(pos).is_some() {
                    break 'grow;
                }
            }
            run += 1;
        }
        run
    }

    /// Longest free run along z such that the full `width x depth x run`
    /// slab at `origin` stays empty, capped at `limit`.
    fn free_run_3d(&self, origin: Coordinate, width: Unit, depth: Unit, limit: Unit) -> Unit {
        let mut run = 0;
        'grow: while run < limit {
            for x_off in 0..width {
                for y_off in 0..depth {
                    let pos = Coordinate {
                        x: origin.x + x_off,
                        y: origin.y + y_off,
                        z: origin.z + run,
                    };
                    if self.cell_at(pos).is_some() {
                        break 'grow;
                    }
                }
            }
            run += 1;
        }
        run
    }

    /// Renders every z-layer as an ASCII slice: `.` for an empty cell,
    /// otherwise the first character of the occupying item's id. Rows
    /// run top (`y = d-1`) to bottom (`y = 0`), matching
    /// `examples/oinoom-blocker/src/grid.rs`'s `format_solution`. Layers
    /// are joined with no trailing newline.
    pub fn format_occupancy(&self) -> String {
        let (w, d, h) = (self.dims.w, self.dims.d, self.dims.h);
        let mut lines = Vec::new();
        for z in 0..h {
            lines.push(format!("z={z}"));
            for y in (0..d).rev() {
                let mut row = String::new();
                for x in 0..w {
                    let ch = match self.cell_at(Coordinate { x, y, z }) {
                        Some(id) => id.0.chars().next().unwrap_or('?'),
                        None => '.',
                    };
                    row.push(ch);
                }
                lines.push(row);
            }
        }
        lines.join("\n")
    }

    /// Every distinct id touching the rectangular corridor described
    /// by `pos`/`dims`, excluding `None` cells.
    pub fn ids_in_box(&self, b: &CellBox) -> Vec<ItemId> {
        let mut ids = Vec::new();
        for idx in self.iter_cells(b) {
            if let Some(id) = &self.cells[idx] {
                if !ids.contains(id) {
                    ids.push(id.clone());
                }
            }
        }
        ids
    }

}

fn is_better_tiebreak(pos: Coordinate, dims: Dimensions, best_pos: Coordinate, best_dims: Dimensions) -> bool {
    let pos_key = (pos.x, pos.y, pos.z);
    let best_pos_key = (best_pos.x, best_pos.y, best_pos.z);
    if pos_key != best_pos_key {
        return pos_key < best_pos_key;
    }
    if dims.w != best_dims.w {
        return dims.w > best_dims.w;
    }
    if dims.d != best_dims.d {
        return dims.d > best_dims.d;
    }
    dims.h > best_dims.h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(w: Unit, d: Unit, h: Unit) -> Dimensions {
        Dimensions::new(w, d, h).unwrap()
    }

    fn coord(x: Unit, y: Unit, z: Unit) -> Coordinate {
        Coordinate::new(x, y, z).unwrap()
    }

    #[test]
    fn occupy_then_release_restores_emptiness() {
        let mut grid = OccupancyGrid::new(dims(4, 4, 4));
        let pos = coord(0, 0, 0);
        let item_dims = dims(2, 2, 2);
        let id: ItemId = "A".into();

        assert!(grid.is_free(pos, item_dims));
        grid.occupy(pos, item_dims, id.clone()).unwrap();
        assert!(!grid.is_free(pos, item_dims));

        assert!(grid.release(&id));
        assert!(grid.is_free(pos, item_dims));
    }

    #[test]
    fn release_of_unknown_id_is_idempotent_not_an_error() {
        let mut grid = OccupancyGrid::new(dims(2, 2, 2));
        assert!(!grid.release(&ItemId::from("ghost")));
    }

    #[test]
    fn occupy_over_occupied_cells_is_a_conflict_and_grid_is_unchanged() {
        let mut grid = OccupancyGrid::new(dims(2, 2, 2));
        grid.occupy(coord(0, 0, 0), dims(1, 1, 1), "A".into()).unwrap();
        let before = grid.clone_cells_for_test();

        let err = grid.occupy(coord(0, 0, 0), dims(1, 1, 1), "B".into());
        assert!(err.is_err());
        assert_eq!(before, grid.clone_cells_for_test());
    }

    #[test]
    fn find_empty_positions_is_row_major() {
        let grid = OccupancyGrid::new(dims(2, 2, 1));
        let positions: Vec<Coordinate> = grid.find_empty_positions(dims(1, 1, 1)).collect();
        let expected = vec![coord(0, 0, 0), coord(0, 1, 0), coord(1, 0, 0), coord(1, 1, 0)];
        assert_eq!(positions, expected);
    }

    #[test]
    fn full_container_has_single_largest_empty_box_of_full_size() {
        let grid = OccupancyGrid::new(dims(3, 2, 1));
        let token = CancellationToken::never();
        let (pos, found_dims) = grid.find_largest_empty_box(&token).unwrap().unwrap();
        assert_eq!(pos, coord(0, 0, 0));
        assert_eq!(found_dims, dims(3, 2, 1));
    }

    #[test]
    fn left_half_filled_yields_right_half_as_largest_empty_box() {
        // 8x8x1 container, left half (x in 0..4) filled by three items,
        // matching seed scenario 4.
        let mut grid = OccupancyGrid::new(dims(8, 8, 1));
        grid.occupy(coord(0, 0, 0), dims(4, 8, 1), "FILL".into()).unwrap();

        let token = CancellationToken::never();
        let (pos, found_dims) = grid.find_largest_empty_box(&token).unwrap().unwrap();
        assert_eq!(pos, coord(4, 0, 0));
        assert_eq!(found_dims, dims(4, 8, 1));
    }

    #[test]
    fn seed_scenario_3_occupancy_snapshot() {
        // 4x4x4 front-open container, ITEM_A 2x2x2 at (0,0,0), ITEM_B
        // 2x2x2 at (0,2,0) — the layout spec seed scenario 3 blocks
        // ITEM_B behind ITEM_A.
        let mut grid = OccupancyGrid::new(dims(4, 4, 4));
        grid.occupy(coord(0, 0, 0), dims(2, 2, 2), "A".into()).unwrap();
        grid.occupy(coord(0, 2, 0), dims(2, 2, 2), "B".into()).unwrap();

        insta::assert_snapshot!(grid.format_occupancy(), @r###"
        z=0
        BB..
        BB..
        AA..
        AA..
        z=1
        BB..
        BB..
        AA..
        AA..
        z=2
        ....
        ....
        ....
        ....
        z=3
        ....
        ....
        ....
        ....
        "###);
    }

    #[test]
    fn find_largest_empty_box_honours_cancellation() {
        let grid = OccupancyGrid::new(dims(4, 4, 4));
        let token = CancellationToken::new();
        token.cancel();
        let result = grid.find_largest_empty_box(&token);
        assert!(matches!(result, Err(StowageError::Cancelled)));
    }

    impl OccupancyGrid {
        fn clone_cells_for_test(&self) -> Vec<Option<ItemId>> {
            self.cells.clone()
        }
    }
}
