//! Container-level analytics: utilization, fragmentation, expiry
//! lookahead and the advisory recommendations derived from them
//! (spec 4.9).

use crate::cancellation::CancellationToken;
use crate::catalogue::Catalogue;
use crate::config::EngineConfig;
use crate::container::OpenFace;
use crate::error::Result;
use crate::error::StowageError;
use crate::geometry::{Coordinate, Dimensions};
use crate::grid::OccupancyGrid;
use crate::item::{CalendarDay, ItemId, Priority};
use crate::visibility;

/// Fraction of a container's volume occupied by placed items, in
/// `0.0..=1.0`.
pub fn utilization(dims: Dimensions, catalogue: &Catalogue) -> f64 {
    let occupied: u64 = catalogue.iter().map(|item| item.eff_dims.volume()).sum();
    occupied as f64 / dims.volume() as f64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentationReport {
    pub total_free_volume: u64,
    pub largest_free_volume: u64,
    /// `largest_free_volume / total_free_volume`: 1.0 means all free
    /// space is one contiguous block, lower values mean it is scattered
    /// across several smaller pockets. `1.0` when there is no free
    /// space at all.
    pub fragmentation_index: f64,
    pub regions_found: usize,
}

/// Paints a sentinel id over carved-out scratch regions and releases it
/// on every exit path, including an unwind, so a panic mid-analysis
/// never leaves a stray id in the scratch grid. Adapted from the
/// place/undo pattern `examples/oinoom-blocker/src/solver.rs` uses
/// around its backtracking search.
struct ScratchGuard<'a> {
    grid: &'a mut OccupancyGrid,
    sentinel: ItemId,
}

impl<'a> ScratchGuard<'a> {
    fn new(grid: &'a mut OccupancyGrid, sentinel: ItemId) -> Self {
        Self { grid, sentinel }
    }

    fn paint(&mut self, pos: Coordinate, dims: Dimensions) -> Result<()> {
        self.grid.occupy(pos, dims, self.sentinel.clone())
    }
}

impl Drop for ScratchGuard<'_> {
    fn drop(&mut self) {
        self.grid.release(&self.sentinel);
    }
}

const MAX_FRAGMENTATION_REGIONS: usize = 10;

/// Iteratively carves the largest empty box out of a scratch copy of
/// `grid`, up to `MAX_FRAGMENTATION_REGIONS` times or until the known
/// free volume is accounted for, and reports how concentrated vs.
/// scattered that free space is.
pub fn fragmentation_analysis(grid: &OccupancyGrid, cancel: &CancellationToken) -> Result<FragmentationReport> {
    let dims = grid.dims();
    let mut total_free: u64 = 0;
    for x in 0..dims.w {
        for y in 0..dims.d {
            for z in 0..dims.h {
                if cancel.is_cancelled() {
                    return Err(StowageError::Cancelled);
                }
                if grid.cell_at(Coordinate { x, y, z }).is_none() {
                    total_free += 1;
                }
            }
        }
    }

    let mut scratch = grid.clone();
    let mut region_volumes: Vec<u64> = Vec::new();
    {
        let mut guard = ScratchGuard::new(&mut scratch, ItemId::from("__fragmentation_scratch__"));
        let mut covered = 0u64;
        while region_volumes.len() < MAX_FRAGMENTATION_REGIONS && covered < total_free {
            let Some((pos, region_dims)) = guard.grid.find_largest_empty_box(cancel)? else {
                break;
            };
            let volume = region_dims.volume();
            if volume == 0 {
                break;
            }
            region_volumes.push(volume);
            covered += volume;
            guard.paint(pos, region_dims)?;
        }
    }

    let largest_free_volume = region_volumes.first().copied().unwrap_or(0);
    let fragmentation_index = if total_free == 0 { 1.0 } else { largest_free_volume as f64 / total_free as f64 };

    Ok(FragmentationReport {
        total_free_volume: total_free,
        largest_free_volume,
        fragmentation_index,
        regions_found: region_volumes.len(),
    })
}

/// A placed item whose expiry falls within the query window, annotated
/// with its current accessibility so a caller can prioritise retrieval.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpiringItem {
    pub id: ItemId,
    pub name: String,
    pub expiry: CalendarDay,
    pub accessibility: f64,
}

pub fn expiring_within(
    grid: &OccupancyGrid,
    open_face: OpenFace,
    catalogue: &Catalogue,
    today: CalendarDay,
    days: u32,
) -> Vec<ExpiringItem> {
    catalogue
        .expiring_within(today, days)
        .into_iter()
        .map(|item| ExpiringItem {
            id: item.id.clone(),
            name: item.name.clone(),
            expiry: item.expiry.expect("catalogue only returns items with an expiry set"),
            accessibility: visibility::accessibility_score(grid, open_face, &item.id, item),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Medium,
}

/// One advisory surfaced by `Container::recommendations` (spec 4.9).
/// Advisory only: nothing in this module mutates the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationKind {
    LowAccessibility(ItemId),
    ExpiringSoon(ItemId),
    Fragmented,
    NearCapacity,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub message: String,
}

/// Derives advisory recommendations from the current occupancy,
/// catalogue and fragmentation state: low-accessibility items, items
/// expiring soon, a poorly fragmented free-space layout, and a
/// near-capacity container.
pub fn recommendations(
    grid: &OccupancyGrid,
    open_face: OpenFace,
    catalogue: &Catalogue,
    config: &EngineConfig,
    today: CalendarDay,
    cancel: &CancellationToken,
) -> Result<Vec<Recommendation>> {
    let mut recs = Vec::new();

    for item in catalogue.iter() {
        if cancel.is_cancelled() {
            return Err(StowageError::Cancelled);
        }
        if item.is_waste || item.priority != crate::item::Priority::High {
            continue;
        }
        let accessibility = visibility::accessibility_score(grid, open_face, &item.id, item);
        if accessibility < config.low_accessibility_threshold {
            recs.push(Recommendation {
                kind: RecommendationKind::LowAccessibility(item.id.clone()),
                severity: Severity::High,
                message: format!("{} has low accessibility ({accessibility:.1})", item.id),
            });
        }
    }

    for expiring in expiring_within(grid, open_face, catalogue, today, config.expiring_soon_days) {
        if expiring.accessibility < config.low_accessibility_threshold {
            recs.push(Recommendation {
                kind: RecommendationKind::ExpiringSoon(expiring.id.clone()),
                severity: Severity::High,
                message: format!("{} expires on day {}", expiring.id, expiring.expiry.0),
            });
        }
    }

    let fragmentation = fragmentation_analysis(grid, cancel)?;
    let utilization = utilization(grid.dims(), catalogue);
    if fragmentation.fragmentation_index < config.fragmentation_warning_threshold
        && utilization < config.fragmentation_max_utilization
    {
        recs.push(Recommendation {
            kind: RecommendationKind::Fragmented,
            severity: Severity::Medium,
            message: format!(
                "free space is scattered across {} region(s) (index {:.2})",
                fragmentation.regions_found, fragmentation.fragmentation_index
            ),
        });
    }

    if utilization > config.utilization_warning_threshold {
        recs.push(Recommendation {
            kind: RecommendationKind::NearCapacity,
            severity: Severity::Medium,
            message: format!("container is at {:.0}% capacity", utilization * 100.0),
        });
    }

    Ok(recs)
}
