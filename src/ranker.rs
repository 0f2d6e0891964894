//! Scores and selects among the candidates `placement::find_valid_placements`
//! enumerates, trading off accessibility, fragmentation and zone
//! affinity (spec 4.7).

use crate::catalogue::Catalogue;
use crate::config::EngineConfig;
use crate::container::OpenFace;
use crate::geometry::{euclidean, Coordinate};
use crate::grid::OccupancyGrid;
use crate::item::{Item, ItemId, PlacedItem};
use crate::placement::PlacementCandidate;
use crate::visibility;

/// How `Container::place_item` picks among feasible candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlacementMode {
    /// `argmax` of the new item's post-placement accessibility score.
    Accessibility,
    /// The full weighted accessibility/fragmentation/zone-affinity
    /// score, modulated by priority and expiry (the default).
    #[default]
    Ranked,
    /// The first candidate in enumeration order.
    FirstFit,
}

/// Picks the winning candidate for `item` out of `candidates`
/// according to `mode`, or `None` if `candidates` is empty.
pub fn rank_candidates(
    grid: &OccupancyGrid,
    open_face: OpenFace,
    config: &EngineConfig,
    catalogue: &Catalogue,
    item: &Item,
    candidates: Vec<PlacementCandidate>,
    mode: PlacementMode,
) -> Option<PlacementCandidate> {
    match mode {
        PlacementMode::FirstFit => candidates.into_iter().next(),
        PlacementMode::Accessibility => candidates
            .into_iter()
            .map(|c| {
                let score = candidate_accessibility(grid, open_face, item, &c);
                (c, score)
            })
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(c, _)| c),
        PlacementMode::Ranked => {
            if candidates.is_empty() {
                return None;
            }
            let before_largest = grid.find_largest_empty_box(&crate::cancellation::CancellationToken::never()).ok().flatten();
            let v0 = before_largest.map(|(_, dims)| dims.volume()).unwrap_or(0);

            let zone_positions: Vec<Coordinate> = match &item.preferred_zone {
                Some(zone) => catalogue
                    .iter()
                    .filter(|placed| placed.preferred_zone.as_deref() == Some(zone.as_str()))
                    .map(|placed| placed.position)
                    .collect(),
                None => Vec::new(),
            };

            candidates
                .into_iter()
                .map(|c| {
                    let score = weighted_score(grid, open_face, config, item, &c, v0, &zone_positions);
                    (c, score)
                })
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .map(|(c, _)| c)
        }
    }
}

/// Accessibility the new item would have if placed at `candidate`,
/// computed against a copy of the grid with the candidate painted.
fn candidate_accessibility(grid: &OccupancyGrid, open_face: OpenFace, item: &Item, candidate: &PlacementCandidate) -> f64 {
    let mut scratch = grid.clone();
    if scratch.occupy(candidate.position, candidate.eff_dims, item.id.clone()).is_err() {
        return 0.0;
    }
    let placed = PlacedItem::new(item.clone(), candidate.position, candidate.orientation);
    visibility::accessibility_score(&scratch, open_face, &item.id, &placed)
}

fn weighted_score(
    grid: &OccupancyGrid,
    open_face: OpenFace,
    config: &EngineConfig,
    item: &Item,
    candidate: &PlacementCandidate,
    v0: u64,
    zone_positions: &[Coordinate],
) -> f64 {
    let accessibility = candidate_accessibility(grid, open_face, item, candidate);
    let fragmentation = fragmentation_component(grid, candidate, v0);
    let zone_affinity = zone_affinity(item, candidate.position, grid.dims(), zone_positions.iter().copied());
    let mu = priority_multiplier(config, item);

    let weights = &config.ranker_weights;
    mu * (weights.accessibility * accessibility + weights.fragmentation * fragmentation + weights.zone_affinity * zone_affinity)
}

/// `F = min(100, 100*V1/V0)` when `V0 > 0`; `100` otherwise, where
/// `V0`/`V1` are the largest-empty-box volumes before/after placement.
fn fragmentation_component(grid: &OccupancyGrid, candidate: &PlacementCandidate, v0: u64) -> f64 {
    if v0 == 0 {
        return 100.0;
    }
    let mut scratch = grid.clone();
    if scratch
        .occupy(candidate.position, candidate.eff_dims, ItemId::from("__candidate__"))
        .is_err()
    {
        return 0.0;
    }
    let v1 = scratch
        .find_largest_empty_box(&crate::cancellation::CancellationToken::never())
        .ok()
        .flatten()
        .map(|(_, dims)| dims.volume())
        .unwrap_or(0);

    (100.0 * v1 as f64 / v0 as f64).min(100.0)
}

/// `Z = 50` with no preferred zone, or no other placed item shares it
/// yet; otherwise `100 - 100*d/D` where `d` is the distance from `pos`
/// to the nearest already-placed item in the same preferred zone, and
/// `D` is the container's space diagonal.
pub fn zone_affinity<'a>(
    item: &Item,
    pos: Coordinate,
    container_dims: crate::geometry::Dimensions,
    same_zone_positions: impl Iterator<Item = Coordinate> + 'a,
) -> f64 {
    let Some(_zone) = item.preferred_zone.as_ref() else {
        return 50.0;
    };

    let min_distance = same_zone_positions.map(|other| euclidean(pos, other)).fold(None, |acc: Option<f64>, d| {
        Some(acc.map_or(d, |best: f64| best.min(d)))
    });

    let Some(d) = min_distance else {
        return 50.0;
    };

    let big_d = euclidean(crate::geometry::Coordinate::origin(), crate::geometry::Coordinate {
        x: container_dims.w,
        y: container_dims.d,
        z: container_dims.h,
    });
    if big_d <= 0.0 {
        return 50.0;
    }
    (100.0 - 100.0 * d / big_d).clamp(0.0, 100.0)
}

fn priority_multiplier(config: &EngineConfig, item: &Item) -> f64 {
    let multipliers = &config.priority_multipliers;
    let mut mu = match item.priority {
        crate::item::Priority::High => multipliers.high,
        crate::item::Priority::Medium => multipliers.medium,
        crate::item::Priority::Low => multipliers.low,
    };
    // Caller-facing "expires within 30 days" uses CalendarDay(0) as a
    // stand-in "today" here; `Container::place_item` doesn't thread a
    // simulated today through ranking, so this matches the item's
    // expiry against the window length alone (days-until-expiry <=
    // window), not a real calendar "today".
    if let Some(expiry) = item.expiry {
        if expiry.0 <= multipliers.expiry_bonus_window_days {
            mu += multipliers.expiry_bonus;
        }
    }
    mu
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Coordinate, Dimensions};
    use crate::item::{CalendarDay, Priority};

    #[test]
    fn first_fit_returns_first_enumerated_candidate() {
        let grid = OccupancyGrid::new(Dimensions::new(4, 4, 4).unwrap());
        let item = Item::new("I", "i", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low).unwrap();
        let candidates = crate::placement::find_valid_placements(&grid, item.dims);
        let first = candidates[0];
        let config = EngineConfig::default();
        let catalogue = Catalogue::new();
        let chosen =
            rank_candidates(&grid, OpenFace::Front, &config, &catalogue, &item, candidates, PlacementMode::FirstFit).unwrap();
        assert_eq!(chosen, first);
    }

    #[test]
    fn ranked_mode_beats_or_matches_first_fit_accessibility_for_urgent_item() {
        let mut grid = OccupancyGrid::new(Dimensions::new(10, 8, 5).unwrap());
        // half-fill the container so first-fit and ranked can diverge
        grid.occupy(Coordinate::origin(), Dimensions::new(5, 8, 5).unwrap(), "FILL".into()).unwrap();

        let item = Item::new("URGENT", "urgent", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::High)
            .unwrap()
            .with_expiry(CalendarDay(10));
        let config = EngineConfig::default();
        let catalogue = Catalogue::new();

        let candidates = crate::placement::find_valid_placements(&grid, item.dims);
        let first_fit =
            rank_candidates(&grid, OpenFace::Front, &config, &catalogue, &item, candidates.clone(), PlacementMode::FirstFit).unwrap();
        let ranked = rank_candidates(&grid, OpenFace::Front, &config, &catalogue, &item, candidates, PlacementMode::Ranked).unwrap();

        let first_fit_placed = PlacedItem::new(item.clone(), first_fit.position, first_fit.orientation);
        let ranked_placed = PlacedItem::new(item.clone(), ranked.position, ranked.orientation);

        let mut scratch_first = grid.clone();
        scratch_first.occupy(first_fit.position, first_fit.eff_dims, item.id.clone()).unwrap();
        let first_fit_score = visibility::accessibility_score(&scratch_first, OpenFace::Front, &item.id, &first_fit_placed);

        let mut scratch_ranked = grid.clone();
        scratch_ranked.occupy(ranked.position, ranked.eff_dims, item.id.clone()).unwrap();
        let ranked_score = visibility::accessibility_score(&scratch_ranked, OpenFace::Front, &item.id, &ranked_placed);

        assert!(ranked_score >= first_fit_score);
    }

    #[test]
    fn zone_affinity_is_fifty_with_no_preference() {
        let item = Item::new("I", "i", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low).unwrap();
        let score = zone_affinity(&item, Coordinate::origin(), Dimensions::new(4, 4, 4).unwrap(), std::iter::empty());
        assert_eq!(score, 50.0);
    }

    #[test]
    fn zone_affinity_is_fifty_when_no_item_in_zone_yet() {
        let item = Item::new("I", "i", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low)
            .unwrap()
            .with_preferred_zone("z1");
        let score = zone_affinity(&item, Coordinate::origin(), Dimensions::new(4, 4, 4).unwrap(), std::iter::empty());
        assert_eq!(score, 50.0);
    }

    #[test]
    fn zone_affinity_increases_with_proximity() {
        let item = Item::new("I", "i", Dimensions::new(1, 1, 1).unwrap(), 1.0, Priority::Low)
            .unwrap()
            .with_preferred_zone("z1");
        let dims = Dimensions::new(10, 10, 10).unwrap();
        let near = zone_affinity(&item, Coordinate::origin(), dims, std::iter::once(Coordinate::new(1, 0, 0).unwrap()));
        let far = zone_affinity(&item, Coordinate::origin(), dims, std::iter::once(Coordinate::new(9, 9, 9).unwrap()));
        assert!(near > far);
    }
}
