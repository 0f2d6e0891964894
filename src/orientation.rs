//! The six axis-permutation orientations an item's dimensions can take
//! on once placed inside a container.
//!
//! Unlike `examples/oinoom-blocker/src/geometry.rs`, which enumerates
//! all 24 rotations of a rigid voxel shape and deduplicates, cargo
//! items here are plain boxes: rotating one about any axis by 90
//! degrees at a time only ever permutes which of its three original
//! dimensions lines up with which container axis. That collapses the
//! rotation group down to the 6 permutations of `{0, 1, 2}`, which is
//! exactly the orientation set the spec defines.

use crate::error::{Result, StowageError};
use crate::geometry::Dimensions;

/// A permutation `(aw, ad, ah)` of `(0, 1, 2)`: for each container
/// axis, which of the item's original dimension indices lies along it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Orientation {
    axes: (u8, u8, u8),
}

/// The six valid orientations, in a fixed, stable order. Downstream
/// code (`placement::find_valid_placements`) relies on this order for
/// its enumeration tie-breaks.
pub const ALL_ORIENTATIONS: [Orientation; 6] = [
    Orientation { axes: (0, 1, 2) },
    Orientation { axes: (0, 2, 1) },
    Orientation { axes: (1, 0, 2) },
    Orientation { axes: (1, 2, 0) },
    Orientation { axes: (2, 0, 1) },
    Orientation { axes: (2, 1, 0) },
];

impl Orientation {
    /// Validates that `(aw, ad, ah)` is a permutation of `{0, 1, 2}`.
    pub fn try_new(aw: u8, ad: u8, ah: u8) -> Result<Self> {
        let mut seen = [false; 3];
        for axis in [aw, ad, ah] {
            match seen.get_mut(axis as usize) {
                Some(slot) if !*slot => *slot = true,
                _ => {
                    return Err(StowageError::InvalidArgument(format!(
                        "orientation ({aw}, {ad}, {ah}) is not a permutation of 0..3"
                    )))
                }
            }
        }
        Ok(Self { axes: (aw, ad, ah) })
    }

    pub const fn identity() -> Self {
        Self { axes: (0, 1, 2) }
    }

    pub fn axes(&self) -> (u8, u8, u8) {
        self.axes
    }

    /// Remaps an item's original dimensions onto container axes under
    /// this orientation: `(origDims[aw], origDims[ad], origDims[ah])`.
    pub fn apply(&self, dims: Dimensions) -> Dimensions {
        let orig = [dims.w, dims.d, dims.h];
        Dimensions {
            w: orig[self.axes.0 as usize],
            d: orig[self.axes.1 as usize],
            h: orig[self.axes.2 as usize],
        }
    }
}

/// Returns the six orientations in the spec's fixed enumeration order.
pub fn all_orientations() -> [Orientation; 6] {
    ALL_ORIENTATIONS
}
