//! A synchronous, single-threaded 3D cargo stowage engine: given a
//! rectangular container with one open face, it finds, ranks and
//! tracks placements for boxy items, scores how accessible each one is
//! from the open face, and plans retrieval around whatever blocks it.

pub mod cancellation;
pub mod catalogue;
pub mod config;
pub mod container;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod item;
pub mod metrics;
pub mod orientation;
pub mod placement;
pub mod ranker;
pub mod retrieval;
pub mod visibility;

pub use cancellation::CancellationToken;
pub use config::{EngineConfig, PriorityMultipliers, RankerWeights};
pub use container::{Container, OpenFace, PlaceOptions, PlacementOutcome};
pub use error::{Result, StowageError};
pub use geometry::{CellBox, Coordinate, Dimensions, Unit};
pub use grid::OccupancyGrid;
pub use item::{CalendarDay, Item, ItemId, PlacedItem, Priority};
pub use metrics::{ExpiringItem, FragmentationReport, Recommendation, RecommendationKind, Severity};
pub use orientation::{all_orientations, Orientation};
pub use placement::PlacementCandidate;
pub use ranker::PlacementMode;
pub use retrieval::{RetrievalPlan, RetrievalStep};
