#![forbid(unsafe_code)]
//! circle_pack: Random sequential packing of non-overlapping circles into a binary mask.
//!
//! Modules:
//! - mask: occupancy masks, Otsu thresholding, and the distance-transform feasibility field
//! - sampling: candidate centers and radii (uniform or small-biased schedules)
//! - packing: configuration, overlap index, validation, the engine, and run events
//!
//! For the command-line front end, see the `circle_pack_cli` crate.
pub mod error;
pub mod mask;
pub mod packing;
pub mod sampling;

/// Convenient re-exports for common types. Import with `use circle_pack::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::mask::{otsu_threshold, FeasibilityField, OccupancyMask};
    pub use crate::packing::{
        pack_circles, pack_circles_with_events, Circle, EventSink, FnSink, IndexOutcome,
        IndexStatus, MultiSink, OverlapIndex, PackConfig, PackEvent, PackEventKind, PackResult,
        PackRunner, PackSummary, PlacedCircleSet, Rejection, UpdateMode, VecSink, Verdict,
    };
    pub use crate::sampling::{
        Candidate, CandidateSampler, CenterSampling, RadiusDistribution, RadiusSchedule,
    };
}
