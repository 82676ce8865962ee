//! Circle placement: configuration, the placed-circle set, candidate validation,
//! the sequential engine and its events.
pub mod circle;
pub mod config;
pub mod engine;
pub mod events;
pub mod placed;
pub mod validator;

pub use circle::Circle;
pub use config::{PackConfig, UpdateMode};
pub use engine::{
    pack_circles, pack_circles_with_events, IndexOutcome, IndexStatus, PackResult, PackRunner,
};
pub use events::{EventSink, FnSink, MultiSink, PackEvent, PackEventKind, PackSummary, VecSink};
pub use placed::{OverlapIndex, PlacedCircleSet};
pub use validator::{accepts, validate, Rejection, Verdict};
