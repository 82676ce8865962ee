//! Event types and sinks for observing packing runs.
//!
//! This module defines [`PackEvent`] and a set of sinks to emit, collect, or forward
//! events while executing [`crate::packing::engine::pack_circles_with_events`] or
//! [`crate::packing::engine::PackRunner::run_with_events`].
use crate::packing::circle::Circle;
use crate::packing::config::PackConfig;
use crate::packing::validator::Rejection;
use crate::sampling::Candidate;

/// Describes events emitted by a packing run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum PackEvent {
    /// Emitted once the configuration and mask were accepted, before any attempt.
    RunStarted {
        /// The run configuration used.
        config: PackConfig,
        /// Mask size `(width, height)` in cells.
        mask_size: (usize, usize),
        /// Allowed cells after inversion.
        allowed_cells: usize,
    },

    /// Emitted when a candidate fails validation.
    CandidateRejected {
        /// Target index being attempted.
        index: usize,
        /// 1-based attempt number for this index.
        attempt: usize,
        /// The rejected candidate.
        candidate: Candidate,
        /// Which check failed.
        reason: Rejection,
    },

    /// Emitted when a candidate is accepted.
    CirclePlaced {
        /// Target index that was filled.
        index: usize,
        /// Attempts used, including the successful one.
        attempts: usize,
        /// The stored circle.
        circle: Circle,
    },

    /// Emitted when a target index runs out of attempts.
    IndexSkipped {
        /// Target index that was given up.
        index: usize,
        /// Attempts used.
        attempts: usize,
    },

    /// Emitted after placed circles were burned into the mask and the field rebuilt.
    MaskRefreshed {
        /// Circles placed so far.
        placed: usize,
        /// Cells that switched from allowed to forbidden in this refresh.
        cells_forbidden: usize,
        /// Allowed cells remaining.
        allowed_cells: usize,
    },

    /// Emitted when the run finishes.
    RunFinished {
        /// Counts for the whole run.
        summary: PackSummary,
    },

    /// Non-fatal warning generated during packing.
    Warning {
        /// Context string (e.g. target index).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// Discriminant of [`PackEvent`], used by sinks to filter before events are built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackEventKind {
    RunStarted,
    CandidateRejected,
    CirclePlaced,
    IndexSkipped,
    MaskRefreshed,
    RunFinished,
    Warning,
}

impl PackEvent {
    pub fn kind(&self) -> PackEventKind {
        match self {
            PackEvent::RunStarted { .. } => PackEventKind::RunStarted,
            PackEvent::CandidateRejected { .. } => PackEventKind::CandidateRejected,
            PackEvent::CirclePlaced { .. } => PackEventKind::CirclePlaced,
            PackEvent::IndexSkipped { .. } => PackEventKind::IndexSkipped,
            PackEvent::MaskRefreshed { .. } => PackEventKind::MaskRefreshed,
            PackEvent::RunFinished { .. } => PackEventKind::RunFinished,
            PackEvent::Warning { .. } => PackEventKind::Warning,
        }
    }
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackSummary {
    /// Target circle count.
    pub requested: usize,
    /// Circles placed.
    pub placed: usize,
    /// Target indices skipped.
    pub skipped: usize,
    /// Candidates drawn in total.
    pub attempts: usize,
    /// Feasibility-field rebuilds performed by update mode.
    pub field_rebuilds: usize,
}

/// A generic event sink that accepts [`PackEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: PackEvent);

    /// Whether events of `kind` should be built and sent at all.
    fn wants(&self, _kind: PackEventKind) -> bool {
        true
    }
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: PackEvent) {}

    #[inline]
    fn wants(&self, _kind: PackEventKind) -> bool {
        false
    }
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(PackEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(PackEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(PackEvent),
{
    #[inline]
    fn send(&mut self, event: PackEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects events in a `Vec`, optionally only some kinds.
#[derive(Default)]
pub struct VecSink {
    events: Vec<PackEvent>,
    only: Option<Vec<PackEventKind>>,
}

impl VecSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects only events of the given kinds.
    pub fn filtered(kinds: impl IntoIterator<Item = PackEventKind>) -> Self {
        Self {
            events: Vec::new(),
            only: Some(kinds.into_iter().collect()),
        }
    }

    pub fn into_inner(self) -> Vec<PackEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[PackEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: PackEvent) {
        if self.wants(event.kind()) {
            self.events.push(event);
        }
    }

    fn wants(&self, kind: PackEventKind) -> bool {
        self.only.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Fan-out sink that forwards each event to all contained sinks.
pub struct MultiSink<S: EventSink> {
    pub(crate) sinks: Vec<S>,
}

impl<S: EventSink> MultiSink<S> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with_sinks(sinks: Vec<S>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: S) {
        self.sinks.push(sink);
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }
}

impl<S: EventSink> Default for MultiSink<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EventSink> EventSink for MultiSink<S> {
    fn send(&mut self, event: PackEvent) {
        let kind = event.kind();
        let targets: Vec<usize> = (0..self.sinks.len())
            .filter(|&i| self.sinks[i].wants(kind))
            .collect();
        let Some((&last, rest)) = targets.split_last() else {
            return;
        };
        for &i in rest {
            self.sinks[i].send(event.clone());
        }
        self.sinks[last].send(event);
    }

    fn wants(&self, kind: PackEventKind) -> bool {
        self.sinks.iter().any(|s| s.wants(kind))
    }
}
