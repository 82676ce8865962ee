//! Accept/reject decisions for candidate circles.
//!
//! A candidate is accepted only if it lies entirely inside the allowed region of the
//! feasibility field and keeps the configured gap to every placed circle. The mask
//! test is constant time and runs first; the overlap test scales with the number of
//! placed circles near the candidate.
use crate::mask::FeasibilityField;
use crate::packing::placed::PlacedCircleSet;
use crate::sampling::Candidate;

/// Why a candidate was turned down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Part of the disc touches a forbidden cell or leaves the raster.
    OutsideMask,
    /// The disc comes closer than `offset` to an already placed circle.
    Overlap,
}

/// Outcome of validating one candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Verdict::Accepted)
    }
}

/// Runs both checks and reports the first failing one.
pub fn validate(
    candidate: &Candidate,
    field: &FeasibilityField,
    placed: &PlacedCircleSet,
) -> Verdict {
    let degenerate = candidate.radius.is_nan() || candidate.radius <= 0.0;
    if degenerate || !field.fits(candidate.center, candidate.radius) {
        return Verdict::Rejected(Rejection::OutsideMask);
    }
    if !placed.is_clear(candidate.center, candidate.radius) {
        return Verdict::Rejected(Rejection::Overlap);
    }
    Verdict::Accepted
}

/// Whether `candidate` passes both checks.
pub fn accepts(candidate: &Candidate, field: &FeasibilityField, placed: &PlacedCircleSet) -> bool {
    validate(candidate, field, placed).is_accepted()
}
