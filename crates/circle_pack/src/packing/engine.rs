//! Random sequential placement of circles onto an occupancy mask.
//!
//! For every target index the engine draws candidates until one passes
//! [`validate`], or the attempt budget runs out and the index is skipped. Each index
//! depends on every circle accepted before it, so the loop is strictly sequential and
//! fully determined by the RNG seed.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, trace, warn};

use crate::error::Result;
use crate::mask::{FeasibilityField, OccupancyMask};
use crate::packing::circle::Circle;
use crate::packing::config::{PackConfig, UpdateMode};
use crate::packing::events::{EventSink, PackEvent, PackEventKind, PackSummary};
use crate::packing::placed::PlacedCircleSet;
use crate::packing::validator::{validate, Rejection, Verdict};
use crate::sampling::{small_biased_schedule, CandidateSampler, RadiusDistribution};

/// Final state of one target index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IndexStatus {
    Placed,
    Skipped,
}

/// Per-index diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexOutcome {
    /// Target index in `0..n_points`.
    pub index: usize,
    pub status: IndexStatus,
    /// Candidates drawn for this index.
    pub attempts: usize,
}

/// Result of a packing run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub struct PackResult {
    /// Accepted circles in acceptance order.
    pub circles: Vec<Circle>,
    /// One entry per target index, in index order.
    pub outcomes: Vec<IndexOutcome>,
    /// Candidates drawn in total.
    pub attempts: usize,
    /// Candidates rejected by the mask check.
    pub rejected_by_mask: usize,
    /// Candidates rejected by the overlap check.
    pub rejected_by_overlap: usize,
    /// Feasibility-field rebuilds triggered by update mode.
    pub field_rebuilds: usize,
    /// Cells recomputed across all rebuilds.
    pub cells_rebuilt: usize,
    /// Mask as it stood at the end of the run (after inversion and any refreshes).
    pub final_mask: OccupancyMask,
    /// Seed the RNG was created from, when the run owned its RNG.
    pub seed: Option<u64>,
}

impl PackResult {
    pub fn placed_count(&self) -> usize {
        self.circles.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.status == IndexStatus::Skipped)
            .count()
    }

    /// A run that placed nothing. Valid, but usually a sign of a bad mask or radii.
    pub fn is_degenerate(&self) -> bool {
        self.circles.is_empty()
    }

    pub fn summary(&self) -> PackSummary {
        PackSummary {
            requested: self.outcomes.len(),
            placed: self.placed_count(),
            skipped: self.skipped_count(),
            attempts: self.attempts,
            field_rebuilds: self.field_rebuilds,
        }
    }
}

/// Packing engine that owns its configuration and RNG.
pub struct PackRunner {
    config: PackConfig,
    seed: u64,
    rng: StdRng,
}

impl PackRunner {
    /// Validates `config` and seeds the RNG from `config.seed`, or from a seed drawn
    /// from the thread RNG. Either way the seed is kept so the run can be replayed.
    pub fn try_new(config: PackConfig) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| rand::rng().next_u64());
        Ok(Self {
            config,
            seed,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Seed the RNG was created from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Packs circles onto `mask`. The mask is taken as decoded; `config.invert` is applied here.
    pub fn run(&mut self, mask: &OccupancyMask) -> Result<PackResult> {
        let mut result = pack_circles(mask, &self.config, &mut self.rng, None)?;
        result.seed = Some(self.seed);
        Ok(result)
    }

    pub fn run_with_events(
        &mut self,
        mask: &OccupancyMask,
        sink: &mut dyn EventSink,
    ) -> Result<PackResult> {
        let mut result = pack_circles_with_events(mask, &self.config, &mut self.rng, sink)?;
        result.seed = Some(self.seed);
        Ok(result)
    }
}

/// Packs circles onto `mask` with a caller-owned RNG.
pub fn pack_circles<R: Rng>(
    mask: &OccupancyMask,
    config: &PackConfig,
    rng: &mut R,
    sink: Option<&mut dyn EventSink>,
) -> Result<PackResult> {
    if let Some(s) = sink {
        pack_circles_with_events(mask, config, rng, s)
    } else {
        pack_circles_with_events(mask, config, rng, &mut ())
    }
}

/// Working state shared by the placement loop and mask refreshes.
struct PackState {
    mask: OccupancyMask,
    field: FeasibilityField,
    sampler: CandidateSampler,
    placed: PlacedCircleSet,
    /// Placed circles already burned into `mask`.
    stamped: usize,
    field_rebuilds: usize,
    cells_rebuilt: usize,
}

impl PackState {
    /// Burns unstamped circles into the mask and rebuilds the field. Does nothing
    /// when every placed circle is already stamped.
    fn refresh(&mut self, sink: &mut dyn EventSink) {
        if self.stamped == self.placed.len() {
            return;
        }
        let mut cells_forbidden = 0;
        for circle in &self.placed.as_slice()[self.stamped..] {
            cells_forbidden += self.mask.forbid_disc(circle.center, circle.radius);
        }
        self.stamped = self.placed.len();

        self.field.rebuild(&self.mask);
        self.sampler.refresh_allowed_centers(&self.mask);
        self.field_rebuilds += 1;
        self.cells_rebuilt += self.field.cell_count();

        let allowed_cells = self.mask.allowed_count();
        info!(
            "Mask refreshed after {} circles: {} cells forbidden, {} allowed remain.",
            self.placed.len(),
            cells_forbidden,
            allowed_cells
        );
        if sink.wants(PackEventKind::MaskRefreshed) {
            sink.send(PackEvent::MaskRefreshed {
                placed: self.placed.len(),
                cells_forbidden,
                allowed_cells,
            });
        }
    }
}

pub fn pack_circles_with_events<R: Rng>(
    mask: &OccupancyMask,
    config: &PackConfig,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<PackResult> {
    config.validate()?;

    let working_mask = if config.invert {
        mask.inverted()
    } else {
        mask.clone()
    };
    let extent = working_mask.extent();

    let mut sampler = CandidateSampler::try_new(config.r_min, config.r_max, extent)?
        .with_center_sampling(config.center_sampling, &working_mask);
    if config.radius_distribution == RadiusDistribution::SmallBiased {
        let schedule = small_biased_schedule(config.r_min, config.r_max, config.n_points, rng);
        sampler = sampler.with_radius_schedule(schedule);
    }

    let mut state = PackState {
        field: FeasibilityField::build(&working_mask),
        placed: PlacedCircleSet::new(config.overlap_index, extent, config.r_max, config.offset),
        mask: working_mask,
        sampler,
        stamped: 0,
        field_rebuilds: 0,
        cells_rebuilt: 0,
    };

    let allowed_cells = state.mask.allowed_count();
    info!(
        "Packing {} circles (r {}..{}, offset {}, {} attempts each) onto {}x{} mask with {} allowed cells.",
        config.n_points,
        config.r_min,
        config.r_max,
        config.offset,
        config.max_attempts,
        state.mask.width(),
        state.mask.height(),
        allowed_cells
    );
    if sink.wants(PackEventKind::RunStarted) {
        sink.send(PackEvent::RunStarted {
            config: config.clone(),
            mask_size: state.mask.size(),
            allowed_cells,
        });
    }

    let mut outcomes = Vec::new();
    let mut total_attempts = 0;
    let mut rejected_by_mask = 0;
    let mut rejected_by_overlap = 0;

    for index in 0..config.n_points {
        if let UpdateMode::Every(k) = config.update {
            if index > 0 && index % k == 0 {
                state.refresh(sink);
            }
        }

        let mut attempts = 0;
        let status = loop {
            if attempts == config.max_attempts {
                break IndexStatus::Skipped;
            }
            let candidate = state.sampler.sample(index, rng);
            attempts += 1;

            match validate(&candidate, &state.field, &state.placed) {
                Verdict::Accepted => {
                    let circle = state.placed.push(candidate.center, candidate.radius);
                    debug!(
                        "Placed circle {} (target {}) at ({:.2}, {:.2}) r {:.2} after {} attempts.",
                        circle.index,
                        index,
                        circle.center.x,
                        circle.center.y,
                        circle.radius,
                        attempts
                    );
                    if sink.wants(PackEventKind::CirclePlaced) {
                        sink.send(PackEvent::CirclePlaced {
                            index,
                            attempts,
                            circle,
                        });
                    }
                    break IndexStatus::Placed;
                }
                Verdict::Rejected(reason) => {
                    match reason {
                        Rejection::OutsideMask => rejected_by_mask += 1,
                        Rejection::Overlap => rejected_by_overlap += 1,
                    }
                    trace!("Target {} attempt {}: rejected ({:?}).", index, attempts, reason);
                    if sink.wants(PackEventKind::CandidateRejected) {
                        sink.send(PackEvent::CandidateRejected {
                            index,
                            attempt: attempts,
                            candidate,
                            reason,
                        });
                    }
                }
            }
        };
        total_attempts += attempts;

        match status {
            IndexStatus::Placed => {
                if config.update == UpdateMode::EveryPlacement {
                    state.refresh(sink);
                }
            }
            IndexStatus::Skipped => {
                debug!("Giving up on target {} after {} attempts.", index, attempts);
                if sink.wants(PackEventKind::IndexSkipped) {
                    sink.send(PackEvent::IndexSkipped { index, attempts });
                }
            }
        }

        outcomes.push(IndexOutcome {
            index,
            status,
            attempts,
        });
    }

    let result = PackResult {
        circles: state.placed.into_vec(),
        outcomes,
        attempts: total_attempts,
        rejected_by_mask,
        rejected_by_overlap,
        field_rebuilds: state.field_rebuilds,
        cells_rebuilt: state.cells_rebuilt,
        final_mask: state.mask,
        seed: None,
    };

    let summary = result.summary();
    if result.is_degenerate() {
        warn!(
            "No circles placed out of {} requested; check the mask and radius range.",
            config.n_points
        );
        if sink.wants(PackEventKind::Warning) {
            sink.send(PackEvent::Warning {
                context: "run".into(),
                message: format!("No circles placed out of {} requested", config.n_points),
            });
        }
    } else if summary.skipped > 0 {
        warn!(
            "Skipped {} of {} circles after exhausting attempts.",
            summary.skipped, config.n_points
        );
    }
    info!(
        "Placed {}/{} circles with {} attempts ({} mask, {} overlap rejections, {} field rebuilds).",
        summary.placed,
        summary.requested,
        summary.attempts,
        result.rejected_by_mask,
        result.rejected_by_overlap,
        result.field_rebuilds
    );
    if sink.wants(PackEventKind::RunFinished) {
        sink.send(PackEvent::RunFinished { summary });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;
    use crate::error::Error;
    use crate::packing::events::VecSink;
    use crate::packing::placed::OverlapIndex;
    use crate::sampling::CenterSampling;

    fn open_mask(size: usize) -> OccupancyMask {
        OccupancyMask::filled(size, size, true).unwrap()
    }

    #[test]
    fn invalid_config_fails_before_sampling() {
        let mut sink = VecSink::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = PackConfig::new(5, 4.0, 2.0);
        let err = pack_circles_with_events(&open_mask(20), &config, &mut rng, &mut sink)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn outcomes_cover_every_index() {
        let config = PackConfig::new(30, 2.0, 6.0)
            .with_max_attempts(50)
            .with_seed(4);
        let mut runner = PackRunner::try_new(config).unwrap();
        let result = runner.run(&open_mask(40)).unwrap();

        assert_eq!(result.outcomes.len(), 30);
        assert_eq!(result.seed, Some(4));
        for (i, o) in result.outcomes.iter().enumerate() {
            assert_eq!(o.index, i);
            assert!(o.attempts >= 1 && o.attempts <= 50);
            if o.status == IndexStatus::Skipped {
                assert_eq!(o.attempts, 50);
            }
        }
        let placed = result
            .outcomes
            .iter()
            .filter(|o| o.status == IndexStatus::Placed)
            .count();
        assert_eq!(placed, result.placed_count());
        assert_eq!(
            result.attempts,
            result.outcomes.iter().map(|o| o.attempts).sum::<usize>()
        );
        assert_eq!(
            result.attempts,
            result.placed_count() + result.rejected_by_mask + result.rejected_by_overlap
        );
    }

    #[test]
    fn circle_indices_follow_acceptance_order() {
        let config = PackConfig::new(20, 1.0, 3.0).with_seed(12);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run(&open_mask(30))
            .unwrap();
        for (i, c) in result.circles.iter().enumerate() {
            assert_eq!(c.index, i);
        }
    }

    #[test]
    fn invert_swaps_the_packable_side() {
        // Left half bright, right half dark; inverted packing must stay on the right.
        let mask = OccupancyMask::from_fn(40, 20, |x, _| x < 20).unwrap();
        let config = PackConfig::new(10, 1.0, 2.0)
            .with_invert(true)
            .with_seed(3);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert!(!result.circles.is_empty());
        for c in &result.circles {
            assert!(c.center.x - c.radius >= 20.0, "{c:?} crosses into the bright half");
        }
    }

    #[test]
    fn events_mirror_outcomes() {
        let config = PackConfig::new(15, 2.0, 5.0)
            .with_max_attempts(20)
            .with_seed(21);
        let mut sink = VecSink::new();
        let result = PackRunner::try_new(config)
            .unwrap()
            .run_with_events(&open_mask(25), &mut sink)
            .unwrap();

        let events = sink.into_inner();
        assert!(matches!(events.first(), Some(PackEvent::RunStarted { .. })));
        assert!(matches!(
            events.last(),
            Some(PackEvent::RunFinished { summary }) if summary.placed == result.placed_count()
        ));
        let placed_events = events
            .iter()
            .filter(|e| e.kind() == PackEventKind::CirclePlaced)
            .count();
        let skipped_events = events
            .iter()
            .filter(|e| e.kind() == PackEventKind::IndexSkipped)
            .count();
        let rejected_events = events
            .iter()
            .filter(|e| e.kind() == PackEventKind::CandidateRejected)
            .count();
        assert_eq!(placed_events, result.placed_count());
        assert_eq!(skipped_events, result.skipped_count());
        assert_eq!(
            rejected_events,
            result.rejected_by_mask + result.rejected_by_overlap
        );
    }

    #[test]
    fn degenerate_run_emits_warning() {
        let mask = OccupancyMask::filled(10, 10, false).unwrap();
        let config = PackConfig::new(3, 1.0, 2.0)
            .with_max_attempts(5)
            .with_seed(0);
        let mut sink = VecSink::filtered([PackEventKind::Warning]);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run_with_events(&mask, &mut sink)
            .unwrap();
        assert!(result.is_degenerate());
        assert_eq!(result.rejected_by_mask, 15);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn every_placement_update_rebuilds_after_each_acceptance() {
        let config = PackConfig::new(8, 2.0, 3.0)
            .with_update(UpdateMode::EveryPlacement)
            .with_seed(5);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run(&open_mask(40))
            .unwrap();
        assert_eq!(result.field_rebuilds, result.placed_count());
        assert_eq!(result.cells_rebuilt, result.placed_count() * 1600);
        for c in &result.circles {
            let cell = c.center.floor();
            assert!(!result.final_mask.allowed(cell.x as isize, cell.y as isize));
        }
    }

    #[test]
    fn periodic_update_refreshes_on_cadence() {
        let config = PackConfig::new(10, 1.0, 2.0)
            .with_update(UpdateMode::Every(4))
            .with_max_attempts(200)
            .with_seed(17);
        let mut sink = VecSink::filtered([PackEventKind::MaskRefreshed]);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run_with_events(&open_mask(50), &mut sink)
            .unwrap();
        // Refreshes before targets 4 and 8 as long as something new was placed.
        assert_eq!(result.placed_count(), 10);
        assert_eq!(result.field_rebuilds, 2);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn update_off_leaves_mask_untouched() {
        let mask = open_mask(30);
        let config = PackConfig::new(10, 1.0, 3.0).with_seed(2);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert_eq!(result.final_mask, mask);
        assert_eq!(result.field_rebuilds, 0);
    }

    #[test]
    fn small_biased_radii_are_placed_largest_first() {
        let config = PackConfig::new(40, 1.0, 4.0)
            .with_radius_distribution(RadiusDistribution::SmallBiased)
            .with_max_attempts(300)
            .with_seed(8);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run(&open_mask(80))
            .unwrap();
        assert!(result.placed_count() > 30);
        assert!(result
            .circles
            .windows(2)
            .all(|w| w[0].radius >= w[1].radius));
    }

    #[test]
    fn huge_small_biased_range_runs_to_completion() {
        let config = PackConfig::new(3, 1.0, 1.0e9)
            .with_radius_distribution(RadiusDistribution::SmallBiased)
            .with_max_attempts(20)
            .with_seed(13);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run(&open_mask(16))
            .unwrap();
        assert_eq!(result.outcomes.len(), 3);
        assert!(result.circles.iter().all(|c| c.radius <= 8.0));
    }

    #[test]
    fn many_small_biased_targets_on_a_closed_mask() {
        let mask = OccupancyMask::filled(4, 4, false).unwrap();
        let config = PackConfig::new(50_000, 1.0, 2.0)
            .with_radius_distribution(RadiusDistribution::SmallBiased)
            .with_max_attempts(1)
            .with_seed(3);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert_eq!(result.outcomes.len(), 50_000);
        assert_eq!(result.skipped_count(), 50_000);
    }

    #[test]
    fn allowed_cell_centers_are_used() {
        let mask = OccupancyMask::from_fn(30, 30, |x, y| (8..22).contains(&x) && (8..22).contains(&y))
            .unwrap();
        let config = PackConfig::new(5, 1.0, 1.5)
            .with_center_sampling(CenterSampling::AllowedCells)
            .with_seed(6);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert_eq!(result.placed_count(), 5);
        for c in &result.circles {
            assert_eq!(c.center.fract(), Vec2::splat(0.5));
        }
    }

    #[test]
    fn caller_owned_rng_reports_no_seed() {
        let mut rng = StdRng::seed_from_u64(10);
        let config = PackConfig::new(3, 1.0, 2.0).with_overlap_index(OverlapIndex::LinearScan);
        let result = pack_circles(&open_mask(20), &config, &mut rng, None).unwrap();
        assert_eq!(result.seed, None);
    }

    #[test]
    fn unseeded_run_replays_from_its_reported_seed() {
        let mask = open_mask(40);
        let config = PackConfig::new(25, 1.0, 4.0);
        let mut runner = PackRunner::try_new(config.clone()).unwrap();
        let first = runner.run(&mask).unwrap();
        assert_eq!(first.seed, Some(runner.seed()));

        let mut replay = PackRunner::try_new(config.with_seed(runner.seed())).unwrap();
        let second = replay.run(&mask).unwrap();
        assert_eq!(first.circles, second.circles);
        assert_eq!(first.outcomes, second.outcomes);
    }

    #[test]
    fn unseeded_runners_draw_distinct_seeds() {
        let seeds: Vec<u64> = (0..4)
            .map(|_| PackRunner::try_new(PackConfig::new(1, 1.0, 1.0)).unwrap().seed())
            .collect();
        assert!(seeds.windows(2).any(|w| w[0] != w[1]));
    }

    fn disc_inside_mask(mask: &OccupancyMask, c: &Circle) -> bool {
        let (w, h) = (mask.width() as f32, mask.height() as f32);
        let probe_radius = (c.radius - 1e-3).max(0.0);
        (0..64).all(|k| {
            let angle = k as f32 * std::f32::consts::TAU / 64.0;
            let p = c.center + Vec2::new(angle.cos(), angle.sin()) * probe_radius;
            p.x >= 0.0 && p.y >= 0.0 && p.x <= w && p.y <= h && mask.allowed_at(p)
        }) && mask.allowed_at(c.center)
    }

    fn assert_pairwise_clear(circles: &[Circle], offset: f32) {
        for (i, a) in circles.iter().enumerate() {
            for b in &circles[i + 1..] {
                let gap = (a.center - b.center).length() - a.radius - b.radius;
                assert!(gap >= offset - 1e-4, "{a:?} and {b:?} gap {gap} < {offset}");
            }
        }
    }

    #[test]
    fn fixed_radius_circles_keep_their_distance() {
        let config = PackConfig::new(4, 5.0, 5.0)
            .with_max_attempts(500)
            .with_seed(2024);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run(&open_mask(100))
            .unwrap();
        assert_eq!(result.placed_count(), 4);
        for (i, a) in result.circles.iter().enumerate() {
            assert_eq!(a.radius, 5.0);
            for b in &result.circles[i + 1..] {
                assert!((a.center - b.center).length() >= 10.0);
            }
        }
    }

    #[test]
    fn fully_forbidden_mask_skips_everything() {
        let mask = OccupancyMask::filled(32, 32, false).unwrap();
        let config = PackConfig::new(6, 1.0, 3.0)
            .with_max_attempts(25)
            .with_seed(1);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert!(result.circles.is_empty());
        assert_eq!(result.outcomes.len(), 6);
        assert!(result
            .outcomes
            .iter()
            .all(|o| o.status == IndexStatus::Skipped && o.attempts == 25));
        assert_eq!(result.rejected_by_overlap, 0);
    }

    #[test]
    fn oversized_radii_are_bounded_by_the_raster() {
        let mask = open_mask(20);
        let field = FeasibilityField::build(&mask);
        let config = PackConfig::new(10, 1.0, 50.0)
            .with_max_attempts(2000)
            .with_seed(33);
        let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert!(!result.circles.is_empty());
        let half_diagonal = (20.0f32 * 20.0 * 2.0).sqrt() / 2.0;
        for c in &result.circles {
            assert!(c.radius <= field.max_distance());
            assert!(c.radius <= half_diagonal);
        }
    }

    #[test]
    fn zero_min_radius_is_rejected_without_events() {
        let mut sink = VecSink::new();
        let mut rng = StdRng::seed_from_u64(0);
        let config = PackConfig::new(5, 0.0, 4.0);
        let err =
            pack_circles_with_events(&open_mask(10), &config, &mut rng, &mut sink).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(sink.is_empty());
        assert!(PackRunner::try_new(config).is_err());
    }

    #[test]
    fn circles_stay_inside_irregular_mask() {
        // Ring-shaped region with a notch.
        let mask = OccupancyMask::from_fn(90, 70, |x, y| {
            let d = Vec2::new(x as f32 + 0.5 - 45.0, y as f32 + 0.5 - 35.0).length();
            (12.0..32.0).contains(&d) && !(x > 40 && x < 50 && y < 35)
        })
        .unwrap();
        for (seed, update) in [
            (1, UpdateMode::Off),
            (2, UpdateMode::EveryPlacement),
            (3, UpdateMode::Every(7)),
        ] {
            let config = PackConfig::new(80, 1.0, 6.0)
                .with_update(update)
                .with_seed(seed);
            let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
            assert!(result.placed_count() > 20);
            for c in &result.circles {
                assert!(disc_inside_mask(&mask, c), "{c:?} leaves the mask ({update:?})");
            }
        }
    }

    #[test]
    fn circles_never_overlap() {
        let mask = open_mask(60);
        for (seed, offset) in [(5, 0.0), (6, 0.75), (7, 3.0)] {
            let config = PackConfig::new(150, 1.0, 5.0)
                .with_offset(offset)
                .with_seed(seed);
            let result = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
            assert!(result.placed_count() <= 150);
            assert_pairwise_clear(&result.circles, offset);
        }
    }

    #[test]
    fn same_seed_reproduces_the_run() {
        let mask = open_mask(50);
        let config = PackConfig::new(60, 1.0, 4.0).with_seed(99);
        let a = PackRunner::try_new(config.clone()).unwrap().run(&mask).unwrap();
        let b = PackRunner::try_new(config).unwrap().run(&mask).unwrap();
        assert_eq!(a.circles, b.circles);
        assert_eq!(a.outcomes, b.outcomes);
    }

    #[test]
    fn overlap_index_does_not_change_the_result() {
        let mask = open_mask(70);
        let base = PackConfig::new(120, 1.0, 6.0)
            .with_offset(0.5)
            .with_seed(314);
        let linear = PackRunner::try_new(base.clone().with_overlap_index(OverlapIndex::LinearScan))
            .unwrap()
            .run(&mask)
            .unwrap();
        let grid = PackRunner::try_new(base.with_overlap_index(OverlapIndex::BucketGrid))
            .unwrap()
            .run(&mask)
            .unwrap();
        assert_eq!(linear.circles, grid.circles);
        assert_eq!(linear.attempts, grid.attempts);
    }

    #[test]
    fn update_mode_only_shrinks_the_mask() {
        let mask = OccupancyMask::from_fn(60, 60, |x, y| (x / 10 + y / 10) % 3 != 0).unwrap();
        let config = PackConfig::new(60, 1.0, 3.0)
            .with_update(UpdateMode::Every(5))
            .with_seed(42);
        let mut sink = VecSink::filtered([PackEventKind::MaskRefreshed]);
        let result = PackRunner::try_new(config)
            .unwrap()
            .run_with_events(&mask, &mut sink)
            .unwrap();

        let mut previous = mask.allowed_count();
        for event in sink.as_slice() {
            if let PackEvent::MaskRefreshed {
                cells_forbidden,
                allowed_cells,
                ..
            } = event
            {
                assert!(*allowed_cells <= previous);
                assert_eq!(previous - allowed_cells, *cells_forbidden);
                previous = *allowed_cells;
            }
        }
        assert!(result.field_rebuilds > 0);
        for (before, after) in mask.cells().iter().zip(result.final_mask.cells()) {
            assert!(*before || !*after, "a forbidden cell became allowed");
        }
    }
}
