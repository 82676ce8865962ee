//! circle-pack: fill the white (or black) areas of a mask image with non-overlapping circles.
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use circle_pack::prelude::*;
use circle_pack_cli::{init_tracing, load_settings, output_path, write_preview_png, write_svg};
use clap::Parser;

/// Every how many circles `--update` refreshes the mask.
const DEFAULT_UPDATE_EVERY: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "circle-pack")]
#[command(about = "Fill white areas of a mask image with circles of varying radii and write them as SVG")]
#[command(version)]
struct Cli {
    /// Input mask image. Circles go on white areas unless --invert is given.
    input: PathBuf,

    /// Output file (.svg). Defaults to circles_<input>_ma-<m>_n-<n>.svg.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How many circles to attempt [default: 300].
    #[arg(short, long)]
    n_points: Option<usize>,

    /// Minimum radius in pixels [default: 2].
    #[arg(long)]
    r_min: Option<f32>,

    /// Maximum radius in pixels [default: 15].
    #[arg(long)]
    r_max: Option<f32>,

    /// Attempts per circle before giving up on it [default: 100].
    #[arg(short, long)]
    max_attempts: Option<usize>,

    /// Extra pixel distance between circles [default: 0].
    #[arg(long)]
    offset: Option<f32>,

    /// Burn placed circles into the mask every 100 circles. Usually slower.
    #[arg(short, long)]
    update: bool,

    /// Burn placed circles into the mask every K circles.
    #[arg(long, value_name = "K")]
    update_every: Option<usize>,

    /// Draw on black areas instead of white ones.
    #[arg(short, long)]
    invert: bool,

    /// Report every attempt.
    #[arg(short, long)]
    verbose: bool,

    /// RNG seed. A random one is picked and reported when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// RON settings file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Draw one radius per circle up front, favouring small ones, and place large ones first.
    #[arg(long)]
    small_biased: bool,

    /// Pick centers among allowed pixels instead of anywhere in the image.
    #[arg(long)]
    allowed_cells: bool,

    /// Check overlaps against every placed circle instead of a bucket grid.
    #[arg(long)]
    linear_scan: bool,

    /// Scale factor applied to the SVG coordinates.
    #[arg(long)]
    scale: Option<f32>,

    /// Also write a PNG rendering of the result.
    #[arg(long)]
    preview: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, mut config: PackConfig) -> PackConfig {
        if let Some(n) = self.n_points {
            config.n_points = n;
        }
        if let Some(r) = self.r_min {
            config.r_min = r;
        }
        if let Some(r) = self.r_max {
            config.r_max = r;
        }
        if let Some(m) = self.max_attempts {
            config = config.with_max_attempts(m);
        }
        if let Some(offset) = self.offset {
            config = config.with_offset(offset);
        }
        if let Some(k) = self.update_every {
            config = config.with_update(UpdateMode::Every(k));
        } else if self.update {
            config = config.with_update(UpdateMode::Every(DEFAULT_UPDATE_EVERY));
        }
        if self.invert {
            config = config.with_invert(true);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if self.small_biased {
            config = config.with_radius_distribution(RadiusDistribution::SmallBiased);
        }
        if self.allowed_cells {
            config = config.with_center_sampling(CenterSampling::AllowedCells);
        }
        if self.linear_scan {
            config = config.with_overlap_index(OverlapIndex::LinearScan);
        }
        config
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match &cli.config {
        Some(path) => load_settings(path)?,
        None => Default::default(),
    };
    let config = cli.apply(settings.packing);
    let mut style = settings.style;
    if let Some(scale) = cli.scale {
        style.scale = scale;
    }
    if !(style.scale.is_finite() && style.scale > 0.0) {
        anyhow::bail!("scale must be finite and > 0, got {}", style.scale);
    }

    let out = output_path(
        &cli.input,
        cli.output.as_deref(),
        config.max_attempts,
        config.n_points,
    );
    if let Some(requested) = &out.renamed_from {
        tracing::warn!(
            "Output file name needs to end in \".svg\"; changed {} to {}",
            requested.display(),
            out.path.display()
        );
    }

    tracing::info!("Input file: {}", cli.input.display());
    tracing::info!("Attempting to place {} circles on mask image.", config.n_points);
    tracing::info!("Attempts for each circle: {}", config.max_attempts);
    tracing::info!("Offset (min distance between circles): {}", config.offset);
    tracing::info!("Output file: {}", out.path.display());

    let start = Instant::now();

    let luma = image::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?
        .to_luma8();
    let (width, height) = luma.dimensions();
    let mask = OccupancyMask::from_luma(width as usize, height as usize, luma.as_raw(), false)?;

    let mut runner = PackRunner::try_new(config)?;
    tracing::info!("Seed: {}", runner.seed());
    let result = if cli.verbose {
        let mut sink = FnSink::new(report_attempt);
        runner.run_with_events(&mask, &mut sink)?
    } else {
        runner.run(&mask)?
    };

    let elapsed = start.elapsed();

    write_svg(&out.path, &result.circles, width, height, &style)?;
    tracing::info!("SVG file saved as: {}", out.path.display());
    if let Some(preview) = &cli.preview {
        write_preview_png(preview, &result.circles, width, height)?;
        tracing::info!("Preview saved as: {}", preview.display());
    }

    let summary = result.summary();
    tracing::info!(
        "Placed {} of {} circles ({} skipped, {} attempts).",
        summary.placed,
        summary.requested,
        summary.skipped,
        summary.attempts
    );
    tracing::info!("Time elapsed: {:.2} seconds", elapsed.as_secs_f64());
    Ok(())
}

fn report_attempt(event: PackEvent) {
    match event {
        PackEvent::CandidateRejected {
            index,
            attempt,
            reason: Rejection::OutsideMask,
            ..
        } => tracing::info!("Circle {index} does not fit mask (attempt {attempt})"),
        PackEvent::CandidateRejected {
            index,
            attempt,
            reason: Rejection::Overlap,
            ..
        } => tracing::info!("Circle {index} overlaps (attempt {attempt})"),
        PackEvent::CirclePlaced { index, circle, .. } => tracing::info!(
            "Circle {index} added at ({:.1}, {:.1}) r {:.2}",
            circle.center.x,
            circle.center.y,
            circle.radius
        ),
        PackEvent::IndexSkipped { index, .. } => {
            tracing::info!("Giving up with circle {index}. Trying next circle radius")
        }
        _ => {}
    }
}
