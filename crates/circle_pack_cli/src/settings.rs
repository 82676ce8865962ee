use std::fs;
use std::path::Path;

use anyhow::Context;
use circle_pack::prelude::PackConfig;
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use crate::export::SvgStyle;

/// Contents of a RON settings file passed with `--config`.
///
/// ```ron
/// (
///     packing: (n_points: 800, r_min: 1.5, r_max: 20.0, update: Every(100)),
///     style: (scale: 0.5),
/// )
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub packing: PackConfig,
    pub style: SvgStyle,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading settings file {}", path.display()))?;
    parse_settings(&text).with_context(|| format!("parsing settings file {}", path.display()))
}

fn parse_settings(text: &str) -> anyhow::Result<Settings> {
    Ok(ron::from_str(text)?)
}

/// Installs a `fmt` subscriber. `RUST_LOG` wins over the default level.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_target(false)
        .init();
}
