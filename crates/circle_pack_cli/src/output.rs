//! Output file naming.
use std::path::{Path, PathBuf};

/// Resolved output path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPath {
    pub path: PathBuf,
    /// The requested path, when it had to be changed to end in `.svg`.
    pub renamed_from: Option<PathBuf>,
}

/// Picks the SVG output path.
///
/// Without an explicit `output` the name is `circles_{stem}_ma-{max_attempts}_n-{n_points}.svg`
/// in the working directory. An explicit path with another extension gets `.svg` instead.
pub fn output_path(
    input: &Path,
    output: Option<&Path>,
    max_attempts: usize,
    n_points: usize,
) -> OutputPath {
    let Some(requested) = output else {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "mask".to_owned());
        return OutputPath {
            path: PathBuf::from(format!("circles_{stem}_ma-{max_attempts}_n-{n_points}.svg")),
            renamed_from: None,
        };
    };

    let is_svg = requested
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if is_svg {
        OutputPath {
            path: requested.to_path_buf(),
            renamed_from: None,
        }
    } else {
        OutputPath {
            path: requested.with_extension("svg"),
            renamed_from: Some(requested.to_path_buf()),
        }
    }
}
