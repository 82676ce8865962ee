#![forbid(unsafe_code)]

mod export;
mod output;
mod settings;

pub use export::{render_preview, svg_document, write_preview_png, write_svg, SvgStyle};
pub use output::{output_path, OutputPath};
pub use settings::{init_tracing, load_settings, Settings};
