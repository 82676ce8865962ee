//! SVG export and PNG preview of placed circles.
use std::path::Path;

use anyhow::Context;
use circle_pack::prelude::Circle;
use glam::Vec2;
use image::{GrayImage, Luma};
use serde::Deserialize;
use svg::node::element::{Circle as SvgCircle, Rectangle};
use svg::Document;

/// Colors and scale of the exported drawing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SvgStyle {
    pub background: String,
    pub fill: String,
    pub stroke: String,
    /// Multiplies every coordinate and radius, e.g. pixels to millimetres.
    pub scale: f32,
}

impl Default for SvgStyle {
    fn default() -> Self {
        Self {
            background: "black".into(),
            fill: "white".into(),
            stroke: "rgb(15%,15%,15%)".into(),
            scale: 1.0,
        }
    }
}

/// Builds a document of `width x height` mask pixels: a background rectangle and one
/// circle element per placed circle.
pub fn svg_document(circles: &[Circle], width: u32, height: u32, style: &SvgStyle) -> Document {
    let w = width as f32 * style.scale;
    let h = height as f32 * style.scale;

    let mut document = Document::new()
        .set("viewBox", (0.0f32, 0.0f32, w, h))
        .set("width", w)
        .set("height", h)
        .add(
            Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", w)
                .set("height", h)
                .set("fill", style.background.as_str()),
        );

    for circle in circles.iter().map(|c| c.scaled(style.scale)) {
        document = document.add(
            SvgCircle::new()
                .set("cx", circle.center.x)
                .set("cy", circle.center.y)
                .set("r", circle.radius)
                .set("stroke", style.stroke.as_str())
                .set("fill", style.fill.as_str()),
        );
    }

    document
}

pub fn write_svg(
    path: &Path,
    circles: &[Circle],
    width: u32,
    height: u32,
    style: &SvgStyle,
) -> anyhow::Result<()> {
    let document = svg_document(circles, width, height, style);
    svg::save(path, &document).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Rasterizes the circles white-on-black at mask resolution.
pub fn render_preview(circles: &[Circle], width: u32, height: u32) -> GrayImage {
    let mut img = GrayImage::from_pixel(width, height, Luma([0]));
    for c in circles {
        let x0 = (c.center.x - c.radius).floor().max(0.0) as u32;
        let y0 = (c.center.y - c.radius).floor().max(0.0) as u32;
        let x1 = ((c.center.x + c.radius).ceil() as u32).min(width);
        let y1 = ((c.center.y + c.radius).ceil() as u32).min(height);
        let r2 = c.radius * c.radius;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                if p.distance_squared(c.center) <= r2 {
                    img.put_pixel(x, y, Luma([255]));
                }
            }
        }
    }
    img
}

pub fn write_preview_png(
    path: &Path,
    circles: &[Circle],
    width: u32,
    height: u32,
) -> anyhow::Result<()> {
    render_preview(circles, width, height)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
