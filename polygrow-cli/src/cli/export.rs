//! Render a grown tree: SVG text, PNG via resvg, and the occupancy mask.

use std::fmt::Write as _;
use std::path::Path;

use image::{GrayImage, RgbaImage};
use tiny_skia::Pixmap;

use polygrow::{Color, Field, Tree};

/// Default raster size, in pixels per side.
pub const DEFAULT_IMAGE_SIZE: u32 = 1024;

/// `#rrggbb` plus a separate opacity; SVG consumers disagree on 8-digit hex.
fn paint(color: &Color) -> (String, f64) {
    let [r, g, b, _] = color.to_rgba8();
    (format!("#{:02x}{:02x}{:02x}", r, g, b), color.a.clamp(0.0, 1.0))
}

/// SVG of every accepted node over the full growth disc, y axis up.
///
/// `size` is the nominal pixel size; line thickness from the draw settings is
/// in those pixels.
pub fn tree_to_svg(tree: &Tree, size: u32) -> String {
    let config = tree.config();
    let r = tree.field().max_radius();
    let unit = 2.0 * r / size.max(1) as f64;

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg"
     width="{size}" height="{size}"
     viewBox="{x:.4} {x:.4} {w:.4} {w:.4}">
  <title>polygrow {name} seed {seed}</title>
  <desc>{count} nodes</desc>
  <rect x="{x:.4}" y="{x:.4}" width="{w:.4}" height="{w:.4}" fill="white"/>
"#,
        size = size,
        x = -r,
        w = 2.0 * r,
        name = config.variant.name(),
        seed = config.random_seed,
        count = tree.nodes().len(),
    );

    let (stroke, stroke_opacity) = paint(&config.draw.line_color);
    if config.draw.line_thickness > 0 {
        let _ = writeln!(
            svg,
            r#"  <g transform="scale(1,-1)" stroke="{}" stroke-opacity="{:.3}" stroke-width="{:.5}" stroke-linejoin="round">"#,
            stroke,
            stroke_opacity,
            config.draw.line_thickness as f64 * unit
        );
    } else {
        svg.push_str("  <g transform=\"scale(1,-1)\" stroke=\"none\">\n");
    }

    for node in tree.nodes() {
        let poly = tree.world_polygon(node);
        if poly.len() < 3 {
            continue;
        }

        let d: String = poly
            .points
            .iter()
            .enumerate()
            .map(|(i, p)| format!("{}{:.4},{:.4}", if i == 0 { "M" } else { " L" }, p.x, p.y))
            .collect();

        let (fill, opacity) = paint(&node.color);
        if opacity < 1.0 {
            let _ = writeln!(svg, r#"    <path d="{} Z" fill="{}" fill-opacity="{:.3}"/>"#, d, fill, opacity);
        } else {
            let _ = writeln!(svg, r#"    <path d="{} Z" fill="{}"/>"#, d, fill);
        }
    }

    svg.push_str("  </g>\n</svg>\n");
    svg
}

/// Rasterize SVG text to a `size` x `size` PNG on white.
pub fn write_png(svg: &str, path: &Path, size: u32) -> Result<(), String> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &options).map_err(|e| format!("Failed to parse generated SVG: {}", e))?;

    let mut pixmap = Pixmap::new(size, size).ok_or_else(|| format!("Could not create {}x{} pixmap", size, size))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let scale = size as f32 / tree.size().width().max(1.0);
    resvg::render(&tree, tiny_skia::Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    let rgba = RgbaImage::from_raw(size, size, pixmap.take()).ok_or("Pixmap size mismatch")?;
    rgba.save(path).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

/// Committed occupancy cells as a grayscale PNG (claimed = white), flipped
/// so it lines up with the SVG.
pub fn write_mask(field: &Field, path: &Path) -> Result<(), String> {
    let image = mask_image(field)?;
    image.save(path).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

fn mask_image(field: &Field) -> Result<GrayImage, String> {
    let side = field.side() as u32;
    let raw = GrayImage::from_raw(side, side, field.cells().to_vec()).ok_or("Field size mismatch")?;
    Ok(image::imageops::flip_vertical(&raw))
}
