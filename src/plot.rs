//! Diagnostic rendering of an [`OffsetGrid`].
//!
//! The plot covers the fixed unit cell `x in [0, 1]`, `y in [-1, 0]` on a
//! square image, so the aspect ratio of the cell is preserved. Each offset
//! becomes a filled disc.

use std::path::Path;

use anyhow::Context as _;
use image::{Rgba, RgbaImage};
use kurbo::{Affine, Point};

use crate::aa_grid::OffsetGrid;
use crate::foundation::error::{OrbitcamError, OrbitcamResult};

#[derive(Clone, Debug, PartialEq)]
pub struct PlotOpts {
    /// Edge length of the square image in pixels.
    pub size: u32,
    /// Disc radius in pixels.
    pub point_radius: f64,
    pub background: [u8; 4],
    pub point_color: [u8; 4],
    /// Outline of the unit cell, drawn along the image edge.
    pub border_color: Option<[u8; 4]>,
}

impl Default for PlotOpts {
    fn default() -> Self {
        Self {
            size: 512,
            point_radius: 6.0,
            background: [255, 255, 255, 255],
            point_color: [220, 30, 30, 255],
            border_color: Some([40, 40, 40, 255]),
        }
    }
}

impl PlotOpts {
    /// Largest accepted edge length in pixels.
    pub const MAX_SIZE: u32 = 16_384;

    pub fn validate(&self) -> OrbitcamResult<()> {
        if !(2..=Self::MAX_SIZE).contains(&self.size) {
            return Err(OrbitcamError::invalid_configuration(format!(
                "plot size must be within 2..={} pixels, got {}",
                Self::MAX_SIZE,
                self.size
            )));
        }
        if !(self.point_radius.is_finite() && self.point_radius > 0.0) {
            return Err(OrbitcamError::invalid_configuration(format!(
                "plot point radius must be positive, got {}",
                self.point_radius
            )));
        }
        Ok(())
    }

    /// Maps cell coordinates to pixel coordinates (y flipped).
    pub fn cell_to_pixels(&self) -> Affine {
        let s = f64::from(self.size);
        Affine::new([s, 0.0, 0.0, -s, 0.0, 0.0])
    }
}

pub fn plot_offsets(grid: &OffsetGrid, opts: &PlotOpts) -> OrbitcamResult<RgbaImage> {
    opts.validate()?;

    let mut img = RgbaImage::from_pixel(opts.size, opts.size, Rgba(opts.background));
    if let Some(border) = opts.border_color {
        draw_border(&mut img, Rgba(border));
    }

    let to_px = opts.cell_to_pixels();
    for offset in grid {
        let center = to_px * offset.to_point();
        fill_disc(&mut img, center, opts.point_radius, Rgba(opts.point_color));
    }

    tracing::debug!(points = grid.len(), size = opts.size, "plotted offset grid");
    Ok(img)
}

pub fn save_plot_png(grid: &OffsetGrid, opts: &PlotOpts, path: &Path) -> OrbitcamResult<()> {
    let img = plot_offsets(grid, opts)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

fn draw_border(img: &mut RgbaImage, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    for x in 0..w {
        img.put_pixel(x, 0, color);
        img.put_pixel(x, h - 1, color);
    }
    for y in 0..h {
        img.put_pixel(0, y, color);
        img.put_pixel(w - 1, y, color);
    }
}

fn fill_disc(img: &mut RgbaImage, center: Point, radius: f64, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    let x0 = (center.x - radius).floor().max(0.0) as u32;
    let y0 = (center.y - radius).floor().max(0.0) as u32;
    let x1 = ((center.x + radius).ceil().max(0.0) as u32).min(w);
    let y1 = ((center.y + radius).ceil().max(0.0) as u32).min(h);

    let r2 = radius * radius;
    for y in y0..y1 {
        for x in x0..x1 {
            let px = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if (px - center).hypot2() <= r2 {
                img.put_pixel(x, y, color);
            }
        }
    }
}
