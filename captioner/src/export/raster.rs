//! # Glyph rasterizer
//!
//! Glyph outlines are built into a lyon path in canvas space, flattened into line edges,
//! and filled with the nonzero rule. Coverage is exact horizontally and supersampled
//! vertically, then blended onto the canvas in the layer's colour.

use captioner_core::{color::Rgba8, state::transform::Matrix};
use lyon_tessellation::path::{iterator::PathIterator, PathEvent};
use rayon::prelude::*;
use rustybuzz::ttf_parser;

/// Sub-scanlines per pixel row.
const SUBSAMPLES: u32 = 4;
/// Max distance, in pixels, between a flattened curve and the true one.
const TOLERANCE: f32 = 0.25;

/// A directed line segment, stored top to bottom.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Edge {
    top: [f32; 2],
    bottom: [f32; 2],
    /// +1 if the outline went downward here, -1 if upward.
    winding: i32,
}
impl Edge {
    #[allow(clippy::float_cmp)]
    fn new(from: [f32; 2], to: [f32; 2]) -> Option<Self> {
        if from[1] == to[1] {
            // Horizontal edges never cross a scanline.
            return None;
        }
        Some(if from[1] < to[1] {
            Self {
                top: from,
                bottom: to,
                winding: 1,
            }
        } else {
            Self {
                top: to,
                bottom: from,
                winding: -1,
            }
        })
    }
    /// Where this edge crosses the horizontal line at `y`, if it does.
    fn crossing(&self, y: f32) -> Option<f32> {
        (self.top[1] <= y && y < self.bottom[1]).then(|| {
            let t = (y - self.top[1]) / (self.bottom[1] - self.top[1]);
            self.top[0] + t * (self.bottom[0] - self.top[0])
        })
    }
}

/// Collects glyph outlines into one canvas-space path.
pub struct EdgeBuilder {
    path: lyon_tessellation::path::path::Builder,
    layer: Matrix,
    /// Pixels per font unit.
    scale: f32,
    /// Current glyph origin, in layer space.
    origin: [f32; 2],
    /// A subpath was begun and not yet ended.
    open: bool,
}
impl EdgeBuilder {
    #[must_use]
    pub fn new(layer: Matrix, scale: f32) -> Self {
        Self {
            path: lyon_tessellation::path::Path::builder(),
            layer,
            scale,
            origin: [0.0; 2],
            open: false,
        }
    }
    /// Outline a glyph with its origin at `origin`. Returns false if the face has no outline
    /// for it, as for spaces.
    pub fn add_glyph(
        &mut self,
        face: &ttf_parser::Face,
        glyph: ttf_parser::GlyphId,
        origin: [f32; 2],
    ) -> bool {
        self.origin = origin;
        let outlined = face.outline_glyph(glyph, self).is_some();
        self.end_open();
        outlined
    }
    /// Flatten everything outlined so far into edges.
    #[must_use]
    pub fn finish(mut self) -> Vec<Edge> {
        self.end_open();
        let path = self.path.build();
        path.iter()
            .flattened(TOLERANCE)
            .filter_map(|event| match event {
                PathEvent::Line { from, to } => Edge::new(from.to_array(), to.to_array()),
                // Fills are implicitly closed.
                PathEvent::End { last, first, .. } => Edge::new(last.to_array(), first.to_array()),
                _ => None,
            })
            .collect()
    }
    fn end_open(&mut self) {
        if self.open {
            self.path.end(false);
            self.open = false;
        }
    }
    /// Font units (Y up) to canvas pixels.
    fn to_canvas(&self, x: f32, y: f32) -> lyon_tessellation::math::Point {
        let [x, y] = self.layer.apply([
            self.origin[0] + x * self.scale,
            self.origin[1] - y * self.scale,
        ]);
        lyon_tessellation::math::point(x, y)
    }
}

impl ttf_parser::OutlineBuilder for EdgeBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.end_open();
        let at = self.to_canvas(x, y);
        self.path.begin(at);
        self.open = true;
    }
    fn line_to(&mut self, x: f32, y: f32) {
        let to = self.to_canvas(x, y);
        self.path.line_to(to);
    }
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = self.to_canvas(x1, y1);
        let to = self.to_canvas(x, y);
        self.path.quadratic_bezier_to(control, to);
    }
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let c1 = self.to_canvas(x1, y1);
        let c2 = self.to_canvas(x2, y2);
        let to = self.to_canvas(x, y);
        self.path.cubic_bezier_to(c1, c2, to);
    }
    fn close(&mut self) {
        if self.open {
            self.path.close();
            self.open = false;
        }
    }
}

/// Add `weight` times the horizontal overlap of `[from, to)` to each pixel of `row`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn add_span(row: &mut [f32], from: f32, to: f32, weight: f32) {
    let width = row.len() as f32;
    let from = from.clamp(0.0, width);
    let to = to.clamp(0.0, width);
    if to <= from {
        return;
    }
    let first = from.floor() as usize;
    let last = (to.ceil() as usize).min(row.len());
    for (x, pixel) in row.iter_mut().enumerate().take(last).skip(first) {
        let left = from.max(x as f32);
        let right = to.min(x as f32 + 1.0);
        *pixel += (right - left) * weight;
    }
}

/// Fraction of each pixel covered by the edges' interior, row-major, in `0.0..=1.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coverage(edges: &[Edge], width: u32, height: u32) -> Vec<f32> {
    let width = width as usize;
    let mut coverage = vec![0.0f32; width * height as usize];
    if width == 0 {
        return coverage;
    }
    let weight = 1.0 / SUBSAMPLES as f32;
    coverage
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let mut crossings = Vec::new();
            for sub in 0..SUBSAMPLES {
                let sample_y = y as f32 + (sub as f32 + 0.5) * weight;
                crossings.clear();
                crossings.extend(edges.iter().filter_map(|edge| {
                    edge.crossing(sample_y).map(|x| (x, edge.winding))
                }));
                crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

                let mut winding = 0;
                let mut span_start = 0.0;
                for &(x, direction) in &crossings {
                    if winding == 0 {
                        span_start = x;
                    }
                    winding += direction;
                    if winding == 0 {
                        add_span(row, span_start, x, weight);
                    }
                }
            }
            for pixel in row.iter_mut() {
                *pixel = pixel.min(1.0);
            }
        });
    coverage
}

/// Blend `fill` onto `target` wherever `coverage` says, scaled by `opacity`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn composite(target: &mut image::RgbaImage, coverage: &[f32], fill: Rgba8, opacity: f32) {
    let source_alpha = fill.alpha_f32() * opacity.clamp(0.0, 1.0);
    if source_alpha <= 0.0 {
        return;
    }
    let source = fill.0.map(|channel| f32::from(channel) / 255.0);
    target
        .par_chunks_exact_mut(4)
        .zip(coverage.par_iter())
        .for_each(|(pixel, &cover)| {
            let a = cover * source_alpha;
            if a <= 0.0 {
                return;
            }
            let dest_alpha = f32::from(pixel[3]) / 255.0;
            let out_alpha = a + dest_alpha * (1.0 - a);
            for channel in 0..3 {
                let d = f32::from(pixel[channel]) / 255.0;
                let c = (source[channel] * a + d * dest_alpha * (1.0 - a)) / out_alpha;
                pixel[channel] = (c * 255.0).round().clamp(0.0, 255.0) as u8;
            }
            pixel[3] = (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8;
        });
}
