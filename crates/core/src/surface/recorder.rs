//! A [`Surface`] that records draw calls instead of painting pixels.
//!
//! Every operation is logged in device space with global alpha already
//! applied, which lets tests count primitives (tree segments, leaf circles,
//! Mondrian rectangles) and check geometry without inspecting a raster.

use super::{DrawState, Paint, Rect, Surface};
use crate::color::{Rgba, Srgb};
use glam::DVec2;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Srgb),
    /// Device-space bounding box of the filled rectangle.
    FillRect { rect: Rect, color: Rgba },
    StrokeRect {
        rect: Rect,
        color: Rgba,
        line_width: f64,
    },
    StrokePath {
        points: Vec<DVec2>,
        color: Rgba,
        line_width: f64,
    },
    FillCircle {
        center: DVec2,
        radius: f64,
        paint: Paint,
    },
}

/// Records [`DrawOp`]s for a surface of a given size.
#[derive(Debug, Clone)]
pub struct Recorder {
    width: usize,
    height: usize,
    ops: Vec<DrawOp>,
    state: DrawState,
}

impl Recorder {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            state: DrawState::default(),
        }
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    /// Recorded path strokes.
    pub fn paths(&self) -> impl Iterator<Item = (&[DVec2], Rgba, f64)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::StrokePath {
                points,
                color,
                line_width,
            } => Some((points.as_slice(), *color, *line_width)),
            _ => None,
        })
    }

    /// Recorded circle fills as `(center, radius, paint)`.
    pub fn circles(&self) -> impl Iterator<Item = (DVec2, f64, &Paint)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillCircle {
                center,
                radius,
                paint,
            } => Some((*center, *radius, paint)),
            _ => None,
        })
    }

    /// Recorded rectangle fills.
    pub fn filled_rects(&self) -> impl Iterator<Item = (Rect, Rgba)> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::FillRect { rect, color } => Some((*rect, *color)),
            _ => None,
        })
    }

    /// Recorded rectangle outlines.
    pub fn stroked_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::StrokeRect { rect, .. } => Some(*rect),
            _ => None,
        })
    }

    fn device_bounds(&self, rect: Rect) -> Rect {
        self.state.device_rect(rect).unwrap_or_else(|| {
            let corners = self.state.device_corners(rect);
            let min = corners.iter().fold(DVec2::splat(f64::INFINITY), |a, &b| a.min(b));
            let max = corners
                .iter()
                .fold(DVec2::splat(f64::NEG_INFINITY), |a, &b| a.max(b));
            Rect::new(min.x, min.y, max.x - min.x, max.y - min.y)
        })
    }
}

impl Surface for Recorder {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self, color: Srgb) {
        self.state.reset();
        self.ops.push(DrawOp::Clear(color));
    }

    fn save(&mut self) {
        self.state.save();
    }

    fn restore(&mut self) {
        self.state.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.state.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.state.rotate(radians);
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.set_alpha(alpha);
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let rect = self.device_bounds(rect);
        let color = color.fade(self.state.alpha());
        self.ops.push(DrawOp::FillRect { rect, color });
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        let rect = self.device_bounds(rect);
        let color = color.fade(self.state.alpha());
        let line_width = line_width * self.state.scale();
        self.ops.push(DrawOp::StrokeRect {
            rect,
            color,
            line_width,
        });
    }

    fn stroke_path(&mut self, points: &[DVec2], color: Rgba, line_width: f64) {
        let points = points.iter().map(|&p| self.state.to_device(p)).collect();
        let color = color.fade(self.state.alpha());
        let line_width = line_width * self.state.scale();
        self.ops.push(DrawOp::StrokePath {
            points,
            color,
            line_width,
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        let center = self.state.to_device(center);
        let radius = radius * self.state.scale();
        let paint = match paint {
            Paint::Solid(c) => Paint::Solid(c.fade(self.state.alpha())),
            Paint::Radial(g) => Paint::Radial(g.clone()),
        };
        self.ops.push(DrawOp::FillCircle {
            center,
            radius,
            paint,
        });
    }
}
