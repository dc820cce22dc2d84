//! 2-D drawing surfaces.
//!
//! Renderers paint through the object-safe [`Surface`] trait, which mirrors
//! the handful of canvas operations the algorithms need: clear, save/restore,
//! translate/rotate, global alpha, rectangle fill/stroke, path stroke, and
//! circle fill with a solid or radial-gradient [`Paint`].
//!
//! # Module overview
//!
//! - [`raster`] -- [`Raster`], an anti-aliased RGBA8 canvas on `tiny-skia`.
//! - [`recorder`] -- [`Recorder`], a surface that logs [`DrawOp`]s in device space.

pub mod raster;
pub mod recorder;

pub use raster::Raster;
pub use recorder::{DrawOp, Recorder};

use crate::color::{Rgba, Srgb};
use glam::{DAffine2, DVec2};

/// Axis-aligned rectangle in user space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }
}

/// A color stop at `offset` in [0, 1] along a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorStop {
    pub offset: f64,
    pub color: Rgba,
}

/// Two-circle radial gradient with pad extension: `t = 0` on the start
/// circle, `t = 1` on the end circle. Stops must be sorted by offset.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradient {
    pub start: DVec2,
    pub start_radius: f64,
    pub end: DVec2,
    pub end_radius: f64,
    pub stops: Vec<ColorStop>,
}

/// How a filled shape is colored.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Rgba),
    Radial(RadialGradient),
}

impl From<Rgba> for Paint {
    fn from(c: Rgba) -> Self {
        Paint::Solid(c)
    }
}

impl From<Srgb> for Paint {
    fn from(c: Srgb) -> Self {
        Paint::Solid(c.opaque())
    }
}

/// A raster drawing target.
///
/// Coordinates are in user space and mapped through the current transform.
/// Object-safe: renderers receive `&mut dyn Surface`.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> usize;

    /// Height in pixels.
    fn height(&self) -> usize;

    /// Resets transform, save stack and global alpha, then fills every pixel
    /// with `color`.
    fn clear(&mut self, color: Srgb);

    /// Pushes the current transform and global alpha.
    fn save(&mut self);

    /// Pops the state pushed by the matching [`save`](Surface::save).
    /// Does nothing if the stack is empty.
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);

    /// Rotates user space clockwise (y points down) by `radians`.
    fn rotate(&mut self, radians: f64);

    /// Multiplier applied to the alpha of everything drawn afterwards.
    fn set_global_alpha(&mut self, alpha: f64);

    fn fill_rect(&mut self, rect: Rect, color: Rgba);

    /// Strokes the outline of `rect`, centered on its edges.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64);

    /// Strokes the open polyline through `points` with butt caps.
    ///
    /// The whole path is composited once, so self-overlaps do not darken.
    /// Fewer than two distinct points paint nothing.
    fn stroke_path(&mut self, points: &[DVec2], color: Rgba, line_width: f64);

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint);
}

/// Transform and global alpha, plus the save stack.
#[derive(Debug, Clone)]
pub(crate) struct DrawState {
    transform: DAffine2,
    alpha: f64,
    saved: Vec<(DAffine2, f64)>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: DAffine2::IDENTITY,
            alpha: 1.0,
            saved: Vec::new(),
        }
    }
}

impl DrawState {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn save(&mut self) {
        self.saved.push((self.transform, self.alpha));
    }

    pub(crate) fn restore(&mut self) {
        if let Some((transform, alpha)) = self.saved.pop() {
            self.transform = transform;
            self.alpha = alpha;
        }
    }

    pub(crate) fn translate(&mut self, dx: f64, dy: f64) {
        self.transform = self.transform * DAffine2::from_translation(DVec2::new(dx, dy));
    }

    pub(crate) fn rotate(&mut self, radians: f64) {
        self.transform = self.transform * DAffine2::from_angle(radians);
    }

    pub(crate) fn set_alpha(&mut self, alpha: f64) {
        if alpha.is_finite() {
            self.alpha = alpha.clamp(0.0, 1.0);
        }
    }

    pub(crate) fn alpha(&self) -> f64 {
        self.alpha
    }

    pub(crate) fn transform(&self) -> DAffine2 {
        self.transform
    }

    pub(crate) fn to_device(&self, p: DVec2) -> DVec2 {
        self.transform.transform_point2(p)
    }

    /// Uniform scale factor of the current transform.
    pub(crate) fn scale(&self) -> f64 {
        self.transform.matrix2.determinant().abs().sqrt()
    }

    /// Device-space rectangle, if the transform keeps rectangles axis-aligned.
    pub(crate) fn device_rect(&self, rect: Rect) -> Option<Rect> {
        let m = self.transform.matrix2;
        if m.x_axis.y != 0.0 || m.y_axis.x != 0.0 {
            return None;
        }
        let a = self.to_device(DVec2::new(rect.x, rect.y));
        let b = self.to_device(DVec2::new(rect.right(), rect.bottom()));
        let min = a.min(b);
        let max = a.max(b);
        Some(Rect::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    /// The four device-space corners of `rect`, in drawing order.
    pub(crate) fn device_corners(&self, rect: Rect) -> [DVec2; 4] {
        [
            DVec2::new(rect.x, rect.y),
            DVec2::new(rect.right(), rect.y),
            DVec2::new(rect.right(), rect.bottom()),
            DVec2::new(rect.x, rect.bottom()),
        ]
        .map(|p| self.to_device(p))
    }
}
