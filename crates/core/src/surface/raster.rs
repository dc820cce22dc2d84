//! RGBA8 canvas backed by a `tiny_skia::Pixmap`.
//!
//! Fills and strokes are anti-aliased and composited source-over. The current
//! transform of the [`DrawState`] is handed to tiny-skia with every call, so
//! stroke widths scale with it. Circles are built in device space, which keeps
//! gradient geometry independent of how tiny-skia maps shaders.

use super::{DrawState, Paint, RadialGradient, Rect, Surface};
use crate::color::{Rgba, Srgb};
use crate::error::EngineError;
use glam::{DAffine2, DVec2};
use tiny_skia::{
    Color, FillRule, GradientStop, LineCap, LineJoin, PathBuilder, Pixmap, Point, SpreadMode,
    Stroke, Transform,
};

/// An owned RGBA8 pixel buffer implementing [`Surface`].
///
/// A new raster is fully transparent; [`Surface::clear`] makes it opaque.
#[derive(Debug, Clone)]
pub struct Raster {
    pixmap: Pixmap,
    state: DrawState,
}

impl Raster {
    /// Creates a transparent raster.
    ///
    /// Returns `EngineError::InvalidDimensions` if either dimension is zero
    /// or too large for a pixmap.
    pub fn new(width: usize, height: usize) -> Result<Self, EngineError> {
        let w = u32::try_from(width).map_err(|_| EngineError::InvalidDimensions)?;
        let h = u32::try_from(height).map_err(|_| EngineError::InvalidDimensions)?;
        let pixmap = Pixmap::new(w, h).ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            pixmap,
            state: DrawState::default(),
        })
    }

    /// Row-major RGBA8 bytes with straight alpha, `width * height * 4` long.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixmap
            .pixels()
            .iter()
            .flat_map(|p| {
                let c = p.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect()
    }

    fn transform(&self) -> Transform {
        sk_transform(self.state.transform())
    }
}

fn sk_transform(t: DAffine2) -> Transform {
    let m = t.matrix2;
    Transform::from_row(
        m.x_axis.x as f32,
        m.x_axis.y as f32,
        m.y_axis.x as f32,
        m.y_axis.y as f32,
        t.translation.x as f32,
        t.translation.y as f32,
    )
}

fn sk_color(c: Rgba) -> Color {
    let [r, g, b, a] = c.to_rgba8();
    Color::from_rgba8(r, g, b, a)
}

fn sk_rect(r: Rect) -> Option<tiny_skia::Rect> {
    tiny_skia::Rect::from_xywh(r.x as f32, r.y as f32, r.w as f32, r.h as f32)
}

fn solid(color: Rgba) -> tiny_skia::Paint<'static> {
    let mut paint = tiny_skia::Paint::default();
    paint.set_color(sk_color(color));
    paint
}

fn butt_stroke(line_width: f64) -> Stroke {
    Stroke {
        width: line_width as f32,
        line_cap: LineCap::Butt,
        line_join: LineJoin::Miter,
        ..Stroke::default()
    }
}

/// Device-space shader for `g`, faded by `alpha`.
///
/// tiny-skia's two-point gradient starts from a point, so the start circle is
/// collapsed to its center and the stops are moved out to where the start
/// radius sits on the end circle. This is exact when both circles share a
/// center. Stops inside the start circle keep the first color.
fn radial_shader(
    g: &RadialGradient,
    state: &DrawState,
    alpha: f64,
) -> Option<tiny_skia::Shader<'static>> {
    let scale = state.scale();
    let start = state.to_device(g.start);
    let end = state.to_device(g.end);
    let end_radius = g.end_radius * scale;
    if end_radius <= 0.0 || !end_radius.is_finite() {
        return None;
    }
    let inner = (g.start_radius * scale / end_radius).clamp(0.0, 1.0);

    let first = g.stops.first()?;
    let mut stops = vec![GradientStop::new(0.0, sk_color(first.color.fade(alpha)))];
    stops.extend(g.stops.iter().map(|s| {
        let offset = inner + s.offset.clamp(0.0, 1.0) * (1.0 - inner);
        GradientStop::new(offset as f32, sk_color(s.color.fade(alpha)))
    }));

    tiny_skia::RadialGradient::new(
        Point::from_xy(start.x as f32, start.y as f32),
        Point::from_xy(end.x as f32, end.y as f32),
        end_radius as f32,
        stops,
        SpreadMode::Pad,
        Transform::identity(),
    )
}

impl Surface for Raster {
    fn width(&self) -> usize {
        self.pixmap.width() as usize
    }

    fn height(&self) -> usize {
        self.pixmap.height() as usize
    }

    fn clear(&mut self, color: Srgb) {
        self.state.reset();
        self.pixmap.fill(sk_color(color.opaque()));
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
        let Some(r) = sk_rect(rect) else {
            return;
        };
        let paint = solid(color.fade(self.state.alpha()));
        let transform = self.transform();
        self.pixmap.fill_rect(r, &paint, transform, None);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba, line_width: f64) {
        if line_width <= 0.0 {
            return;
        }
        let Some(r) = sk_rect(rect) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let paint = solid(color.fade(self.state.alpha()));
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint, &butt_stroke(line_width), transform, None);
    }

    fn stroke_path(&mut self, points: &[DVec2], color: Rgba, line_width: f64) {
        if line_width <= 0.0 || points.windows(2).all(|w| w[0] == w[1]) {
            return;
        }
        let mut pb = PathBuilder::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                pb.move_to(p.x as f32, p.y as f32);
            } else {
                pb.line_to(p.x as f32, p.y as f32);
            }
        }
        let Some(path) = pb.finish() else {
            return;
        };
        let paint = solid(color.fade(self.state.alpha()));
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &paint, &butt_stroke(line_width), transform, None);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, paint: &Paint) {
        if radius <= 0.0 || !radius.is_finite() {
            return;
        }
        let c = self.state.to_device(center);
        let r = radius * self.state.scale();
        let Some(path) = PathBuilder::from_circle(c.x as f32, c.y as f32, r as f32) else {
            return;
        };

        let alpha = self.state.alpha();
        let sk_paint = match paint {
            Paint::Solid(color) => solid(color.fade(alpha)),
            Paint::Radial(g) => match radial_shader(g, &self.state, alpha) {
                Some(shader) => tiny_skia::Paint {
                    shader,
                    ..tiny_skia::Paint::default()
                },
                None => return,
            },
        };
        self.pixmap.fill_path(
            &path,
            &sk_paint,
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }
}
