#![deny(unsafe_code)]
//! Flow-field renderer.
//!
//! Scatters particles at random positions and lets each one drift for a fixed
//! number of steps along the angle given by a lattice gradient noise field.
//! Every particle's trail is stroked as one thin path in a random palette
//! color, at a shared global alpha.
//!
//! The noise function is stateless: its gradients are hashed from the lattice
//! coordinates with `sin`/`cos`, so it never touches the random stream. Only
//! particle placement and color do, in this order per particle: x, y, color.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::Srgb;
use glam::DVec2;
use serde_json::{json, Value};
use std::f64::consts::PI;

/// Steps traced per particle.
pub const STEPS: usize = 50;
/// Stroke width of every trail.
const LINE_WIDTH: f64 = 1.0;

const DEFAULT_SCALE: f64 = 0.01;
const DEFAULT_PARTICLES: f64 = 1000.0;
const DEFAULT_SPEED: f64 = 2.0;
const DEFAULT_COMPLEXITY: f64 = 2.0;
const DEFAULT_OPACITY: f64 = 0.6;

/// Parameter table for `perlin`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "perlin",
    params: &[
        ParamSpec::number(
            "scale",
            DEFAULT_SCALE,
            0.001,
            0.1,
            0.001,
            "Noise frequency per pixel",
        ),
        ParamSpec::integer(
            "particles",
            DEFAULT_PARTICLES,
            1.0,
            2000.0,
            "Number of particles",
        ),
        ParamSpec::number(
            "speed",
            DEFAULT_SPEED,
            0.1,
            10.0,
            0.1,
            "Distance moved per step",
        ),
        ParamSpec::number(
            "complexity",
            DEFAULT_COMPLEXITY,
            0.1,
            10.0,
            0.1,
            "Extra multiplier on the noise frequency",
        ),
        ParamSpec::number(
            "opacity",
            DEFAULT_OPACITY,
            0.0,
            1.0,
            0.01,
            "Global alpha of the trails",
        ),
    ],
};

/// Flow-field parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowFieldParams {
    pub scale: f64,
    pub particles: usize,
    pub speed: f64,
    pub complexity: f64,
    pub opacity: f64,
}

impl Default for FlowFieldParams {
    fn default() -> Self {
        Self {
            scale: DEFAULT_SCALE,
            particles: DEFAULT_PARTICLES as usize,
            speed: DEFAULT_SPEED,
            complexity: DEFAULT_COMPLEXITY,
            opacity: DEFAULT_OPACITY,
        }
    }
}

impl FlowFieldParams {
    /// Extracts parameters from a JSON object, falling back to defaults and
    /// clamping into the schema ranges.
    pub fn from_json(params: &Value) -> Self {
        Self {
            scale: SCHEMA.spec("scale").read_f64(params),
            particles: SCHEMA.spec("particles").read_usize(params),
            speed: SCHEMA.spec("speed").read_f64(params),
            complexity: SCHEMA.spec("complexity").read_f64(params),
            opacity: SCHEMA.spec("opacity").read_f64(params),
        }
    }
}

/// A particle: current position and trail color.
#[derive(Debug, Clone, Copy)]
struct Particle {
    pos: DVec2,
    color: Srgb,
}

/// Flow-field renderer.
#[derive(Debug, Clone, Default)]
pub struct FlowField {
    params: FlowFieldParams,
}

impl FlowField {
    pub fn new(params: FlowFieldParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(FlowFieldParams::from_json(params))
    }

    /// Follows the field from `start` for up to [`STEPS`] steps.
    ///
    /// Returns the start point followed by every in-bounds step. Tracing stops
    /// at the first step that leaves `[0, width] x [0, height]`; if that is the
    /// very first step, the trail is the single start point.
    pub fn trace(&self, start: DVec2, width: f64, height: f64) -> Vec<DVec2> {
        let FlowFieldParams {
            scale,
            complexity,
            speed,
            ..
        } = self.params;
        let mut pos = start;
        let mut trail = Vec::with_capacity(STEPS + 1);
        trail.push(pos);
        for _ in 0..STEPS {
            let angle =
                lattice_noise(pos.x * scale * complexity, pos.y * scale * complexity) * PI * 4.0;
            pos.x += angle.cos() * speed;
            pos.y += angle.sin() * speed;
            if pos.x < 0.0 || pos.x > width || pos.y < 0.0 || pos.y > height {
                break;
            }
            trail.push(pos);
        }
        trail
    }
}

impl Renderer for FlowField {
    fn render(&self, frame: &mut Frame<'_>) {
        let (w, h) = (frame.width(), frame.height());

        let mut particles = Vec::with_capacity(self.params.particles);
        for _ in 0..self.params.particles {
            let x = frame.rng.next_f64() * w;
            let y = frame.rng.next_f64() * h;
            let color = frame.palette.pick(frame.rng);
            particles.push(Particle {
                pos: DVec2::new(x, y),
                color,
            });
        }

        frame.surface.set_global_alpha(self.params.opacity);
        for p in &particles {
            let trail = self.trace(p.pos, w, h);
            frame
                .surface
                .stroke_path(&trail, p.color.opaque(), LINE_WIDTH);
        }
    }

    fn params(&self) -> Value {
        json!({
            "scale": self.params.scale,
            "particles": self.params.particles,
            "speed": self.params.speed,
            "complexity": self.params.complexity,
            "opacity": self.params.opacity,
        })
    }

    fn param_schema(&self) -> &'static ParamSchema {
        &SCHEMA
    }
}

/// Lattice gradient noise at `(x, y)`, roughly in [-1, 1].
///
/// Gradients at integer lattice points come from [`gradient_angle`];
/// contributions are blended with a quintic fade and bilinear interpolation.
/// Zero at every lattice point.
pub fn lattice_noise(x: f64, y: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let xf = x - x0;
    let yf = y - y0;

    let u = fade(xf);
    let v = fade(yf);

    let n00 = dot_grid_gradient(x0, y0, xf, yf);
    let n01 = dot_grid_gradient(x0, y0 + 1.0, xf, yf - 1.0);
    let n10 = dot_grid_gradient(x0 + 1.0, y0, xf - 1.0, yf);
    let n11 = dot_grid_gradient(x0 + 1.0, y0 + 1.0, xf - 1.0, yf - 1.0);

    let x1 = lerp(n00, n10, u);
    let x2 = lerp(n01, n11, u);
    lerp(x1, x2, v)
}

/// Pseudo-random gradient angle hashed from lattice coordinates.
fn gradient_angle(ix: f64, iy: f64) -> f64 {
    let r = 2920.0
        * (ix * 21942.0 + iy * 171_324.0 + 8912.0).sin()
        * (ix * 23157.0 * iy * 217_832.0 + 9758.0).cos();
    r * 2.0 * PI
}

/// Dot product of the lattice gradient at `(ix, iy)` with the offset `(dx, dy)`.
fn dot_grid_gradient(ix: f64, iy: f64, dx: f64, dy: f64) -> f64 {
    let angle = gradient_angle(ix, iy);
    angle.cos() * dx + angle.sin() * dy
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_art_core::prng::{RandomSource, SeededRandom};
    use algo_art_core::surface::{Raster, Recorder, Surface};
    use algo_art_core::{Palette, Theme};

    fn render_to(surface: &mut dyn Surface, ff: &FlowField, seed: i64) {
        let palette = Palette::from_name("sunset").unwrap();
        let mut rng = SeededRandom::new(seed);
        surface.clear(Theme::Light.background());
        let mut frame = Frame {
            surface,
            rng: &mut rng,
            palette: &palette,
            theme: Theme::Light,
        };
        ff.render(&mut frame);
    }

    fn small(particles: usize) -> FlowField {
        FlowField::new(FlowFieldParams {
            particles,
            ..FlowFieldParams::default()
        })
    }

    // ---- Noise ----

    #[test]
    fn fade_fixes_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert!((fade(1.0) - 1.0).abs() < 1e-12);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn noise_is_zero_on_lattice_points() {
        for (x, y) in [(0.0, 0.0), (3.0, 7.0), (-2.0, 5.0), (12.0, -4.0)] {
            assert!(lattice_noise(x, y).abs() < 1e-12, "noise({x}, {y}) != 0");
        }
    }

    #[test]
    fn noise_is_a_pure_function_of_coordinates() {
        let a = lattice_noise(1.37, 4.21);
        let b = lattice_noise(1.37, 4.21);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn noise_is_continuous_across_cell_edges() {
        let left = lattice_noise(2.0 - 1e-9, 0.5);
        let right = lattice_noise(2.0 + 1e-9, 0.5);
        assert!((left - right).abs() < 1e-6);
    }

    // ---- Params ----

    #[test]
    fn from_json_uses_defaults_for_empty_json() {
        assert_eq!(FlowFieldParams::from_json(&json!({})), FlowFieldParams::default());
    }

    #[test]
    fn from_json_extracts_and_clamps() {
        let p = FlowFieldParams::from_json(&json!({
            "scale": 0.02, "particles": 50, "speed": 3, "complexity": 1.5, "opacity": 7
        }));
        assert!((p.scale - 0.02).abs() < f64::EPSILON);
        assert_eq!(p.particles, 50);
        assert!((p.speed - 3.0).abs() < f64::EPSILON);
        assert!((p.opacity - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn params_and_schema_share_keys() {
        let ff = FlowField::default();
        let params = ff.params();
        for spec in ff.param_schema().params {
            assert!(params.get(spec.key).is_some(), "params missing {}", spec.key);
        }
    }

    // ---- Tracing ----

    #[test]
    fn trace_stays_in_bounds_and_is_bounded() {
        let ff = FlowField::default();
        let trail = ff.trace(DVec2::new(100.0, 80.0), 200.0, 160.0);
        assert!(!trail.is_empty() && trail.len() <= STEPS + 1);
        assert!(trail
            .iter()
            .all(|p| (0.0..=200.0).contains(&p.x) && (0.0..=160.0).contains(&p.y)));
    }

    #[test]
    fn trace_steps_have_length_speed() {
        let ff = FlowField::default();
        let trail = ff.trace(DVec2::new(400.0, 300.0), 800.0, 600.0);
        for pair in trail.windows(2) {
            assert!(((pair[1] - pair[0]).length() - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn particle_whose_first_step_exits_is_a_point() {
        let ff = FlowField::new(FlowFieldParams {
            speed: 10.0,
            ..FlowFieldParams::default()
        });
        // start on the corner: any step with a negative component leaves
        let trail = ff.trace(DVec2::ZERO, 0.0, 0.0);
        assert_eq!(trail, vec![DVec2::ZERO]);
    }

    // ---- Rendering ----

    #[test]
    fn one_path_per_particle_with_opacity_alpha() {
        let mut rec = Recorder::new(120, 90);
        render_to(&mut rec, &small(37), 42);
        let paths: Vec<_> = rec.paths().collect();
        assert_eq!(paths.len(), 37);
        assert!(paths.iter().all(|(_, c, w)| (c.a - 0.6).abs() < 1e-12 && *w == 1.0));
    }

    #[test]
    fn trail_colors_come_from_palette() {
        let palette = Palette::from_name("sunset").unwrap();
        let mut rec = Recorder::new(64, 64);
        render_to(&mut rec, &small(20), 7);
        for (_, color, _) in rec.paths() {
            let [r, g, b, _] = color.to_rgba8();
            assert!(palette
                .colors()
                .iter()
                .any(|c| c.opaque().to_rgba8()[..3] == [r, g, b]));
        }
    }

    #[test]
    fn draws_three_values_per_particle() {
        let mut rng = SeededRandom::new(11);
        let mut rec = Recorder::new(50, 50);
        render_to(&mut rec, &small(5), 11);
        let (first, _, _) = rec.paths().next().unwrap();
        let expected = DVec2::new(rng.next_f64() * 50.0, rng.next_f64() * 50.0);
        assert_eq!(first[0], expected);
    }

    #[test]
    fn same_seed_renders_identical_pixels() {
        let ff = small(200);
        let mut a = Raster::new(96, 64).unwrap();
        let mut b = Raster::new(96, 64).unwrap();
        render_to(&mut a, &ff, 2024);
        render_to(&mut b, &ff, 2024);
        assert_eq!(a.to_rgba8(), b.to_rgba8());
    }

    #[test]
    fn different_seed_renders_different_pixels() {
        let ff = small(200);
        let mut a = Raster::new(96, 64).unwrap();
        let mut b = Raster::new(96, 64).unwrap();
        render_to(&mut a, &ff, 1);
        render_to(&mut b, &ff, 2);
        assert_ne!(a.to_rgba8(), b.to_rgba8());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn trace_never_leaves_surface(
                x in 0.0_f64..300.0,
                y in 0.0_f64..200.0,
                speed in 0.1_f64..10.0,
                scale in 0.001_f64..0.1,
            ) {
                let ff = FlowField::new(FlowFieldParams {
                    speed,
                    scale,
                    ..FlowFieldParams::default()
                });
                let trail = ff.trace(DVec2::new(x, y), 300.0, 200.0);
                prop_assert!(trail.len() <= STEPS + 1);
                for p in &trail {
                    prop_assert!((0.0..=300.0).contains(&p.x) && (0.0..=200.0).contains(&p.y));
                }
            }
        }
    }
}
