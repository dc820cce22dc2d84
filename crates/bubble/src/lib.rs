#![deny(unsafe_code)]
//! Bubble packing renderer.
//!
//! Circles are placed by rejection sampling: each attempt draws a radius, a
//! center that keeps the circle inside the surface, and a color, and is kept
//! only if its distance to every accepted bubble is at least
//! `(r1 + r2) * overlapping`. Sampling stops once `count` bubbles are placed
//! or after `count * 10` attempts, so fewer bubbles than requested is normal
//! on a crowded canvas.
//!
//! Each bubble is painted with a glossy radial gradient (white core, then the
//! bubble color fading out) and a small white highlight.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::prng::RandomSource;
use algo_art_core::surface::{ColorStop, Paint, RadialGradient};
use algo_art_core::{Palette, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

/// Attempts allowed per requested bubble.
pub const ATTEMPTS_PER_BUBBLE: usize = 10;
/// Highlight offset and size, as fractions of the radius.
const HIGHLIGHT_OFFSET: f64 = 0.3;
const HIGHLIGHT_SIZE: f64 = 0.1;
const HIGHLIGHT_ALPHA: f64 = 0.8;
/// Gradient alphas at the 0.2 and 1.0 stops (`dd` and `77` in hex).
const INNER_ALPHA: f64 = 221.0 / 255.0;
const OUTER_ALPHA: f64 = 119.0 / 255.0;

const DEFAULT_COUNT: f64 = 150.0;
const DEFAULT_MIN_RADIUS: f64 = 5.0;
const DEFAULT_MAX_RADIUS: f64 = 50.0;
const DEFAULT_OVERLAPPING: f64 = 0.7;

/// Parameter table for `bubble`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "bubble",
    params: &[
        ParamSpec::integer("count", DEFAULT_COUNT, 1.0, 2000.0, "Bubbles requested"),
        ParamSpec::integer(
            "minRadius",
            DEFAULT_MIN_RADIUS,
            1.0,
            30.0,
            "Smallest radius",
        ),
        ParamSpec::integer(
            "maxRadius",
            DEFAULT_MAX_RADIUS,
            10.0,
            100.0,
            "Largest radius",
        ),
        ParamSpec::number(
            "overlapping",
            DEFAULT_OVERLAPPING,
            0.0,
            1.0,
            0.01,
            "Required separation as a fraction of the radius sum",
        ),
    ],
};

/// Bubble parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BubbleParams {
    pub count: usize,
    pub min_radius: f64,
    pub max_radius: f64,
    pub overlapping: f64,
}

impl Default for BubbleParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT as usize,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            overlapping: DEFAULT_OVERLAPPING,
        }
    }
}

impl BubbleParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            count: SCHEMA.spec("count").read_usize(params),
            min_radius: SCHEMA.spec("minRadius").read_usize(params) as f64,
            max_radius: SCHEMA.spec("maxRadius").read_usize(params) as f64,
            overlapping: SCHEMA.spec("overlapping").read_f64(params),
        }
    }
}

/// An accepted circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bubble {
    pub center: DVec2,
    pub radius: f64,
    pub color: Srgb,
}

impl Bubble {
    /// Whether `other` sits closer than `overlapping` times the radius sum.
    pub fn crowds(&self, other: &Bubble, overlapping: f64) -> bool {
        self.center.distance(other.center) < (self.radius + other.radius) * overlapping
    }

    /// Glossy fill: white near the upper-left highlight, fading to a
    /// translucent bubble color at the rim.
    pub fn gradient(&self) -> RadialGradient {
        RadialGradient {
            start: self.highlight_center(),
            start_radius: self.radius * HIGHLIGHT_SIZE,
            end: self.center,
            end_radius: self.radius,
            stops: vec![
                ColorStop {
                    offset: 0.0,
                    color: Srgb::WHITE.opaque(),
                },
                ColorStop {
                    offset: 0.2,
                    color: self.color.with_alpha(INNER_ALPHA),
                },
                ColorStop {
                    offset: 1.0,
                    color: self.color.with_alpha(OUTER_ALPHA),
                },
            ],
        }
    }

    fn highlight_center(&self) -> DVec2 {
        self.center - DVec2::splat(self.radius * HIGHLIGHT_OFFSET)
    }
}

/// Result of a packing run.
#[derive(Debug, Clone, PartialEq)]
pub struct Packing {
    pub bubbles: Vec<Bubble>,
    pub attempts: usize,
}

/// Bubble renderer.
#[derive(Debug, Clone, Default)]
pub struct BubblePack {
    params: BubbleParams,
}

impl BubblePack {
    pub fn new(params: BubbleParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(BubbleParams::from_json(params))
    }

    /// Places bubbles over `width x height`.
    ///
    /// Each attempt draws radius, x, y, then color, whether or not it is kept.
    pub fn pack(
        &self,
        width: f64,
        height: f64,
        palette: &Palette,
        rng: &mut dyn RandomSource,
    ) -> Packing {
        let BubbleParams {
            count,
            min_radius,
            max_radius,
            overlapping,
        } = self.params;
        let max_attempts = count * ATTEMPTS_PER_BUBBLE;

        let mut bubbles: Vec<Bubble> = Vec::with_capacity(count);
        let mut attempts = 0;
        while bubbles.len() < count && attempts < max_attempts {
            attempts += 1;

            let radius = rng.next_range(min_radius, max_radius);
            let x = rng.next_range(radius, width - radius);
            let y = rng.next_range(radius, height - radius);
            let candidate = Bubble {
                center: DVec2::new(x, y),
                radius,
                color: palette.pick(rng),
            };

            if !bubbles.iter().any(|b| candidate.crowds(b, overlapping)) {
                bubbles.push(candidate);
            }
        }

        Packing { bubbles, attempts }
    }
}

impl Renderer for BubblePack {
    fn render(&self, frame: &mut Frame<'_>) {
        let (w, h) = (frame.width(), frame.height());
        let packing = self.pack(w, h, frame.palette, frame.rng);

        let highlight = Paint::Solid(Srgb::WHITE.with_alpha(HIGHLIGHT_ALPHA));
        for bubble in &packing.bubbles {
            frame
                .surface
                .fill_circle(bubble.center, bubble.radius, &Paint::Radial(bubble.gradient()));
            frame.surface.fill_circle(
                bubble.highlight_center(),
                bubble.radius * HIGHLIGHT_SIZE,
                &highlight,
            );
        }
    }

    fn params(&self) -> Value {
        json!({
            "count": self.params.count,
            "minRadius": self.params.min_radius,
            "maxRadius": self.params.max_radius,
            "overlapping": self.params.overlapping,
        })
    }

    fn param_schema(&self) -> &'static ParamSchema {
        &SCHEMA
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use algo_art_core::prng::SeededRandom;
    use algo_art_core::surface::{Raster, Recorder, Surface};
    use algo_art_core::Theme;

    fn packer(count: usize, overlapping: f64) -> BubblePack {
        BubblePack::new(BubbleParams {
            count,
            overlapping,
            ..BubbleParams::default()
        })
    }

    fn palette() -> Palette {
        Palette::from_name("pastel").unwrap()
    }

    fn render_to(surface: &mut dyn Surface, b: &BubblePack, seed: i64) {
        let palette = palette();
        let mut rng = SeededRandom::new(seed);
        surface.clear(Theme::Light.background());
        let mut frame = Frame {
            surface,
            rng: &mut rng,
            palette: &palette,
            theme: Theme::Light,
        };
        b.render(&mut frame);
    }

    #[test]
    fn attempts_are_capped() {
        let packing = packer(150, 0.7).pack(800.0, 600.0, &palette(), &mut SeededRandom::new(42));
        assert!(packing.attempts <= 1500);
        assert!(packing.bubbles.len() <= 150);
        assert!(packing.bubbles.len() == 150 || packing.attempts == 1500);
    }

    #[test]
    fn tiny_canvas_exhausts_attempts() {
        let packing = packer(50, 1.0).pack(60.0, 60.0, &palette(), &mut SeededRandom::new(8));
        assert_eq!(packing.attempts, 500);
        assert!(packing.bubbles.len() < 50);
    }

    #[test]
    fn zero_overlapping_accepts_every_attempt() {
        let packing = packer(40, 0.0).pack(200.0, 200.0, &palette(), &mut SeededRandom::new(5));
        assert_eq!(packing.bubbles.len(), 40);
        assert_eq!(packing.attempts, 40);
    }

    #[test]
    fn full_overlapping_means_no_intersections() {
        let packing = packer(150, 1.0).pack(800.0, 600.0, &palette(), &mut SeededRandom::new(77));
        let bubbles = &packing.bubbles;
        for (i, a) in bubbles.iter().enumerate() {
            for b in &bubbles[i + 1..] {
                assert!(a.center.distance(b.center) >= a.radius + b.radius);
            }
        }
    }

    #[test]
    fn attempt_draws_radius_x_y_color() {
        let params = BubbleParams::default();
        let packing =
            BubblePack::new(params).pack(400.0, 300.0, &palette(), &mut SeededRandom::new(19));
        let mut check = SeededRandom::new(19);
        let radius = check.next_range(params.min_radius, params.max_radius);
        let x = check.next_range(radius, 400.0 - radius);
        let y = check.next_range(radius, 300.0 - radius);
        let color = palette().pick(&mut check);
        assert_eq!(
            packing.bubbles[0],
            Bubble {
                center: DVec2::new(x, y),
                radius,
                color
            }
        );
    }

    #[test]
    fn bubbles_lie_inside_the_surface() {
        let packing = packer(100, 0.7).pack(500.0, 400.0, &palette(), &mut SeededRandom::new(3));
        for b in &packing.bubbles {
            assert!(b.center.x - b.radius >= -1e-9 && b.center.x + b.radius <= 500.0 + 1e-9);
            assert!(b.center.y - b.radius >= -1e-9 && b.center.y + b.radius <= 400.0 + 1e-9);
        }
    }

    #[test]
    fn gradient_runs_from_highlight_to_rim() {
        let bubble = Bubble {
            center: DVec2::new(100.0, 100.0),
            radius: 20.0,
            color: Srgb::from_hex("#336699").unwrap(),
        };
        let g = bubble.gradient();
        assert_eq!(g.start, DVec2::new(94.0, 94.0));
        assert_eq!(g.start_radius, 2.0);
        assert_eq!((g.end, g.end_radius), (bubble.center, 20.0));
        assert_eq!(g.stops[0].color, Srgb::WHITE.opaque());
        assert_eq!(g.stops[1].color.to_rgba8(), [0x33, 0x66, 0x99, 0xdd]);
        assert_eq!(g.stops[2].color.to_rgba8(), [0x33, 0x66, 0x99, 0x77]);
    }

    #[test]
    fn each_bubble_paints_body_then_highlight() {
        let b = packer(25, 0.7);
        let mut rec = Recorder::new(300, 300);
        render_to(&mut rec, &b, 64);
        let packing = b.pack(300.0, 300.0, &palette(), &mut SeededRandom::new(64));

        let circles: Vec<_> = rec.circles().collect();
        assert_eq!(circles.len(), packing.bubbles.len() * 2);
        for (pair, bubble) in circles.chunks(2).zip(&packing.bubbles) {
            assert!(matches!(pair[0].2, Paint::Radial(_)));
            assert_eq!(pair[0].1, bubble.radius);
            assert_eq!(pair[1].2, &Paint::Solid(Srgb::WHITE.with_alpha(0.8)));
            assert!((pair[1].1 - bubble.radius * 0.1).abs() < 1e-12);
        }
    }

    #[test]
    fn same_seed_renders_identical_pixels() {
        let b = packer(30, 0.7);
        let mut a = Raster::new(120, 90).unwrap();
        let mut c = Raster::new(120, 90).unwrap();
        render_to(&mut a, &b, 900);
        render_to(&mut c, &b, 900);
        assert_eq!(a.to_rgba8(), c.to_rgba8());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(48))]

            #[test]
            fn packing_respects_separation_and_caps(
                count in 1_usize..120,
                overlapping in 0.0_f64..=1.0,
                seed in 1_i64..1_000_000,
            ) {
                let packing = packer(count, overlapping)
                    .pack(300.0, 200.0, &palette(), &mut SeededRandom::new(seed));
                prop_assert!(packing.attempts <= count * ATTEMPTS_PER_BUBBLE);
                prop_assert!(packing.bubbles.len() <= count);
                let bubbles = &packing.bubbles;
                for (i, a) in bubbles.iter().enumerate() {
                    for b in &bubbles[i + 1..] {
                        prop_assert!(!a.crowds(b, overlapping));
                    }
                }
            }
        }
    }
}
