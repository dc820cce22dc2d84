#![deny(unsafe_code)]
//! Mondrian-style recursive rectangle partition.
//!
//! The surface is split recursively, across its longer side (vertical cut when
//! `w > h`, horizontal otherwise), at a random point that leaves at least
//! `minSize` on both sides when room allows. Every split recurses into both
//! halves, so the leaves tile the surface exactly. A rectangle narrower or
//! shorter than `minSize` becomes a bare leaf. Otherwise, past depth 1, it
//! stops with probability `1 - splitProb`, is filled with a random palette
//! color with probability `colorProb`, and gets a thick border in the theme
//! ink. The root and its two children always split, unless the drawn cut
//! would leave one side empty, in which case the rectangle is a bare leaf.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::prng::RandomSource;
use algo_art_core::surface::Rect;
use algo_art_core::{Palette, Srgb};
use serde_json::{json, Value};

/// Border width of terminated rectangles.
pub const BORDER_WIDTH: f64 = 5.0;

const DEFAULT_MIN_SIZE: f64 = 30.0;
const DEFAULT_SPLIT_PROB: f64 = 0.5;
const DEFAULT_COLOR_PROB: f64 = 0.3;

/// Parameter table for `mondrian`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "mondrian",
    params: &[
        ParamSpec::integer(
            "minSize",
            DEFAULT_MIN_SIZE,
            5.0,
            100.0,
            "Smallest side that may still split",
        ),
        ParamSpec::number(
            "splitProb",
            DEFAULT_SPLIT_PROB,
            0.0,
            1.0,
            0.01,
            "Probability of splitting again",
        ),
        ParamSpec::number(
            "colorProb",
            DEFAULT_COLOR_PROB,
            0.0,
            1.0,
            0.01,
            "Probability that a leaf is filled",
        ),
    ],
};

/// Mondrian parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MondrianParams {
    pub min_size: f64,
    pub split_prob: f64,
    pub color_prob: f64,
}

impl Default for MondrianParams {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            split_prob: DEFAULT_SPLIT_PROB,
            color_prob: DEFAULT_COLOR_PROB,
        }
    }
}

impl MondrianParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            min_size: SCHEMA.spec("minSize").read_usize(params) as f64,
            split_prob: SCHEMA.spec("splitProb").read_f64(params),
            color_prob: SCHEMA.spec("colorProb").read_f64(params),
        }
    }
}

/// A rectangle of the final partition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf {
    pub rect: Rect,
    pub depth: usize,
    /// Fill color, if the leaf was chosen for color.
    pub fill: Option<Srgb>,
    /// Whether the leaf terminated by chance (and gets a border) rather than
    /// by falling below the minimum size.
    pub bordered: bool,
}

/// Mondrian renderer.
#[derive(Debug, Clone, Default)]
pub struct Mondrian {
    params: MondrianParams,
}

impl Mondrian {
    pub fn new(params: MondrianParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(MondrianParams::from_json(params))
    }

    /// Partitions `width x height` into leaves, in depth-first paint order.
    pub fn partition(
        &self,
        width: f64,
        height: f64,
        palette: &Palette,
        rng: &mut dyn RandomSource,
    ) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        self.split(Rect::new(0.0, 0.0, width, height), 0, palette, rng, &mut leaves);
        leaves
    }

    fn split(
        &self,
        rect: Rect,
        depth: usize,
        palette: &Palette,
        rng: &mut dyn RandomSource,
        out: &mut Vec<Leaf>,
    ) {
        let MondrianParams {
            min_size,
            split_prob,
            color_prob,
        } = self.params;

        if rect.w < min_size || rect.h < min_size {
            out.push(Leaf {
                rect,
                depth,
                fill: None,
                bordered: false,
            });
            return;
        }

        // drawn even when depth <= 1
        if rng.next_f64() > split_prob && depth > 1 {
            let fill = (rng.next_f64() < color_prob).then(|| palette.pick(rng));
            out.push(Leaf {
                rect,
                depth,
                fill,
                bordered: true,
            });
            return;
        }

        let Rect { x, y, w, h } = rect;
        let vertical = w > h;
        let (start, extent) = if vertical { (x, w) } else { (y, h) };
        let at = (start + rng.next_f64() * (extent - min_size * 2.0) + min_size).floor();
        // a cut that leaves one side empty would reproduce `rect` forever
        if at - start <= 0.0 || at - start >= extent {
            out.push(Leaf {
                rect,
                depth,
                fill: None,
                bordered: false,
            });
            return;
        }

        let (first, second) = if vertical {
            (
                Rect::new(x, y, at - x, h),
                Rect::new(at, y, w - (at - x), h),
            )
        } else {
            (
                Rect::new(x, y, w, at - y),
                Rect::new(x, at, w, h - (at - y)),
            )
        };
        self.split(first, depth + 1, palette, rng, out);
        self.split(second, depth + 1, palette, rng, out);
    }
}

impl Renderer for Mondrian {
    fn render(&self, frame: &mut Frame<'_>) {
        let (w, h) = (frame.width(), frame.height());
        let leaves = self.partition(w, h, frame.palette, frame.rng);

        let ink = frame.theme.ink().opaque();
        for leaf in leaves.iter().filter(|l| l.bordered) {
            if let Some(color) = leaf.fill {
                frame.surface.fill_rect(leaf.rect, color.opaque());
            }
            frame.surface.stroke_rect(leaf.rect, ink, BORDER_WIDTH);
        }
    }

    fn params(&self) -> Value {
        json!({
            "minSize": self.params.min_size,
            "splitProb": self.params.split_prob,
            "colorProb": self.params.color_prob,
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

    fn mondrian(min_size: f64, split_prob: f64, color_prob: f64) -> Mondrian {
        Mondrian::new(MondrianParams {
            min_size,
            split_prob,
            color_prob,
        })
    }

    fn palette() -> Palette {
        Palette::from_name("retro").unwrap()
    }

    fn render_to(surface: &mut dyn Surface, m: &Mondrian, theme: Theme, seed: i64) {
        let palette = palette();
        let mut rng = SeededRandom::new(seed);
        surface.clear(theme.background());
        let mut frame = Frame {
            surface,
            rng: &mut rng,
            palette: &palette,
            theme,
        };
        m.render(&mut frame);
    }

    fn overlaps(a: &Rect, b: &Rect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    #[test]
    fn never_splitting_still_splits_twice() {
        let m = mondrian(30.0, 0.0, 0.0);
        let leaves = m.partition(400.0, 400.0, &palette(), &mut SeededRandom::new(9));
        assert_eq!(leaves.len(), 4);
        assert!(leaves.iter().all(|l| l.bordered && l.depth == 2));
    }

    #[test]
    fn first_cut_is_horizontal_on_square() {
        let m = mondrian(30.0, 0.0, 0.0);
        let leaves = m.partition(400.0, 400.0, &palette(), &mut SeededRandom::new(9));
        // horizontal then vertical: the first two leaves share a row band
        assert_eq!(leaves[0].rect.y, 0.0);
        assert_eq!(leaves[1].rect.y, 0.0);
        assert_eq!(leaves[0].rect.h, leaves[1].rect.h);
        assert_eq!(leaves[0].rect.w + leaves[1].rect.w, 400.0);
    }

    #[test]
    fn split_point_respects_min_margin() {
        let m = mondrian(30.0, 0.0, 0.0);
        for seed in 1..50 {
            for leaf in m.partition(300.0, 200.0, &palette(), &mut SeededRandom::new(seed)) {
                assert!(leaf.rect.w >= 30.0 && leaf.rect.h >= 30.0, "{leaf:?}");
            }
        }
    }

    #[test]
    fn surface_below_min_size_is_one_bare_leaf() {
        let m = mondrian(100.0, 0.5, 0.5);
        let leaves = m.partition(80.0, 300.0, &palette(), &mut SeededRandom::new(4));
        assert_eq!(leaves.len(), 1);
        assert!(!leaves[0].bordered && leaves[0].fill.is_none());
    }

    #[test]
    fn zero_stream_terminates_and_tiles() {
        // seed 0 is a fixed point of the sine hash: every draw is 0.0
        let m = Mondrian::default();
        let leaves = m.partition(800.0, 600.0, &palette(), &mut SeededRandom::new(0));
        let area: f64 = leaves.iter().map(|l| l.rect.w * l.rect.h).sum();
        assert!((area - 800.0 * 600.0).abs() < 1e-6, "area {area}");
        assert!(leaves.iter().all(|l| l.rect.w > 0.0 && l.rect.h > 0.0));
        for (i, a) in leaves.iter().enumerate() {
            for b in &leaves[i + 1..] {
                assert!(!overlaps(&a.rect, &b.rect), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn cut_at_full_extent_becomes_bare_leaf() {
        let m = mondrian(30.0, 0.0, 0.0);
        // a 30-wide square: a 0.0 draw would cut at offset 30, leaving nothing
        let leaves = m.partition(30.0, 30.0, &palette(), &mut SeededRandom::new(0));
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].rect, Rect::new(0.0, 0.0, 30.0, 30.0));
        assert!(!leaves[0].bordered);
    }

    #[test]
    fn color_probability_extremes() {
        let never =
            mondrian(20.0, 0.3, 0.0).partition(300.0, 300.0, &palette(), &mut SeededRandom::new(6));
        assert!(never.iter().all(|l| l.fill.is_none()));
        let always =
            mondrian(20.0, 0.3, 1.0).partition(300.0, 300.0, &palette(), &mut SeededRandom::new(6));
        assert!(always.iter().filter(|l| l.bordered).all(|l| l.fill.is_some()));
    }

    #[test]
    fn render_paints_bordered_leaves_only() {
        let m = Mondrian::default();
        let mut rec = Recorder::new(320, 240);
        render_to(&mut rec, &m, Theme::Light, 77);
        let leaves = m.partition(320.0, 240.0, &palette(), &mut SeededRandom::new(77));

        let bordered = leaves.iter().filter(|l| l.bordered).count();
        let filled = leaves.iter().filter(|l| l.fill.is_some()).count();
        assert_eq!(rec.stroked_rects().count(), bordered);
        assert_eq!(rec.filled_rects().count(), filled);
    }

    #[test]
    fn borders_use_theme_ink() {
        let m = mondrian(30.0, 0.0, 0.0);
        let mut rec = Recorder::new(200, 200);
        render_to(&mut rec, &m, Theme::Dark, 1);
        for op in rec.ops() {
            if let algo_art_core::surface::DrawOp::StrokeRect { color, line_width, .. } = op {
                assert_eq!(*color, Srgb::WHITE.opaque());
                assert_eq!(*line_width, BORDER_WIDTH);
            }
        }
    }

    #[test]
    fn same_seed_renders_identical_pixels() {
        let m = Mondrian::default();
        let mut a = Raster::new(128, 96).unwrap();
        let mut b = Raster::new(128, 96).unwrap();
        render_to(&mut a, &m, Theme::Light, 31337);
        render_to(&mut b, &m, Theme::Light, 31337);
        assert_eq!(a.to_rgba8(), b.to_rgba8());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn leaves_tile_the_surface(
                width in 10_u32..500,
                height in 10_u32..500,
                min_size in 5.0_f64..100.0,
                split_prob in 0.0_f64..0.95,
                seed in 0_i64..1_000_000,
            ) {
                let (w, h) = (f64::from(width), f64::from(height));
                let m = mondrian(min_size.round(), split_prob, 0.3);
                let leaves = m.partition(w, h, &palette(), &mut SeededRandom::new(seed));

                let area: f64 = leaves.iter().map(|l| l.rect.w * l.rect.h).sum();
                prop_assert_eq!(area, w * h);
                for leaf in &leaves {
                    prop_assert!(leaf.rect.x >= 0.0 && leaf.rect.right() <= w);
                    prop_assert!(leaf.rect.y >= 0.0 && leaf.rect.bottom() <= h);
                }
                if leaves.len() <= 64 {
                    for (i, a) in leaves.iter().enumerate() {
                        for b in &leaves[i + 1..] {
                            prop_assert!(!overlaps(&a.rect, &b.rect));
                        }
                    }
                }
            }
        }
    }
}
