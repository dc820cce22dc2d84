#![deny(unsafe_code)]
//! Recursive fractal tree renderer.
//!
//! The trunk grows upward from `(width / 2, height - 20)`. Each branch is a
//! straight segment drawn in the local frame, after which the origin moves to
//! its tip and `branches` children fan out around the parent heading. Levels
//! count down from `depth` to `0`; level 0 branches draw their segment and
//! leaf but have no children, so a tree has `sum(branches^k, k = 0..=depth)`
//! segments.
//!
//! Random draws happen in a fixed order. Per child: spread jitter, then
//! length jitter, then the child's whole subtree. The leaf radius is drawn
//! after all children of that branch.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::surface::Paint;
use algo_art_core::{Palette, Srgb};
use glam::DVec2;
use serde_json::{json, Value};
use std::f64::consts::PI;

/// Distance of the trunk base above the bottom edge.
pub const BASE_MARGIN: f64 = 20.0;
/// Branches at or below this level carry a leaf.
pub const LEAF_LEVEL: usize = 2;
/// Upper bound on segments per tree; deeper trees are cut to fit.
pub const MAX_SEGMENTS: u64 = 2_000_000;

const DEFAULT_BRANCHES: f64 = 3.0;
const DEFAULT_DEPTH: f64 = 9.0;
const DEFAULT_ANGLE: f64 = 15.0;
const DEFAULT_REDUCTION: f64 = 0.7;
const DEFAULT_INITIAL_SIZE: f64 = 120.0;

/// Parameter table for `fractal`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "fractal",
    params: &[
        ParamSpec::integer(
            "branches",
            DEFAULT_BRANCHES,
            1.0,
            6.0,
            "Children per branch",
        ),
        ParamSpec::integer("depth", DEFAULT_DEPTH, 1.0, 12.0, "Levels below the trunk"),
        ParamSpec::number(
            "angle",
            DEFAULT_ANGLE,
            0.0,
            90.0,
            1.0,
            "Fan angle between siblings in degrees",
        ),
        ParamSpec::number(
            "reduction",
            DEFAULT_REDUCTION,
            0.1,
            0.95,
            0.01,
            "Child length as a fraction of the parent",
        ),
        ParamSpec::number(
            "initialSize",
            DEFAULT_INITIAL_SIZE,
            10.0,
            300.0,
            1.0,
            "Trunk length in pixels",
        ),
    ],
};

/// Fractal tree parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FractalParams {
    pub branches: usize,
    pub depth: usize,
    pub angle: f64,
    pub reduction: f64,
    pub initial_size: f64,
}

impl Default for FractalParams {
    fn default() -> Self {
        Self {
            branches: DEFAULT_BRANCHES as usize,
            depth: DEFAULT_DEPTH as usize,
            angle: DEFAULT_ANGLE,
            reduction: DEFAULT_REDUCTION,
            initial_size: DEFAULT_INITIAL_SIZE,
        }
    }
}

impl FractalParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            branches: SCHEMA.spec("branches").read_usize(params),
            depth: SCHEMA.spec("depth").read_usize(params),
            angle: SCHEMA.spec("angle").read_f64(params),
            reduction: SCHEMA.spec("reduction").read_f64(params),
            initial_size: SCHEMA.spec("initialSize").read_f64(params),
        }
    }
}

/// Segments in a full tree of the given shape.
pub fn segment_count(branches: usize, depth: usize) -> u64 {
    let b = branches as u64;
    let mut total: u64 = 0;
    let mut level_width: u64 = 1;
    for _ in 0..=depth {
        total = total.saturating_add(level_width);
        level_width = level_width.saturating_mul(b);
    }
    total
}

/// Deepest depth not above `depth` whose tree fits in [`MAX_SEGMENTS`].
pub fn effective_depth(branches: usize, depth: usize) -> usize {
    let mut d = depth;
    while d > 1 && segment_count(branches, d) > MAX_SEGMENTS {
        d -= 1;
    }
    d
}

/// Stroke color at `level`: the first color in the trunk region, then
/// stepping through the palette toward the tips.
pub fn branch_color(palette: &Palette, level: usize, depth: usize) -> Srgb {
    let (level, depth) = (level as f64, depth.max(1) as f64);
    if level > depth * 0.4 {
        return palette.first();
    }
    let idx = ((depth - level) / depth * palette.len() as f64).floor() as usize;
    palette.get(idx.min(palette.len() - 1))
}

/// Stroke width at `level`, never below one pixel.
pub fn stroke_width(level: usize, depth: usize) -> f64 {
    (level as f64 * 1.5 / depth.max(1) as f64 * 10.0).max(1.0)
}

/// Fractal tree renderer.
#[derive(Debug, Clone, Default)]
pub struct FractalTree {
    params: FractalParams,
}

impl FractalTree {
    pub fn new(params: FractalParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(FractalParams::from_json(params))
    }

    fn branch(&self, frame: &mut Frame<'_>, len: f64, level: usize, depth: usize) {
        let color = branch_color(frame.palette, level, depth);
        frame.surface.stroke_path(
            &[DVec2::ZERO, DVec2::new(0.0, -len)],
            color.opaque(),
            stroke_width(level, depth),
        );
        frame.surface.translate(0.0, -len);

        if level > 0 {
            let fan = self.params.branches as f64;
            for i in 0..self.params.branches {
                let spread = self.params.angle * (1.0 + (frame.rng.next_f64() * 0.5 - 0.25));
                let offset = (i as f64 - (fan - 1.0) / 2.0) * spread;

                frame.surface.save();
                frame.surface.rotate(offset * PI / 180.0);
                let child = len * self.params.reduction * (0.9 + frame.rng.next_f64() * 0.2);
                self.branch(frame, child, level - 1, depth);
                frame.surface.restore();
            }
        }

        if level <= LEAF_LEVEL {
            let radius = 5.0 + frame.rng.next_f64() * 5.0;
            let leaf = Paint::from(frame.palette.last());
            frame.surface.fill_circle(DVec2::ZERO, radius, &leaf);
        }

        frame.surface.translate(0.0, len);
    }
}

impl Renderer for FractalTree {
    fn render(&self, frame: &mut Frame<'_>) {
        let depth = effective_depth(self.params.branches, self.params.depth.max(1));
        let (w, h) = (frame.width(), frame.height());

        frame.surface.save();
        frame.surface.translate(w / 2.0, h - BASE_MARGIN);
        self.branch(frame, self.params.initial_size, depth, depth);
        frame.surface.restore();
    }

    fn params(&self) -> Value {
        json!({
            "branches": self.params.branches,
            "depth": self.params.depth,
            "angle": self.params.angle,
            "reduction": self.params.reduction,
            "initialSize": self.params.initial_size,
        })
    }

    fn param_schema(&self) -> &'static ParamSchema {
        &SCHEMA
    }
}
