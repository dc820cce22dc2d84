#![deny(unsafe_code)]
//! Voronoi tessellation renderer.
//!
//! Places `points` colored sites at random, then assigns every sample of a
//! coarse grid (one sample per [`CELL`] pixels, columns outer) to its nearest
//! site and fills the sample's block in that site's color. The distance to
//! each site is scaled by a fresh random factor `1 + jitter * (r - 0.5)`,
//! which roughens region borders; with `jitter = 0` the regions are exact.
//! A small marker disc in the theme's ink is drawn over every site.

use algo_art_core::engine::{Frame, Renderer};
use algo_art_core::params::{ParamSchema, ParamSpec};
use algo_art_core::prng::RandomSource;
use algo_art_core::surface::{Paint, Rect};
use algo_art_core::{Palette, Srgb};
use glam::DVec2;
use serde_json::{json, Value};

/// Edge of the square block painted per grid sample.
pub const CELL: usize = 4;
/// Radius of the site markers.
pub const MARKER_RADIUS: f64 = 3.0;

const DEFAULT_POINTS: f64 = 30.0;
const DEFAULT_JITTER: f64 = 0.8;
const DEFAULT_LINE_WIDTH: f64 = 1.5;

/// Parameter table for `voronoi`.
pub static SCHEMA: ParamSchema = ParamSchema {
    algorithm: "voronoi",
    params: &[
        ParamSpec::integer("points", DEFAULT_POINTS, 1.0, 2000.0, "Number of sites"),
        ParamSpec::number(
            "jitter",
            DEFAULT_JITTER,
            0.0,
            2.0,
            0.01,
            "Random distance distortion",
        ),
        ParamSpec::number(
            "lineWidth",
            DEFAULT_LINE_WIDTH,
            0.0,
            10.0,
            0.1,
            "Marker outline width (reserved)",
        ),
    ],
};

/// Voronoi parameters.
///
/// `line_width` is accepted and reported but does not affect the image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoronoiParams {
    pub points: usize,
    pub jitter: f64,
    pub line_width: f64,
}

impl Default for VoronoiParams {
    fn default() -> Self {
        Self {
            points: DEFAULT_POINTS as usize,
            jitter: DEFAULT_JITTER,
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

impl VoronoiParams {
    pub fn from_json(params: &Value) -> Self {
        Self {
            points: SCHEMA.spec("points").read_usize(params),
            jitter: SCHEMA.spec("jitter").read_f64(params),
            line_width: SCHEMA.spec("lineWidth").read_f64(params),
        }
    }
}

/// A region seed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub pos: DVec2,
    pub color: Srgb,
}

/// Draws `count` sites uniformly over `width x height`: x, y, then color.
pub fn place_sites(
    count: usize,
    width: f64,
    height: f64,
    palette: &Palette,
    rng: &mut dyn RandomSource,
) -> Vec<Site> {
    (0..count)
        .map(|_| {
            let x = rng.next_f64() * width;
            let y = rng.next_f64() * height;
            let color = palette.pick(rng);
            Site {
                pos: DVec2::new(x, y),
                color,
            }
        })
        .collect()
}

/// Index of the site closest to `p` under jittered distance.
///
/// Draws one value per site, in site order. Ties keep the earlier site.
/// Returns `None` only for an empty site list.
pub fn nearest_site(
    sites: &[Site],
    p: DVec2,
    jitter: f64,
    rng: &mut dyn RandomSource,
) -> Option<usize> {
    let mut best = None;
    let mut best_dist = f64::MAX;
    for (i, site) in sites.iter().enumerate() {
        let dist = p.distance(site.pos) * (1.0 + jitter * (rng.next_f64() - 0.5));
        if dist < best_dist {
            best_dist = dist;
            best = Some(i);
        }
    }
    best
}

/// Voronoi renderer.
#[derive(Debug, Clone, Default)]
pub struct Voronoi {
    params: VoronoiParams,
}

impl Voronoi {
    pub fn new(params: VoronoiParams) -> Self {
        Self { params }
    }

    pub fn from_json(params: &Value) -> Self {
        Self::new(VoronoiParams::from_json(params))
    }

    /// Grid blocks and the site owning each, in paint order.
    pub fn regions(
        &self,
        sites: &[Site],
        width: usize,
        height: usize,
        rng: &mut dyn RandomSource,
    ) -> Vec<(Rect, usize)> {
        let size = CELL as f64;
        let mut out = Vec::with_capacity(width.div_ceil(CELL) * height.div_ceil(CELL));
        for x in (0..width).step_by(CELL) {
            for y in (0..height).step_by(CELL) {
                let p = DVec2::new(x as f64, y as f64);
                if let Some(owner) = nearest_site(sites, p, self.params.jitter, rng) {
                    out.push((Rect::new(p.x, p.y, size, size), owner));
                }
            }
        }
        out
    }
}

impl Renderer for Voronoi {
    fn render(&self, frame: &mut Frame<'_>) {
        let (w, h) = (frame.surface.width(), frame.surface.height());
        let sites = place_sites(self.params.points, w as f64, h as f64, frame.palette, frame.rng);

        for (rect, owner) in self.regions(&sites, w, h, frame.rng) {
            frame.surface.fill_rect(rect, sites[owner].color.opaque());
        }

        let marker = Paint::from(frame.theme.ink());
        for site in &sites {
            frame.surface.fill_circle(site.pos, MARKER_RADIUS, &marker);
        }
    }

    fn params(&self) -> Value {
        json!({
            "points": self.params.points,
            "jitter": self.params.jitter,
            "lineWidth": self.params.line_width,
        })
    }

    fn param_schema(&self) -> &'static ParamSchema {
        &SCHEMA
    }
}
