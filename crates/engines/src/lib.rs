#![deny(unsafe_code)]
//! Algorithm registry and render entry point.
//!
//! This crate sits between `algo-art-core` (which defines the `Renderer` trait
//! and the drawing surfaces) and the individual algorithm crates. The CLI and
//! any other front end go through [`render`] so that palette lookup, seeding
//! and background clearing happen the same way everywhere.

#[cfg(feature = "png")]
pub mod snapshot;

use algo_art_bubble::BubblePack;
use algo_art_cellular::Cellular;
use algo_art_core::params::ParamSchema;
use algo_art_core::{
    EngineError, Frame, Palette, RandomSource, Raster, RenderConfig, Renderer, Surface, Theme,
};
use algo_art_flow_field::FlowField;
use algo_art_fractal_tree::FractalTree;
use algo_art_mondrian::Mondrian;
use algo_art_voronoi::Voronoi;
use serde_json::Value;

/// Id and display name of a registered algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlgorithmInfo {
    pub id: &'static str,
    pub name: &'static str,
}

/// All registered algorithms, in menu order.
const ALGORITHMS: &[AlgorithmInfo] = &[
    AlgorithmInfo {
        id: "perlin",
        name: "Perlin Noise Flow Field",
    },
    AlgorithmInfo {
        id: "cellular",
        name: "Cellular Automata",
    },
    AlgorithmInfo {
        id: "fractal",
        name: "Fractal Tree",
    },
    AlgorithmInfo {
        id: "voronoi",
        name: "Voronoi Diagram",
    },
    AlgorithmInfo {
        id: "mondrian",
        name: "Mondrian Style",
    },
    AlgorithmInfo {
        id: "bubble",
        name: "Bubble Patterns",
    },
];

/// Enumeration of all available algorithms.
///
/// Wraps each renderer and delegates `Renderer` trait methods.
/// Use [`AlgorithmKind::from_name`] for string-based construction.
pub enum AlgorithmKind {
    FlowField(FlowField),
    Cellular(Cellular),
    FractalTree(FractalTree),
    Voronoi(Voronoi),
    Mondrian(Mondrian),
    Bubble(BubblePack),
}

impl AlgorithmKind {
    /// Constructs an algorithm by id, reading its parameters from `params`.
    ///
    /// Returns `EngineError::UnknownAlgorithm` if the id is not registered.
    pub fn from_name(name: &str, params: &Value) -> Result<Self, EngineError> {
        Ok(match name {
            "perlin" => AlgorithmKind::FlowField(FlowField::from_json(params)),
            "cellular" => AlgorithmKind::Cellular(Cellular::from_json(params)),
            "fractal" => AlgorithmKind::FractalTree(FractalTree::from_json(params)),
            "voronoi" => AlgorithmKind::Voronoi(Voronoi::from_json(params)),
            "mondrian" => AlgorithmKind::Mondrian(Mondrian::from_json(params)),
            "bubble" => AlgorithmKind::Bubble(BubblePack::from_json(params)),
            _ => return Err(EngineError::UnknownAlgorithm(name.to_string())),
        })
    }

    /// All registered algorithms.
    pub fn list_algorithms() -> &'static [AlgorithmInfo] {
        ALGORITHMS
    }

    /// Parameter schema of the algorithm with the given id.
    pub fn schema_for(name: &str) -> Result<&'static ParamSchema, EngineError> {
        Ok(match name {
            "perlin" => &algo_art_flow_field::SCHEMA,
            "cellular" => &algo_art_cellular::SCHEMA,
            "fractal" => &algo_art_fractal_tree::SCHEMA,
            "voronoi" => &algo_art_voronoi::SCHEMA,
            "mondrian" => &algo_art_mondrian::SCHEMA,
            "bubble" => &algo_art_bubble::SCHEMA,
            _ => return Err(EngineError::UnknownAlgorithm(name.to_string())),
        })
    }

    /// Clears `surface` to the theme background, then paints one full frame.
    pub fn paint(
        &self,
        surface: &mut dyn Surface,
        rng: &mut dyn RandomSource,
        palette: &Palette,
        theme: Theme,
    ) {
        surface.clear(theme.background());
        let mut frame = Frame {
            surface,
            rng,
            palette,
            theme,
        };
        self.render(&mut frame);
    }
}

impl Renderer for AlgorithmKind {
    fn render(&self, frame: &mut Frame<'_>) {
        match self {
            AlgorithmKind::FlowField(a) => a.render(frame),
            AlgorithmKind::Cellular(a) => a.render(frame),
            AlgorithmKind::FractalTree(a) => a.render(frame),
            AlgorithmKind::Voronoi(a) => a.render(frame),
            AlgorithmKind::Mondrian(a) => a.render(frame),
            AlgorithmKind::Bubble(a) => a.render(frame),
        }
    }

    fn params(&self) -> Value {
        match self {
            AlgorithmKind::FlowField(a) => a.params(),
            AlgorithmKind::Cellular(a) => a.params(),
            AlgorithmKind::FractalTree(a) => a.params(),
            AlgorithmKind::Voronoi(a) => a.params(),
            AlgorithmKind::Mondrian(a) => a.params(),
            AlgorithmKind::Bubble(a) => a.params(),
        }
    }

    fn param_schema(&self) -> &'static ParamSchema {
        match self {
            AlgorithmKind::FlowField(a) => a.param_schema(),
            AlgorithmKind::Cellular(a) => a.param_schema(),
            AlgorithmKind::FractalTree(a) => a.param_schema(),
            AlgorithmKind::Voronoi(a) => a.param_schema(),
            AlgorithmKind::Mondrian(a) => a.param_schema(),
            AlgorithmKind::Bubble(a) => a.param_schema(),
        }
    }
}

/// Renders `config` onto `surface`.
///
/// Everything that can fail is checked before the surface is touched: the
/// size, the algorithm id and the palette id. The surface must match the
/// configured size.
pub fn render(config: &RenderConfig, surface: &mut dyn Surface) -> Result<(), EngineError> {
    config.validate()?;
    if surface.width() != config.width || surface.height() != config.height {
        return Err(EngineError::InvalidDimensions);
    }
    let algorithm = AlgorithmKind::from_name(&config.algorithm, &config.params)?;
    let palette = Palette::from_name(&config.palette)?;
    let mut rng = config.rng.build(config.seed);
    algorithm.paint(surface, rng.as_mut(), &palette, config.theme);
    Ok(())
}

/// Renders `config` onto a fresh [`Raster`] of the configured size.
pub fn render_raster(config: &RenderConfig) -> Result<Raster, EngineError> {
    config.validate()?;
    let mut raster = Raster::new(config.width, config.height)?;
    render(config, &mut raster)?;
    Ok(raster)
}
