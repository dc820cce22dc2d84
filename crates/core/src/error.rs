//! Error types for the algo-art core.

use thiserror::Error;

/// Errors produced while configuring or exporting a render.
///
/// Renderers themselves never fail; every variant here describes input that
/// must be rejected before a render starts, or a failure while exporting.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero when creating a surface.
    #[error("invalid dimensions: width and height must be non-zero")]
    InvalidDimensions,

    /// The requested algorithm id is not registered.
    #[error("unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    /// The requested palette id is not in the palette table.
    #[error("unknown palette: {0}")]
    UnknownPalette(String),

    /// A parameter had a value outside its schema range.
    #[error("parameter '{name}' = {value} is outside [{min}, {max}]")]
    ParamOutOfRange {
        name: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// A parameter existed but had the wrong JSON type.
    #[error("parameter type mismatch for '{name}': expected {expected}, got {got}")]
    ParamTypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// A palette could not be constructed from the given colors.
    #[error("invalid palette: {0}")]
    InvalidPalette(String),

    /// Writing or encoding an exported image failed.
    #[error("i/o error: {0}")]
    Io(String),
}
