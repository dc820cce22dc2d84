//! Reproducible description of one artwork.
//!
//! A [`RenderConfig`] captures everything needed to recreate an image:
//! algorithm id, surface size, palette id, parameters, seed, theme and
//! generator. It is owned by the caller and passed by value into each render;
//! the engine keeps no state between calls.

use crate::color::Srgb;
use crate::error::EngineError;
use crate::prng::RngKind;
use serde::{Deserialize, Serialize};

/// Light or dark presentation.
///
/// Decides the background fill and the "ink" used for Voronoi site markers
/// and Mondrian borders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    /// White, or `#1a1a1a` in the dark theme.
    pub fn background(self) -> Srgb {
        match self {
            Theme::Light => Srgb::WHITE,
            Theme::Dark => Srgb {
                r: 26.0 / 255.0,
                g: 26.0 / 255.0,
                b: 26.0 / 255.0,
            },
        }
    }

    /// Black, or white in the dark theme.
    pub fn ink(self) -> Srgb {
        match self {
            Theme::Light => Srgb::BLACK,
            Theme::Dark => Srgb::WHITE,
        }
    }
}

/// Everything needed to reproduce one render.
///
/// Two equal configs rendered by the same binary produce pixel-identical output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderConfig {
    pub algorithm: String,
    pub width: usize,
    pub height: usize,
    pub palette: String,
    #[serde(default = "empty_params")]
    pub params: serde_json::Value,
    pub seed: i64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub rng: RngKind,
}

fn empty_params() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl RenderConfig {
    /// Creates a config with default params (`{}`), light theme and the sine generator.
    pub fn new(algorithm: &str, width: usize, height: usize, palette: &str, seed: i64) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            width,
            height,
            palette: palette.to_string(),
            params: empty_params(),
            seed,
            theme: Theme::default(),
            rng: RngKind::default(),
        }
    }

    /// Validates that the size is non-zero and `width * height * 4` does not overflow.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }

    /// Conventional export file name: `algorithmic-art-<algorithm>-<seed>.png`.
    pub fn export_file_name(&self) -> String {
        format!("algorithmic-art-{}-{}.png", self.algorithm, self.seed)
    }
}
