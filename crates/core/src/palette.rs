//! Ordered color palettes and the built-in palette table.
//!
//! A [`Palette`] is a non-empty, ordered list of opaque colors. Renderers
//! index it directly (first color for tree trunks, last for leaves,
//! `(col + row) % len` for automaton cells) or pick from it with one random
//! draw via [`Palette::pick`].

use crate::color::Srgb;
use crate::error::EngineError;
use crate::prng::RandomSource;
use serde::Serialize;

/// A built-in palette: stable id, display name, and hex colors.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PaletteEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub colors: &'static [&'static str],
}

/// The built-in palette table, in display order.
pub const PALETTES: &[PaletteEntry] = &[
    PaletteEntry {
        id: "sunset",
        name: "Sunset",
        colors: &["#FF7B89", "#8A5082", "#6F5F90", "#758EB7", "#A5CAD2"],
    },
    PaletteEntry {
        id: "forest",
        name: "Forest",
        colors: &["#2D3047", "#93B7BE", "#E0CA3C", "#A37336", "#6D2E46"],
    },
    PaletteEntry {
        id: "neon",
        name: "Neon",
        colors: &[
            "#7400B8", "#6930C3", "#5E60CE", "#5390D9", "#4EA8DE", "#48BFE3", "#56CFE1",
            "#64DFDF", "#72EFDD", "#80FFDB",
        ],
    },
    PaletteEntry {
        id: "monochrome",
        name: "Monochrome",
        colors: &[
            "#F8F9FA", "#E9ECEF", "#DEE2E6", "#CED4DA", "#ADB5BD", "#6C757D", "#495057",
            "#343A40", "#212529",
        ],
    },
    PaletteEntry {
        id: "retro",
        name: "Retro",
        colors: &["#EF476F", "#FFD166", "#06D6A0", "#118AB2", "#073B4C"],
    },
    PaletteEntry {
        id: "pastel",
        name: "Pastel",
        colors: &["#FFD6FF", "#E7C6FF", "#C8B6FF", "#B8C0FF", "#BBD0FF"],
    },
];

/// A non-empty ordered list of colors. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings.
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self, EngineError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Looks up a built-in palette by id.
    pub fn from_name(id: &str) -> Result<Self, EngineError> {
        let entry = PALETTES
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| EngineError::UnknownPalette(id.to_string()))?;
        Self::from_hex(entry.colors)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Color at `index`, clamped to the last entry.
    pub fn get(&self, index: usize) -> Srgb {
        self.colors[index.min(self.colors.len() - 1)]
    }

    pub fn first(&self) -> Srgb {
        self.colors[0]
    }

    pub fn last(&self) -> Srgb {
        self.colors[self.colors.len() - 1]
    }

    /// Picks `colors[floor(r * len)]` with one draw from `rng`.
    pub fn pick(&self, rng: &mut dyn RandomSource) -> Srgb {
        self.colors[rng.next_index(self.colors.len())]
    }
}
