//! Color types: opaque [`Srgb`] palette entries and [`Rgba`] paints.
//!
//! Components are `f64` in [0, 1]. Colors enter the system as hex strings
//! (`"#rrggbb"`) and leave it as RGBA8
//! pixels on a [`Raster`](crate::surface::Raster).

use crate::error::EngineError;

/// Opaque sRGB color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Srgb {
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const BLACK: Srgb = Srgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Returns `EngineError::InvalidColor` if the input is not a valid 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits in '{hex}', got {}",
                digits.len()
            )));
        }
        Ok(Srgb {
            r: hex_channel(digits, 0, "red")?,
            g: hex_channel(digits, 2, "green")?,
            b: hex_channel(digits, 4, "blue")?,
        })
    }

    /// This color with the given alpha.
    pub fn with_alpha(self, a: f64) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// This color at full opacity.
    pub fn opaque(self) -> Rgba {
        self.with_alpha(1.0)
    }
}

impl Rgba {
    /// Quantizes to 8-bit channels with rounding.
    pub fn to_rgba8(self) -> [u8; 4] {
        [
            quantize(self.r),
            quantize(self.g),
            quantize(self.b),
            quantize(self.a),
        ]
    }

    /// This color with its alpha multiplied by `factor`.
    pub fn fade(self, factor: f64) -> Rgba {
        Rgba {
            a: (self.a * factor).clamp(0.0, 1.0),
            ..self
        }
    }
}

fn quantize(c: f64) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hex_channel(digits: &str, at: usize, name: &str) -> Result<f64, EngineError> {
    let pair = digits
        .get(at..at + 2)
        .ok_or_else(|| EngineError::InvalidColor(format!("missing {name} component")))?;
    u8::from_str_radix(pair, 16)
        .map(|v| v as f64 / 255.0)
        .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
}
