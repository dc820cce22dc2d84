//! The `Renderer` trait every algorithm implements, and the per-call [`Frame`].
//!
//! The trait is object-safe so algorithms can be used as `dyn Renderer` for
//! runtime switching.

use crate::config::Theme;
use crate::palette::Palette;
use crate::params::ParamSchema;
use crate::prng::RandomSource;
use crate::surface::Surface;
use serde_json::Value;

/// Everything one render call borrows: the surface to paint, the random
/// stream, the palette and the theme.
///
/// A frame lives for exactly one call; nothing in it survives to the next.
pub struct Frame<'a> {
    pub surface: &'a mut dyn Surface,
    pub rng: &'a mut dyn RandomSource,
    pub palette: &'a Palette,
    pub theme: Theme,
}

impl Frame<'_> {
    /// Surface width in pixels, as `f64`.
    pub fn width(&self) -> f64 {
        self.surface.width() as f64
    }

    /// Surface height in pixels, as `f64`.
    pub fn height(&self) -> f64 {
        self.surface.height() as f64
    }
}

/// A deterministic generative algorithm.
///
/// Implementations hold their typed parameters and paint a complete frame on
/// every call. Given the same parameters, the same random stream and the same
/// palette, two calls issue identical draw operations.
pub trait Renderer {
    /// Paints the frame. The surface has already been cleared to the theme
    /// background; renderers never fail.
    fn render(&self, frame: &mut Frame<'_>);

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Declarative schema of all parameters.
    fn param_schema(&self) -> &'static ParamSchema;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Srgb;
    use crate::params::ParamSpec;
    use crate::prng::SeededRandom;
    use crate::surface::{Rect, Recorder};
    use serde_json::json;

    static MOCK_SCHEMA: ParamSchema = ParamSchema {
        algorithm: "mock",
        params: &[ParamSpec::integer("squares", 2.0, 0.0, 10.0, "Squares to draw")],
    };

    /// Minimal renderer used to verify trait object safety.
    struct MockRenderer {
        squares: usize,
    }

    impl Renderer for MockRenderer {
        fn render(&self, frame: &mut Frame<'_>) {
            for _ in 0..self.squares {
                let x = frame.rng.next_f64() * frame.width();
                let color = frame.palette.pick(frame.rng);
                frame
                    .surface
                    .fill_rect(Rect::new(x, 0.0, 1.0, 1.0), color.opaque());
            }
        }

        fn params(&self) -> Value {
            json!({"squares": self.squares})
        }

        fn param_schema(&self) -> &'static ParamSchema {
            &MOCK_SCHEMA
        }
    }

    #[test]
    fn renderer_trait_is_object_safe() {
        let renderer: Box<dyn Renderer> = Box::new(MockRenderer { squares: 3 });
        assert_eq!(renderer.params()["squares"], 3);
        assert_eq!(renderer.param_schema().algorithm, "mock");
    }

    #[test]
    fn frame_exposes_surface_dimensions() {
        let mut surface = Recorder::new(64, 32);
        let mut rng = SeededRandom::new(1);
        let palette = Palette::from_hex(&["#000000"]).unwrap();
        let frame = Frame {
            surface: &mut surface,
            rng: &mut rng,
            palette: &palette,
            theme: Theme::Light,
        };
        assert!((frame.width() - 64.0).abs() < f64::EPSILON);
        assert!((frame.height() - 32.0).abs() < f64::EPSILON);
    }

    #[test]
    fn mock_render_draws_through_dyn_surface() {
        let mut surface = Recorder::new(16, 16);
        let mut rng = SeededRandom::new(9);
        let palette = Palette::new(vec![Srgb::BLACK]).unwrap();
        let mut frame = Frame {
            surface: &mut surface,
            rng: &mut rng,
            palette: &palette,
            theme: Theme::Dark,
        };
        MockRenderer { squares: 4 }.render(&mut frame);
        assert_eq!(surface.filled_rects().count(), 4);
    }
}
