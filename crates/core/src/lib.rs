#![deny(unsafe_code)]
//! Core types and traits for the algo-art generative art system.
//!
//! Provides the `Renderer` trait and per-call `Frame`, the `Surface` drawing
//! abstraction with its `Raster` and `Recorder` implementations, color types,
//! the built-in `Palette` table, the seeded random sources, the declarative
//! parameter schema, and `RenderConfig`.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod palette;
pub mod params;
pub mod prng;
pub mod surface;

pub use color::{Rgba, Srgb};
pub use config::{RenderConfig, Theme};
pub use engine::{Frame, Renderer};
pub use error::EngineError;
pub use palette::Palette;
pub use params::{ParamSchema, ParamSpec};
pub use prng::{RandomSource, RngKind, SeededRandom, Xorshift64};
pub use surface::{Paint, Raster, Rect, Recorder, Surface};
