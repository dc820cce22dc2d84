//! PNG export of a rendered [`Raster`].
//!
//! This module is feature-gated behind `png` (default on) so that embedders
//! who only need the raster buffer do not pull in the `image` crate.

use algo_art_core::{EngineError, Raster, Surface};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

fn to_image(raster: &Raster) -> Result<RgbaImage, EngineError> {
    let w = u32::try_from(raster.width()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| EngineError::InvalidDimensions)?;
    RgbaImage::from_raw(w, h, raster.to_rgba8())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))
}

/// Encodes the raster as PNG bytes.
pub fn encode_png(raster: &Raster) -> Result<Vec<u8>, EngineError> {
    let img = to_image(raster)?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| EngineError::Io(e.to_string()))?;
    Ok(bytes)
}

/// Writes the raster to `path` as PNG, whatever the file extension.
///
/// Returns `EngineError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `EngineError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), EngineError> {
    to_image(raster)?
        .save_with_format(path, ImageFormat::Png)
        .map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_raster;
    use algo_art_core::RenderConfig;

    #[test]
    fn write_png_round_trip() {
        let config = RenderConfig::new("mondrian", 48, 32, "retro", 11);
        let raster = render_raster(&config).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(config.export_file_name());

        write_png(&raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!(img.width(), 48);
        assert_eq!(img.height(), 32);
        assert_eq!(img.as_raw().as_slice(), raster.to_rgba8());
    }

    #[test]
    fn encode_png_has_signature_and_decodes() {
        let raster = render_raster(&RenderConfig::new("cellular", 24, 24, "neon", 3)).unwrap();
        let bytes = encode_png(&raster).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
        let img = image::load_from_memory_with_format(&bytes, ImageFormat::Png)
            .unwrap()
            .to_rgba8();
        assert_eq!(img.as_raw().as_slice(), raster.to_rgba8());
    }

    #[test]
    fn write_into_missing_directory_is_io_error() {
        let raster = Raster::new(4, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("out.png");
        assert!(matches!(write_png(&raster, &path), Err(EngineError::Io(_))));
    }
}
