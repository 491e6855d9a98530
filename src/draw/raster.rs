//! Conversions between decoded RGBA pixels and cairo image surfaces.
//!
//! Cairo's ARGB32 format stores premultiplied alpha in native-endian `u32`
//! words, while the `image` crate works with straight-alpha RGBA bytes.

use cairo::{Format, ImageSurface};
use image::{Rgba, RgbaImage};
use thiserror::Error;

/// Errors raised while producing or converting raster layers.
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Surface data unavailable: {0}")]
    Borrow(#[from] cairo::BorrowError),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] cairo::IoError),

    #[error("Image decoding failed: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Raster of {width}x{height} exceeds cairo's surface limits")]
    TooLarge { width: u32, height: u32 },
}

/// Creates a fully transparent ARGB32 surface.
pub fn blank_surface(width: u32, height: u32) -> Result<ImageSurface, RasterError> {
    let too_large = || RasterError::TooLarge { width, height };
    let surface_width = i32::try_from(width).map_err(|_| too_large())?;
    let surface_height = i32::try_from(height).map_err(|_| too_large())?;
    Ok(ImageSurface::create(Format::ARgb32, surface_width, surface_height)?)
}

/// Creates a cairo surface holding a copy of `image`.
pub fn surface_from_rgba(image: &RgbaImage) -> Result<ImageSurface, RasterError> {
    let mut surface = blank_surface(image.width(), image.height())?;
    let stride = surface.stride() as usize;
    {
        let mut data = surface.data()?;
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b, a] = pixel.0;
            let alpha = a as u32;
            let premultiply = |c: u8| (c as u32 * alpha + 127) / 255;
            let word = (alpha << 24) | (premultiply(r) << 16) | (premultiply(g) << 8) | premultiply(b);
            let offset = y as usize * stride + x as usize * 4;
            data[offset..offset + 4].copy_from_slice(&word.to_ne_bytes());
        }
    }
    surface.mark_dirty();
    Ok(surface)
}

/// Copies a cairo surface back into straight-alpha RGBA pixels.
///
/// The surface must not be referenced by a live [`cairo::Context`].
pub fn surface_to_rgba(mut surface: ImageSurface) -> Result<RgbaImage, RasterError> {
    surface.flush();
    let width = surface.width().max(0) as u32;
    let height = surface.height().max(0) as u32;
    let stride = surface.stride() as usize;
    let data = surface.data()?;

    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let offset = y as usize * stride + x as usize * 4;
        let mut word_bytes = [0u8; 4];
        word_bytes.copy_from_slice(&data[offset..offset + 4]);
        let word = u32::from_ne_bytes(word_bytes);

        let a = (word >> 24) & 0xff;
        let unpremultiply = |c: u32| {
            if a == 0 {
                0
            } else {
                ((c * 255 + a / 2) / a).min(255) as u8
            }
        };
        *pixel = Rgba([
            unpremultiply((word >> 16) & 0xff),
            unpremultiply((word >> 8) & 0xff),
            unpremultiply(word & 0xff),
            a as u8,
        ]);
    }
    Ok(image)
}
