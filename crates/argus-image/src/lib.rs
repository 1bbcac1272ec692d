//! Still-image decoding for the argus detectors.
//!
//! Wraps the `image` crate to decode encoded bytes into RGB8 `Tensor<u8>`
//! from `argus-base`, plus a fixed-filter resize used to bring stills to the
//! classifier's input size.
//!
//! All rasters use HWC layout: `[height, width, 3]`.

pub mod error;

pub use error::ImageError;

use argus_base::Tensor;
use crates_image::imageops::FilterType;
use crates_image::{ImageBuffer, Rgb, RgbImage};

/// Decodes an image from raw bytes into an RGB8 raster tensor.
///
/// The format is auto-detected by the `image` crate; any pixel type is
/// converted to 8-bit RGB (alpha dropped, grayscale expanded).
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is
/// unsupported, `ImageError::Tensor` if tensor construction fails.
pub fn decode_rgb8(data: &[u8]) -> Result<Tensor<u8>, ImageError> {
    let img = crates_image::load_from_memory(data)?;
    let rgb = img.to_rgb8();
    let (width, height) = rgb.dimensions();
    let shape = vec![height as usize, width as usize, 3];
    Ok(Tensor::new(shape, rgb.into_raw())?)
}

/// Resizes an RGB8 raster to `target` (height, width).
///
/// Uses triangle (bilinear) filtering, a fixed non-random resampling, so
/// the same input always produces the same output.
///
/// # Errors
///
/// Returns `ImageError::Resize` if the input is not an HWC `[h, w, 3]`
/// raster with non-zero dimensions or if the target has a zero dimension.
pub fn resize_rgb8(raster: &Tensor<u8>, target: (usize, usize)) -> Result<Tensor<u8>, ImageError> {
    if raster.ndim() != 3 || raster.dim(2) != 3 {
        return Err(ImageError::Resize(format!(
            "expected [h, w, 3] raster, got shape {:?}",
            raster.shape
        )));
    }
    let (h, w) = (raster.dim(0), raster.dim(1));
    let (th, tw) = target;
    if h == 0 || w == 0 || th == 0 || tw == 0 {
        return Err(ImageError::Resize(format!(
            "dimensions must be non-zero: source {}x{}, target {}x{}",
            h, w, th, tw
        )));
    }

    if (h, w) == (th, tw) {
        return Ok(raster.clone());
    }

    let buf: RgbImage = ImageBuffer::<Rgb<u8>, _>::from_raw(w as u32, h as u32, raster.data.clone())
        .ok_or_else(|| ImageError::Resize("raster length does not match dimensions".to_string()))?;

    let resized = crates_image::imageops::resize(&buf, tw as u32, th as u32, FilterType::Triangle);
    let shape = vec![th, tw, 3];
    Ok(Tensor::new(shape, resized.into_raw())?)
}
