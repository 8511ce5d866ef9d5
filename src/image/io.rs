//! Convenience helpers for loading images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Animated formats
//! (GIF) decode to their first frame, which is what sprite templates
//! captured from the game's asset pages contain.

use crate::image::{ImageView, OwnedImage};
use crate::util::{SpriteScanError, SpriteScanResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> SpriteScanResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> SpriteScanResult<OwnedImage> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    OwnedImage::new(img.as_raw().clone(), width, height)
}

/// Creates an owned grayscale image from a dynamic image.
pub fn owned_from_dynamic_image(img: &image::DynamicImage) -> SpriteScanResult<OwnedImage> {
    let gray = img.to_luma8();
    owned_from_gray_image(&gray)
}

/// Loads an image from disk and converts it to a grayscale owned image.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> SpriteScanResult<OwnedImage> {
    let img = image::open(path.as_ref()).map_err(|err| SpriteScanError::Decode {
        path: path.as_ref().to_path_buf(),
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Loads an image from disk as RGB, for annotation output.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> SpriteScanResult<image::RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| SpriteScanError::Decode {
        path: path.as_ref().to_path_buf(),
        reason: err.to_string(),
    })?;
    Ok(img.to_rgb8())
}
