//! Error types for spritescan.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias for spritescan operations.
pub type SpriteScanResult<T> = std::result::Result<T, SpriteScanError>;

/// Errors that can occur while loading templates or scanning frames.
///
/// Only `TemplateDir` and `Capture` abort a detection cycle. `Decode` and
/// `TemplateTooLarge` are recovered where they arise: the store skips the
/// file, the detector skips the template for that frame.
#[derive(Debug, Error, PartialEq)]
pub enum SpriteScanError {
    /// Image dimensions are zero or overflow an index computation.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The row stride is smaller than the image width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// The backing buffer is too small for the declared dimensions.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// The template has no intensity variance, so ZNCC is undefined.
    #[error("degenerate template: {reason}")]
    DegenerateTemplate { reason: &'static str },
    /// The template exceeds the frame in at least one dimension.
    #[error(
        "template {tpl_width}x{tpl_height} larger than frame {img_width}x{img_height}"
    )]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The template directory itself could not be listed. Fatal to a run.
    #[error("cannot read template directory {path:?}: {reason}")]
    TemplateDir { path: PathBuf, reason: String },
    /// A single image file could not be decoded.
    #[error("cannot decode {path:?}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// The frame source failed to produce an image for this cycle.
    #[error("frame capture failed: {reason}")]
    Capture { reason: String },
}
