//! Error types for planescan.

use thiserror::Error;

/// Result alias for planescan operations.
pub type PlaneScanResult<T> = std::result::Result<T, PlaneScanError>;

/// Errors reported by planescan algorithms.
///
/// Only invalid arguments and resource limits are errors. Degenerate numeric
/// cases (vertical slopes, zero-area roundness, flat correlation windows) are
/// signalled through sentinel values on the returned data instead.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PlaneScanError {
    /// Width or height is zero, or their product overflows.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Backing buffer is shorter than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Buffer length differs from `width * height`.
    #[error("size mismatch: expected {expected} samples, got {got}")]
    SizeMismatch { expected: usize, got: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Two planes that must share a size do not.
    #[error("dimension mismatch: expected {expected:?}, got {got:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Template and target carry a different number of channels.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },
    /// ROI does not fit inside the image.
    #[error(
        "roi out of bounds: x={x}, y={y}, width={width}, height={height} in {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// Template does not fit inside the target.
    #[error("template {tpl_width}x{tpl_height} larger than target {img_width}x{img_height}")]
    TemplateTooLarge {
        tpl_width: usize,
        tpl_height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// A parameter is outside its accepted range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: &'static str,
    },
    /// Hough accumulator would exceed addressable size.
    #[error("accumulator too large: {cells} cells")]
    AccumulatorTooLarge { cells: u128 },
    /// Image decoding failed.
    #[cfg(feature = "image-io")]
    #[error("image i/o failed: {reason}")]
    ImageIo { reason: String },
}
