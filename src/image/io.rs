//! Conversions from the `image` crate's buffers.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::color::ColorPlanes;
use crate::image::{ImageView, Plane};
use crate::util::{PlaneScanError, PlaneScanResult};
use std::path::Path;

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> PlaneScanResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Copies a grayscale image buffer into a plane.
pub fn plane_from_gray_image(img: &image::GrayImage) -> PlaneScanResult<Plane<u8>> {
    Plane::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Splits an RGB image buffer into three planes.
pub fn planes_from_rgb_image(img: &image::RgbImage) -> PlaneScanResult<ColorPlanes> {
    ColorPlanes::from_interleaved(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Loads an image from disk as a single luma plane.
pub fn load_gray_plane<P: AsRef<Path>>(path: P) -> PlaneScanResult<Plane<u8>> {
    let img = open(path)?;
    plane_from_gray_image(&img.to_luma8())
}

/// Loads an image from disk as R, G, B planes.
pub fn load_color_planes<P: AsRef<Path>>(path: P) -> PlaneScanResult<ColorPlanes> {
    let img = open(path)?;
    planes_from_rgb_image(&img.to_rgb8())
}

fn open<P: AsRef<Path>>(path: P) -> PlaneScanResult<image::DynamicImage> {
    image::open(path).map_err(|err| PlaneScanError::ImageIo {
        reason: err.to_string(),
    })
}
