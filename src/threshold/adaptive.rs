//! Local-mean adaptive thresholding backed by an integral image.

use crate::image::{ImageView, Plane};
use crate::integral::IntegralImage;
use crate::threshold::binary;
use crate::trace::{trace_event, trace_span};
use crate::util::{PlaneScanError, PlaneScanResult};

/// Parameters for [`adaptive_threshold`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdaptiveConfig {
    /// Half window size; the window spans `(2 * block_size + 1)^2` samples
    /// (fewer at the borders, where it is clamped).
    pub block_size: usize,
    /// Offset subtracted from the local mean.
    pub constant: f64,
    /// Swap foreground and background.
    pub invert: bool,
}

impl Default for AdaptiveConfig {
    fn default() -> Self {
        Self {
            block_size: 7,
            constant: 5.0,
            invert: false,
        }
    }
}

/// Binarizes `src` against `local_mean - constant` per pixel.
///
/// Samples strictly above the local cutoff become foreground.
pub fn adaptive_threshold(
    src: ImageView<'_, u8>,
    cfg: AdaptiveConfig,
) -> PlaneScanResult<Plane<u8>> {
    if cfg.block_size == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "block_size",
            reason: "must be at least 1",
        });
    }
    if !cfg.constant.is_finite() {
        return Err(PlaneScanError::InvalidParameter {
            name: "constant",
            reason: "must be finite",
        });
    }

    let _span = trace_span!(
        "adaptive_threshold",
        width = src.width(),
        height = src.height(),
        block_size = cfg.block_size
    )
    .entered();

    let integral = IntegralImage::build(src, false);
    let mut out = Plane::filled(src.width(), src.height(), 0u8)?;
    let width = src.width();
    let mut foreground = 0usize;
    for y in 0..src.height() {
        let Some(row) = src.row(y) else { break };
        for (x, &v) in row.iter().enumerate() {
            let (sum, count) = integral.centered_sum(x, y, cfg.block_size, cfg.block_size);
            let mean = sum as f64 / count.max(1) as f64;
            let on = (f64::from(v) > mean - cfg.constant) != cfg.invert;
            foreground += usize::from(on);
            out.data_mut()[y * width + x] = binary(on);
        }
    }

    trace_event!("adaptive_foreground", pixels = foreground);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{adaptive_threshold, AdaptiveConfig};
    use crate::image::Plane;

    #[test]
    fn rejects_zero_block() {
        let src = Plane::filled(4, 4, 10u8).unwrap();
        let cfg = AdaptiveConfig {
            block_size: 0,
            ..AdaptiveConfig::default()
        };
        assert!(adaptive_threshold(src.view(), cfg).is_err());
    }

    #[test]
    fn bright_dot_on_gradient_is_isolated() {
        let width = 16;
        let height = 16;
        let mut data: Vec<u8> = (0..width * height).map(|i| (i % width * 8) as u8).collect();
        data[8 * width + 8] = 255;
        let src = Plane::new(data, width, height).unwrap();
        let out = adaptive_threshold(
            src.view(),
            AdaptiveConfig {
                block_size: 2,
                constant: -10.0,
                invert: false,
            },
        )
        .unwrap();
        assert_eq!(*out.get(8, 8).unwrap(), 255);
        assert_eq!(*out.get(4, 4).unwrap(), 0);
        assert!(out.is_binary());
    }
}
