//! Global and adaptive thresholding.
//!
//! Cutoff selection ([`ThresholdMethod`]) is separate from how a cutoff is
//! applied ([`ThresholdType`]). Binary outputs use only `{0, 255}`.

use crate::image::{ImageView, Plane, BACKGROUND, FOREGROUND};
use crate::trace::{trace_event, trace_span};
use crate::util::PlaneScanResult;

mod adaptive;
pub mod histogram;

pub use adaptive::{adaptive_threshold, AdaptiveConfig};
pub use histogram::{
    histogram, mean_cutoff, mean_shift_cutoff, otsu_cutoff, triangle_cutoff, BINS,
};

/// Global cutoff selection strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdMethod {
    /// Caller-provided cutoff.
    Fixed(u8),
    /// Mean intensity.
    Mean,
    /// Otsu's minimum within-class variance.
    Otsu,
    /// Triangle (peak-to-tail distance) method.
    Triangle,
    /// Iterative intermeans starting at 127.
    MeanShift,
}

/// How a cutoff maps samples to outputs (`v > cutoff` is "above").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThresholdType {
    /// Above: `max_value`, otherwise 0.
    Binary,
    /// Above: 0, otherwise `max_value`.
    BinaryInv,
    /// Above: `cutoff`, otherwise unchanged.
    Trunc,
    /// Above: unchanged, otherwise 0.
    ToZero,
    /// Above: 0, otherwise unchanged.
    ToZeroInv,
}

impl ThresholdType {
    #[inline]
    fn apply(self, v: u8, cutoff: u8, max_value: u8) -> u8 {
        let above = v > cutoff;
        match self {
            ThresholdType::Binary => {
                if above {
                    max_value
                } else {
                    0
                }
            }
            ThresholdType::BinaryInv => {
                if above {
                    0
                } else {
                    max_value
                }
            }
            ThresholdType::Trunc => {
                if above {
                    cutoff
                } else {
                    v
                }
            }
            ThresholdType::ToZero => {
                if above {
                    v
                } else {
                    0
                }
            }
            ThresholdType::ToZeroInv => {
                if above {
                    0
                } else {
                    v
                }
            }
        }
    }
}

/// Resolves a method to a scalar cutoff for `src`.
pub fn compute_cutoff(src: ImageView<'_, u8>, method: ThresholdMethod) -> u8 {
    let _span = trace_span!("compute_cutoff", width = src.width(), height = src.height()).entered();
    let cutoff = match method {
        ThresholdMethod::Fixed(t) => t,
        ThresholdMethod::Mean => mean_cutoff(&histogram(src)),
        ThresholdMethod::Otsu => otsu_cutoff(&histogram(src)),
        ThresholdMethod::Triangle => triangle_cutoff(&histogram(src)),
        ThresholdMethod::MeanShift => {
            let (cutoff, rounds) = mean_shift_cutoff(&histogram(src));
            trace_event!("mean_shift_rounds", rounds = rounds);
            cutoff
        }
    };
    trace_event!("cutoff", value = cutoff);
    cutoff
}

/// Applies a cutoff in place.
pub fn apply_threshold(plane: &mut Plane<u8>, cutoff: u8, max_value: u8, kind: ThresholdType) {
    for v in plane.data_mut() {
        *v = kind.apply(*v, cutoff, max_value);
    }
}

/// Binarizes in place: `v > cutoff` becomes 255 (0 when `invert`).
pub fn apply_binary(plane: &mut Plane<u8>, cutoff: u8, invert: bool) {
    let kind = if invert {
        ThresholdType::BinaryInv
    } else {
        ThresholdType::Binary
    };
    apply_threshold(plane, cutoff, FOREGROUND, kind);
}

/// Computes a cutoff with `method` and returns a new binary plane with it.
pub fn binarize(
    src: ImageView<'_, u8>,
    method: ThresholdMethod,
    invert: bool,
) -> PlaneScanResult<(Plane<u8>, u8)> {
    let cutoff = compute_cutoff(src, method);
    let mut out = Plane::from_view(src)?;
    apply_binary(&mut out, cutoff, invert);
    Ok((out, cutoff))
}

/// Maps a boolean decision to a binary sample.
#[inline]
pub(crate) fn binary(on: bool) -> u8 {
    if on {
        FOREGROUND
    } else {
        BACKGROUND
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_binary, apply_threshold, binarize, ThresholdMethod, ThresholdType};
    use crate::image::Plane;

    fn plane(data: &[u8]) -> Plane<u8> {
        Plane::new(data.to_vec(), data.len(), 1).unwrap()
    }

    #[test]
    fn binary_and_inverse_are_complements() {
        let mut a = plane(&[0, 100, 101, 255]);
        let mut b = a.clone();
        apply_threshold(&mut a, 100, 200, ThresholdType::Binary);
        apply_threshold(&mut b, 100, 200, ThresholdType::BinaryInv);
        assert_eq!(a.data(), &[0, 0, 200, 200]);
        assert_eq!(b.data(), &[200, 200, 0, 0]);
    }

    #[test]
    fn trunc_and_to_zero_variants() {
        let src = plane(&[10, 50, 90]);
        let mut trunc = src.clone();
        apply_threshold(&mut trunc, 50, 255, ThresholdType::Trunc);
        assert_eq!(trunc.data(), &[10, 50, 50]);

        let mut to_zero = src.clone();
        apply_threshold(&mut to_zero, 50, 255, ThresholdType::ToZero);
        assert_eq!(to_zero.data(), &[0, 0, 90]);

        let mut to_zero_inv = src;
        apply_threshold(&mut to_zero_inv, 50, 255, ThresholdType::ToZeroInv);
        assert_eq!(to_zero_inv.data(), &[10, 50, 0]);
    }

    #[test]
    fn apply_binary_is_idempotent_on_binary_planes() {
        let mut p = plane(&[0, 255, 255, 0, 255]);
        let before = p.clone();
        apply_binary(&mut p, 127, false);
        assert_eq!(p, before);
    }

    #[test]
    fn binarize_reports_cutoff() {
        let src = plane(&[20, 20, 20, 220, 220, 220]);
        let (out, cutoff) = binarize(src.view(), ThresholdMethod::Otsu, false).unwrap();
        assert!(cutoff >= 20 && cutoff < 220);
        assert_eq!(out.data(), &[0, 0, 0, 255, 255, 255]);
    }
}
