//! Per-placement scoring kernels and the sequential scan.

use crate::image::ImageView;
use crate::integral::IntegralImage;
use crate::matching::plan::{EnergyPlan, ZnccPlan};

/// Windows whose sampled variance is at or below this are flat.
pub(crate) const MIN_VARIANCE: f64 = 1e-9;

/// Target image together with its prefix-sum tables.
pub(crate) struct Target<'a> {
    pub(crate) image: ImageView<'a, u8>,
    pub(crate) integral: IntegralImage,
}

impl<'a> Target<'a> {
    pub(crate) fn new(image: ImageView<'a, u8>) -> Self {
        Self {
            image,
            integral: IntegralImage::build(image, true),
        }
    }

    /// Placements per axis for a `tpl_width x tpl_height` template.
    pub(crate) fn placements(&self, tpl_width: usize, tpl_height: usize) -> (usize, usize) {
        (
            self.image.width() + 1 - tpl_width,
            self.image.height() + 1 - tpl_height,
        )
    }
}

/// Scores one placement (top-left corner) of a planned template.
///
/// Callers keep `(x, y)` within [`Target::placements`].
pub(crate) trait Kernel {
    type Plan: Sync;

    fn dims(plan: &Self::Plan) -> (usize, usize);

    fn score_at(target: &Target<'_>, plan: &Self::Plan, x: usize, y: usize) -> f32;
}

/// Sum of squared differences assembled from window energy, template energy
/// and an explicit cross term. Zero for an exact copy; lower is better.
pub(crate) struct EnergyKernel;

impl Kernel for EnergyKernel {
    type Plan = EnergyPlan;

    fn dims(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(target: &Target<'_>, plan: &Self::Plan, x: usize, y: usize) -> f32 {
        let (w, h) = (plan.width(), plan.height());
        let window = target
            .integral
            .rect_square_sum(x as isize, y as isize, w, h)
            .unwrap_or(0);
        let samples = plan.samples();
        let mut cross = 0u64;
        for ty in 0..h {
            let Some(row) = target.image.row(y + ty) else {
                return f32::NAN;
            };
            cross += cross_term(&row[x..x + w], &samples[ty * w..(ty + 1) * w]);
        }
        (window + plan.energy()).saturating_sub(2 * cross) as f32
    }
}

#[cfg(not(feature = "simd"))]
#[inline]
fn cross_term(window: &[u8], tpl: &[u8]) -> u64 {
    window
        .iter()
        .zip(tpl)
        .map(|(&a, &b)| u64::from(a) * u64::from(b))
        .sum()
}

#[cfg(feature = "simd")]
#[inline]
fn cross_term(window: &[u8], tpl: &[u8]) -> u64 {
    crate::matching::simd::dot_u8(window, tpl)
}

/// Zero-mean normalized cross-correlation on a strided sample grid.
///
/// The window mean comes from the prefix sums over the full window; the
/// deviations and the window variance are accumulated explicitly at the
/// sampled pixels. Flat windows or templates score `f32::NEG_INFINITY`.
pub(crate) struct ZnccKernel;

impl Kernel for ZnccKernel {
    type Plan = ZnccPlan;

    fn dims(plan: &Self::Plan) -> (usize, usize) {
        (plan.width(), plan.height())
    }

    fn score_at(target: &Target<'_>, plan: &Self::Plan, x: usize, y: usize) -> f32 {
        let var_t = plan.var_t();
        if var_t <= MIN_VARIANCE {
            return f32::NEG_INFINITY;
        }
        let (w, h, step) = (plan.width(), plan.height(), plan.step());
        let mean_i =
            target.integral.rect_sum(x as isize, y as isize, w, h) as f64 / (w * h) as f64;

        let t_prime = plan.zero_mean();
        let per_row = plan.row_samples();
        let mut dot = 0.0f64;
        let mut var_i = 0.0f64;
        for (sample_row, ty) in (0..h).step_by(step).enumerate() {
            let Some(row) = target.image.row(y + ty) else {
                return f32::NEG_INFINITY;
            };
            let t_row = &t_prime[sample_row * per_row..(sample_row + 1) * per_row];
            for (&value, &t) in row[x..x + w].iter().step_by(step).zip(t_row) {
                let d = f64::from(value) - mean_i;
                dot += d * t;
                var_i += d * d;
            }
        }

        if var_i <= MIN_VARIANCE {
            return f32::NEG_INFINITY;
        }
        let score = (dot / (var_i * var_t).sqrt()) as f32;
        if score.is_finite() {
            score
        } else {
            f32::NEG_INFINITY
        }
    }
}

/// Scores of one placement row.
pub(crate) fn scan_row<K: Kernel>(target: &Target<'_>, plan: &K::Plan, y: usize) -> Vec<f32> {
    let (tpl_width, tpl_height) = K::dims(plan);
    let (out_width, _) = target.placements(tpl_width, tpl_height);
    (0..out_width)
        .map(|x| K::score_at(target, plan, x, y))
        .collect()
}

/// Row-major scores for every placement.
#[cfg(not(feature = "rayon"))]
pub(crate) fn scan_full<K: Kernel>(target: &Target<'_>, plan: &K::Plan) -> Vec<f32> {
    let (tpl_width, tpl_height) = K::dims(plan);
    let (out_width, out_height) = target.placements(tpl_width, tpl_height);
    let mut scores = Vec::with_capacity(out_width * out_height);
    for y in 0..out_height {
        scores.extend(scan_row::<K>(target, plan, y));
    }
    scores
}
