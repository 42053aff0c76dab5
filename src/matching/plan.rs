//! Template precomputation for the two scoring paths.

use crate::image::ImageView;
use crate::util::{PlaneScanError, PlaneScanResult};

/// Template data for the energy score: raw samples and their squared sum.
pub(crate) struct EnergyPlan {
    width: usize,
    height: usize,
    samples: Vec<u8>,
    energy: u64,
}

impl EnergyPlan {
    pub(crate) fn from_view(tpl: ImageView<'_, u8>) -> PlaneScanResult<Self> {
        let (width, height) = tpl.dims();
        let mut samples = Vec::with_capacity(width * height);
        for y in 0..height {
            samples.extend_from_slice(template_row(tpl, y)?);
        }
        let energy = samples.iter().map(|&v| u64::from(v) * u64::from(v)).sum();
        Ok(Self {
            width,
            height,
            samples,
            energy,
        })
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    /// Row-major template samples.
    pub(crate) fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// Sum of squared template samples.
    pub(crate) fn energy(&self) -> u64 {
        self.energy
    }
}

/// Template data for sampled zero-mean correlation.
///
/// The mean is taken over every template pixel; the zero-mean samples and
/// their variance only cover the `step`-strided grid the score visits.
pub(crate) struct ZnccPlan {
    width: usize,
    height: usize,
    step: usize,
    zero_mean: Vec<f64>,
    var_t: f64,
}

impl ZnccPlan {
    pub(crate) fn from_view(tpl: ImageView<'_, u8>, step: usize) -> PlaneScanResult<Self> {
        if step == 0 {
            return Err(PlaneScanError::InvalidParameter {
                name: "sample_step",
                reason: "must be at least 1",
            });
        }
        let (width, height) = tpl.dims();
        let mut sum = 0u64;
        for y in 0..height {
            sum += template_row(tpl, y)?.iter().map(|&v| u64::from(v)).sum::<u64>();
        }
        let mean = sum as f64 / (width * height) as f64;

        let mut zero_mean = Vec::new();
        for y in (0..height).step_by(step) {
            let row = template_row(tpl, y)?;
            zero_mean.extend(row.iter().step_by(step).map(|&v| f64::from(v) - mean));
        }
        let var_t = zero_mean.iter().map(|d| d * d).sum();
        Ok(Self {
            width,
            height,
            step,
            zero_mean,
            var_t,
        })
    }

    pub(crate) fn width(&self) -> usize {
        self.width
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn step(&self) -> usize {
        self.step
    }

    /// Samples per strided row.
    pub(crate) fn row_samples(&self) -> usize {
        self.width.div_ceil(self.step)
    }

    /// Zero-mean template values on the strided grid, row-major.
    pub(crate) fn zero_mean(&self) -> &[f64] {
        &self.zero_mean
    }

    /// Sum of squared zero-mean samples.
    pub(crate) fn var_t(&self) -> f64 {
        self.var_t
    }
}

fn template_row<'a>(tpl: ImageView<'a, u8>, y: usize) -> PlaneScanResult<&'a [u8]> {
    tpl.row(y).ok_or(PlaneScanError::BufferTooSmall {
        needed: y * tpl.stride() + tpl.width(),
        got: tpl.as_slice().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::{EnergyPlan, ZnccPlan};
    use crate::image::ImageView;

    #[test]
    fn energy_plan_sums_squares() {
        let data = [1u8, 2, 3, 4];
        let plan = EnergyPlan::from_view(ImageView::from_slice(&data, 2, 2).unwrap()).unwrap();
        assert_eq!(plan.energy(), 1 + 4 + 9 + 16);
        assert_eq!(plan.samples(), &data);
    }

    #[test]
    fn zncc_plan_samples_strided_grid() {
        let data: Vec<u8> = (0..25).collect();
        let tpl = ImageView::from_slice(&data, 5, 5).unwrap();
        let plan = ZnccPlan::from_view(tpl, 2).unwrap();
        assert_eq!(plan.row_samples(), 3);
        assert_eq!(plan.zero_mean().len(), 9);
        // Full mean is 12; first sample is pixel 0.
        assert!((plan.zero_mean()[0] + 12.0).abs() < 1e-12);
        assert!(ZnccPlan::from_view(tpl, 0).is_err());
    }
}
