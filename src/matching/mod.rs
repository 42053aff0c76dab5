//! Sliding-window template matching.
//!
//! Two scoring paths are kept apart on purpose:
//!
//! - [`MatchMethod::Energy`]: `window energy + template energy - 2 * cross`,
//!   with the window energy read from squared prefix sums and the cross term
//!   accumulated per pixel. This is the sum of squared differences, so lower
//!   is better and an exact copy scores `0`.
//! - [`MatchMethod::Zncc`]: zero-mean normalized cross-correlation using
//!   prefix-sum window means and explicit deviations on a strided sample
//!   grid. Higher is better, `1` for an exact copy, `f32::NEG_INFINITY` for
//!   flat windows.
//!
//! Score maps hold one value per placement of the template's top-left corner:
//! `(W - w + 1) x (H - h + 1)`.

use crate::candidate::topk::{Peak, Rank, TopK};
use crate::image::{ImageView, Plane};
use crate::trace::{trace_event, trace_span};
use crate::util::{PlaneScanError, PlaneScanResult};

mod kernel;
mod plan;
#[cfg(feature = "rayon")]
mod rayon;
#[cfg(feature = "simd")]
mod simd;

use kernel::{EnergyKernel, Kernel, Target, ZnccKernel};
use plan::{EnergyPlan, ZnccPlan};

/// Scoring path selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MatchMethod {
    /// Sum of squared differences via prefix-sum energies; lower is better.
    Energy,
    /// Sampled zero-mean normalized cross-correlation; higher is better.
    #[default]
    Zncc,
}

impl MatchMethod {
    /// Whether the best placement has the highest score.
    pub fn higher_is_better(self) -> bool {
        matches!(self, MatchMethod::Zncc)
    }

    fn rank(self) -> Rank {
        if self.higher_is_better() {
            Rank::Highest
        } else {
            Rank::Lowest
        }
    }
}

/// Parameters for [`match_template`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchConfig {
    pub method: MatchMethod,
    /// Sample stride in both axes for [`MatchMethod::Zncc`]. Ignored by
    /// the energy path.
    pub sample_step: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            method: MatchMethod::Zncc,
            sample_step: 2,
        }
    }
}

/// Scores every placement of `template` over `image`.
pub fn match_template(
    image: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    cfg: MatchConfig,
) -> PlaneScanResult<Plane<f32>> {
    check_sizes(image, template)?;
    let _span = trace_span!(
        "match_template",
        width = image.width(),
        height = image.height(),
        tpl_width = template.width(),
        tpl_height = template.height()
    )
    .entered();

    let target = Target::new(image);
    let scores = match cfg.method {
        MatchMethod::Energy => scan::<EnergyKernel>(&target, &EnergyPlan::from_view(template)?),
        MatchMethod::Zncc => scan::<ZnccKernel>(
            &target,
            &ZnccPlan::from_view(template, cfg.sample_step)?,
        ),
    };
    let (out_width, out_height) = target.placements(template.width(), template.height());
    let map = Plane::new(scores, out_width, out_height)?;

    if let Some(best) = best_of(&map, cfg.method) {
        trace_event!("best_match", x = best.x, y = best.y, score = best.score);
    }
    Ok(map)
}

/// Matches multi-channel data channel by channel and averages the maps.
///
/// `image` and `template` must hold the same non-zero number of channels,
/// and all image channels must share one size.
pub fn match_template_channels(
    image: &[ImageView<'_, u8>],
    template: &[ImageView<'_, u8>],
    cfg: MatchConfig,
) -> PlaneScanResult<Plane<f32>> {
    if image.len() != template.len() || image.is_empty() {
        return Err(PlaneScanError::ChannelMismatch {
            expected: image.len(),
            got: template.len(),
        });
    }
    for (views, (first_w, first_h)) in [(image, image[0].dims()), (template, template[0].dims())] {
        if let Some(other) = views.iter().find(|v| v.dims() != (first_w, first_h)) {
            return Err(PlaneScanError::DimensionMismatch {
                expected: (first_w, first_h),
                got: other.dims(),
            });
        }
    }

    let mut acc: Option<Plane<f32>> = None;
    for (&img, &tpl) in image.iter().zip(template) {
        let map = match_template(img, tpl, cfg)?;
        acc = Some(match acc {
            None => map,
            Some(mut sum) => {
                for (s, v) in sum.data_mut().iter_mut().zip(map.data()) {
                    *s += v;
                }
                sum
            }
        });
    }
    let channels = image.len() as f32;
    let sum = acc.ok_or(PlaneScanError::ChannelMismatch {
        expected: image.len(),
        got: 0,
    })?;
    Ok(sum.map(|v| v / channels))
}

/// The `k` best placements of a score map, best first.
///
/// Non-finite scores never qualify. Ties resolve to the smaller row, then
/// the smaller column.
pub fn top_matches(scores: &Plane<f32>, k: usize, method: MatchMethod) -> PlaneScanResult<Vec<Peak>> {
    if k == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "k",
            reason: "must be at least 1",
        });
    }
    let mut topk = TopK::with_rank(k, method.rank());
    let width = scores.width();
    for (idx, &score) in scores.data().iter().enumerate() {
        if score.is_finite() {
            topk.push(Peak {
                x: idx % width,
                y: idx / width,
                score,
            });
        }
    }
    Ok(topk.into_sorted())
}

/// Best placement of a score map, if any score is finite.
pub fn best_match(scores: &Plane<f32>, method: MatchMethod) -> Option<Peak> {
    best_of(scores, method)
}

fn best_of(scores: &Plane<f32>, method: MatchMethod) -> Option<Peak> {
    top_matches(scores, 1, method).ok()?.into_iter().next()
}

fn check_sizes(image: ImageView<'_, u8>, template: ImageView<'_, u8>) -> PlaneScanResult<()> {
    if template.width() > image.width() || template.height() > image.height() {
        return Err(PlaneScanError::TemplateTooLarge {
            tpl_width: template.width(),
            tpl_height: template.height(),
            img_width: image.width(),
            img_height: image.height(),
        });
    }
    Ok(())
}

#[cfg(feature = "rayon")]
fn scan<K: Kernel>(target: &Target<'_>, plan: &K::Plan) -> Vec<f32> {
    rayon::scan_full_par::<K>(target, plan)
}

#[cfg(not(feature = "rayon"))]
fn scan<K: Kernel>(target: &Target<'_>, plan: &K::Plan) -> Vec<f32> {
    kernel::scan_full::<K>(target, plan)
}
