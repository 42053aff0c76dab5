//! Row-parallel score scan (feature-gated).
//!
//! Each placement row is scored by one worker into its own buffer; rows are
//! concatenated in order afterwards, so the result equals the sequential scan.

use crate::matching::kernel::{scan_row, Kernel, Target};
use rayon::prelude::*;

pub(crate) fn scan_full_par<K: Kernel>(target: &Target<'_>, plan: &K::Plan) -> Vec<f32> {
    let (tpl_width, tpl_height) = K::dims(plan);
    let (out_width, out_height) = target.placements(tpl_width, tpl_height);

    let rows: Vec<Vec<f32>> = (0..out_height)
        .into_par_iter()
        .map(|y| scan_row::<K>(target, plan, y))
        .collect();

    let mut scores = Vec::with_capacity(out_width * out_height);
    for row in rows {
        scores.extend(row);
    }
    scores
}
