//! Histogram-derived global cutoffs.
//!
//! Every method returns a cutoff `t` with the convention used by
//! [`apply_binary`](super::apply_binary): samples `<= t` are background and
//! samples `> t` are foreground.

use crate::image::ImageView;

/// Number of intensity bins for 8-bit samples.
pub const BINS: usize = 256;

/// Hard cap on mean-shift refinement rounds.
pub(crate) const MEAN_SHIFT_MAX_ITERS: usize = 256;

/// Counts samples per intensity.
pub fn histogram(src: ImageView<'_, u8>) -> [u32; BINS] {
    let mut hist = [0u32; BINS];
    for y in 0..src.height() {
        if let Some(row) = src.row(y) {
            for &v in row {
                hist[v as usize] += 1;
            }
        }
    }
    hist
}

/// Mean intensity, rounded down.
pub fn mean_cutoff(hist: &[u32; BINS]) -> u8 {
    let (count, sum) = class_stats(hist, 0, BINS - 1);
    if count == 0 {
        return 0;
    }
    (sum / count) as u8
}

/// Otsu's cutoff: minimizes `w_bg * var_bg + w_fg * var_fg`.
///
/// Equal minima form a plateau (two perfectly separated populations give
/// zero within-class variance for every cutoff between them); the midpoint
/// of the first plateau is returned. A single-valued histogram returns that
/// value.
pub fn otsu_cutoff(hist: &[u32; BINS]) -> u8 {
    let total: f64 = hist.iter().map(|&c| f64::from(c)).sum();
    let total_sum: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * f64::from(c))
        .sum();
    let total_sq: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| (i * i) as f64 * f64::from(c))
        .sum();

    let mut w_bg = 0.0f64;
    let mut sum_bg = 0.0f64;
    let mut sq_bg = 0.0f64;
    let mut best = f64::INFINITY;
    let mut first = None::<usize>;
    let mut last = 0usize;

    for (t, &count) in hist.iter().enumerate() {
        let c = f64::from(count);
        w_bg += c;
        sum_bg += t as f64 * c;
        sq_bg += (t * t) as f64 * c;
        let w_fg = total - w_bg;
        if w_bg == 0.0 || w_fg == 0.0 {
            continue;
        }

        let mean_bg = sum_bg / w_bg;
        let mean_fg = (total_sum - sum_bg) / w_fg;
        let var_bg = (sq_bg / w_bg - mean_bg * mean_bg).max(0.0);
        let var_fg = ((total_sq - sq_bg) / w_fg - mean_fg * mean_fg).max(0.0);
        let within = w_bg * var_bg + w_fg * var_fg;

        let tol = if best.is_finite() {
            1e-9 * best.abs().max(1.0)
        } else {
            0.0
        };
        if first.is_none() || within < best - tol {
            best = within;
            first = Some(t);
            last = t;
        } else if (within - best).abs() <= tol && first.is_some() && last + 1 == t {
            last = t;
        }
    }

    match first {
        Some(first) => ((first + last) / 2) as u8,
        None => hist.iter().position(|&c| c > 0).unwrap_or(0) as u8,
    }
}

/// Triangle (Zack) cutoff.
///
/// Draws a line from the histogram peak to the far end of the longer tail and
/// picks the bin with maximal perpendicular distance below it. When the peak
/// sits closer to the low end the histogram is mirrored first and the result
/// mirrored back.
pub fn triangle_cutoff(hist: &[u32; BINS]) -> u8 {
    let Some(first) = hist.iter().position(|&c| c > 0) else {
        return 0;
    };
    let last = hist.iter().rposition(|&c| c > 0).unwrap_or(first);

    let mut left = first.saturating_sub(1) as i64;
    let right = (last + 1).min(BINS - 1) as i64;

    let mut max_ind = 0usize;
    for (i, &c) in hist.iter().enumerate() {
        if c > hist[max_ind] {
            max_ind = i;
        }
    }
    let mut max_ind = max_ind as i64;

    let mut h: Vec<i64> = hist.iter().map(|&c| i64::from(c)).collect();
    let flip = max_ind - left < right - max_ind;
    if flip {
        h.reverse();
        left = BINS as i64 - 1 - right;
        max_ind = BINS as i64 - 1 - max_ind;
    }

    let mut thresh = left;
    let a = h[max_ind as usize];
    let b = left - max_ind;
    let mut dist = 0i64;
    for i in (left + 1)..=max_ind {
        let d = a * i + b * h[i as usize];
        if d > dist {
            dist = d;
            thresh = i;
        }
    }
    thresh -= 1;

    if flip {
        thresh = BINS as i64 - 1 - thresh;
    }
    thresh.clamp(0, BINS as i64 - 1) as u8
}

/// Iterative intermeans (mean-shift) cutoff.
///
/// Starts at 127 and moves the cutoff to the midpoint of the two class means
/// until it stops changing. An empty class contributes the current cutoff as
/// its mean. Returns the cutoff and the number of rounds taken.
pub fn mean_shift_cutoff(hist: &[u32; BINS]) -> (u8, usize) {
    let mut t = 127usize;
    for round in 1..=MEAN_SHIFT_MAX_ITERS {
        let (lo_count, lo_sum) = class_stats(hist, 0, t);
        let (hi_count, hi_sum) = class_stats(hist, t + 1, BINS - 1);
        let lo_mean = if lo_count == 0 { t as u64 } else { lo_sum / lo_count };
        let hi_mean = if hi_count == 0 { t as u64 } else { hi_sum / hi_count };
        let next = ((lo_mean + hi_mean) / 2) as usize;
        if next == t {
            return (t as u8, round);
        }
        t = next;
    }
    (t as u8, MEAN_SHIFT_MAX_ITERS)
}

/// Sample count and intensity sum over the inclusive bin range `[lo, hi]`.
fn class_stats(hist: &[u32; BINS], lo: usize, hi: usize) -> (u64, u64) {
    if lo > hi {
        return (0, 0);
    }
    hist[lo..=hi]
        .iter()
        .enumerate()
        .fold((0u64, 0u64), |(count, sum), (i, &c)| {
            let c = u64::from(c);
            (count + c, sum + (lo + i) as u64 * c)
        })
}
