//! Straight-line Hough transform.
//!
//! Lines are parameterized as `rho = x cos(theta) + y sin(theta)` with
//! `theta` in whole degrees `[0, 180)`. Rho spans `[-D, D]` where
//! `D = ceil(sqrt(W^2 + H^2))`, stored with an offset of `D` rows.

use crate::candidate::topk::{Peak, TopK};
use crate::geom::Line;
use crate::hough::{checked_cells, foreground_points};
use crate::image::{ImageView, Plane};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{diagonal_ceil, round_i64, trig_tables};
use crate::util::{PlaneScanError, PlaneScanResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Number of angle bins (one per degree).
pub const THETA_BINS: usize = 180;

/// Parameters for [`detect_lines`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HoughLineConfig {
    /// Accumulator cells considered for back-projection.
    pub top_k: usize,
    /// Minimum normalized vote (`0..=255`) for a cell to be considered.
    pub min_score: u8,
    /// Candidates whose slope differs from an already kept line by less than
    /// this are dropped.
    pub slope_tolerance: f64,
    /// Minimum foreground pixels on a back-projected segment.
    pub min_points: usize,
}

impl Default for HoughLineConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            min_score: 1,
            slope_tolerance: 0.1,
            min_points: 2,
        }
    }
}

/// Vote counts over `(theta, rho)`.
#[derive(Clone, Debug)]
pub struct LineAccumulator {
    /// `THETA_BINS` columns by `2 * rho_max + 1` rows.
    votes: Plane<u32>,
    rho_max: usize,
}

impl LineAccumulator {
    /// Raw votes; column is theta in degrees, row is `rho + rho_max`.
    pub fn votes(&self) -> &Plane<u32> {
        &self.votes
    }

    pub fn rho_max(&self) -> usize {
        self.rho_max
    }

    /// Votes at `(theta, rho)`, zero outside the accumulator.
    pub fn votes_at(&self, theta: usize, rho: i64) -> u32 {
        let row = rho + self.rho_max as i64;
        if row < 0 {
            return 0;
        }
        self.votes.get(theta, row as usize).copied().unwrap_or(0)
    }

    /// Votes rescaled to `[0, 255]` by the maximum cell.
    pub fn normalized(&self) -> Plane<u8> {
        let max = u64::from(self.votes.data().iter().copied().max().unwrap_or(0));
        if max == 0 {
            return self.votes.map(|_| 0u8);
        }
        self.votes.map(|v| (u64::from(v) * 255 / max) as u8)
    }
}

/// Builds the vote accumulator for the foreground of `src`.
pub fn line_accumulator(src: ImageView<'_, u8>) -> PlaneScanResult<LineAccumulator> {
    let points = foreground_points(src)?;
    let rho_max = diagonal_ceil(src.width(), src.height());
    let (cos, sin) = trig_tables(THETA_BINS);
    vote_lines(&points, rho_max, &cos, &sin)
}

/// Detects straight segments in a binary view.
///
/// The top-K accumulator cells are back-projected by rescanning foreground
/// pixels that fall on the same `(rho, theta)`; the segment runs between the
/// extreme pixels ordered by `x` (then `y`). Candidates are visited best
/// first and a candidate is dropped when its slope is within
/// `slope_tolerance` of a kept line; two vertical (`NaN` slope) segments
/// count as equal slopes. The kept line is the first-seen one, not a merge.
pub fn detect_lines(src: ImageView<'_, u8>, cfg: HoughLineConfig) -> PlaneScanResult<Vec<Line>> {
    if cfg.top_k == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "top_k",
            reason: "must be at least 1",
        });
    }
    if !(cfg.slope_tolerance >= 0.0) {
        return Err(PlaneScanError::InvalidParameter {
            name: "slope_tolerance",
            reason: "must be non-negative",
        });
    }
    let _span = trace_span!(
        "hough_lines",
        width = src.width(),
        height = src.height(),
        top_k = cfg.top_k
    )
    .entered();

    let points = foreground_points(src)?;
    let rho_max = diagonal_ceil(src.width(), src.height());
    let (cos, sin) = trig_tables(THETA_BINS);
    let acc = vote_lines(&points, rho_max, &cos, &sin)?;
    let normalized = acc.normalized();

    let mut topk = TopK::new(cfg.top_k);
    for (idx, (&votes, &norm)) in acc.votes.data().iter().zip(normalized.data()).enumerate() {
        if votes == 0 || norm < cfg.min_score {
            continue;
        }
        topk.push(Peak {
            x: idx % THETA_BINS,
            y: idx / THETA_BINS,
            score: votes as f32,
        });
    }

    let mut lines: Vec<Line> = Vec::new();
    for peak in topk.into_sorted() {
        let rho = peak.y as i64 - rho_max as i64;
        let Some(line) = back_project(&points, rho, cos[peak.x], sin[peak.x], cfg.min_points)
        else {
            continue;
        };
        let slope = line.slope();
        if lines
            .iter()
            .any(|kept| same_slope(kept.slope(), slope, cfg.slope_tolerance))
        {
            continue;
        }
        lines.push(line);
    }

    trace_event!("lines", count = lines.len());
    Ok(lines)
}

fn same_slope(a: f64, b: f64, tolerance: f64) -> bool {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => true,
        (false, false) => (a - b).abs() < tolerance,
        _ => false,
    }
}

fn back_project(
    points: &[(usize, usize)],
    rho: i64,
    cos: f64,
    sin: f64,
    min_points: usize,
) -> Option<Line> {
    let mut lo: Option<(usize, usize)> = None;
    let mut hi: Option<(usize, usize)> = None;
    let mut count = 0usize;
    for &(x, y) in points {
        if round_i64(x as f64 * cos + y as f64 * sin) != rho {
            continue;
        }
        count += 1;
        if lo.map_or(true, |p| (x, y) < p) {
            lo = Some((x, y));
        }
        if hi.map_or(true, |p| (x, y) > p) {
            hi = Some((x, y));
        }
    }
    if count < min_points.max(1) {
        return None;
    }
    let (x1, y1) = lo?;
    let (x2, y2) = hi?;
    Some(Line::new(x1 as i32, y1 as i32, x2 as i32, y2 as i32))
}

#[inline]
fn vote_point(votes: &mut [u32], rho_max: usize, x: usize, y: usize, cos: &[f64], sin: &[f64]) {
    let (xf, yf) = (x as f64, y as f64);
    for theta in 0..THETA_BINS {
        let rho = round_i64(xf * cos[theta] + yf * sin[theta]);
        let row = rho + rho_max as i64;
        if row < 0 || row > 2 * rho_max as i64 {
            continue;
        }
        votes[row as usize * THETA_BINS + theta] += 1;
    }
}

#[cfg(not(feature = "rayon"))]
fn vote_lines(
    points: &[(usize, usize)],
    rho_max: usize,
    cos: &[f64],
    sin: &[f64],
) -> PlaneScanResult<LineAccumulator> {
    let rows = 2 * rho_max + 1;
    let cells = checked_cells(rows, THETA_BINS)?;
    let mut votes = vec![0u32; cells];
    for &(x, y) in points {
        vote_point(&mut votes, rho_max, x, y, cos, sin);
    }
    Ok(LineAccumulator {
        votes: Plane::new(votes, THETA_BINS, rows)?,
        rho_max,
    })
}

/// Each worker votes a chunk of points into a private accumulator; the
/// private accumulators are summed afterwards.
#[cfg(feature = "rayon")]
fn vote_lines(
    points: &[(usize, usize)],
    rho_max: usize,
    cos: &[f64],
    sin: &[f64],
) -> PlaneScanResult<LineAccumulator> {
    let rows = 2 * rho_max + 1;
    let cells = checked_cells(rows, THETA_BINS)?;
    let chunk = (points.len() / rayon::current_num_threads().max(1)).max(256);
    let votes = points
        .par_chunks(chunk)
        .map(|part| {
            let mut local = vec![0u32; cells];
            for &(x, y) in part {
                vote_point(&mut local, rho_max, x, y, cos, sin);
            }
            local
        })
        .reduce(
            || vec![0u32; cells],
            |mut acc, local| {
                for (a, b) in acc.iter_mut().zip(local) {
                    *a += b;
                }
                acc
            },
        );
    Ok(LineAccumulator {
        votes: Plane::new(votes, THETA_BINS, rows)?,
        rho_max,
    })
}
