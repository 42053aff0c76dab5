//! Hough-transform voting for lines and circles on binary planes.
//!
//! Foreground is `255`. Coordinates follow image convention: `x` is the
//! column, `y` the row. Votes are counted in `u32` cells; inputs whose
//! foreground could overflow a cell, and accumulators that would not fit in
//! memory, are rejected up front.

use crate::image::{ImageView, FOREGROUND};
use crate::util::{PlaneScanError, PlaneScanResult};

mod circle;
mod line;

pub use circle::{circle_votes, detect_circles, CircleMode, HoughCircleConfig};
pub use line::{detect_lines, line_accumulator, HoughLineConfig, LineAccumulator, THETA_BINS};

/// Foreground pixel coordinates `(x, y)` in raster order.
pub(crate) fn foreground_points(src: ImageView<'_, u8>) -> PlaneScanResult<Vec<(usize, usize)>> {
    let mut points = Vec::new();
    for y in 0..src.height() {
        let Some(row) = src.row(y) else { break };
        for (x, &v) in row.iter().enumerate() {
            if v == FOREGROUND {
                points.push((x, y));
            }
        }
    }
    if points.len() as u64 > u64::from(u32::MAX) {
        return Err(PlaneScanError::AccumulatorTooLarge {
            cells: points.len() as u128,
        });
    }
    Ok(points)
}

/// Cell count `a * b`, rejected when it cannot be allocated.
pub(crate) fn checked_cells(a: usize, b: usize) -> PlaneScanResult<usize> {
    let cells = a as u128 * b as u128;
    if cells > isize::MAX as u128 / std::mem::size_of::<u32>() as u128 {
        return Err(PlaneScanError::AccumulatorTooLarge { cells });
    }
    Ok(cells as usize)
}
