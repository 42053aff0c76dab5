//! Summed-area tables for O(1) rectangle statistics.
//!
//! `sum[y * width + x]` is the inclusive sum of all samples in
//! `[0, x] x [0, y]`. The optional square table holds the same prefix sums
//! over squared samples. Tables are a snapshot of the source: mutating the
//! source afterwards invalidates them, so they borrow nothing and the caller
//! rebuilds when needed.

use crate::geom::Rect;
use crate::image::ImageView;

/// Prefix-sum tables built once from an 8-bit view.
#[derive(Clone, Debug)]
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    square_sum: Option<Vec<u64>>,
}

impl IntegralImage {
    /// Builds the tables in one row-major pass.
    ///
    /// `sum[r,c] = p + sum[r-1,c] + sum[r,c-1] - sum[r-1,c-1]`, with
    /// out-of-range neighbors read as zero.
    pub fn build(src: ImageView<'_, u8>, include_squares: bool) -> Self {
        let width = src.width();
        let height = src.height();
        let len = width * height;
        let mut sum = vec![0u64; len];
        let mut square_sum = include_squares.then(|| vec![0u64; len]);

        for y in 0..height {
            let Some(row) = src.row(y) else { break };
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                let idx = y * width + x;
                sum[idx] = prefix(&sum, width, x, y, v);
                if let Some(sq) = square_sum.as_mut() {
                    sq[idx] = prefix(sq.as_slice(), width, x, y, v * v);
                }
            }
        }

        Self {
            width,
            height,
            sum,
            square_sum,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true when squared prefix sums were built.
    pub fn has_squares(&self) -> bool {
        self.square_sum.is_some()
    }

    /// Inclusive prefix sums in row-major order.
    pub fn sums(&self) -> &[u64] {
        &self.sum
    }

    /// Clamps a top-left anchored window to the table bounds.
    ///
    /// Returns `None` when nothing of the window overlaps the image.
    pub fn clamp_rect(&self, x: isize, y: isize, width: usize, height: usize) -> Option<Rect> {
        if width == 0 || height == 0 {
            return None;
        }
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = x
            .saturating_add(width as isize - 1)
            .min(self.width as isize - 1);
        let y1 = y
            .saturating_add(height as isize - 1)
            .min(self.height as isize - 1);
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Rect::from_corners(
            x0 as usize,
            y0 as usize,
            x1 as usize,
            y1 as usize,
        ))
    }

    /// Sum over the window `[x, x + width) x [y, y + height)` after clamping.
    pub fn rect_sum(&self, x: isize, y: isize, width: usize, height: usize) -> u64 {
        self.clamp_rect(x, y, width, height)
            .map_or(0, |rect| corner_sum(&self.sum, self.width, rect))
    }

    /// Squared-sample sum over a clamped window, or `None` without squares.
    pub fn rect_square_sum(&self, x: isize, y: isize, width: usize, height: usize) -> Option<u64> {
        let sq = self.square_sum.as_ref()?;
        Some(
            self.clamp_rect(x, y, width, height)
                .map_or(0, |rect| corner_sum(sq, self.width, rect)),
        )
    }

    /// Sum over an already in-bounds rectangle.
    pub fn sum_in(&self, rect: Rect) -> u64 {
        match self.clamp_rect(
            rect.x as isize,
            rect.y as isize,
            rect.width,
            rect.height,
        ) {
            Some(rect) => corner_sum(&self.sum, self.width, rect),
            None => 0,
        }
    }

    /// Sum over the window centered on `(cx, cy)` spanning `half_w`/`half_h`
    /// samples on each side, together with the clamped sample count.
    pub fn centered_sum(&self, cx: usize, cy: usize, half_w: usize, half_h: usize) -> (u64, usize) {
        let x = cx as isize - half_w as isize;
        let y = cy as isize - half_h as isize;
        match self.clamp_rect(x, y, 2 * half_w + 1, 2 * half_h + 1) {
            Some(rect) => (corner_sum(&self.sum, self.width, rect), rect.area()),
            None => (0, 0),
        }
    }
}

#[inline]
fn prefix(table: &[u64], width: usize, x: usize, y: usize, value: u64) -> u64 {
    let up = if y > 0 { table[(y - 1) * width + x] } else { 0 };
    let left = if x > 0 { table[y * width + x - 1] } else { 0 };
    let diag = if x > 0 && y > 0 {
        table[(y - 1) * width + x - 1]
    } else {
        0
    };
    value + up + left - diag
}

/// 4-corner inclusion-exclusion over an in-bounds rectangle.
#[inline]
fn corner_sum(table: &[u64], width: usize, rect: Rect) -> u64 {
    let x0 = rect.x;
    let y0 = rect.y;
    let x1 = rect.x + rect.width - 1;
    let y1 = rect.y + rect.height - 1;

    let d = table[y1 * width + x1];
    let b = if y0 > 0 { table[(y0 - 1) * width + x1] } else { 0 };
    let c = if x0 > 0 { table[y1 * width + x0 - 1] } else { 0 };
    let a = if x0 > 0 && y0 > 0 {
        table[(y0 - 1) * width + x0 - 1]
    } else {
        0
    };
    (d + a) - (b + c)
}
