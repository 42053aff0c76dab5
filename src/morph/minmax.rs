//! Separable min/max filtering with edge replication.

use crate::morph::StructuringElement;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Extremum {
    Min,
    Max,
}

impl Extremum {
    #[inline]
    fn identity(self) -> u8 {
        match self {
            Extremum::Min => u8::MAX,
            Extremum::Max => u8::MIN,
        }
    }

    #[inline]
    fn combine(self, a: u8, b: u8) -> u8 {
        match self {
            Extremum::Min => a.min(b),
            Extremum::Max => a.max(b),
        }
    }
}

/// One full pass: horizontal window into `scratch`, then vertical window
/// over `scratch` into `dst`. `src` is never written.
pub(crate) fn filter_pass(
    src: &[u8],
    scratch: &mut [u8],
    dst: &mut [u8],
    width: usize,
    height: usize,
    se: StructuringElement,
    op: Extremum,
) {
    let (low_x, low_y) = se.anchor();
    let cols = se.cols();
    let rows = se.rows();

    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        let out = &mut scratch[y * width..(y + 1) * width];
        for (x, slot) in out.iter_mut().enumerate() {
            let mut acc = op.identity();
            for k in 0..cols {
                let sx = clamp_index(x as isize + k as isize - low_x as isize, width);
                acc = op.combine(acc, row[sx]);
            }
            *slot = acc;
        }
    }

    for y in 0..height {
        for x in 0..width {
            let mut acc = op.identity();
            for k in 0..rows {
                let sy = clamp_index(y as isize + k as isize - low_y as isize, height);
                acc = op.combine(acc, scratch[sy * width + x]);
            }
            dst[y * width + x] = acc;
        }
    }
}

#[inline]
fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::{filter_pass, Extremum};
    use crate::morph::StructuringElement;

    #[test]
    fn max_pass_spreads_single_pixel() {
        let mut src = vec![0u8; 25];
        src[12] = 9;
        let mut scratch = vec![0u8; 25];
        let mut dst = vec![0u8; 25];
        let se = StructuringElement::square(3).unwrap();
        filter_pass(&src, &mut scratch, &mut dst, 5, 5, se, Extremum::Max);
        for y in 0..5 {
            for x in 0..5 {
                let expected = if (1..=3).contains(&x) && (1..=3).contains(&y) {
                    9
                } else {
                    0
                };
                assert_eq!(dst[y * 5 + x], expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn even_width_window_extends_to_low_side() {
        // cols = 2: window is [x - 1, x].
        let src = vec![0u8, 0, 7, 0, 0];
        let mut scratch = vec![0u8; 5];
        let mut dst = vec![0u8; 5];
        let se = StructuringElement::new(2, 1).unwrap();
        filter_pass(&src, &mut scratch, &mut dst, 5, 1, se, Extremum::Max);
        assert_eq!(dst, vec![0, 0, 7, 7, 0]);
    }

    #[test]
    fn min_pass_replicates_edges() {
        let src = vec![5u8, 9, 9, 9];
        let mut scratch = vec![0u8; 4];
        let mut dst = vec![0u8; 4];
        let se = StructuringElement::new(3, 1).unwrap();
        filter_pass(&src, &mut scratch, &mut dst, 4, 1, se, Extremum::Min);
        assert_eq!(dst, vec![5, 5, 9, 9]);
    }
}
