//! Small numeric helpers shared by the Hough detectors.

/// Cosine/sine lookup tables for integer degree steps `0..steps`.
pub(crate) fn trig_tables(steps: usize) -> (Vec<f64>, Vec<f64>) {
    let mut cos = Vec::with_capacity(steps);
    let mut sin = Vec::with_capacity(steps);
    for deg in 0..steps {
        let (s, c) = (deg as f64).to_radians().sin_cos();
        cos.push(c);
        sin.push(s);
    }
    (cos, sin)
}

/// Rounds half away from zero and converts to `i64`.
#[inline]
pub(crate) fn round_i64(value: f64) -> i64 {
    value.round() as i64
}

/// Diagonal length of a `width x height` grid, rounded up.
pub(crate) fn diagonal_ceil(width: usize, height: usize) -> usize {
    let w = width as f64;
    let h = height as f64;
    (w * w + h * h).sqrt().ceil() as usize
}
