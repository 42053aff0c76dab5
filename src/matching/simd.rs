//! `wide`-vectorized inner loops for template scoring.
//!
//! Products of 8-bit samples are accumulated in `f32x8` lanes. Each lane
//! stays an exact integer while it holds fewer than 2^24 / 255^2 products,
//! so rows narrower than 2048 pixels produce exactly the scalar result.

use wide::f32x8;

const LANES: usize = 8;

/// Load 8 u8 values and convert to f32x8.
#[inline]
fn load_u8x8_as_f32x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

/// Lane-wise sum, each lane converted to an integer first.
#[inline]
fn hsum_u64(v: f32x8) -> u64 {
    v.to_array().iter().map(|&lane| lane as u64).sum()
}

/// Dot product of two equally long 8-bit rows.
pub(crate) fn dot_u8(a: &[u8], b: &[u8]) -> u64 {
    let len = a.len().min(b.len());
    let simd_end = len / LANES * LANES;

    let mut acc = f32x8::ZERO;
    let mut i = 0;
    while i < simd_end {
        acc += load_u8x8_as_f32x8(&a[i..]) * load_u8x8_as_f32x8(&b[i..]);
        i += LANES;
    }

    let mut tail = 0u64;
    while i < len {
        tail += u64::from(a[i]) * u64::from(b[i]);
        i += 1;
    }
    hsum_u64(acc) + tail
}

#[cfg(test)]
mod tests {
    use super::dot_u8;

    #[test]
    fn dot_matches_scalar_with_remainder() {
        let a: Vec<u8> = (0..29).map(|i| (i * 9 % 256) as u8).collect();
        let b: Vec<u8> = (0..29).map(|i| (255 - i * 7 % 256) as u8).collect();
        let expected: u64 = a
            .iter()
            .zip(&b)
            .map(|(&x, &y)| u64::from(x) * u64::from(y))
            .sum();
        assert_eq!(dot_u8(&a, &b), expected);
    }

    #[test]
    fn saturated_row_is_exact() {
        let a = vec![255u8; 256];
        assert_eq!(dot_u8(&a, &a), 256 * 255 * 255);
    }
}
