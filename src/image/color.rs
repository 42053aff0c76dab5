//! Three-plane color images and grayscale conversion.

use crate::image::{ImageView, Plane};
use crate::util::{PlaneScanError, PlaneScanResult};

/// Color image stored as three equally sized byte planes (R, G, B).
#[derive(Clone, Debug, PartialEq)]
pub struct ColorPlanes {
    planes: [Plane<u8>; 3],
}

impl ColorPlanes {
    /// Builds a color image from separate channel planes.
    pub fn new(r: Plane<u8>, g: Plane<u8>, b: Plane<u8>) -> PlaneScanResult<Self> {
        r.ensure_same_dims(&g)?;
        r.ensure_same_dims(&b)?;
        Ok(Self { planes: [r, g, b] })
    }

    /// Splits an interleaved `RGBRGB...` buffer into planes.
    pub fn from_interleaved(data: &[u8], width: usize, height: usize) -> PlaneScanResult<Self> {
        let len = crate::image::checked_area(width, height)?;
        let expected = len * 3;
        if data.len() != expected {
            return Err(PlaneScanError::SizeMismatch {
                expected,
                got: data.len(),
            });
        }
        let mut r = Vec::with_capacity(len);
        let mut g = Vec::with_capacity(len);
        let mut b = Vec::with_capacity(len);
        for px in data.chunks_exact(3) {
            r.push(px[0]);
            g.push(px[1]);
            b.push(px[2]);
        }
        Ok(Self {
            planes: [
                Plane::new(r, width, height)?,
                Plane::new(g, width, height)?,
                Plane::new(b, width, height)?,
            ],
        })
    }

    pub fn width(&self) -> usize {
        self.planes[0].width()
    }

    pub fn height(&self) -> usize {
        self.planes[0].height()
    }

    /// Returns the channel planes in R, G, B order.
    pub fn planes(&self) -> &[Plane<u8>; 3] {
        &self.planes
    }

    /// Returns borrowed views of the three channels.
    pub fn views(&self) -> [ImageView<'_, u8>; 3] {
        [
            self.planes[0].view(),
            self.planes[1].view(),
            self.planes[2].view(),
        ]
    }

    /// Converts to luma with fixed-point BT.601 weights.
    ///
    /// `y = (77 r + 150 g + 29 b + 128) >> 8`; integer-only, so repeated
    /// conversions of the same input are bit-identical.
    pub fn to_gray(&self) -> Plane<u8> {
        let [r, g, b] = &self.planes;
        let data = r
            .data()
            .iter()
            .zip(g.data())
            .zip(b.data())
            .map(|((&r, &g), &b)| luma(r, g, b))
            .collect();
        Plane {
            data,
            width: r.width(),
            height: r.height(),
        }
    }
}

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let acc = 77 * u32::from(r) + 150 * u32::from(g) + 29 * u32::from(b) + 128;
    (acc >> 8) as u8
}

#[cfg(test)]
mod tests {
    use super::{luma, ColorPlanes};
    use crate::image::Plane;

    #[test]
    fn luma_maps_extremes() {
        assert_eq!(luma(0, 0, 0), 0);
        assert_eq!(luma(255, 255, 255), 255);
        assert_eq!(luma(255, 0, 0), 77);
    }

    #[test]
    fn interleaved_split_roundtrips_channels() {
        let data = [1u8, 2, 3, 4, 5, 6];
        let color = ColorPlanes::from_interleaved(&data, 2, 1).unwrap();
        assert_eq!(color.planes()[0].data(), &[1, 4]);
        assert_eq!(color.planes()[1].data(), &[2, 5]);
        assert_eq!(color.planes()[2].data(), &[3, 6]);
    }

    #[test]
    fn new_rejects_mismatched_planes() {
        let a = Plane::filled(2, 2, 0u8).unwrap();
        let b = Plane::filled(3, 2, 0u8).unwrap();
        assert!(ColorPlanes::new(a.clone(), a, b).is_err());
    }
}
