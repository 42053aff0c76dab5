//! Moment-based shape descriptors for labeled regions.
//!
//! Raw moments are taken with rows as the first axis,
//! `m_pq = Σ row^p · col^q`, so `m10 / m00` is the mean row and `m01 / m00`
//! the mean column.

use crate::label::{Labeling, PixelNode};
use crate::trace::{trace_event, trace_span};

/// Shape descriptors of one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeasureData {
    /// Mean column.
    pub centroid_x: f64,
    /// Mean row.
    pub centroid_y: f64,
    /// Principal-axis angle in radians, `atan2(2 μ11, μ20 - μ02) / 2`;
    /// `π/4` when `μ20 == μ02`.
    pub orientation: f64,
    /// Member pixel count.
    pub area: usize,
    /// Major over minor equivalent radius; `f64::INFINITY` when the minor
    /// radius is zero (lines, single pixels, empty regions).
    pub roundness: f64,
    /// Equivalent radius along the major axis.
    pub major_radius: f64,
    /// Equivalent radius along the minor axis.
    pub minor_radius: f64,
}

/// Measures a single region. Empty input yields `NaN` centroid and
/// infinite roundness.
pub fn measure_region(pixels: &[PixelNode]) -> MeasureData {
    let area = pixels.len();
    if area == 0 {
        return MeasureData {
            centroid_x: f64::NAN,
            centroid_y: f64::NAN,
            orientation: 0.0,
            area: 0,
            roundness: f64::INFINITY,
            major_radius: 0.0,
            minor_radius: 0.0,
        };
    }

    let m00 = area as f64;
    let (m10, m01) = pixels.iter().fold((0.0f64, 0.0f64), |(r, c), p| {
        (r + p.row as f64, c + p.col as f64)
    });
    let mean_row = m10 / m00;
    let mean_col = m01 / m00;

    let mut mu20 = 0.0f64;
    let mut mu02 = 0.0f64;
    let mut mu11 = 0.0f64;
    for p in pixels {
        let dr = p.row as f64 - mean_row;
        let dc = p.col as f64 - mean_col;
        mu20 += dr * dr;
        mu02 += dc * dc;
        mu11 += dr * dc;
    }

    let spread = ((mu20 - mu02).powi(2) + 4.0 * mu11 * mu11).sqrt();
    let a1 = (mu20 + mu02) + spread;
    let a2 = ((mu20 + mu02) - spread).max(0.0);
    let major_radius = (2.0 * a1 / m00).sqrt();
    let minor_radius = (2.0 * a2 / m00).sqrt();

    let orientation = if mu20 == mu02 {
        std::f64::consts::FRAC_PI_4
    } else {
        (2.0 * mu11).atan2(mu20 - mu02) / 2.0
    };
    let roundness = if minor_radius == 0.0 {
        f64::INFINITY
    } else {
        major_radius / minor_radius
    };

    MeasureData {
        centroid_x: mean_col,
        centroid_y: mean_row,
        orientation,
        area,
        roundness,
        major_radius,
        minor_radius,
    }
}

/// Measures every component of a labeling, indexed by component id.
pub fn measure_regions(labeling: &Labeling) -> Vec<MeasureData> {
    let _span = trace_span!("measure_regions", regions = labeling.count).entered();
    let out: Vec<MeasureData> = labeling
        .regions
        .iter()
        .map(|pixels| measure_region(pixels))
        .collect();
    trace_event!("measured", count = out.len());
    out
}
