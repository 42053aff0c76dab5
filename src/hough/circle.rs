//! Circle Hough transform over a radius range.
//!
//! Every foreground pixel votes, for each radius, for the centers
//! `(x - r cos θ, y - r sin θ)` with `θ` in whole degrees `[0, 360)`.
//! Center votes that fall outside the image are discarded.

use crate::geom::Vec3i;
use crate::hough::{checked_cells, foreground_points};
use crate::image::{ImageView, Plane};
use crate::trace::{trace_event, trace_span};
use crate::util::math::{round_i64, trig_tables};
use crate::util::{PlaneScanError, PlaneScanResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

const ANGLE_STEPS: usize = 360;

/// How centers are extracted from each radius' accumulator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CircleMode {
    /// The single best center per radius (first in raster order on ties).
    #[default]
    MaxOnly,
    /// Every center with strictly more than `threshold` votes.
    Accumulate { threshold: u32 },
}

/// Parameters for [`detect_circles`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoughCircleConfig {
    pub min_radius: usize,
    /// Inclusive.
    pub max_radius: usize,
    pub mode: CircleMode,
}

impl Default for HoughCircleConfig {
    fn default() -> Self {
        Self {
            min_radius: 5,
            max_radius: 20,
            mode: CircleMode::MaxOnly,
        }
    }
}

/// Center votes for a single radius, as a plane the size of `src`.
pub fn circle_votes(src: ImageView<'_, u8>, radius: usize) -> PlaneScanResult<Plane<u32>> {
    if radius == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "radius",
            reason: "must be at least 1",
        });
    }
    let points = foreground_points(src)?;
    let (cos, sin) = trig_tables(ANGLE_STEPS);
    let votes = vote_radius(&points, src.width(), src.height(), radius, &cos, &sin)?;
    Plane::new(votes, src.width(), src.height())
}

/// Detects circles in a binary view.
///
/// Results are ordered by radius, then by center in raster order. A radius
/// without any in-image vote contributes nothing.
pub fn detect_circles(
    src: ImageView<'_, u8>,
    cfg: HoughCircleConfig,
) -> PlaneScanResult<Vec<Vec3i>> {
    validate(&cfg, src.width(), src.height())?;
    let _span = trace_span!(
        "hough_circles",
        width = src.width(),
        height = src.height(),
        min_radius = cfg.min_radius,
        max_radius = cfg.max_radius
    )
    .entered();

    let points = foreground_points(src)?;
    let (cos, sin) = trig_tables(ANGLE_STEPS);
    let (width, height) = (src.width(), src.height());
    let per_radius = |radius: usize| -> PlaneScanResult<Vec<Vec3i>> {
        let votes = vote_radius(&points, width, height, radius, &cos, &sin)?;
        Ok(extract_centers(&votes, width, radius, cfg.mode))
    };

    #[cfg(feature = "rayon")]
    let found: Vec<Vec<Vec3i>> = (cfg.min_radius..=cfg.max_radius)
        .into_par_iter()
        .map(per_radius)
        .collect::<PlaneScanResult<_>>()?;
    #[cfg(not(feature = "rayon"))]
    let found: Vec<Vec<Vec3i>> = (cfg.min_radius..=cfg.max_radius)
        .map(per_radius)
        .collect::<PlaneScanResult<_>>()?;

    let circles: Vec<Vec3i> = found.into_iter().flatten().collect();
    trace_event!("circles", count = circles.len());
    Ok(circles)
}

fn validate(cfg: &HoughCircleConfig, width: usize, height: usize) -> PlaneScanResult<()> {
    if cfg.min_radius == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "min_radius",
            reason: "must be at least 1",
        });
    }
    if cfg.min_radius > cfg.max_radius {
        return Err(PlaneScanError::InvalidParameter {
            name: "max_radius",
            reason: "must not be smaller than min_radius",
        });
    }
    if cfg.max_radius > width.max(height) {
        return Err(PlaneScanError::InvalidParameter {
            name: "max_radius",
            reason: "must not exceed the larger image dimension",
        });
    }
    Ok(())
}

fn vote_radius(
    points: &[(usize, usize)],
    width: usize,
    height: usize,
    radius: usize,
    cos: &[f64],
    sin: &[f64],
) -> PlaneScanResult<Vec<u32>> {
    let mut votes = vec![0u32; checked_cells(width, height)?];
    let r = radius as f64;
    // Offsets depend only on the radius.
    let offsets: Vec<(i64, i64)> = cos
        .iter()
        .zip(sin)
        .map(|(&c, &s)| (round_i64(r * c), round_i64(r * s)))
        .collect();
    for &(x, y) in points {
        for &(dx, dy) in &offsets {
            let cx = x as i64 - dx;
            let cy = y as i64 - dy;
            if cx < 0 || cy < 0 || cx >= width as i64 || cy >= height as i64 {
                continue;
            }
            votes[cy as usize * width + cx as usize] += 1;
        }
    }
    Ok(votes)
}

fn extract_centers(votes: &[u32], width: usize, radius: usize, mode: CircleMode) -> Vec<Vec3i> {
    let at = |idx: usize| Vec3i {
        x: (idx % width) as i32,
        y: (idx / width) as i32,
        radius: radius as i32,
    };
    match mode {
        CircleMode::MaxOnly => {
            let mut best: Option<(usize, u32)> = None;
            for (idx, &v) in votes.iter().enumerate() {
                if v > 0 && best.map_or(true, |(_, b)| v > b) {
                    best = Some((idx, v));
                }
            }
            best.map(|(idx, _)| vec![at(idx)]).unwrap_or_default()
        }
        CircleMode::Accumulate { threshold } => votes
            .iter()
            .enumerate()
            .filter(|&(_, &v)| v > threshold)
            .map(|(idx, _)| at(idx))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::{circle_votes, detect_circles, CircleMode, HoughCircleConfig};
    use crate::image::Plane;

    fn ring(size: usize, cx: f64, cy: f64, r: f64) -> Plane<u8> {
        let mut img = Plane::filled(size, size, 0u8).unwrap();
        for deg in 0..360 {
            let t = (deg as f64).to_radians();
            let x = (cx + r * t.cos()).round() as usize;
            let y = (cy + r * t.sin()).round() as usize;
            *img.get_mut(x, y).unwrap() = 255;
        }
        img
    }

    #[test]
    fn ring_center_gets_the_most_votes() {
        let img = ring(48, 24.0, 20.0, 9.0);
        let circles = detect_circles(
            img.view(),
            HoughCircleConfig {
                min_radius: 9,
                max_radius: 9,
                mode: CircleMode::MaxOnly,
            },
        )
        .unwrap();
        assert_eq!(circles.len(), 1);
        let c = circles[0];
        assert_eq!(c.radius, 9);
        assert!((c.x - 24).abs() <= 1 && (c.y - 20).abs() <= 1, "{c:?}");
    }

    #[test]
    fn single_pixel_votes_form_a_ring() {
        let mut img = Plane::filled(21, 21, 0u8).unwrap();
        *img.get_mut(10, 10).unwrap() = 255;
        let votes = circle_votes(img.view(), 5).unwrap();
        assert!(*votes.get(15, 10).unwrap() > 0);
        assert!(*votes.get(10, 5).unwrap() > 0);
        assert_eq!(*votes.get(10, 10).unwrap(), 0);
    }

    #[test]
    fn accumulate_mode_applies_threshold() {
        let img = ring(40, 20.0, 20.0, 8.0);
        let strict = detect_circles(
            img.view(),
            HoughCircleConfig {
                min_radius: 8,
                max_radius: 8,
                mode: CircleMode::Accumulate { threshold: u32::MAX - 1 },
            },
        )
        .unwrap();
        assert!(strict.is_empty());
        let loose = detect_circles(
            img.view(),
            HoughCircleConfig {
                min_radius: 8,
                max_radius: 8,
                mode: CircleMode::Accumulate { threshold: 0 },
            },
        )
        .unwrap();
        assert!(loose.len() > 1);
        assert!(loose.iter().all(|c| c.radius == 8));
    }

    #[test]
    fn radius_range_is_validated() {
        let img = Plane::filled(10, 10, 0u8).unwrap();
        let bad = |min_radius, max_radius| {
            detect_circles(
                img.view(),
                HoughCircleConfig {
                    min_radius,
                    max_radius,
                    mode: CircleMode::MaxOnly,
                },
            )
            .is_err()
        };
        assert!(bad(0, 3));
        assert!(bad(5, 4));
        assert!(bad(2, 11));
        assert!(!bad(1, 10));
    }
}
