//! Peeling distance transform and ridge skeleton.

use crate::image::{ImageView, Plane, FOREGROUND};
use crate::threshold::binary;
use crate::trace::{trace_event, trace_span};
use crate::util::PlaneScanResult;

/// Upper bound on peeling rounds; real inputs converge in
/// `ceil(min(width, height) / 2)` rounds.
pub const DISTANCE_MAX_ROUNDS: usize = u16::MAX as usize;

const NEIGHBORS4: [(isize, isize); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// City-block distance levels by iterative peeling.
///
/// Each round removes every remaining foreground pixel that has a background
/// (or out-of-image) 4-neighbor and records the round number as its level.
/// Rounds repeat until nothing is removed. Background pixels stay at 0, so
/// boundary foreground pixels carry level 1.
pub fn distance_transform(src: ImageView<'_, u8>) -> PlaneScanResult<Plane<u16>> {
    let width = src.width();
    let height = src.height();
    let _span = trace_span!("distance_transform", width = width, height = height).entered();

    let mut alive = Vec::with_capacity(width * height);
    for y in 0..height {
        if let Some(row) = src.row(y) {
            alive.extend(row.iter().map(|&v| v == FOREGROUND));
        }
    }
    let mut levels = Plane::filled(width, height, 0u16)?;
    let mut peel = Vec::new();
    let max_rounds = DISTANCE_MAX_ROUNDS.min(width.max(height) + 1);
    let mut rounds = 0usize;

    for level in 1..=max_rounds {
        peel.clear();
        for y in 0..height {
            for x in 0..width {
                let idx = y * width + x;
                if alive[idx] && touches_background(&alive, width, height, x, y) {
                    peel.push(idx);
                }
            }
        }
        if peel.is_empty() {
            break;
        }
        let data = levels.data_mut();
        for &idx in &peel {
            alive[idx] = false;
            data[idx] = level as u16;
        }
        rounds = level;
    }

    trace_event!("distance_rounds", rounds = rounds);
    Ok(levels)
}

/// Distance levels rescaled to `[0, 255]` (`level * 255 / max_level`).
pub fn distance_transform_u8(src: ImageView<'_, u8>) -> PlaneScanResult<Plane<u8>> {
    let levels = distance_transform(src)?;
    let max = levels.data().iter().copied().max().unwrap_or(0);
    if max == 0 {
        return Ok(levels.map(|_| 0u8));
    }
    let max = u32::from(max);
    Ok(levels.map(|v| (u32::from(v) * 255 / max) as u8))
}

/// Keeps foreground pixels whose distance level is at least that of every
/// in-image 4-neighbor.
pub fn skeleton(src: ImageView<'_, u8>) -> PlaneScanResult<Plane<u8>> {
    let _span = trace_span!("skeleton").entered();
    let levels = distance_transform(src)?;
    let width = levels.width();
    let height = levels.height();
    let dist = levels.data();

    let mut out = Plane::filled(width, height, 0u8)?;
    let mut kept = 0usize;
    for y in 0..height {
        for x in 0..width {
            let d = dist[y * width + x];
            if d == 0 {
                continue;
            }
            let ridge = NEIGHBORS4.iter().all(|&(dx, dy)| {
                neighbor(width, height, x, y, dx, dy).map_or(true, |n| d >= dist[n])
            });
            if ridge {
                out.data_mut()[y * width + x] = binary(true);
                kept += 1;
            }
        }
    }

    trace_event!("skeleton_pixels", count = kept);
    Ok(out)
}

#[inline]
fn neighbor(width: usize, height: usize, x: usize, y: usize, dx: isize, dy: isize) -> Option<usize> {
    let nx = x as isize + dx;
    let ny = y as isize + dy;
    if nx < 0 || ny < 0 || nx >= width as isize || ny >= height as isize {
        return None;
    }
    Some(ny as usize * width + nx as usize)
}

#[inline]
fn touches_background(alive: &[bool], width: usize, height: usize, x: usize, y: usize) -> bool {
    NEIGHBORS4
        .iter()
        .any(|&(dx, dy)| neighbor(width, height, x, y, dx, dy).map_or(true, |n| !alive[n]))
}

#[cfg(test)]
mod tests {
    use super::{distance_transform, distance_transform_u8, skeleton};
    use crate::image::Plane;

    fn bar(width: usize, height: usize, y0: usize, y1: usize) -> Plane<u8> {
        let mut data = vec![0u8; width * height];
        for y in y0..=y1 {
            for x in 1..width - 1 {
                data[y * width + x] = 255;
            }
        }
        Plane::new(data, width, height).unwrap()
    }

    #[test]
    fn levels_grow_toward_center() {
        // Rows 1..=5 set: levels per column interior are 1,2,3,2,1.
        let img = bar(20, 7, 1, 5);
        let levels = distance_transform(img.view()).unwrap();
        let column: Vec<u16> = (0..7).map(|y| *levels.get(10, y).unwrap()).collect();
        assert_eq!(column, vec![0, 1, 2, 3, 2, 1, 0]);
    }

    #[test]
    fn full_plane_peels_from_image_border() {
        let img = Plane::filled(5, 5, 255u8).unwrap();
        let levels = distance_transform(img.view()).unwrap();
        assert_eq!(*levels.get(0, 0).unwrap(), 1);
        assert_eq!(*levels.get(2, 2).unwrap(), 3);
    }

    #[test]
    fn normalized_levels_reach_255() {
        let img = bar(20, 7, 1, 5);
        let norm = distance_transform_u8(img.view()).unwrap();
        assert_eq!(*norm.get(10, 3).unwrap(), 255);
        assert_eq!(*norm.get(10, 1).unwrap(), 85);
        assert_eq!(*norm.get(10, 0).unwrap(), 0);
    }

    #[test]
    fn skeleton_of_bar_is_its_midline() {
        let img = bar(20, 7, 1, 5);
        let skel = skeleton(img.view()).unwrap();
        for x in 4..16 {
            assert_eq!(*skel.get(x, 3).unwrap(), 255);
            assert_eq!(*skel.get(x, 2).unwrap(), 0);
            assert_eq!(*skel.get(x, 4).unwrap(), 0);
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let img = Plane::filled(4, 3, 0u8).unwrap();
        assert!(distance_transform_u8(img.view())
            .unwrap()
            .data()
            .iter()
            .all(|&v| v == 0));
    }
}
