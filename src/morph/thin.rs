//! Zhang-Suen thinning.

use crate::image::{ImageView, Plane, FOREGROUND};
use crate::threshold::binary;
use crate::trace::{trace_event, trace_span};
use crate::util::{PlaneScanError, PlaneScanResult};

/// Parameters for [`thin`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThinningConfig {
    /// Hard cap on full (two sub-iteration) rounds.
    pub max_iterations: usize,
}

impl Default for ThinningConfig {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}

// Clockwise from north: P2, P3, ..., P9.
const RING: [(isize, isize); 8] = [
    (0, -1),
    (1, -1),
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
];

/// Reduces foreground strokes to one-pixel-wide curves.
///
/// Each round runs two sub-iterations. A foreground pixel is deleted when it
/// has between 2 and 6 foreground 8-neighbors, exactly one 0→1 transition
/// around its ring, and (first pass) `P2·P4·P6 = 0` and `P4·P6·P8 = 0`, or
/// (second pass) `P2·P4·P8 = 0` and `P2·P6·P8 = 0`. Deletions are collected
/// per sub-iteration and applied together. Rounds repeat until neither pass
/// deletes anything. Out-of-image neighbors read as background.
pub fn thin(src: ImageView<'_, u8>, cfg: ThinningConfig) -> PlaneScanResult<Plane<u8>> {
    if cfg.max_iterations == 0 {
        return Err(PlaneScanError::InvalidParameter {
            name: "max_iterations",
            reason: "must be at least 1",
        });
    }
    let width = src.width();
    let height = src.height();
    let _span = trace_span!("thin", width = width, height = height).entered();

    let mut fg = Vec::with_capacity(width * height);
    for y in 0..height {
        if let Some(row) = src.row(y) {
            fg.extend(row.iter().map(|&v| v == FOREGROUND));
        }
    }

    let mut marked = Vec::new();
    let mut rounds = 0usize;
    for _ in 0..cfg.max_iterations {
        rounds += 1;
        let mut deleted = 0usize;
        for first_pass in [true, false] {
            marked.clear();
            for y in 0..height {
                for x in 0..width {
                    if fg[y * width + x] && deletable(&fg, width, height, x, y, first_pass) {
                        marked.push(y * width + x);
                    }
                }
            }
            for &idx in &marked {
                fg[idx] = false;
            }
            deleted += marked.len();
        }
        if deleted == 0 {
            break;
        }
    }

    trace_event!("thinning_rounds", rounds = rounds);
    let data = fg.into_iter().map(binary).collect();
    Plane::new(data, width, height)
}

fn deletable(fg: &[bool], width: usize, height: usize, x: usize, y: usize, first_pass: bool) -> bool {
    let mut p = [0u8; 8];
    for (slot, &(dx, dy)) in p.iter_mut().zip(RING.iter()) {
        let nx = x as isize + dx;
        let ny = y as isize + dy;
        if nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height {
            *slot = u8::from(fg[ny as usize * width + nx as usize]);
        }
    }

    let count: u8 = p.iter().sum();
    if !(2..=6).contains(&count) {
        return false;
    }
    let transitions = (0..8).filter(|&i| p[i] == 0 && p[(i + 1) % 8] == 1).count();
    if transitions != 1 {
        return false;
    }

    let [p2, _p3, p4, _p5, p6, _p7, p8, _p9] = p;
    if first_pass {
        p2 * p4 * p6 == 0 && p4 * p6 * p8 == 0
    } else {
        p2 * p4 * p8 == 0 && p2 * p6 * p8 == 0
    }
}
