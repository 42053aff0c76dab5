//! Two-pass connected-component labeling of binary planes.
//!
//! Pass 1 scans in raster order and gives each foreground pixel (`255`) the
//! smallest resolved label among its already-visited neighbors, merging their
//! sets, or a fresh label when it has none. The union-find table is then
//! flattened once, and pass 2 rewrites every pixel to a dense component id
//! while grouping member pixels per component.
//!
//! Label masks hold `-1` for background and `0..count` for components; ids
//! follow the raster order of each component's first pixel.

use crate::geom::Rect;
use crate::image::{ImageView, Plane, FOREGROUND};
use crate::trace::{trace_event, trace_span};
use crate::util::{PlaneScanError, PlaneScanResult};

mod union_find;

use union_find::UnionFind;

/// Background value in label masks.
pub const BACKGROUND_LABEL: i32 = -1;

const UNLABELED: u32 = u32::MAX;

/// Pixel adjacency used to join foreground pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Connectivity {
    /// Edge neighbors only.
    #[default]
    Four,
    /// Edge and corner neighbors.
    Eight,
}

/// Parameters for [`label_components`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LabelConfig {
    pub connectivity: Connectivity,
    /// Components with fewer member pixels are cleared to background.
    /// `0` and `1` keep everything.
    pub min_pixels: usize,
    /// Compute per-component bounding rectangles.
    pub with_bounds: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            connectivity: Connectivity::Four,
            min_pixels: 0,
            with_bounds: false,
        }
    }
}

/// Member pixel of a component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelNode {
    pub row: usize,
    pub col: usize,
    /// Row-major index, `row * width + col`.
    pub index: usize,
}

/// Output of [`label_components`].
#[derive(Clone, Debug)]
pub struct Labeling {
    /// Per-pixel component id, `-1` for background.
    pub mask: Plane<i32>,
    /// Number of surviving components.
    pub count: usize,
    /// Member pixels per component id, in raster order.
    pub regions: Vec<Vec<PixelNode>>,
    /// Bounding rectangles per component id when requested.
    pub bounds: Option<Vec<Rect>>,
}

impl Labeling {
    /// Pixel count of each component.
    pub fn areas(&self) -> Vec<usize> {
        self.regions.iter().map(Vec::len).collect()
    }
}

/// Labels the foreground of a binary view.
pub fn label_components(src: ImageView<'_, u8>, cfg: LabelConfig) -> PlaneScanResult<Labeling> {
    let width = src.width();
    let height = src.height();
    let _span = trace_span!("label_components", width = width, height = height).entered();

    let mut provisional = vec![UNLABELED; width * height];
    let mut sets = UnionFind::with_capacity(64);
    let mut neighbors = [UNLABELED; 4];

    for y in 0..height {
        let Some(row) = src.row(y) else { break };
        for (x, &v) in row.iter().enumerate() {
            if v != FOREGROUND {
                continue;
            }
            let found = visited_neighbors(&provisional, width, x, y, cfg.connectivity, &mut neighbors);
            let label = if found == 0 {
                sets.make_set()
            } else {
                let mut root = sets.find(neighbors[0]);
                for &other in &neighbors[1..found] {
                    root = sets.union(root, other);
                }
                root
            };
            provisional[y * width + x] = label;
        }
    }

    sets.flatten();

    let mut dense = vec![BACKGROUND_LABEL; sets.len()];
    let mut count = 0usize;
    for label in 0..sets.len() as u32 {
        if sets.parent(label) == label {
            dense[label as usize] = count as i32;
            count += 1;
        }
    }

    let mut mask = Plane::filled(width, height, BACKGROUND_LABEL)?;
    let mut regions: Vec<Vec<PixelNode>> = vec![Vec::new(); count];
    for (index, &label) in provisional.iter().enumerate() {
        if label == UNLABELED {
            continue;
        }
        let id = dense[sets.parent(label) as usize];
        mask.data_mut()[index] = id;
        regions[id as usize].push(PixelNode {
            row: index / width,
            col: index % width,
            index,
        });
    }

    if cfg.min_pixels > 1 {
        drop_small(&mut mask, &mut regions, cfg.min_pixels);
    }
    let count = regions.len();
    let bounds = cfg.with_bounds.then(|| regions.iter().map(|r| bounding_rect(r)).collect());

    trace_event!("components", count = count);
    Ok(Labeling {
        mask,
        count,
        regions,
        bounds,
    })
}

/// Rebuilds member groups from an existing label mask.
///
/// Negative values are background. Ids absent from the mask yield empty
/// groups.
pub fn regions_from_mask(mask: &Plane<i32>) -> Vec<Vec<PixelNode>> {
    let width = mask.width();
    let count = mask
        .data()
        .iter()
        .copied()
        .filter(|&id| id >= 0)
        .max()
        .map_or(0, |max| max as usize + 1);
    let mut regions = vec![Vec::new(); count];
    for (index, &id) in mask.data().iter().enumerate() {
        if id >= 0 {
            regions[id as usize].push(PixelNode {
                row: index / width,
                col: index % width,
                index,
            });
        }
    }
    regions
}

/// Like [`regions_from_mask`] for a raw label buffer of `width * height`.
pub fn regions_from_labels(
    labels: &[i32],
    width: usize,
    height: usize,
) -> PlaneScanResult<Vec<Vec<PixelNode>>> {
    let expected = crate::image::checked_area(width, height)?;
    if labels.len() != expected {
        return Err(PlaneScanError::SizeMismatch {
            expected,
            got: labels.len(),
        });
    }
    let mask = Plane::new(labels.to_vec(), width, height)?;
    Ok(regions_from_mask(&mask))
}

/// Smallest rectangle holding every member pixel.
pub fn bounding_rect(pixels: &[PixelNode]) -> Rect {
    let Some(first) = pixels.first() else {
        return Rect::default();
    };
    let (mut x0, mut y0, mut x1, mut y1) = (first.col, first.row, first.col, first.row);
    for p in pixels {
        x0 = x0.min(p.col);
        x1 = x1.max(p.col);
        y0 = y0.min(p.row);
        y1 = y1.max(p.row);
    }
    Rect::from_corners(x0, y0, x1, y1)
}

/// Collects provisional labels of already-scanned neighbors; returns how many.
#[inline]
fn visited_neighbors(
    provisional: &[u32],
    width: usize,
    x: usize,
    y: usize,
    connectivity: Connectivity,
    out: &mut [u32; 4],
) -> usize {
    let mut n = 0usize;
    let mut push = |label: u32| {
        if label != UNLABELED {
            out[n] = label;
            n += 1;
        }
    };
    if x > 0 {
        push(provisional[y * width + x - 1]);
    }
    if y > 0 {
        let up = (y - 1) * width + x;
        push(provisional[up]);
        if connectivity == Connectivity::Eight {
            if x > 0 {
                push(provisional[up - 1]);
            }
            if x + 1 < width {
                push(provisional[up + 1]);
            }
        }
    }
    n
}

/// Clears components below `min_pixels` and renumbers the survivors densely.
fn drop_small(mask: &mut Plane<i32>, regions: &mut Vec<Vec<PixelNode>>, min_pixels: usize) {
    let mut remap = vec![BACKGROUND_LABEL; regions.len()];
    let mut next = 0i32;
    for (id, region) in regions.iter().enumerate() {
        if region.len() >= min_pixels {
            remap[id] = next;
            next += 1;
        }
    }
    for v in mask.data_mut() {
        if *v >= 0 {
            *v = remap[*v as usize];
        }
    }
    regions.retain(|region| region.len() >= min_pixels);
}
