//! Grayscale and binary morphology.
//!
//! Erosion and dilation are separable min/max filters over a rectangular
//! structuring element: a horizontal pass followed by a vertical pass on its
//! output. Border probes replicate the edge sample. Every operator reads its
//! input view and returns a new plane; iterated operators ping-pong between
//! two owned buffers, so iteration `k + 1` only reads what iteration `k`
//! finished writing.
//!
//! Binary operators (distance transform, skeleton, thinning) treat `255` as
//! foreground and every other value as background.

use crate::image::{ImageView, Plane};
use crate::threshold::apply_binary;
use crate::trace::{trace_event, trace_span};
use crate::util::{PlaneScanError, PlaneScanResult};

mod distance;
mod minmax;
mod thin;

pub use distance::{distance_transform, distance_transform_u8, skeleton, DISTANCE_MAX_ROUNDS};
pub use thin::{thin, ThinningConfig};

use minmax::{filter_pass, Extremum};

/// Rectangular window of `cols x rows` samples.
///
/// The window covers `[c - d/2, c - d/2 + d - 1]` along each axis, so odd
/// sizes are centered and even sizes carry their extra sample on the low
/// (left/top) side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StructuringElement {
    cols: usize,
    rows: usize,
}

impl StructuringElement {
    pub fn new(cols: usize, rows: usize) -> PlaneScanResult<Self> {
        if cols == 0 || rows == 0 {
            return Err(PlaneScanError::InvalidParameter {
                name: "structuring_element",
                reason: "cols and rows must be at least 1",
            });
        }
        Ok(Self { cols, rows })
    }

    /// Square `size x size` element.
    pub fn square(size: usize) -> PlaneScanResult<Self> {
        Self::new(size, size)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Offsets of the window start before the anchor, `(cols / 2, rows / 2)`.
    pub fn anchor(&self) -> (usize, usize) {
        (self.cols / 2, self.rows / 2)
    }

    pub fn is_symmetric(&self) -> bool {
        self.cols % 2 == 1 && self.rows % 2 == 1
    }
}

impl Default for StructuringElement {
    fn default() -> Self {
        Self { cols: 3, rows: 3 }
    }
}

/// Morphological gradient variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientKind {
    /// `dilate - erode`, binarized at `cutoff`.
    Basic { cutoff: u8 },
    /// `dilate - source`.
    External,
    /// `source - erode`.
    Internal,
}

/// Minimum filter applied `iterations` times.
pub fn erode(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    iterations: usize,
) -> PlaneScanResult<Plane<u8>> {
    let _span = trace_span!("erode", iterations = iterations).entered();
    iterate(src, se, iterations, Extremum::Min)
}

/// Maximum filter applied `iterations` times.
pub fn dilate(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    iterations: usize,
) -> PlaneScanResult<Plane<u8>> {
    let _span = trace_span!("dilate", iterations = iterations).entered();
    iterate(src, se, iterations, Extremum::Max)
}

/// Erosion followed by dilation with the same element and count.
pub fn open(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    iterations: usize,
) -> PlaneScanResult<Plane<u8>> {
    let eroded = erode(src, se, iterations)?;
    dilate(eroded.view(), se, iterations)
}

/// Dilation followed by erosion with the same element and count.
pub fn close(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    iterations: usize,
) -> PlaneScanResult<Plane<u8>> {
    let dilated = dilate(src, se, iterations)?;
    erode(dilated.view(), se, iterations)
}

/// Morphological gradient of `src`.
pub fn gradient(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    kind: GradientKind,
) -> PlaneScanResult<Plane<u8>> {
    let _span = trace_span!("gradient").entered();
    let source = Plane::from_view(src)?;
    let out = match kind {
        GradientKind::Basic { cutoff } => {
            let dilated = dilate(src, se, 1)?;
            let eroded = erode(src, se, 1)?;
            let mut diff = difference(&dilated, &eroded)?;
            apply_binary(&mut diff, cutoff, false);
            diff
        }
        GradientKind::External => {
            let dilated = dilate(src, se, 1)?;
            difference(&dilated, &source)?
        }
        GradientKind::Internal => {
            let eroded = erode(src, se, 1)?;
            difference(&source, &eroded)?
        }
    };
    Ok(out)
}

/// Saturating `a - b`, sample by sample.
fn difference(a: &Plane<u8>, b: &Plane<u8>) -> PlaneScanResult<Plane<u8>> {
    a.ensure_same_dims(b)?;
    let data = a
        .data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x.saturating_sub(y))
        .collect();
    Plane::new(data, a.width(), a.height())
}

fn iterate(
    src: ImageView<'_, u8>,
    se: StructuringElement,
    iterations: usize,
    op: Extremum,
) -> PlaneScanResult<Plane<u8>> {
    let width = src.width();
    let height = src.height();
    let mut current = Plane::from_view(src)?;
    if iterations == 0 {
        return Ok(current);
    }
    let mut scratch = Plane::filled(width, height, 0u8)?;
    let mut next = Plane::filled(width, height, 0u8)?;

    for _ in 0..iterations {
        filter_pass(
            current.data(),
            scratch.data_mut(),
            next.data_mut(),
            width,
            height,
            se,
            op,
        );
        std::mem::swap(&mut current, &mut next);
    }

    trace_event!("morph_iterations", count = iterations);
    Ok(current)
}
