//! PlaneScan is a CPU library for analysing binary and grayscale rasters held
//! in plain pixel buffers.
//!
//! The crate covers global and adaptive thresholding, separable morphology
//! with distance transform, skeleton and thinning, two-pass connected
//! component labeling with moment-based measurement, Hough voting for lines
//! and circles, and template matching backed by integral images. Every
//! operation is a free function over explicit buffers; parameters travel in
//! small `Copy` config structs. Optional parallelism is available via the
//! `rayon` feature and vectorized matching inner loops via `simd`.

mod candidate;
pub mod geom;
pub mod hough;
pub mod image;
pub mod integral;
pub mod label;
pub mod matching;
pub mod measure;
pub mod morph;
pub mod threshold;
mod trace;
pub mod util;

pub use candidate::topk::Peak;
pub use geom::{Line, Point, Rect, Size, Vec3i};
pub use hough::{
    circle_votes, detect_circles, detect_lines, line_accumulator, CircleMode, HoughCircleConfig,
    HoughLineConfig, LineAccumulator,
};
pub use image::color::ColorPlanes;
pub use image::{ImageView, Plane, BACKGROUND, FOREGROUND};
pub use integral::IntegralImage;
pub use label::{
    bounding_rect, label_components, regions_from_labels, regions_from_mask, Connectivity,
    LabelConfig, Labeling, PixelNode, BACKGROUND_LABEL,
};
pub use matching::{
    best_match, match_template, match_template_channels, top_matches, MatchConfig, MatchMethod,
};
pub use measure::{measure_region, measure_regions, MeasureData};
pub use morph::{
    close, dilate, distance_transform, distance_transform_u8, erode, gradient, open, skeleton,
    thin, GradientKind, StructuringElement, ThinningConfig,
};
pub use threshold::{
    adaptive_threshold, apply_binary, apply_threshold, binarize, compute_cutoff, histogram,
    AdaptiveConfig, ThresholdMethod, ThresholdType,
};
pub use util::{PlaneScanError, PlaneScanResult};
