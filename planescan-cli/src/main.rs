use clap::Parser;
use planescan::image::io::load_gray_plane;
use planescan::{
    adaptive_threshold, binarize, close, detect_circles, detect_lines, dilate, erode,
    label_components, match_template, measure_regions, open, top_matches, AdaptiveConfig,
    CircleMode, Connectivity, HoughCircleConfig, HoughLineConfig, LabelConfig, MatchConfig,
    MatchMethod, Plane, StructuringElement, ThresholdMethod,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "PlaneScan CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
enum ThresholdConfig {
    Fixed { cutoff: u8 },
    Mean,
    Otsu,
    Triangle,
    MeanShift,
    Adaptive {
        #[serde(default = "default_block_size")]
        block_size: usize,
        #[serde(default = "default_constant")]
        constant: f64,
    },
}

fn default_block_size() -> usize {
    AdaptiveConfig::default().block_size
}

fn default_constant() -> f64 {
    AdaptiveConfig::default().constant
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MorphOp {
    Erode,
    Dilate,
    Open,
    Close,
}

#[derive(Debug, Deserialize)]
struct MorphStep {
    op: MorphOp,
    #[serde(default = "default_element")]
    size: usize,
    #[serde(default = "default_iterations")]
    iterations: usize,
}

fn default_element() -> usize {
    3
}

fn default_iterations() -> usize {
    1
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ConnectivityConfig {
    Four,
    Eight,
}

impl From<ConnectivityConfig> for Connectivity {
    fn from(value: ConnectivityConfig) -> Self {
        match value {
            ConnectivityConfig::Four => Connectivity::Four,
            ConnectivityConfig::Eight => Connectivity::Eight,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LabelConfigJson {
    connectivity: ConnectivityConfig,
    min_pixels: usize,
}

impl Default for LabelConfigJson {
    fn default() -> Self {
        Self {
            connectivity: ConnectivityConfig::Four,
            min_pixels: LabelConfig::default().min_pixels,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct LinesConfigJson {
    top_k: usize,
    min_score: u8,
    slope_tolerance: f64,
    min_points: usize,
}

impl Default for LinesConfigJson {
    fn default() -> Self {
        let cfg = HoughLineConfig::default();
        Self {
            top_k: cfg.top_k,
            min_score: cfg.min_score,
            slope_tolerance: cfg.slope_tolerance,
            min_points: cfg.min_points,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CirclesConfigJson {
    min_radius: usize,
    max_radius: usize,
    /// Report every center above this vote count instead of one per radius.
    #[serde(default)]
    threshold: Option<u32>,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum MatchMethodConfig {
    Energy,
    Zncc,
}

impl From<MatchMethodConfig> for MatchMethod {
    fn from(value: MatchMethodConfig) -> Self {
        match value {
            MatchMethodConfig::Energy => MatchMethod::Energy,
            MatchMethodConfig::Zncc => MatchMethod::Zncc,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct MatchConfigJson {
    template_path: String,
    method: MatchMethodConfig,
    sample_step: usize,
    topk: usize,
}

impl Default for MatchConfigJson {
    fn default() -> Self {
        Self {
            template_path: String::new(),
            method: MatchMethodConfig::Zncc,
            sample_step: MatchConfig::default().sample_step,
            topk: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
struct Config {
    image_path: String,
    #[serde(default)]
    output_path: Option<String>,
    threshold: ThresholdConfig,
    #[serde(default)]
    invert: bool,
    #[serde(default)]
    morphology: Vec<MorphStep>,
    #[serde(default)]
    labeling: LabelConfigJson,
    #[serde(default)]
    lines: Option<LinesConfigJson>,
    #[serde(default)]
    circles: Option<CirclesConfigJson>,
    #[serde(default, rename = "match")]
    match_cfg: Option<MatchConfigJson>,
}

#[derive(Debug, Serialize)]
struct RegionRecord {
    id: usize,
    area: usize,
    centroid_x: f64,
    centroid_y: f64,
    orientation: f64,
    /// `null` when the region has no minor extent.
    roundness: Option<f64>,
    bounds: [usize; 4],
}

#[derive(Debug, Serialize)]
struct LineRecord {
    x1: i32,
    y1: i32,
    x2: i32,
    y2: i32,
    /// `null` for vertical lines.
    slope: Option<f64>,
}

#[derive(Debug, Serialize)]
struct CircleRecord {
    x: i32,
    y: i32,
    radius: i32,
}

#[derive(Debug, Serialize)]
struct MatchRecord {
    x: usize,
    y: usize,
    score: f32,
}

#[derive(Debug, Serialize)]
struct Output {
    width: usize,
    height: usize,
    cutoff: Option<u8>,
    regions: Vec<RegionRecord>,
    lines: Vec<LineRecord>,
    circles: Vec<CircleRecord>,
    matches: Vec<MatchRecord>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("planescan=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let image = load_gray_plane(&config.image_path)?;
    let (binary, cutoff) = threshold(&image, &config.threshold, config.invert)?;
    let binary = apply_morphology(binary, &config.morphology)?;

    let labeling = label_components(
        binary.view(),
        LabelConfig {
            connectivity: config.labeling.connectivity.into(),
            min_pixels: config.labeling.min_pixels,
            with_bounds: true,
        },
    )?;
    let bounds = labeling.bounds.clone().unwrap_or_default();
    let regions = measure_regions(&labeling)
        .into_iter()
        .zip(bounds)
        .enumerate()
        .map(|(id, (m, rect))| RegionRecord {
            id,
            area: m.area,
            centroid_x: m.centroid_x,
            centroid_y: m.centroid_y,
            orientation: m.orientation,
            roundness: m.roundness.is_finite().then_some(m.roundness),
            bounds: [rect.x, rect.y, rect.width, rect.height],
        })
        .collect();

    let lines = match &config.lines {
        Some(cfg) => detect_lines(
            binary.view(),
            HoughLineConfig {
                top_k: cfg.top_k,
                min_score: cfg.min_score,
                slope_tolerance: cfg.slope_tolerance,
                min_points: cfg.min_points,
            },
        )?
        .into_iter()
        .map(|line| LineRecord {
            x1: line.x1,
            y1: line.y1,
            x2: line.x2,
            y2: line.y2,
            slope: (!line.is_vertical()).then(|| line.slope()),
        })
        .collect(),
        None => Vec::new(),
    };

    let circles = match &config.circles {
        Some(cfg) => detect_circles(
            binary.view(),
            HoughCircleConfig {
                min_radius: cfg.min_radius,
                max_radius: cfg.max_radius,
                mode: match cfg.threshold {
                    Some(threshold) => CircleMode::Accumulate { threshold },
                    None => CircleMode::MaxOnly,
                },
            },
        )?
        .into_iter()
        .map(|c| CircleRecord {
            x: c.x,
            y: c.y,
            radius: c.radius,
        })
        .collect(),
        None => Vec::new(),
    };

    let matches = match &config.match_cfg {
        Some(cfg) => {
            if cfg.template_path.is_empty() {
                return Err("match.template_path must be set when match is present".into());
            }
            if cfg.topk == 0 {
                return Err("match.topk must be at least 1".into());
            }
            let template = load_gray_plane(&cfg.template_path)?;
            let method: MatchMethod = cfg.method.into();
            let scores = match_template(
                image.view(),
                template.view(),
                MatchConfig {
                    method,
                    sample_step: cfg.sample_step,
                },
            )?;
            top_matches(&scores, cfg.topk, method)?
                .into_iter()
                .map(|p| MatchRecord {
                    x: p.x,
                    y: p.y,
                    score: p.score,
                })
                .collect()
        }
        None => Vec::new(),
    };

    let output = Output {
        width: image.width(),
        height: image.height(),
        cutoff,
        regions,
        lines,
        circles,
        matches,
    };
    tracing::info!(
        regions = output.regions.len(),
        lines = output.lines.len(),
        circles = output.circles.len(),
        matches = output.matches.len(),
        "analysis finished"
    );
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}

/// Binarizes `image`; the global cutoff is reported when one was used.
fn threshold(
    image: &Plane<u8>,
    cfg: &ThresholdConfig,
    invert: bool,
) -> Result<(Plane<u8>, Option<u8>), Box<dyn std::error::Error>> {
    let method = match *cfg {
        ThresholdConfig::Fixed { cutoff } => ThresholdMethod::Fixed(cutoff),
        ThresholdConfig::Mean => ThresholdMethod::Mean,
        ThresholdConfig::Otsu => ThresholdMethod::Otsu,
        ThresholdConfig::Triangle => ThresholdMethod::Triangle,
        ThresholdConfig::MeanShift => ThresholdMethod::MeanShift,
        ThresholdConfig::Adaptive {
            block_size,
            constant,
        } => {
            let binary = adaptive_threshold(
                image.view(),
                AdaptiveConfig {
                    block_size,
                    constant,
                    invert,
                },
            )?;
            return Ok((binary, None));
        }
    };
    let (binary, cutoff) = binarize(image.view(), method, invert)?;
    Ok((binary, Some(cutoff)))
}

fn apply_morphology(
    mut plane: Plane<u8>,
    steps: &[MorphStep],
) -> Result<Plane<u8>, Box<dyn std::error::Error>> {
    for step in steps {
        let se = StructuringElement::square(step.size)?;
        let view = plane.view();
        let next = match step.op {
            MorphOp::Erode => erode(view, se, step.iterations)?,
            MorphOp::Dilate => dilate(view, se, step.iterations)?,
            MorphOp::Open => open(view, se, step.iterations)?,
            MorphOp::Close => close(view, se, step.iterations)?,
        };
        plane = next;
    }
    Ok(plane)
}
