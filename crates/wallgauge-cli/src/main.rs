//! wallgauge CLI: wall dimensions and paint volume from photographs.

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use wallgauge::{
    open_gray, AuxView, EstimateRequest, Estimator, EstimatorConfig, GrayImage,
    MeasurementReport, OutputUnits, PaintConfig, PixelRect, ScaleInput,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Parser)]
#[command(name = "wallgauge")]
#[command(about = "Estimate wall width, height, depth and paint volume from photographs")]
#[command(version)]
struct Cli {
    /// Path to the front view image.
    #[arg(long)]
    front: PathBuf,

    /// Path to a top view image (optional, gives depth).
    #[arg(long)]
    top: Option<PathBuf>,

    /// Path to a side view image (optional, gives depth; preferred over --top).
    #[arg(long)]
    side: Option<PathBuf>,

    /// Front image scale in metres per pixel.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "reference")]
    scale: Option<f64>,

    /// Reference object in the front image: real length (m) and its length in pixels.
    #[arg(
        long = "ref",
        id = "reference",
        num_args = 2,
        value_names = ["REAL_M", "PX"],
        allow_negative_numbers = true
    )]
    reference: Option<Vec<f64>>,

    /// Paint coverage in m² per litre (default: 10, or the config file value).
    #[arg(long)]
    coverage: Option<f64>,

    /// Number of coats (default: 2, or the config file value).
    #[arg(long)]
    coats: Option<u32>,

    /// Side image scale in metres per pixel.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "side_ref")]
    side_scale: Option<f64>,

    /// Reference object in the side image: real length (m) and pixels.
    #[arg(long, num_args = 2, value_names = ["REAL_M", "PX"], allow_negative_numbers = true)]
    side_ref: Option<Vec<f64>>,

    /// Top image scale in metres per pixel.
    #[arg(long, allow_negative_numbers = true, conflicts_with = "top_ref")]
    top_scale: Option<f64>,

    /// Reference object in the top image: real length (m) and pixels.
    #[arg(long, num_args = 2, value_names = ["REAL_M", "PX"], allow_negative_numbers = true)]
    top_ref: Option<Vec<f64>>,

    /// Wall region in front-image pixels; skips automatic detection.
    #[arg(long, num_args = 4, value_names = ["X", "Y", "W", "H"])]
    region: Option<Vec<u32>>,

    /// Report pixel dimensions; no scale needed, no paint estimate.
    #[arg(long)]
    pixels_only: bool,

    /// Also report litres rounded up to whole litres.
    #[arg(long)]
    round_up: bool,

    /// Estimator configuration (JSON).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to write the result (JSON).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Use the front scale for side/top views that have none.
    #[arg(long)]
    allow_front_scale_for_depth: bool,
}

fn scale_input(scale: Option<f64>, reference: Option<&[f64]>) -> ScaleInput {
    let reference = match reference {
        Some(&[real_m, px]) => Some(wallgauge::ReferenceMeasurement::new(real_m, px)),
        _ => None,
    };
    ScaleInput {
        scale_m_per_px: scale,
        reference,
    }
}

impl Cli {
    fn front_scale(&self) -> ScaleInput {
        scale_input(self.scale, self.reference.as_deref())
    }

    fn side_scale(&self) -> ScaleInput {
        scale_input(self.side_scale, self.side_ref.as_deref())
    }

    fn top_scale(&self) -> ScaleInput {
        scale_input(self.top_scale, self.top_ref.as_deref())
    }

    fn units(&self) -> OutputUnits {
        if self.pixels_only {
            OutputUnits::Pixels
        } else {
            OutputUnits::Metric
        }
    }

    fn region(&self) -> Option<PixelRect> {
        match self.region.as_deref() {
            Some(&[x, y, w, h]) => Some(PixelRect::new(x, y, w, h)),
            _ => None,
        }
    }

    fn paint(&self, defaults: PaintConfig) -> PaintConfig {
        PaintConfig {
            coverage_m2_per_litre: self.coverage.unwrap_or(defaults.coverage_m2_per_litre),
            coats: self.coats.unwrap_or(defaults.coats),
        }
    }

    fn estimator_config(&self) -> CliResult<EstimatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading config: {}", path.display());
                EstimatorConfig::from_json_file(path)?
            }
            None => EstimatorConfig::default(),
        };
        if self.allow_front_scale_for_depth {
            config.depth.allow_front_scale = true;
        }
        Ok(config)
    }

    /// Front-view request; auxiliary views are attached separately.
    fn build_request(&self, estimator: &Estimator, front: GrayImage) -> EstimateRequest {
        let mut req = estimator
            .request(front)
            .with_scale(self.front_scale())
            .with_units(self.units());
        req.paint = self.paint(estimator.config().paint);
        req.region = self.region();
        req.round_up_litres = self.round_up;
        req
    }
}

fn load_view(path: &Path, what: &str) -> CliResult<GrayImage> {
    tracing::info!("Loading {} image: {}", what, path.display());
    let gray = open_gray(path)?;
    let (w, h) = gray.dimensions();
    tracing::info!("Image size: {}x{}", w, h);
    Ok(gray)
}

fn print_summary(report: &MeasurementReport) {
    let unit = report.units.symbol();
    println!("Wall measurement results:");
    println!(" - Width ({}): {:.3}", unit, report.width_m);
    println!(" - Height ({}): {:.3}", unit, report.height_m);
    if let (Some(depth), Some(source)) = (report.depth_m, report.depth_source) {
        println!(" - Depth ({}, from {} view): {:.3}", unit, source, depth);
    }
    println!(" - Area ({}^2): {:.3}", unit, report.area_m2);
    if report.units == OutputUnits::Metric {
        println!(
            " - Paint coverage: {} m^2/L, Coats: {}",
            report.coverage_m2_per_l, report.coats
        );
        println!(" - Estimated paint required: {:.2} L", report.litres);
        if let Some(rounded) = report.litres_rounded {
            println!(" - To buy (rounded up): {} L", rounded);
        }
    }
    let b = &report.bbox;
    println!(
        " - Wall box: x={} y={} w={} h={} in {}x{} image{}",
        b.x_px,
        b.y_px,
        b.w_px,
        b.h_px,
        b.image_w_px,
        b.image_h_px,
        if report.low_confidence {
            " (low confidence)"
        } else {
            ""
        }
    );
    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &report.warnings {
            println!(" - {}", w);
        }
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    let estimator = Estimator::with_config(cli.estimator_config()?);

    let front = load_view(&cli.front, "front")?;
    let mut req = cli.build_request(&estimator, front);
    if let Some(path) = &cli.side {
        req.side = Some(AuxView::new(load_view(path, "side")?, cli.side_scale()));
    }
    if let Some(path) = &cli.top {
        req.top = Some(AuxView::new(load_view(path, "top")?, cli.top_scale()));
    }

    let report = estimator.estimate(&req)?;
    print_summary(&report);

    if let Some(out) = &cli.out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(out, &json)
            .map_err(|e| -> CliError { format!("failed to write {}: {}", out.display(), e).into() })?;
        tracing::info!("Results written to {}", out.display());
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
