//! wallgauge: wall dimensions and paint volume from photographs.
//!
//! The pipeline stages are:
//!
//! 1. **Scale** – metres-per-pixel from an explicit factor or a reference
//!    object of known length.
//! 2. **Region** – wall bounding box from an edge mask (Scharr or Canny),
//!    falling back to the whole image when nothing convincing is found.
//! 3. **Depth** – optional wall thickness from a side or top view.
//! 4. **Measure** – box size converted to metres (or kept in pixels).
//! 5. **Paint** – litres for the requested coverage and number of coats.
//! 6. **Report** – serializable result with warnings and confidence flag.
//!
//! # Public API
//! - [`Estimator`] and [`EstimateRequest`] as primary entry points
//! - [`EstimatorConfig`] for tuning, loadable from JSON
//! - stage functions ([`detect_region`], [`estimate_depth`], [`measure`],
//!   [`estimate_litres`]) for callers that need only part of the pipeline

mod commentary;
mod config;
mod depth;
mod error;
mod estimator;
mod imageio;
mod measure;
mod paint;
mod region;
mod report;
mod scale;

#[cfg(test)]
pub(crate) mod test_utils;

pub use commentary::{commentary_prompt, SYSTEM_PROMPT};
pub use config::EstimatorConfig;
pub use depth::{estimate_depth, AuxView, DepthAxis, DepthConfig, DepthEstimate, DepthSource};
pub use error::{ErrorKind, MeasureError};
pub use estimator::{EstimateRequest, Estimator};
pub use imageio::{decode_gray, open_gray};
pub use measure::{measure, Measurement, OutputUnits};
pub use paint::{
    estimate_litres, round_up_litres, PaintConfig, DEFAULT_COATS, DEFAULT_COVERAGE_M2_PER_LITRE,
};
pub use region::{
    detect_region, BoundingBox, BoxMethod, Detection, DetectionStats, EdgeSignal, FallbackReason,
    PixelRect, RegionConfig,
};
pub use report::{assemble, MeasurementReport};
pub use scale::{ReferenceMeasurement, ScaleFactor, ScaleInput};

pub use image::{self, GrayImage};
