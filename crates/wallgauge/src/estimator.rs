//! High-level estimation API.
//!
//! [`Estimator`] wires the stages together:
//! scale → wall region → depth → dimensions → paint → report.
//! It holds only configuration, so one instance can serve any number of
//! requests, concurrently if needed.

use image::GrayImage;

use crate::config::EstimatorConfig;
use crate::depth::{estimate_depth, AuxView, DepthEstimate};
use crate::error::MeasureError;
use crate::measure::{measure, OutputUnits};
use crate::paint::{estimate_litres, PaintConfig};
use crate::region::{detect_region, Detection, PixelRect};
use crate::report::{assemble, MeasurementReport};
use crate::scale::ScaleInput;

/// Inputs for one estimate.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    /// Frontal photograph of the wall.
    pub front: GrayImage,
    /// Scale information for the front image.
    pub front_scale: ScaleInput,
    /// Explicit wall region; skips detection when set.
    pub region: Option<PixelRect>,
    pub side: Option<AuxView>,
    pub top: Option<AuxView>,
    pub paint: PaintConfig,
    pub units: OutputUnits,
    /// Also report litres rounded up to whole litres.
    pub round_up_litres: bool,
}

impl EstimateRequest {
    /// Request with default paint parameters and metric output.
    pub fn new(front: GrayImage) -> Self {
        Self {
            front,
            front_scale: ScaleInput::default(),
            region: None,
            side: None,
            top: None,
            paint: PaintConfig::default(),
            units: OutputUnits::Metric,
            round_up_litres: false,
        }
    }

    pub fn with_scale(mut self, scale: ScaleInput) -> Self {
        self.front_scale = scale;
        self
    }

    pub fn with_region(mut self, region: PixelRect) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_side(mut self, side: AuxView) -> Self {
        self.side = Some(side);
        self
    }

    pub fn with_top(mut self, top: AuxView) -> Self {
        self.top = Some(top);
        self
    }

    pub fn with_paint(mut self, paint: PaintConfig) -> Self {
        self.paint = paint;
        self
    }

    pub fn with_units(mut self, units: OutputUnits) -> Self {
        self.units = units;
        self
    }
}

/// Primary estimation interface.
///
/// # Examples
///
/// ```no_run
/// use wallgauge::{EstimateRequest, Estimator, ScaleInput};
/// use std::path::Path;
///
/// let front = wallgauge::open_gray(Path::new("front.jpg")).unwrap();
/// let request = EstimateRequest::new(front).with_scale(ScaleInput::from_reference(1.0, 120.0));
/// let report = Estimator::new().estimate(&request).unwrap();
/// println!("{:.2} m² -> {:.2} L", report.area_m2, report.litres);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Estimator {
    config: EstimatorConfig,
}

impl Estimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EstimatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut EstimatorConfig {
        &mut self.config
    }

    /// Request prefilled with this estimator's default paint parameters.
    pub fn request(&self, front: GrayImage) -> EstimateRequest {
        EstimateRequest::new(front).with_paint(self.config.paint)
    }

    /// Run the full estimate.
    ///
    /// Input validation (scale, paint, region) happens before any image
    /// processing. Low-confidence detections and missing auxiliary scales are
    /// reported as warnings, not errors.
    pub fn estimate(&self, req: &EstimateRequest) -> Result<MeasurementReport, MeasureError> {
        let scale = match req.units {
            OutputUnits::Metric => match req.front_scale.require() {
                Ok(scale) => Some(scale),
                Err(MeasureError::NoScaleAvailable) => return Err(MeasureError::ScaleRequired),
                Err(e) => return Err(e),
            },
            OutputUnits::Pixels => req.front_scale.resolve()?,
        };
        req.paint.validate()?;

        let (w, h) = req.front.dimensions();
        if w == 0 || h == 0 {
            return Err(MeasureError::ImageDecode("front image has no pixels".into()));
        }

        let detection = match req.region {
            Some(rect) => Detection::explicit(rect.to_bbox(w, h)?),
            None => detect_region(&req.front, &self.config.region),
        };

        let mut warnings = Vec::new();
        if let Some(reason) = detection.fallback {
            warnings.push(format!(
                "low-confidence wall detection ({}); measured the whole front image",
                reason.describe()
            ));
        }

        let depth = match req.units {
            OutputUnits::Metric => estimate_depth(
                req.side.as_ref(),
                req.top.as_ref(),
                scale,
                &self.config.region,
                &self.config.depth,
            )?,
            OutputUnits::Pixels => {
                if req.side.is_some() || req.top.is_some() {
                    warnings.push("depth is not computed for pixel-only output".to_string());
                }
                DepthEstimate::default()
            }
        };
        warnings.extend(depth.warnings.iter().cloned());

        let measurement = measure(scale, &detection.bbox, depth.depth_m, req.units)?;
        let litres = match req.units {
            OutputUnits::Metric => estimate_litres(measurement.area_m2, &req.paint)?,
            OutputUnits::Pixels => {
                warnings.push("paint volume requires a metric scale; litres reported as 0".to_string());
                0.0
            }
        };

        tracing::info!(
            "wall {:.3} x {:.3} {} (area {:.3}), depth {:?}, {:.2} L",
            measurement.width_m,
            measurement.height_m,
            measurement.units.symbol(),
            measurement.area_m2,
            measurement.depth_m,
            litres,
        );

        let report = assemble(
            &measurement,
            litres,
            &detection,
            &req.paint,
            depth.source,
            warnings,
        );
        Ok(if req.round_up_litres {
            report.with_rounded_litres()
        } else {
            report
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::DepthSource;
    use crate::error::ErrorKind;
    use crate::test_utils::draw_wall_image;
    use image::Luma;

    fn front() -> GrayImage {
        draw_wall_image(1200, 800, [100, 50, 960, 720], 200, 60)
    }

    #[test]
    fn reference_example_with_explicit_region() {
        let req = EstimateRequest::new(front())
            .with_scale(ScaleInput::from_reference(1.0, 120.0))
            .with_region(PixelRect::new(100, 50, 960, 720));
        let r = Estimator::new().estimate(&req).unwrap();
        assert!((r.width_m - 8.0).abs() < 1e-12);
        assert!((r.height_m - 6.0).abs() < 1e-12);
        assert!((r.area_m2 - 48.0).abs() < 1e-9);
        assert!((r.litres - 9.6).abs() < 1e-9);
        assert_eq!(r.depth_m, None);
        assert_eq!(r.depth_source, None);
        assert!(!r.low_confidence);
        assert!(r.warnings.is_empty());
    }

    #[test]
    fn detected_region_is_close_to_wall() {
        let req = EstimateRequest::new(front()).with_scale(ScaleInput::from_reference(1.0, 120.0));
        let r = Estimator::new().estimate(&req).unwrap();
        assert!((r.width_m - 8.0).abs() < 0.1, "width {}", r.width_m);
        assert!((r.height_m - 6.0).abs() < 0.1, "height {}", r.height_m);
        assert_eq!(r.area_m2, r.width_m * r.height_m);
    }

    #[test]
    fn missing_scale_is_scale_required() {
        let err = Estimator::new()
            .estimate(&EstimateRequest::new(front()))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ScaleRequired);
    }

    #[test]
    fn invalid_inputs_fail_before_detection() {
        let est = Estimator::new();
        let bad_coats = EstimateRequest::new(front())
            .with_scale(ScaleInput::explicit(0.01))
            .with_paint(PaintConfig {
                coverage_m2_per_litre: 10.0,
                coats: 0,
            });
        assert_eq!(
            est.estimate(&bad_coats).unwrap_err().kind(),
            ErrorKind::InvalidPaintConfig
        );

        let bad_ref = EstimateRequest::new(front()).with_scale(ScaleInput::from_reference(1.0, -120.0));
        assert_eq!(
            est.estimate(&bad_ref).unwrap_err().kind(),
            ErrorKind::InvalidReference
        );

        let bad_region = EstimateRequest::new(front())
            .with_scale(ScaleInput::explicit(0.01))
            .with_region(PixelRect::new(1000, 0, 300, 10));
        assert_eq!(
            est.estimate(&bad_region).unwrap_err().kind(),
            ErrorKind::InvalidRegion
        );
    }

    #[test]
    fn blank_front_is_measured_whole_with_warning() {
        let req = EstimateRequest::new(GrayImage::from_pixel(300, 200, Luma([128])))
            .with_scale(ScaleInput::explicit(0.01));
        let r = Estimator::new().estimate(&req).unwrap();
        assert!(r.low_confidence);
        assert!(r.bbox.is_full_image());
        assert!((r.width_m - 3.0).abs() < 1e-12);
        assert!((r.height_m - 2.0).abs() < 1e-12);
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn side_view_supplies_depth_without_touching_area() {
        let side = AuxView::new(
            draw_wall_image(160, 260, [60, 30, 40, 200], 220, 30),
            ScaleInput::explicit(0.001),
        );
        let req = EstimateRequest::new(front())
            .with_scale(ScaleInput::from_reference(1.0, 120.0))
            .with_region(PixelRect::new(100, 50, 960, 720))
            .with_side(side);
        let r = Estimator::new().estimate(&req).unwrap();
        assert_eq!(r.depth_source, Some(DepthSource::Side));
        assert!((r.depth_m.unwrap() - 0.2).abs() < 0.006);
        assert!((r.area_m2 - 48.0).abs() < 1e-9);
    }

    #[test]
    fn pixel_output_without_scale() {
        let req = EstimateRequest::new(front())
            .with_units(OutputUnits::Pixels)
            .with_region(PixelRect::new(100, 50, 960, 720));
        let r = Estimator::new().estimate(&req).unwrap();
        assert_eq!((r.width_m, r.height_m), (960.0, 720.0));
        assert_eq!(r.area_m2, 960.0 * 720.0);
        assert_eq!(r.litres, 0.0);
        assert_eq!(r.units, OutputUnits::Pixels);
        assert!(r.warnings.iter().any(|w| w.contains("metric scale")));
    }

    #[test]
    fn extreme_scales_fail_instead_of_reporting_non_finite_values() {
        let est = Estimator::new();
        let huge = EstimateRequest::new(front())
            .with_scale(ScaleInput::explicit(1e160))
            .with_region(PixelRect::new(0, 0, 1200, 800));
        let err = est.estimate(&huge).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);

        let tiny = EstimateRequest::new(front())
            .with_scale(ScaleInput::explicit(1e-200))
            .with_region(PixelRect::new(0, 0, 10, 10));
        let err = est.estimate(&tiny).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn invalid_scale_wins_over_missing_scale_in_metric_mode() {
        let req = EstimateRequest::new(front()).with_scale(ScaleInput::explicit(-1.0));
        let err = Estimator::new().estimate(&req).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidScale);
    }

    #[test]
    fn estimator_paint_defaults_flow_into_requests() {
        let mut est = Estimator::new();
        est.config_mut().paint.coverage_m2_per_litre = 12.0;
        let req = est
            .request(front())
            .with_scale(ScaleInput::explicit(0.01))
            .with_region(PixelRect::new(0, 0, 600, 400));
        let mut req = req;
        req.round_up_litres = true;
        let r = est.estimate(&req).unwrap();
        // 6 m x 4 m, 2 coats at 12 m²/L
        assert!((r.litres - 4.0).abs() < 1e-9);
        assert_eq!(r.coverage_m2_per_l, 12.0);
        assert_eq!(r.litres_rounded, Some(4.0));
    }
}
