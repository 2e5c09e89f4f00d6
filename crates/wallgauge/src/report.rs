//! Output contract assembly.

use crate::depth::DepthSource;
use crate::measure::{Measurement, OutputUnits};
use crate::paint::{round_up_litres, PaintConfig};
use crate::region::{BoundingBox, Detection};

/// Final estimate returned to callers.
///
/// `depth_m`, `litres_rounded` and `depth_source` serialize as `null` when
/// absent so consumers can tell "not computed" apart from zero.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MeasurementReport {
    pub width_m: f64,
    pub height_m: f64,
    pub depth_m: Option<f64>,
    pub area_m2: f64,
    pub litres: f64,
    /// Descriptive commentary, empty when none was produced.
    pub ai: String,
    /// Wall box in native front-image pixels.
    pub bbox: BoundingBox,
    pub units: OutputUnits,
    pub coverage_m2_per_l: f64,
    pub coats: u32,
    /// `litres` rounded up to whole litres, when requested.
    pub litres_rounded: Option<f64>,
    /// True when the whole-image fallback was used for the front view.
    pub low_confidence: bool,
    pub depth_source: Option<DepthSource>,
    pub warnings: Vec<String>,
}

/// Merge stage outputs into a report. Inputs are only read.
pub fn assemble(
    measurement: &Measurement,
    litres: f64,
    detection: &Detection,
    paint: &PaintConfig,
    depth_source: Option<DepthSource>,
    warnings: Vec<String>,
) -> MeasurementReport {
    MeasurementReport {
        width_m: measurement.width_m,
        height_m: measurement.height_m,
        depth_m: measurement.depth_m,
        area_m2: measurement.area_m2,
        litres,
        ai: String::new(),
        bbox: detection.bbox,
        units: measurement.units,
        coverage_m2_per_l: paint.coverage_m2_per_litre,
        coats: paint.coats,
        litres_rounded: None,
        low_confidence: detection.low_confidence,
        depth_source: measurement.depth_m.and(depth_source),
        warnings,
    }
}

impl MeasurementReport {
    /// Attach commentary text; `None` or blank text leaves `ai` empty.
    pub fn with_commentary(mut self, text: Option<String>) -> Self {
        self.ai = text
            .map(|t| t.trim().to_string())
            .unwrap_or_default();
        self
    }

    /// Fill `litres_rounded` with the whole-litre purchase quantity.
    pub fn with_rounded_litres(mut self) -> Self {
        self.litres_rounded = Some(round_up_litres(self.litres));
        self
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::measure;
    use crate::scale::ScaleFactor;

    fn sample() -> MeasurementReport {
        let bbox = BoundingBox::new(100, 50, 960, 720, 1200, 800).unwrap();
        let scale = ScaleFactor::new(1.0 / 120.0).ok();
        let m = measure(scale, &bbox, None, OutputUnits::Metric).unwrap();
        assemble(
            &m,
            9.6,
            &Detection::explicit(bbox),
            &PaintConfig::default(),
            None,
            Vec::new(),
        )
    }

    #[test]
    fn absent_depth_serializes_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("depth_m").unwrap().is_null());
        assert_eq!(json["ai"], "");
        assert_eq!(json["units"], "m");
        assert_eq!(json["bbox"]["x_px"], 100);
        assert_eq!(json["bbox"]["image_w_px"], 1200);
        assert_eq!(json["bbox"]["image_h_px"], 800);
        assert_eq!(json["coats"], 2);
    }

    #[test]
    fn commentary_is_trimmed_and_optional() {
        let r = sample().with_commentary(Some("  Looks good.\n".into()));
        assert_eq!(r.ai, "Looks good.");
        let r = r.with_commentary(None);
        assert_eq!(r.ai, "");
    }

    #[test]
    fn rounding_does_not_touch_litres() {
        let r = sample().with_rounded_litres();
        assert_eq!(r.litres, 9.6);
        assert_eq!(r.litres_rounded, Some(10.0));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let r = sample().with_rounded_litres();
        let text = r.to_json_pretty().unwrap();
        let back: MeasurementReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, r);
    }
}
