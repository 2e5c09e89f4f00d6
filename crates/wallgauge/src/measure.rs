//! Pixel geometry to real-world dimensions.

use crate::error::MeasureError;
use crate::region::BoundingBox;
use crate::scale::ScaleFactor;

/// Unit system of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum OutputUnits {
    /// Meters (requires a scale).
    #[default]
    #[serde(rename = "m", alias = "metric")]
    Metric,
    /// Raw pixels of the front image.
    #[serde(rename = "px", alias = "pixels")]
    Pixels,
}

impl OutputUnits {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Metric => "m",
            Self::Pixels => "px",
        }
    }
}

impl std::str::FromStr for OutputUnits {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "m" | "metric" | "meters" => Ok(Self::Metric),
            "px" | "pixels" => Ok(Self::Pixels),
            other => Err(format!("unknown units '{}': expected 'm' or 'px'", other)),
        }
    }
}

/// Wall dimensions.
///
/// Field names carry the metric suffix of the output contract; with
/// [`OutputUnits::Pixels`] they hold pixels and px² instead.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Measurement {
    pub width_m: f64,
    pub height_m: f64,
    /// Passed through from depth estimation; not part of the area.
    pub depth_m: Option<f64>,
    /// Paintable wall surface, `width_m * height_m`.
    pub area_m2: f64,
    pub units: OutputUnits,
}

/// Convert a bounding box into wall dimensions.
///
/// Metric output needs a scale and fails with [`MeasureError::ScaleRequired`]
/// otherwise. Pixel output ignores the scale and drops depth, which lives on
/// another view's pixel grid. Values are not rounded.
///
/// Metric dimensions that overflow to infinity or underflow to zero fail with
/// [`MeasureError::OutOfRange`].
pub fn measure(
    scale: Option<ScaleFactor>,
    bbox: &BoundingBox,
    depth_m: Option<f64>,
    units: OutputUnits,
) -> Result<Measurement, MeasureError> {
    let (w_px, h_px) = (f64::from(bbox.w_px), f64::from(bbox.h_px));
    let (width, height, depth) = match units {
        OutputUnits::Metric => {
            let scale = scale.ok_or(MeasureError::ScaleRequired)?;
            (scale.to_meters(w_px), scale.to_meters(h_px), depth_m)
        }
        OutputUnits::Pixels => (w_px, h_px, None),
    };

    let area = width * height;
    if units == OutputUnits::Metric {
        positive_finite("width_m", width)?;
        positive_finite("height_m", height)?;
        positive_finite("area_m2", area)?;
        if let Some(d) = depth {
            positive_finite("depth_m", d)?;
        }
    }

    Ok(Measurement {
        width_m: width,
        height_m: height,
        depth_m: depth,
        area_m2: area,
        units,
    })
}

fn positive_finite(quantity: &'static str, value: f64) -> Result<(), MeasureError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(MeasureError::OutOfRange { quantity, value })
    }
}
