//! Wall depth from auxiliary side/top photographs.
//!
//! Each auxiliary view lives on its own pixel grid, so it needs its own scale.
//! The front scale is reused only when [`DepthConfig::allow_front_scale`] is
//! set; otherwise a view without a scale contributes a warning, not a number.

use image::GrayImage;

use crate::error::MeasureError;
use crate::region::{detect_region, RegionConfig};
use crate::scale::{ScaleFactor, ScaleInput};

/// Box dimension that spans the wall's depth in a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthAxis {
    Width,
    Height,
}

/// Auxiliary view a depth value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthSource {
    Side,
    Top,
}

impl std::fmt::Display for DepthSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Side => "side",
            Self::Top => "top",
        })
    }
}

/// Depth estimation controls.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Reuse the front-view scale for auxiliary views that have none.
    pub allow_front_scale: bool,
    /// Dimension measured in the side view.
    pub side_axis: DepthAxis,
    /// Dimension measured in the top view.
    pub top_axis: DepthAxis,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            allow_front_scale: false,
            side_axis: DepthAxis::Height,
            top_axis: DepthAxis::Width,
        }
    }
}

/// An auxiliary photograph and the scale information supplied for it.
#[derive(Debug, Clone)]
pub struct AuxView {
    pub image: GrayImage,
    pub scale: ScaleInput,
}

impl AuxView {
    pub fn new(image: GrayImage, scale: ScaleInput) -> Self {
        Self { image, scale }
    }
}

/// Depth result with provenance and non-fatal warnings.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DepthEstimate {
    pub depth_m: Option<f64>,
    pub source: Option<DepthSource>,
    pub warnings: Vec<String>,
}

/// Estimate wall depth, preferring the side view over the top view.
///
/// The top view is only examined when the side view is absent or yields no
/// value. A malformed scale input on an examined view is an error.
pub fn estimate_depth(
    side: Option<&AuxView>,
    top: Option<&AuxView>,
    front_scale: Option<ScaleFactor>,
    region: &RegionConfig,
    config: &DepthConfig,
) -> Result<DepthEstimate, MeasureError> {
    let mut warnings = Vec::new();
    let candidates = [
        (DepthSource::Side, side, config.side_axis),
        (DepthSource::Top, top, config.top_axis),
    ];

    for (source, view, axis) in candidates {
        let Some(view) = view else {
            continue;
        };
        if let Some(depth_m) =
            view_depth(source, view, axis, front_scale, region, config, &mut warnings)?
        {
            tracing::debug!("depth {:.3} m from {} view", depth_m, source);
            return Ok(DepthEstimate {
                depth_m: Some(depth_m),
                source: Some(source),
                warnings,
            });
        }
    }

    Ok(DepthEstimate {
        depth_m: None,
        source: None,
        warnings,
    })
}

fn view_depth(
    source: DepthSource,
    view: &AuxView,
    axis: DepthAxis,
    front_scale: Option<ScaleFactor>,
    region: &RegionConfig,
    config: &DepthConfig,
    warnings: &mut Vec<String>,
) -> Result<Option<f64>, MeasureError> {
    let scale = match (view.scale.resolve()?, front_scale) {
        (Some(own), _) => own,
        (None, Some(front)) if config.allow_front_scale => {
            warnings.push(format!(
                "{} view has no scale of its own; reusing the front scale",
                source
            ));
            front
        }
        (None, _) => {
            tracing::warn!("{} view supplied without a scale; skipping depth", source);
            warnings.push(format!(
                "{} view supplied without a scale; depth from it is unavailable",
                source
            ));
            return Ok(None);
        }
    };

    let detection = detect_region(&view.image, region);
    if let Some(reason) = detection.fallback {
        warnings.push(format!(
            "{} view detection is low confidence ({}); depth may be unreliable",
            source,
            reason.describe()
        ));
    }

    let px = match axis {
        DepthAxis::Width => detection.bbox.w_px,
        DepthAxis::Height => detection.bbox.h_px,
    };
    Ok(Some(scale.to_meters(f64::from(px))))
}
