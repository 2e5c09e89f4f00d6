//! Engine configuration, loadable from JSON.
//!
//! Every section has defaults, so a file only needs the fields it changes:
//!
//! ```json
//! {
//!   "region": { "method": "percentile_span", "min_area_frac": 0.1 },
//!   "depth": { "allow_front_scale": true },
//!   "paint": { "coverage_m2_per_litre": 12.0 }
//! }
//! ```

use std::path::Path;

use crate::depth::DepthConfig;
use crate::error::MeasureError;
use crate::paint::PaintConfig;
use crate::region::RegionConfig;

/// Top-level estimator configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimatorConfig {
    /// Wall region detection.
    pub region: RegionConfig,
    /// Auxiliary-view depth estimation.
    pub depth: DepthConfig,
    /// Default paint parameters for requests that do not override them.
    pub paint: PaintConfig,
}

impl EstimatorConfig {
    pub fn from_json_str(text: &str) -> Result<Self, MeasureError> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| MeasureError::Config(format!("invalid config JSON: {}", e)))?;
        cfg.paint.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, MeasureError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            MeasureError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::region::BoxMethod;

    #[test]
    fn empty_object_gives_defaults() {
        let cfg = EstimatorConfig::from_json_str("{}").unwrap();
        assert_eq!(cfg.region.max_working_dim, 1024);
        assert!(!cfg.depth.allow_front_scale);
        assert_eq!(cfg.paint, PaintConfig::default());
    }

    #[test]
    fn sections_override_independently() {
        let cfg = EstimatorConfig::from_json_str(
            r#"{
                "region": { "method": "percentile_span" },
                "depth": { "allow_front_scale": true, "side_axis": "width" },
                "paint": { "coats": 3 }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.region.method, BoxMethod::PercentileSpan);
        assert!(cfg.depth.allow_front_scale);
        assert_eq!(cfg.paint.coats, 3);
        assert_eq!(cfg.paint.coverage_m2_per_litre, 10.0);
    }

    #[test]
    fn unknown_sections_and_bad_paint_are_rejected() {
        let err = EstimatorConfig::from_json_str(r#"{ "regoin": {} }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = EstimatorConfig::from_json_str(r#"{ "paint": { "coats": 0 } }"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPaintConfig);
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let err = EstimatorConfig::from_json_file(Path::new("/nonexistent/wallgauge.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
