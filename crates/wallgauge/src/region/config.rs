/// Edge signal used to separate wall boundaries from surface texture.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeSignal {
    /// Scharr gradient magnitude with an adaptive percentile threshold.
    #[default]
    Scharr,
    /// Canny hysteresis edges (gradient thresholds on the Sobel scale).
    Canny { low: f32, high: f32 },
}

/// How the wall rectangle is derived from edge pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxMethod {
    /// Rectangle of the connected edge component with the largest extent.
    #[default]
    LargestComponent,
    /// Rectangle spanning the `span_percentiles` of edge coordinates per axis.
    PercentileSpan,
}

/// Wall region detection parameters.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// Longest side (pixels) of the working image; larger inputs are
    /// downscaled before detection. `0` disables downscaling.
    pub max_working_dim: u32,
    /// Gaussian pre-smoothing sigma. `0` disables smoothing.
    pub blur_sigma: f32,
    /// Edge signal.
    pub edge_signal: EdgeSignal,
    /// Percentile (in [0, 1]) of the gradient magnitude used as threshold.
    pub edge_percentile: f32,
    /// Threshold floor as a fraction of the maximum gradient magnitude.
    pub min_relative_magnitude: f32,
    /// Absolute threshold floor on the Scharr magnitude scale.
    pub min_edge_magnitude: f32,
    /// Rectangle extraction method.
    pub method: BoxMethod,
    /// Dilation radius (working pixels) used to bridge broken edges before
    /// component labelling.
    pub link_radius_px: u8,
    /// Lower/upper coordinate percentiles for [`BoxMethod::PercentileSpan`].
    pub span_percentiles: [f32; 2],
    /// Boxes covering less than this image fraction fall back to the whole image.
    pub min_area_frac: f32,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            max_working_dim: 1024,
            blur_sigma: 1.4,
            edge_signal: EdgeSignal::Scharr,
            edge_percentile: 0.95,
            min_relative_magnitude: 0.2,
            min_edge_magnitude: 40.0,
            method: BoxMethod::LargestComponent,
            link_radius_px: 2,
            span_percentiles: [0.05, 0.95],
            min_area_frac: 0.05,
        }
    }
}

impl RegionConfig {
    /// Canny settings matching a 50/150 hysteresis pass.
    pub fn canny() -> Self {
        Self {
            edge_signal: EdgeSignal::Canny {
                low: 50.0,
                high: 150.0,
            },
            ..Default::default()
        }
    }
}
