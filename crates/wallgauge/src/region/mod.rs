//! Heuristic wall region detection.
//!
//! The wall is located from structural edges (corners, trim, frames) rather
//! than surface texture:
//!
//! 1. optional downscale to a bounded working resolution,
//! 2. Gaussian smoothing + Scharr gradient magnitude (or Canny),
//! 3. adaptive threshold (magnitude percentile with relative and absolute floors),
//! 4. rectangle of the largest linked edge component, or of the
//!    5th–95th percentile span of edge coordinates,
//! 5. whole-image fallback flagged as low confidence when nothing usable is found.
//!
//! Detection never fails for a non-empty image.

mod bbox;
mod config;
mod extract;
mod signal;

use std::borrow::Cow;

use image::imageops::FilterType;
use image::GrayImage;

pub use bbox::{BoundingBox, PixelRect};
pub use config::{BoxMethod, EdgeSignal, RegionConfig};

/// Why the whole-image fallback was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// No pixel exceeded the edge threshold.
    NoEdges,
    /// The detected rectangle covered less than `min_area_frac` of the image.
    TooSmall,
}

impl FallbackReason {
    pub fn describe(self) -> &'static str {
        match self {
            Self::NoEdges => "no structural edges found",
            Self::TooSmall => "detected region too small",
        }
    }
}

/// Detector statistics, mostly useful for logging and tuning.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct DetectionStats {
    /// Working resolution `[w, h]` the edges were computed at.
    pub working_size: [u32; 2],
    /// Gradient magnitude threshold, when the Scharr signal was used.
    pub threshold: Option<f32>,
    /// Number of edge pixels above threshold.
    pub edge_pixels: usize,
    /// Number of connected edge components (component method only).
    pub components: usize,
}

/// Wall region found in one image.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Detection {
    pub bbox: BoundingBox,
    /// True when the whole-image fallback was returned.
    pub low_confidence: bool,
    pub fallback: Option<FallbackReason>,
    pub stats: DetectionStats,
}

impl Detection {
    /// Wrap a caller-supplied region (no detection was run).
    pub fn explicit(bbox: BoundingBox) -> Self {
        Self {
            bbox,
            low_confidence: false,
            fallback: None,
            stats: DetectionStats::default(),
        }
    }

    fn fallback(w: u32, h: u32, reason: FallbackReason, stats: DetectionStats) -> Self {
        tracing::warn!(
            "wall detection fell back to whole image ({}x{}): {}",
            w,
            h,
            reason.describe()
        );
        Self {
            bbox: BoundingBox::full_image(w, h),
            low_confidence: true,
            fallback: Some(reason),
            stats,
        }
    }
}

/// Find the wall bounding box in a grayscale image.
///
/// The returned box is in the image's native pixel grid. Images with a zero
/// dimension yield a zero-sized fallback box; decoded images are never empty.
pub fn detect_region(gray: &GrayImage, config: &RegionConfig) -> Detection {
    let (w, h) = gray.dimensions();
    if w == 0 || h == 0 {
        return Detection::fallback(w, h, FallbackReason::NoEdges, DetectionStats::default());
    }

    let working = working_image(gray, config.max_working_dim);
    let (ww, wh) = working.dimensions();
    let edges = signal::edge_mask(&working, config);

    let mut stats = DetectionStats {
        working_size: [ww, wh],
        threshold: edges.threshold,
        edge_pixels: edges.edge_pixels,
        components: 0,
    };
    if edges.edge_pixels == 0 {
        return Detection::fallback(w, h, FallbackReason::NoEdges, stats);
    }

    let rect = match config.method {
        BoxMethod::LargestComponent => {
            let (rect, n) = extract::largest_component(&edges.mask, config.link_radius_px);
            stats.components = n;
            rect
        }
        BoxMethod::PercentileSpan => extract::percentile_span(&edges.mask, config.span_percentiles),
    };
    let Some(rect) = rect else {
        return Detection::fallback(w, h, FallbackReason::NoEdges, stats);
    };

    let bbox = rect.to_native((ww, wh), (w, h));
    if bbox.area_fraction() < f64::from(config.min_area_frac) {
        return Detection::fallback(w, h, FallbackReason::TooSmall, stats);
    }

    tracing::debug!(
        "wall region ({}, {}, {}x{}) in {}x{} image; {} edge px, threshold {:?}",
        bbox.x_px,
        bbox.y_px,
        bbox.w_px,
        bbox.h_px,
        w,
        h,
        stats.edge_pixels,
        stats.threshold,
    );

    Detection {
        bbox,
        low_confidence: false,
        fallback: None,
        stats,
    }
}

/// Downscale so the longer side is at most `max_dim` (0 = unlimited).
fn working_image(gray: &GrayImage, max_dim: u32) -> Cow<'_, GrayImage> {
    let (w, h) = gray.dimensions();
    let longest = w.max(h);
    if max_dim == 0 || longest <= max_dim {
        return Cow::Borrowed(gray);
    }
    let f = f64::from(max_dim) / f64::from(longest);
    let nw = ((f64::from(w) * f).round() as u32).max(1);
    let nh = ((f64::from(h) * f).round() as u32).max(1);
    Cow::Owned(image::imageops::resize(gray, nw, nh, FilterType::Triangle))
}
