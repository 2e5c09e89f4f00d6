//! Edge mask extraction: smoothing, gradient magnitude, adaptive threshold.

use image::{GrayImage, Luma};

use super::config::{EdgeSignal, RegionConfig};

/// Mask value marking an edge pixel.
pub(crate) const EDGE: u8 = 255;

/// Binary edge mask and the statistics that produced it.
pub(crate) struct EdgeMask {
    pub mask: GrayImage,
    /// Magnitude threshold (Scharr only; Canny thresholds are fixed).
    pub threshold: Option<f32>,
    pub edge_pixels: usize,
}

pub(crate) fn edge_mask(gray: &GrayImage, config: &RegionConfig) -> EdgeMask {
    match config.edge_signal {
        EdgeSignal::Scharr => scharr_mask(gray, config),
        EdgeSignal::Canny { low, high } => {
            // canny applies its own Gaussian pre-smoothing
            let mask = imageproc::edges::canny(gray, low.min(high), high.max(low));
            let edge_pixels = count_edges(&mask);
            EdgeMask {
                mask,
                threshold: None,
                edge_pixels,
            }
        }
    }
}

fn scharr_mask(gray: &GrayImage, config: &RegionConfig) -> EdgeMask {
    let (w, h) = gray.dimensions();
    let magnitude = if config.blur_sigma > 0.0 {
        let smoothed = imageproc::filter::gaussian_blur_f32(gray, config.blur_sigma);
        gradient_magnitude(&smoothed)
    } else {
        gradient_magnitude(gray)
    };

    let max_mag = magnitude.iter().copied().fold(0.0f32, f32::max);
    if max_mag <= config.min_edge_magnitude {
        return EdgeMask {
            mask: GrayImage::new(w, h),
            threshold: Some(config.min_edge_magnitude),
            edge_pixels: 0,
        };
    }

    let mut scratch = magnitude.clone();
    let threshold = percentile_f32(&mut scratch, config.edge_percentile)
        .max(config.min_relative_magnitude * max_mag)
        .max(config.min_edge_magnitude);

    let stride = w as usize;
    let mask = GrayImage::from_fn(w, h, |x, y| {
        let m = magnitude[y as usize * stride + x as usize];
        Luma([if m > threshold { EDGE } else { 0 }])
    });
    let edge_pixels = count_edges(&mask);

    EdgeMask {
        mask,
        threshold: Some(threshold),
        edge_pixels,
    }
}

/// Per-pixel Scharr gradient magnitude, row-major.
pub(crate) fn gradient_magnitude(gray: &GrayImage) -> Vec<f32> {
    let gx = imageproc::gradients::horizontal_scharr(gray);
    let gy = imageproc::gradients::vertical_scharr(gray);
    gx.as_raw()
        .iter()
        .zip(gy.as_raw().iter())
        .map(|(&gxv, &gyv)| {
            let gxv = gxv as f32;
            let gyv = gyv as f32;
            (gxv * gxv + gyv * gyv).sqrt()
        })
        .collect()
}

fn count_edges(mask: &GrayImage) -> usize {
    mask.as_raw().iter().filter(|&&v| v == EDGE).count()
}

/// Nearest-rank index of quantile `q` in a slice of length `len > 0`.
fn quantile_index(len: usize, q: f32) -> usize {
    let q = if q.is_finite() { q.clamp(0.0, 1.0) } else { 0.5 };
    (((len - 1) as f64) * q as f64).round() as usize
}

/// Quantile `q` of `values`. Reorders the slice; returns 0 when empty.
pub(crate) fn percentile_f32(values: &mut [f32], q: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let idx = quantile_index(values.len(), q);
    *values.select_nth_unstable_by(idx, f32::total_cmp).1
}

/// Quantile `q` of `values`. Reorders the slice; returns `None` when empty.
pub(crate) fn percentile_u32(values: &mut [u32], q: f32) -> Option<u32> {
    if values.is_empty() {
        return None;
    }
    let idx = quantile_index(values.len(), q);
    Some(*values.select_nth_unstable(idx).1)
}
