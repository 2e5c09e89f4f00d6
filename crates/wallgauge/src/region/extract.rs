//! Rectangle extraction from a binary edge mask.

use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::region_labelling::{connected_components, Connectivity};

use super::bbox::BoundingBox;
use super::signal::{percentile_u32, EDGE};

/// Half-open rectangle `[x0, x1) x [y0, y1)` in working-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Rect {
    /// Map from a `working_w x working_h` grid onto the native `w x h` grid,
    /// rounding outward and clamping to the image.
    pub fn to_native(self, working: (u32, u32), native: (u32, u32)) -> BoundingBox {
        let (ww, wh) = working;
        let (w, h) = native;
        let sx = w as f64 / ww as f64;
        let sy = h as f64 / wh as f64;

        let x0 = ((self.x0 as f64 * sx).floor() as u32).min(w - 1);
        let y0 = ((self.y0 as f64 * sy).floor() as u32).min(h - 1);
        let x1 = ((self.x1 as f64 * sx).ceil() as u32).clamp(x0 + 1, w);
        let y1 = ((self.y1 as f64 * sy).ceil() as u32).clamp(y0 + 1, h);

        BoundingBox {
            x_px: x0,
            y_px: y0,
            w_px: x1 - x0,
            h_px: y1 - y0,
            image_w_px: w,
            image_h_px: h,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ComponentStats {
    pixels: usize,
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
}

impl ComponentStats {
    const EMPTY: Self = Self {
        pixels: 0,
        min_x: u32::MAX,
        min_y: u32::MAX,
        max_x: 0,
        max_y: 0,
    };

    fn add(&mut self, x: u32, y: u32) {
        self.pixels += 1;
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn rect_area(&self) -> u64 {
        u64::from(self.max_x - self.min_x + 1) * u64::from(self.max_y - self.min_y + 1)
    }

    fn rect(&self) -> Rect {
        Rect {
            x0: self.min_x,
            y0: self.min_y,
            x1: self.max_x + 1,
            y1: self.max_y + 1,
        }
    }
}

/// Rectangle of the edge component with the largest extent.
///
/// Edges are dilated by `link_radius` before 8-connected labelling so that
/// broken outlines join up; the rectangle is measured on the undilated edge
/// pixels of the winning component. Ties prefer more edge pixels, then the
/// lower label. Returns the rectangle and the number of components found.
pub(crate) fn largest_component(mask: &GrayImage, link_radius: u8) -> (Option<Rect>, usize) {
    let linked;
    let label_src = if link_radius > 0 {
        linked = imageproc::morphology::dilate(mask, Norm::LInf, link_radius);
        &linked
    } else {
        mask
    };
    let labels = connected_components(label_src, Connectivity::Eight, Luma([0u8]));

    let mut comps: Vec<ComponentStats> = Vec::new();
    for (x, y, p) in mask.enumerate_pixels() {
        if p[0] != EDGE {
            continue;
        }
        let label = labels.get_pixel(x, y)[0] as usize;
        if label == 0 {
            continue;
        }
        if label >= comps.len() {
            comps.resize(label + 1, ComponentStats::EMPTY);
        }
        comps[label].add(x, y);
    }

    let n_components = comps.iter().filter(|c| c.pixels > 0).count();
    let best = comps
        .iter()
        .enumerate()
        .filter(|(_, c)| c.pixels > 0)
        .max_by(|(la, a), (lb, b)| {
            a.rect_area()
                .cmp(&b.rect_area())
                .then(a.pixels.cmp(&b.pixels))
                .then(lb.cmp(la))
        })
        .map(|(_, c)| c.rect());

    (best, n_components)
}

/// Rectangle spanning the `[lo, hi]` quantiles of edge coordinates per axis.
pub(crate) fn percentile_span(mask: &GrayImage, quantiles: [f32; 2]) -> Option<Rect> {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (x, y, p) in mask.enumerate_pixels() {
        if p[0] == EDGE {
            xs.push(x);
            ys.push(y);
        }
    }

    let lo = quantiles[0].min(quantiles[1]);
    let hi = quantiles[0].max(quantiles[1]);
    let x0 = percentile_u32(&mut xs, lo)?;
    let x1 = percentile_u32(&mut xs, hi)?;
    let y0 = percentile_u32(&mut ys, lo)?;
    let y1 = percentile_u32(&mut ys, hi)?;

    Some(Rect {
        x0,
        y0,
        x1: x1 + 1,
        y1: y1 + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(points: &[(u32, u32)], w: u32, h: u32) -> GrayImage {
        let mut m = GrayImage::new(w, h);
        for &(x, y) in points {
            m.put_pixel(x, y, Luma([EDGE]));
        }
        m
    }

    fn outline(x0: u32, y0: u32, x1: u32, y1: u32) -> Vec<(u32, u32)> {
        let mut pts = Vec::new();
        for x in x0..=x1 {
            pts.push((x, y0));
            pts.push((x, y1));
        }
        for y in y0..=y1 {
            pts.push((x0, y));
            pts.push((x1, y));
        }
        pts
    }

    #[test]
    fn largest_component_prefers_widest_extent() {
        let mut pts = outline(10, 10, 60, 40);
        // A dense blob with more pixels but a smaller rectangle.
        for y in 70..80 {
            for x in 70..85 {
                pts.push((x, y));
            }
        }
        let mask = mask_with(&pts, 100, 100);
        let (rect, n) = largest_component(&mask, 0);
        assert_eq!(n, 2);
        assert_eq!(
            rect,
            Some(Rect {
                x0: 10,
                y0: 10,
                x1: 61,
                y1: 41
            })
        );
    }

    #[test]
    fn linking_joins_broken_outline() {
        // Outline with 2-pixel gaps in every side.
        let pts: Vec<_> = outline(10, 10, 60, 40)
            .into_iter()
            .filter(|&(x, y)| !(x == 35 || x == 36 || y == 25 || y == 26))
            .collect();
        let mask = mask_with(&pts, 80, 60);

        let (_, n_unlinked) = largest_component(&mask, 0);
        assert!(n_unlinked > 1);

        let (rect, n_linked) = largest_component(&mask, 2);
        assert_eq!(n_linked, 1);
        let rect = rect.unwrap();
        assert_eq!((rect.x0, rect.y0, rect.x1, rect.y1), (10, 10, 61, 41));
    }

    #[test]
    fn percentile_span_ignores_sparse_outliers() {
        let mut pts = outline(20, 20, 79, 59);
        pts.push((0, 0));
        pts.push((99, 99));
        let mask = mask_with(&pts, 100, 100);
        let rect = percentile_span(&mask, [0.05, 0.95]).unwrap();
        assert_eq!((rect.x0, rect.y0, rect.x1, rect.y1), (20, 20, 80, 60));
    }

    #[test]
    fn empty_mask_yields_nothing() {
        let mask = GrayImage::new(20, 20);
        assert_eq!(largest_component(&mask, 2), (None, 0));
        assert_eq!(percentile_span(&mask, [0.05, 0.95]), None);
    }

    #[test]
    fn to_native_rounds_outward_and_clamps() {
        let r = Rect {
            x0: 85,
            y0: 43,
            x1: 905,
            y1: 658,
        };
        let b = r.to_native((1024, 683), (1200, 800));
        assert!(b.x_px <= 100 && b.right() >= 1060);
        assert!(b.right() <= 1200 && b.bottom() <= 800);

        let edge = Rect {
            x0: 0,
            y0: 0,
            x1: 1024,
            y1: 683,
        };
        assert!(edge.to_native((1024, 683), (1200, 800)).is_full_image());
    }
}
