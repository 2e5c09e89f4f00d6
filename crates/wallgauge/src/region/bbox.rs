//! Pixel-space rectangles.

use crate::error::MeasureError;

/// Axis-aligned wall rectangle in an image's native pixel grid.
///
/// Carries the native image dimensions so a consumer displaying the image at
/// another resolution can remap the box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoundingBox {
    pub x_px: u32,
    pub y_px: u32,
    pub w_px: u32,
    pub h_px: u32,
    pub image_w_px: u32,
    pub image_h_px: u32,
}

impl BoundingBox {
    /// Build a box, checking that it has positive extent and lies inside the image.
    pub fn new(
        x_px: u32,
        y_px: u32,
        w_px: u32,
        h_px: u32,
        image_w_px: u32,
        image_h_px: u32,
    ) -> Result<Self, MeasureError> {
        if w_px == 0 || h_px == 0 {
            return Err(MeasureError::InvalidRegion(format!(
                "region {}x{} has zero extent",
                w_px, h_px
            )));
        }
        let right = u64::from(x_px) + u64::from(w_px);
        let bottom = u64::from(y_px) + u64::from(h_px);
        if right > u64::from(image_w_px) || bottom > u64::from(image_h_px) {
            return Err(MeasureError::InvalidRegion(format!(
                "region ({}, {}, {}, {}) exceeds image bounds {}x{}",
                x_px, y_px, w_px, h_px, image_w_px, image_h_px
            )));
        }
        Ok(Self {
            x_px,
            y_px,
            w_px,
            h_px,
            image_w_px,
            image_h_px,
        })
    }

    /// The whole image as a box.
    pub fn full_image(image_w_px: u32, image_h_px: u32) -> Self {
        Self {
            x_px: 0,
            y_px: 0,
            w_px: image_w_px,
            h_px: image_h_px,
            image_w_px,
            image_h_px,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.x_px + self.w_px
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.y_px + self.h_px
    }

    pub fn area_px(&self) -> u64 {
        u64::from(self.w_px) * u64::from(self.h_px)
    }

    /// Fraction of the image covered by the box, in [0, 1].
    pub fn area_fraction(&self) -> f64 {
        let image_area = u64::from(self.image_w_px) * u64::from(self.image_h_px);
        if image_area == 0 {
            return 0.0;
        }
        self.area_px() as f64 / image_area as f64
    }

    pub fn is_full_image(&self) -> bool {
        self.x_px == 0
            && self.y_px == 0
            && self.w_px == self.image_w_px
            && self.h_px == self.image_h_px
    }
}

/// Caller-supplied wall rectangle, validated against an image on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Attach image dimensions, failing with `InvalidRegion` when out of bounds.
    pub fn to_bbox(self, image_w_px: u32, image_h_px: u32) -> Result<BoundingBox, MeasureError> {
        BoundingBox::new(self.x, self.y, self.w, self.h, image_w_px, image_h_px)
    }
}
