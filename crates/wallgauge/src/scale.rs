//! Pixel-to-metric scale resolution.
//!
//! A view's scale comes from either an explicit meters-per-pixel value or a
//! reference object of known length measured in that view. The explicit value
//! wins when both are present.

use crate::error::MeasureError;

/// Meters per pixel for one image's pixel grid. Always positive and finite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, serde::Serialize)]
#[serde(transparent)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    /// Validate an explicit meters-per-pixel value.
    pub fn new(m_per_px: f64) -> Result<Self, MeasureError> {
        if m_per_px.is_finite() && m_per_px > 0.0 {
            Ok(Self(m_per_px))
        } else {
            Err(MeasureError::InvalidScale {
                scale_m_per_px: m_per_px,
            })
        }
    }

    pub fn m_per_px(self) -> f64 {
        self.0
    }

    /// Convert a pixel length into meters.
    #[inline]
    pub fn to_meters(self, px: f64) -> f64 {
        px * self.0
    }
}

/// Known real-world length of an object and its length in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReferenceMeasurement {
    pub real_length_m: f64,
    pub pixel_length_px: f64,
}

impl ReferenceMeasurement {
    pub fn new(real_length_m: f64, pixel_length_px: f64) -> Self {
        Self {
            real_length_m,
            pixel_length_px,
        }
    }

    /// Derive `real_length_m / pixel_length_px`.
    pub fn scale(&self) -> Result<ScaleFactor, MeasureError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.real_length_m) || !valid(self.pixel_length_px) {
            return Err(MeasureError::InvalidReference {
                real_length_m: self.real_length_m,
                pixel_length_px: self.pixel_length_px,
            });
        }
        ScaleFactor::new(self.real_length_m / self.pixel_length_px).map_err(|_| {
            MeasureError::InvalidReference {
                real_length_m: self.real_length_m,
                pixel_length_px: self.pixel_length_px,
            }
        })
    }
}

/// User-supplied scale information for a single view.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ScaleInput {
    /// Explicit meters per pixel.
    pub scale_m_per_px: Option<f64>,
    /// Reference-object calibration.
    pub reference: Option<ReferenceMeasurement>,
}

impl ScaleInput {
    pub fn explicit(m_per_px: f64) -> Self {
        Self {
            scale_m_per_px: Some(m_per_px),
            reference: None,
        }
    }

    pub fn from_reference(real_length_m: f64, pixel_length_px: f64) -> Self {
        Self {
            scale_m_per_px: None,
            reference: Some(ReferenceMeasurement::new(real_length_m, pixel_length_px)),
        }
    }

    /// True when neither an explicit scale nor a reference was given.
    pub fn is_empty(&self) -> bool {
        self.scale_m_per_px.is_none() && self.reference.is_none()
    }

    /// Resolve to a scale factor, or `None` when no input was supplied.
    ///
    /// An explicit scale takes precedence over the reference; the reference
    /// is not validated in that case.
    pub fn resolve(&self) -> Result<Option<ScaleFactor>, MeasureError> {
        if let Some(m_per_px) = self.scale_m_per_px {
            if self.reference.is_some() {
                tracing::debug!("explicit scale given together with a reference; using explicit scale");
            }
            return ScaleFactor::new(m_per_px).map(Some);
        }
        match &self.reference {
            Some(reference) => reference.scale().map(Some),
            None => Ok(None),
        }
    }

    /// Resolve and fail with [`MeasureError::NoScaleAvailable`] when absent.
    ///
    /// The estimator's metric path reports that absence as
    /// [`MeasureError::ScaleRequired`].
    pub fn require(&self) -> Result<ScaleFactor, MeasureError> {
        self.resolve()?.ok_or(MeasureError::NoScaleAvailable)
    }
}
