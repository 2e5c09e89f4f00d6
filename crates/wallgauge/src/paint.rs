//! Paint volume from wall area.

use crate::error::MeasureError;

pub const DEFAULT_COVERAGE_M2_PER_LITRE: f64 = 10.0;
pub const DEFAULT_COATS: u32 = 2;

/// Paint coverage and number of coats.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PaintConfig {
    /// Area covered by one litre of paint (m² per litre).
    pub coverage_m2_per_litre: f64,
    pub coats: u32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            coverage_m2_per_litre: DEFAULT_COVERAGE_M2_PER_LITRE,
            coats: DEFAULT_COATS,
        }
    }
}

impl PaintConfig {
    /// Build a validated config.
    pub fn new(coverage_m2_per_litre: f64, coats: u32) -> Result<Self, MeasureError> {
        let cfg = Self {
            coverage_m2_per_litre,
            coats,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), MeasureError> {
        let coverage_ok =
            self.coverage_m2_per_litre.is_finite() && self.coverage_m2_per_litre > 0.0;
        if !coverage_ok || self.coats < 1 {
            return Err(MeasureError::InvalidPaintConfig {
                coverage_m2_per_litre: self.coverage_m2_per_litre,
                coats: self.coats,
            });
        }
        Ok(())
    }
}

/// `litres = area_m2 * coats / coverage`.
///
/// Fails with [`MeasureError::OutOfRange`] when the area is negative or not
/// finite, or the volume overflows.
pub fn estimate_litres(area_m2: f64, paint: &PaintConfig) -> Result<f64, MeasureError> {
    paint.validate()?;
    if !(area_m2.is_finite() && area_m2 >= 0.0) {
        return Err(MeasureError::OutOfRange {
            quantity: "area_m2",
            value: area_m2,
        });
    }
    let litres = area_m2 * f64::from(paint.coats) / paint.coverage_m2_per_litre;
    if !litres.is_finite() {
        return Err(MeasureError::OutOfRange {
            quantity: "litres",
            value: litres,
        });
    }
    Ok(litres)
}

/// Round a volume up to whole litres for purchasing.
///
/// Values within 1e-9 above an integer round down to it, so float noise in
/// an exact result does not add a litre.
pub fn round_up_litres(litres: f64) -> f64 {
    (litres - 1e-9).ceil().max(0.0)
}
