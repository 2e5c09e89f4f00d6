//! Error taxonomy shared by every estimation stage.

/// Machine-readable error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidReference,
    InvalidScale,
    NoScaleAvailable,
    ScaleRequired,
    InvalidPaintConfig,
    InvalidRegion,
    OutOfRange,
    ImageDecode,
    Config,
}

impl ErrorKind {
    /// Stable identifier used in error payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidReference => "INVALID_REFERENCE",
            Self::InvalidScale => "INVALID_SCALE",
            Self::NoScaleAvailable => "NO_SCALE_AVAILABLE",
            Self::ScaleRequired => "SCALE_REQUIRED",
            Self::InvalidPaintConfig => "INVALID_PAINT_CONFIG",
            Self::InvalidRegion => "INVALID_REGION",
            Self::OutOfRange => "RESULT_OUT_OF_RANGE",
            Self::ImageDecode => "IMAGE_DECODE_ERROR",
            Self::Config => "CONFIG_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while resolving inputs or computing an estimate.
#[derive(Debug, Clone, PartialEq)]
pub enum MeasureError {
    /// Reference pair with a non-positive or non-finite component.
    InvalidReference {
        real_length_m: f64,
        pixel_length_px: f64,
    },
    /// Explicit meters-per-pixel value that is non-positive or non-finite.
    InvalidScale { scale_m_per_px: f64 },
    /// A scale was demanded but no scale input was supplied.
    NoScaleAvailable,
    /// Metric output was requested without a resolvable scale.
    ScaleRequired,
    /// Coverage must be positive and finite, coats at least one.
    InvalidPaintConfig { coverage_m2_per_litre: f64, coats: u32 },
    /// Explicit region outside the image or with zero extent.
    InvalidRegion(String),
    /// A computed quantity overflowed, underflowed to zero or is not a number.
    OutOfRange { quantity: &'static str, value: f64 },
    /// Image bytes could not be decoded (or decoded to an empty raster).
    ImageDecode(String),
    /// Engine configuration could not be read or parsed.
    Config(String),
}

impl MeasureError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidReference { .. } => ErrorKind::InvalidReference,
            Self::InvalidScale { .. } => ErrorKind::InvalidScale,
            Self::NoScaleAvailable => ErrorKind::NoScaleAvailable,
            Self::ScaleRequired => ErrorKind::ScaleRequired,
            Self::InvalidPaintConfig { .. } => ErrorKind::InvalidPaintConfig,
            Self::InvalidRegion(_) => ErrorKind::InvalidRegion,
            Self::OutOfRange { .. } => ErrorKind::OutOfRange,
            Self::ImageDecode(_) => ErrorKind::ImageDecode,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

impl std::fmt::Display for MeasureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference {
                real_length_m,
                pixel_length_px,
            } => write!(
                f,
                "invalid reference: real length {} m over {} px (both must be positive)",
                real_length_m, pixel_length_px
            ),
            Self::InvalidScale { scale_m_per_px } => write!(
                f,
                "invalid scale: {} m/px (must be positive and finite)",
                scale_m_per_px
            ),
            Self::NoScaleAvailable => write!(
                f,
                "no scale available: provide a scale (m/px) or a reference length and its pixel length"
            ),
            Self::ScaleRequired => write!(
                f,
                "metric output requires a scale: provide a scale (m/px) or a reference length and its pixel length"
            ),
            Self::InvalidPaintConfig {
                coverage_m2_per_litre,
                coats,
            } => write!(
                f,
                "invalid paint config: coverage {} m^2/L must be positive, coats {} must be at least 1",
                coverage_m2_per_litre, coats
            ),
            Self::InvalidRegion(msg) => write!(f, "invalid region: {}", msg),
            Self::OutOfRange { quantity, value } => write!(
                f,
                "{} = {} is out of range; check the scale and paint inputs",
                quantity, value
            ),
            Self::ImageDecode(msg) => write!(f, "image decode error: {}", msg),
            Self::Config(msg) => write!(f, "config error: {}", msg),
        }
    }
}

impl std::error::Error for MeasureError {}

impl From<image::ImageError> for MeasureError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageDecode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_stable_codes() {
        assert_eq!(MeasureError::ScaleRequired.kind().as_str(), "SCALE_REQUIRED");
        assert_eq!(
            MeasureError::InvalidPaintConfig {
                coverage_m2_per_litre: 0.0,
                coats: 2
            }
            .kind(),
            ErrorKind::InvalidPaintConfig
        );
        assert_eq!(
            MeasureError::ImageDecode("x".into()).kind().to_string(),
            "IMAGE_DECODE_ERROR"
        );
    }

    #[test]
    fn display_mentions_offending_values() {
        let err = MeasureError::InvalidReference {
            real_length_m: 1.0,
            pixel_length_px: -5.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("-5"), "message was: {msg}");
        assert!(msg.starts_with("invalid reference"));
    }
}
