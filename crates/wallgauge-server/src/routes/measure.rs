//! Wall measurement endpoint.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};
use wallgauge::{
    decode_gray, AuxView, MeasureError, MeasurementReport, OutputUnits, PaintConfig,
    ReferenceMeasurement, ScaleInput,
};

use crate::error::ApiError;
use crate::AppState;

/// Uploaded images and text fields of a measure request.
#[derive(Debug, Default)]
pub struct MeasureForm {
    pub front: Option<Vec<u8>>,
    pub side: Option<Vec<u8>>,
    pub top: Option<Vec<u8>>,
    fields: HashMap<String, String>,
}

impl MeasureForm {
    /// Drain a multipart body. Empty file parts count as absent.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            tracing::debug!(field_name = %name, "Processing multipart field");

            match name.as_str() {
                "front" | "side" | "top" => {
                    let bytes = field.bytes().await?;
                    if bytes.is_empty() {
                        tracing::debug!(field_name = %name, "Ignoring empty file part");
                        continue;
                    }
                    let slot = match name.as_str() {
                        "front" => &mut form.front,
                        "side" => &mut form.side,
                        _ => &mut form.top,
                    };
                    *slot = Some(bytes.to_vec());
                }
                _ => {
                    let text = field.text().await?;
                    form.set_field(&name, &text);
                }
            }
        }
        Ok(form)
    }

    pub fn set_field(&mut self, name: &str, value: &str) {
        self.fields
            .insert(name.to_string(), value.trim().to_string());
    }

    /// First non-empty value among `names`, with the name it was found under.
    fn text<'a>(&'a self, names: &[&'a str]) -> Option<(&'a str, &'a str)> {
        names.iter().find_map(|&n| {
            self.fields
                .get(n)
                .filter(|v| !v.is_empty())
                .map(|v| (n, v.as_str()))
        })
    }

    fn number(&self, names: &[&str]) -> Result<Option<f64>, ApiError> {
        let Some((name, value)) = self.text(names) else {
            return Ok(None);
        };
        value
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ApiError::invalid_field(name, format!("expected a number, got '{}'", value)))
    }

    fn flag(&self, name: &str) -> bool {
        self.text(&[name])
            .map(|(_, v)| is_truthy(v))
            .unwrap_or(false)
    }

    fn scale(&self, scale: &str, real: &[&str], px: &[&str]) -> Result<ScaleInput, ApiError> {
        let scale_m_per_px = self.number(&[scale])?;
        let reference = match (self.number(real)?, self.number(px)?) {
            (Some(real_m), Some(pixels)) => Some(ReferenceMeasurement::new(real_m, pixels)),
            (None, None) => None,
            _ => {
                return Err(ApiError::invalid_field(
                    real[0],
                    format!("{} and {} must be given together", real[0], px[0]),
                ))
            }
        };
        Ok(ScaleInput {
            scale_m_per_px,
            reference,
        })
    }

    fn coats(&self) -> Result<Option<u32>, ApiError> {
        let Some((name, value)) = self.text(&["coats"]) else {
            return Ok(None);
        };
        if let Ok(n) = value.parse::<u32>() {
            return Ok(Some(n));
        }
        // "2.0" from form sliders
        match value.parse::<f64>() {
            Ok(f) if f >= 0.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) => Ok(Some(f as u32)),
            _ => Err(ApiError::invalid_field(
                name,
                format!("expected a whole number, got '{}'", value),
            )),
        }
    }

    fn units(&self) -> Result<OutputUnits, ApiError> {
        match self.text(&["units"]) {
            Some((name, value)) => OutputUnits::from_str(value)
                .map_err(|_| ApiError::invalid_field(name, format!("expected 'm' or 'px', got '{}'", value))),
            None => Ok(OutputUnits::default()),
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Non-image parameters of a measure request.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasureParams {
    pub front_scale: ScaleInput,
    pub side_scale: ScaleInput,
    pub top_scale: ScaleInput,
    pub paint: PaintConfig,
    pub units: OutputUnits,
    pub round_up: bool,
    pub use_ai: bool,
}

impl MeasureParams {
    /// Parse text fields; paint values default to `defaults`.
    pub fn from_form(form: &MeasureForm, defaults: PaintConfig) -> Result<Self, ApiError> {
        Ok(Self {
            front_scale: form.scale(
                "scale",
                &["ref_length_m", "ref_real"],
                &["ref_pixels", "ref_px"],
            )?,
            side_scale: form.scale("side_scale", &["side_ref_length_m"], &["side_ref_pixels"])?,
            top_scale: form.scale("top_scale", &["top_ref_length_m"], &["top_ref_pixels"])?,
            paint: PaintConfig {
                coverage_m2_per_litre: form
                    .number(&["coverage"])?
                    .unwrap_or(defaults.coverage_m2_per_litre),
                coats: form.coats()?.unwrap_or(defaults.coats),
            },
            units: form.units()?,
            round_up: form.flag("round_up"),
            use_ai: form.flag("use_ai"),
        })
    }
}

/// POST /measure - Measure a wall from uploaded photographs.
pub async fn measure(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<MeasurementReport>, ApiError> {
    let mut form = MeasureForm::read(&mut multipart)
        .await
        .map_err(|e| e.with_upload_limit(state.config.max_upload_mb))?;
    let front = form.front.take().ok_or(ApiError::MissingFront)?;
    let params = MeasureParams::from_form(&form, state.estimator.config().paint)?;
    let (side, top) = (form.side.take(), form.top.take());
    let use_ai = params.use_ai;

    tracing::info!(
        front_bytes = front.len(),
        side = side.is_some(),
        top = top.is_some(),
        units = params.units.symbol(),
        "Measure request"
    );

    // Decoding and detection are CPU-bound
    let estimator = Arc::clone(&state.estimator);
    let report = tokio::task::spawn_blocking(move || -> Result<MeasurementReport, MeasureError> {
        let mut req = estimator
            .request(decode_gray(&front)?)
            .with_scale(params.front_scale)
            .with_paint(params.paint)
            .with_units(params.units);
        if let Some(bytes) = side {
            req.side = Some(AuxView::new(decode_gray(&bytes)?, params.side_scale));
        }
        if let Some(bytes) = top {
            req.top = Some(AuxView::new(decode_gray(&bytes)?, params.top_scale));
        }
        req.round_up_litres = params.round_up;
        estimator.estimate(&req)
    })
    .await??;

    let report = match (&state.commentary, use_ai) {
        (Some(client), true) => {
            let text = client.describe(&report).await;
            report.with_commentary(text)
        }
        (None, true) => {
            tracing::debug!("Commentary requested but no API key is configured");
            report
        }
        (_, false) => report,
    };

    Ok(Json(report))
}
