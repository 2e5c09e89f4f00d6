//! Prompt text for the optional descriptive commentary.
//!
//! The request itself is made by the hosting service; this module only
//! turns a report into the instruction sent to a chat-completion model.

use crate::report::MeasurementReport;

/// System message for the commentary model.
pub const SYSTEM_PROMPT: &str = "You are a helpful construction assistant.";

/// User message summarising a report and asking for advice.
pub fn commentary_prompt(report: &MeasurementReport) -> String {
    let unit = report.units.symbol();
    let depth = match report.depth_m {
        Some(d) => format!("{:.3} {}", d, unit),
        None => "unknown".to_string(),
    };
    let mut prompt = format!(
        "You are an expert building estimator. Provide a concise (3-6 lines) human-friendly \
         summary of the wall measurement, and 3 short practical painting tips (bulleted).\n\n\
         Measurements: width={:.3} {unit}, height={:.3} {unit}, area={:.3} {unit}^2, depth={}\n\
         Paint estimate: {:.2} L, coverage {} m^2/L, coats {}\n",
        report.width_m,
        report.height_m,
        report.area_m2,
        depth,
        report.litres,
        report.coverage_m2_per_l,
        report.coats,
    );
    if report.low_confidence {
        prompt.push_str(
            "Note: the wall outline could not be detected reliably; the whole photo was measured.\n",
        );
    }
    prompt.push_str("\nOutput a friendly summary and short tips.");
    prompt
}
