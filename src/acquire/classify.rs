//! Classification of raw device lines

use crate::error::{AppError, Result};
use crate::models::Measurement;

/// What a single device line turned out to be
#[derive(Debug, Clone, PartialEq)]
pub enum LineClass {
    /// A delay reading in milliseconds, with the line as the device sent
    /// it minus its terminators
    Measurement { value: Measurement, text: String },
    /// Output without a decimal point: banners, status chatter
    Noise(String),
    /// Nothing but line terminators or whitespace
    Empty,
}

/// Classify one raw line.
///
/// A line is a measurement when it contains a `.`; everything else is
/// noise. A line with a `.` that does not parse as a float is an error,
/// never noise.
pub fn classify_line(raw: &str) -> Result<LineClass> {
    let cleaned: String = raw.chars().filter(|c| !matches!(c, '\r' | '\n')).collect();

    if !raw.contains('.') {
        let text = cleaned.trim();
        return Ok(if text.is_empty() {
            LineClass::Empty
        } else {
            LineClass::Noise(text.to_string())
        });
    }

    let value = cleaned.trim().parse::<f64>().map_err(|_| {
        AppError::parse(format!(
            "Device sent {:?}, which contains '.' but is not a delay value",
            cleaned
        ))
    })?;

    // Literals beyond f64 range parse to infinity
    if !value.is_finite() {
        return Err(AppError::parse(format!(
            "Device sent {:?}, which is not a finite delay value",
            cleaned
        )));
    }

    Ok(LineClass::Measurement { value, text: cleaned })
}
