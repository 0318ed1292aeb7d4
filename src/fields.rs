//! Conversion of the text a user typed into form fields into readings. Every error names the field
//! it came from, so a host can point at the box that needs fixing.

use crate::color::{XYZColor, XyYColor};
use crate::error::CalibrationError;

/// Parses a single number. Surrounding whitespace is ignored. Anything that is not a finite decimal
/// number, including the `NaN` and `inf` spellings Rust itself would accept, is rejected.
/// # Example
/// ```
/// # use chromatune::fields::parse_number;
/// assert_eq!(parse_number("Red x", " 0.64 ").unwrap(), 0.64);
/// assert!(parse_number("Red x", "0,64").is_err());
/// ```
pub fn parse_number(field: &str, text: &str) -> Result<f64, CalibrationError> {
    let invalid = || CalibrationError::InvalidNumber {
        field: field.to_string(),
        text: text.to_string(),
    };
    let value: f64 = text.trim().parse().map_err(|_| invalid())?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(invalid())
    }
}

fn parse_triple(
    field: &str,
    names: [&str; 3],
    texts: [&str; 3],
) -> Result<[f64; 3], CalibrationError> {
    let mut values = [0.0; 3];
    for ((value, name), text) in values.iter_mut().zip(names.iter()).zip(texts.iter()) {
        *value = parse_number(&format!("{} {}", field, name), text)?;
    }
    Ok(values)
}

/// Parses the `x`, `y` and `Y` boxes of one reading. The values are not range-checked here; that
/// is up to the computation that consumes them.
pub fn parse_xyy(field: &str, texts: [&str; 3]) -> Result<XyYColor, CalibrationError> {
    let [x, y, luminance] = parse_triple(field, ["x", "y", "Y"], texts)?;
    Ok(XyYColor::new(x, y, luminance))
}

/// Parses the `X`, `Y` and `Z` boxes of one reading.
pub fn parse_xyz(field: &str, texts: [&str; 3]) -> Result<XYZColor, CalibrationError> {
    let [x, y, z] = parse_triple(field, ["X", "Y", "Z"], texts)?;
    Ok(XYZColor::new(x, y, z))
}
