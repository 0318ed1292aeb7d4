//! The errors that can come out of a calibration computation. Every failure is local to the one
//! request that caused it: a rejected matrix solve leaves nothing half-written, and a failed
//! controller step leaves the history and best candidate as they were.

use thiserror::Error;

use crate::color::XyYColor;
use crate::correction::{Device, Primary};
use crate::measure::MeasureError;

/// Errors raised by the calibration engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalibrationError {
    /// A primary reading is outside the physically valid xyY range.
    #[error("invalid xyY values for {device} {primary}: {sample}")]
    InvalidInput {
        /// The device the reading belongs to.
        device: Device,
        /// Which primary was being measured.
        primary: Primary,
        /// The offending reading.
        sample: XyYColor,
    },
    /// A white reading is outside the valid xyY range or has `y = 0`.
    #[error("invalid white point reading: {0}")]
    InvalidWhitePoint(XyYColor),
    /// A tristimulus component is negative or not a finite number.
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidTristimulus {
        /// Which component was rejected.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A text field did not contain a number.
    #[error("{field} is not a number: {text:?}")]
    InvalidNumber {
        /// The name of the field.
        field: String,
        /// What was entered.
        text: String,
    },
    /// A set of labelled primaries did not have exactly one entry per primary.
    #[error("invalid primary set: {0}")]
    InvalidPrimarySet(String),
    /// A gamma ramp cannot be turned into a lookup table.
    #[error("invalid gamma ramp: {0}")]
    InvalidGammaRamp(String),
    /// The matrix that has to be inverted has no inverse.
    #[error("matrix is singular (determinant {determinant:e})")]
    SingularMatrix {
        /// The determinant that was found to be numerically zero.
        determinant: f64,
    },
    /// The measurement provider failed.
    #[error("measurement failed: {0}")]
    Measurement(#[from] MeasureError),
}
