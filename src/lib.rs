//! Chromatune is a numerical engine for display calibration. Colorimeters and spectroradiometers
//! report what they see as chromaticity plus luminance (xyY) or as tristimulus values (XYZ), and
//! everything a calibration workflow needs is built on top of those two representations: a 3x3
//! matrix that makes a cheap sensor agree with a reference instrument, the CIEDE2000 perceptual
//! difference for final quality checks, and a closed-loop controller that tunes RGB gains until
//! the panel's white lands on its target chromaticity.
//!
//! The engine is pure computation. Instruments, simulators and user interfaces plug in from the
//! outside: a [`Measure`](measure::Measure) implementation supplies readings, and the results come
//! back as plain values, formatted strings and plottable series.

// Clippy doesn't like long decimals, but adding separators in decimals isn't any more readable
#![allow(clippy::unreadable_literal)]
#![warn(missing_docs)]

#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate maplit;

pub mod calibrator;
pub mod color;
pub mod colors;
mod consts;
pub mod correction;
pub mod delta_e;
pub mod error;
pub mod fields;
pub mod gain;
pub mod gamma;
pub mod illuminants;
pub mod measure;
pub mod prelude;
pub mod report;
