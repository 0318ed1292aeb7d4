//! This module describes the controls a white balance works with: per-channel RGB gains, and the
//! sensitivity model that says how far a gain step moves the measured chromaticity.
//!
//! Gains model a fixed-point panel register with 192 as its top value, so every gain triple is
//! clamped to `[0, 192]` whenever it is built. There is no way to hold an out-of-range gain.

use std::fmt;

use crate::consts::MAX_GAIN;

/// Clamps a single gain to the addressable range. NaN has no sensible gain and becomes 0.
fn clamp_gain(gain: f64) -> f64 {
    if gain.is_nan() {
        0.0
    } else {
        num::clamp(gain, 0.0, MAX_GAIN)
    }
}

/// The red, green and blue gains applied to a panel at one point in time.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GainTriple {
    red: f64,
    green: f64,
    blue: f64,
}

impl GainTriple {
    /// The highest gain any channel can take.
    pub const MAX: f64 = MAX_GAIN;

    /// Creates a gain triple, clamping each channel to `[0, 192]`.
    /// # Example
    /// ```
    /// # use chromatune::gain::GainTriple;
    /// let gains = GainTriple::new(250.0, -3.0, 100.5);
    /// assert_eq!(gains.red(), 192.0);
    /// assert_eq!(gains.green(), 0.0);
    /// assert_eq!(gains.blue(), 100.5);
    /// ```
    pub fn new(red: f64, green: f64, blue: f64) -> GainTriple {
        GainTriple {
            red: clamp_gain(red),
            green: clamp_gain(green),
            blue: clamp_gain(blue),
        }
    }

    /// Every channel at its maximum, where a calibration starts.
    pub fn max() -> GainTriple {
        GainTriple::new(MAX_GAIN, MAX_GAIN, MAX_GAIN)
    }

    /// The red gain.
    pub fn red(&self) -> f64 {
        self.red
    }

    /// The green gain.
    pub fn green(&self) -> f64 {
        self.green
    }

    /// The blue gain.
    pub fn blue(&self) -> f64 {
        self.blue
    }

    /// A copy with the red gain replaced (and clamped).
    pub fn with_red(&self, red: f64) -> GainTriple {
        GainTriple::new(red, self.green, self.blue)
    }

    /// A copy with the green gain replaced (and clamped).
    pub fn with_green(&self, green: f64) -> GainTriple {
        GainTriple::new(self.red, green, self.blue)
    }

    /// A copy with the blue gain replaced (and clamped).
    pub fn with_blue(&self, blue: f64) -> GainTriple {
        GainTriple::new(self.red, self.green, blue)
    }
}

impl Default for GainTriple {
    fn default() -> GainTriple {
        GainTriple::max()
    }
}

/// Gains are shown truncated to whole register steps, as the panel sees them.
impl fmt::Display for GainTriple {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "R:{} G:{} B:{}",
            self.red.trunc(),
            self.green.trunc(),
            self.blue.trunc()
        )
    }
}

/// How much the measured chromaticity moves per unit of gain: red mostly moves x, green mostly
/// moves y. Units are chromaticity per gain step.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sensitivity {
    /// Change of x per step of red gain.
    pub red: f64,
    /// Change of y per step of green gain.
    pub green: f64,
}

impl Sensitivity {
    /// Below this a sensitivity is indistinguishable from noise and would blow up the controller.
    pub const MIN: f64 = 1e-7;

    /// Returns `true` if both channels move the chromaticity measurably.
    pub fn is_usable(&self) -> bool {
        self.red >= Sensitivity::MIN && self.green >= Sensitivity::MIN
    }
}

impl Default for Sensitivity {
    fn default() -> Sensitivity {
        Sensitivity {
            red: 0.0006,
            green: 0.0005,
        }
    }
}
