//! This module builds a gamma-correcting lookup table from a luminance ramp. The panel is measured
//! at 0%, 10%, ..., 100% drive, and for every 8-bit input code the table holds the drive level
//! whose measured luminance matches the target power-law curve, interpolating linearly between
//! the measured points.

use std::fmt;

use crate::color::XyYColor;
use crate::error::CalibrationError;

/// The number of ramp measurements, 0% to 100% in steps of 10%.
pub const RAMP_POINTS: usize = 11;

/// The distance in input codes between two ramp measurements.
const SEGMENT_WIDTH: f64 = 25.5;

/// Segments whose luminance changes less than this are treated as flat.
const FLAT_SEGMENT: f64 = 1e-9;

/// A 256-entry table mapping an input code to the drive level that produces the target gamma.
#[derive(Clone)]
pub struct GammaLut {
    gamma: f64,
    entries: [u8; 256],
}

impl GammaLut {
    /// Builds the table from an 11-point luminance ramp, aiming for `(i / 255)^gamma` of the
    /// ramp's peak luminance at code `i`. Only the luminance of each reading is used.
    ///
    /// Fails if the ramp does not have exactly 11 readings, if any luminance is negative or not a
    /// number, or if the 100% reading is not brighter than black.
    /// # Example
    /// ```
    /// # use chromatune::color::XyYColor;
    /// # use chromatune::gamma::GammaLut;
    /// // a panel that already follows gamma 2.2
    /// let ramp: Vec<XyYColor> = (0..11)
    ///     .map(|i| XyYColor::new(0.3127, 0.3290, (i as f64 / 10.0).powf(2.2) * 100.0))
    ///     .collect();
    /// let lut = GammaLut::from_ramp(&ramp, 2.2).unwrap();
    /// assert_eq!(lut.get(0), 0);
    /// assert_eq!(lut.get(128), 128);
    /// assert_eq!(lut.get(255), 255);
    /// ```
    pub fn from_ramp(ramp: &[XyYColor], gamma: f64) -> Result<GammaLut, CalibrationError> {
        if ramp.len() != RAMP_POINTS {
            return Err(CalibrationError::InvalidGammaRamp(format!(
                "expected {} readings, got {}",
                RAMP_POINTS,
                ramp.len()
            )));
        }
        if let Some(bad) = ramp
            .iter()
            .position(|r| r.luminance < 0.0 || r.luminance.is_nan())
        {
            return Err(CalibrationError::InvalidGammaRamp(format!(
                "reading {} has luminance {}",
                bad, ramp[bad].luminance
            )));
        }
        let peak = ramp[RAMP_POINTS - 1].luminance;
        if !(peak > 0.0) {
            return Err(CalibrationError::InvalidGammaRamp(
                "the 100% reading has no luminance".to_string(),
            ));
        }

        let luminances: Vec<f64> = ramp.iter().map(|r| r.luminance).collect();
        let mut entries = [0u8; 256];
        for (code, entry) in entries.iter_mut().enumerate() {
            let target = (code as f64 / 255.0).powf(gamma) * peak;
            // readings that never bracket the target extrapolate from the first segment
            let seg = luminances
                .windows(2)
                .position(|pair| target >= pair[0] && target <= pair[1])
                .unwrap_or(0);
            let (y0, y1) = (luminances[seg], luminances[seg + 1]);
            let x0 = seg as f64 * SEGMENT_WIDTH;
            let drive = if (y1 - y0).abs() < FLAT_SEGMENT {
                x0
            } else {
                x0 + (target - y0) * SEGMENT_WIDTH / (y1 - y0)
            };
            *entry = num::clamp(drive.round(), 0.0, 255.0) as u8;
        }
        debug!(
            "gamma {} table: 64 -> {}, 128 -> {}, 192 -> {}",
            gamma, entries[64], entries[128], entries[192]
        );
        Ok(GammaLut { gamma, entries })
    }

    /// The gamma the table was built for.
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// The drive level for an input code.
    pub fn get(&self, code: u8) -> u8 {
        self.entries[code as usize]
    }

    /// The whole table.
    pub fn entries(&self) -> &[u8; 256] {
        &self.entries
    }
}

impl fmt::Debug for GammaLut {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GammaLut")
            .field("gamma", &self.gamma)
            .field("entries", &&self.entries[..])
            .finish()
    }
}

impl PartialEq for GammaLut {
    fn eq(&self, other: &GammaLut) -> bool {
        self.gamma == other.gamma && self.entries[..] == other.entries[..]
    }
}
