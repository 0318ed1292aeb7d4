//! This module defines how the calibration engine gets readings: the [`Measure`] trait, a
//! capability with one method that sets gains on the panel and reports what the instrument saw.
//! Real instrument drivers implement it outside this crate; [`PanelSimulator`] implements it
//! here for testing and demos, and any suitable closure works too.
//!
//! A provider either returns promptly or fails outright. Retrying is the provider's business.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::color::XyYColor;
use crate::gain::GainTriple;

/// Why a measurement provider could not deliver a reading.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    /// The instrument or panel could not be reached or did not answer.
    #[error("instrument unavailable: {0}")]
    Unavailable(String),
    /// The instrument answered with something that is not a valid reading.
    #[error("instrument returned an invalid reading: {0}")]
    InvalidSample(XyYColor),
}

/// Something that can drive a panel at given gains and measure the result.
pub trait Measure {
    /// Applies `gains` to the panel and returns the measured xyY.
    fn measure(&mut self, gains: GainTriple) -> Result<XyYColor, MeasureError>;

    /// Like [`measure`](Measure::measure), but a reading with a NaN or infinite component is
    /// turned into [`MeasureError::InvalidSample`]. No distance or gain update can be derived from
    /// such a reading.
    fn checked_measure(&mut self, gains: GainTriple) -> Result<XyYColor, MeasureError> {
        let sample = self.measure(gains)?;
        if sample.x.is_finite() && sample.y.is_finite() && sample.luminance.is_finite() {
            Ok(sample)
        } else {
            Err(MeasureError::InvalidSample(sample))
        }
    }
}

impl<F> Measure for F
where
    F: FnMut(GainTriple) -> Result<XyYColor, MeasureError>,
{
    fn measure(&mut self, gains: GainTriple) -> Result<XyYColor, MeasureError> {
        self(gains)
    }
}

/// A linear model of a panel whose white point drifts with its gains, with optional measurement
/// noise.
///
/// The chromaticity is `x = 0.25 + 0.0004R + 0.0001G + 0.00005B` and
/// `y = 0.23 + 0.0001R + 0.0005G + 0.0001B`, at a constant luminance of 100. Noise, when enabled,
/// is uniform in `[-noise, noise)` on each coordinate and comes from a seeded generator, so runs
/// are reproducible.
/// # Example
/// ```
/// # use chromatune::gain::GainTriple;
/// # use chromatune::measure::{Measure, PanelSimulator};
/// let mut panel = PanelSimulator::new();
/// let reading = panel.measure(GainTriple::max()).unwrap();
/// assert!((reading.x - 0.3556).abs() <= 1e-12);
/// assert!((reading.y - 0.3644).abs() <= 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct PanelSimulator {
    noise: f64,
    rng: StdRng,
    readings: usize,
}

impl PanelSimulator {
    /// A noise-free panel.
    pub fn new() -> PanelSimulator {
        PanelSimulator::with_noise(0.0, 0)
    }

    /// A panel whose readings carry uniform noise of the given amplitude, drawn from a generator
    /// seeded with `seed`. A NaN or infinite amplitude has no usable range and gives a noise-free
    /// panel.
    pub fn with_noise(noise: f64, seed: u64) -> PanelSimulator {
        let noise = if noise.is_finite() {
            noise.abs()
        } else {
            warn!("ignoring non-finite simulator noise {}", noise);
            0.0
        };
        PanelSimulator {
            noise,
            rng: StdRng::seed_from_u64(seed),
            readings: 0,
        }
    }

    /// How many readings have been taken so far.
    pub fn readings(&self) -> usize {
        self.readings
    }

    fn jitter(&mut self) -> f64 {
        if self.noise > 0.0 {
            self.rng.gen_range(-self.noise..self.noise)
        } else {
            0.0
        }
    }
}

impl Default for PanelSimulator {
    fn default() -> PanelSimulator {
        PanelSimulator::new()
    }
}

impl Measure for PanelSimulator {
    fn measure(&mut self, gains: GainTriple) -> Result<XyYColor, MeasureError> {
        let (r, g, b) = (gains.red(), gains.green(), gains.blue());
        let x = 0.25 + 0.0004 * r + 0.0001 * g + 0.00005 * b + self.jitter();
        let y = 0.23 + 0.0001 * r + 0.0005 * g + 0.0001 * b + self.jitter();
        self.readings += 1;
        Ok(XyYColor::new(x, y, 100.0))
    }
}
