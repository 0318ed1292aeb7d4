//! This module contains the closed-loop white-point controller. A [`GainCalibrator`] owns every
//! piece of state a calibration run has: the current gains, the append-only history of
//! [`CalibrationStep`]s, the best candidate seen so far, the iteration counter and the running
//! flag. Nothing is global, so any number of calibrators can run side by side, and a host can drive
//! one step at a time from a timer or hand the whole loop to [`GainCalibrator::run`].
//!
//! Each step measures the panel, scores the reading by its planar distance to the target
//! chromaticity, and applies a damped proportional update: red moves x, green moves y, and blue
//! gets a coarse nudge only while the reading is still far away. The gains with the smallest
//! distance ever measured are kept as the recommended operating point, since later iterations can
//! wander off again.

use std::fmt;

use crate::color::{Chromaticity, XyYColor};
use crate::error::CalibrationError;
use crate::gain::{GainTriple, Sensitivity};
use crate::measure::Measure;
use crate::report::PlotSeries;

/// How far the red and green gains are pulled down when probing the panel's sensitivity.
const PROBE_STEP: f64 = 15.0;

/// Tunables of the controller. The defaults are the ones the controller was designed around: 20
/// steps from full gains, a damping of 0.8, and no early exit.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// How many measurements a run takes at most.
    pub max_steps: usize,
    /// Where the gains start.
    pub initial_gains: GainTriple,
    /// The fraction of the estimated correction applied per step.
    pub damping: f64,
    /// How much the chromaticity moves per gain step, before any probing.
    pub sensitivity: Sensitivity,
    /// The blue gain moves by this much per unit of summed chromaticity error.
    pub blue_step: f64,
    /// Blue is only adjusted while the distance is above this.
    pub blue_threshold: f64,
    /// If set, a step whose distance falls below this ends the run early.
    pub convergence_threshold: Option<f64>,
}

impl Default for ControllerConfig {
    fn default() -> ControllerConfig {
        ControllerConfig {
            max_steps: 20,
            initial_gains: GainTriple::max(),
            damping: 0.8,
            sensitivity: Sensitivity::default(),
            blue_step: 50.0,
            blue_threshold: 0.01,
            convergence_threshold: None,
        }
    }
}

/// One iteration of a calibration run: the gains that were applied, what was measured, and how far
/// that was from the target. Steps are never changed after they are recorded.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationStep {
    /// The zero-based iteration this step was taken at.
    pub index: usize,
    /// The gains in effect during the measurement.
    pub gains: GainTriple,
    /// The reading.
    pub sample: XyYColor,
    /// Planar chromaticity distance from the reading to the target.
    pub distance: f64,
}

/// The status line hosts print after every step, numbered from 1:
/// `[01] R:192 G:192 B:192 | x:0.3556 y:0.3644 | Dist:0.05562`.
impl fmt::Display for CalibrationStep {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{:02}] {} | x:{:.4} y:{:.4} | Dist:{:.5}",
            self.index + 1,
            self.gains,
            self.sample.x,
            self.sample.y,
            self.distance
        )
    }
}

/// The closest the panel has come to the target during a run.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestCandidate {
    /// The gains that produced the reading.
    pub gains: GainTriple,
    /// Its distance to the target.
    pub distance: f64,
    /// The iteration it was measured at.
    pub iteration: usize,
}

/// Why a calibration run ended.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Every allowed step was taken.
    StepLimit,
    /// The host cleared the running flag.
    Cancelled,
    /// A reading came within the configured convergence threshold.
    Converged,
    /// The measurement provider failed and the run was abandoned.
    MeasurementFailed,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let reason = match self {
            StopReason::StepLimit => "step limit reached",
            StopReason::Cancelled => "cancelled",
            StopReason::Converged => "converged",
            StopReason::MeasurementFailed => "measurement failed",
        };
        write!(f, "{}", reason)
    }
}

/// The summary of a finished [`GainCalibrator::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationOutcome {
    /// Why the run stopped.
    pub reason: StopReason,
    /// The recommended gains, if anything was measured at all.
    pub best: Option<BestCandidate>,
    /// How many steps the history holds.
    pub steps: usize,
    /// The error that ended the run, for [`StopReason::MeasurementFailed`].
    pub error: Option<CalibrationError>,
}

/// A white-point calibration run against a fixed target chromaticity.
///
/// A new calibrator is idle: call [`start`](GainCalibrator::start) and then
/// [`step`](GainCalibrator::step) as often as the host likes, or let
/// [`run`](GainCalibrator::run) do both.
/// # Example
/// ```
/// # use chromatune::prelude::*;
/// let mut panel = PanelSimulator::new();
/// let mut calibrator = GainCalibrator::new(Illuminant::D65.chromaticity());
/// let outcome = calibrator.run(&mut panel);
/// assert_eq!(outcome.reason, StopReason::StepLimit);
/// assert_eq!(calibrator.history().len(), 20);
/// assert!(outcome.best.unwrap().distance < 0.01);
/// ```
#[derive(Debug, Clone)]
pub struct GainCalibrator {
    target: Chromaticity,
    config: ControllerConfig,
    sensitivity: Sensitivity,
    gains: GainTriple,
    history: Vec<CalibrationStep>,
    best: Option<BestCandidate>,
    iteration: usize,
    running: bool,
    stop_reason: Option<StopReason>,
}

impl GainCalibrator {
    /// A calibrator with the default configuration.
    pub fn new(target: Chromaticity) -> GainCalibrator {
        GainCalibrator::with_config(target, ControllerConfig::default())
    }

    /// A calibrator with the given configuration.
    pub fn with_config(target: Chromaticity, config: ControllerConfig) -> GainCalibrator {
        GainCalibrator {
            target,
            config,
            sensitivity: config.sensitivity,
            gains: config.initial_gains,
            history: Vec::with_capacity(config.max_steps),
            best: None,
            iteration: 0,
            running: false,
            stop_reason: None,
        }
    }

    /// The chromaticity this run aims for.
    pub fn target(&self) -> Chromaticity {
        self.target
    }

    /// The configuration the calibrator was built with.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The sensitivity the controller currently steers with.
    pub fn sensitivity(&self) -> Sensitivity {
        self.sensitivity
    }

    /// The gains the next step will measure at.
    pub fn gains(&self) -> GainTriple {
        self.gains
    }

    /// Every step taken so far, in order.
    pub fn history(&self) -> &[CalibrationStep] {
        &self.history
    }

    /// The best candidate seen so far.
    pub fn best(&self) -> Option<BestCandidate> {
        self.best
    }

    /// The number of completed steps.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Returns `true` while steps are allowed.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Why the run stopped, if it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Sets the running flag. Completed steps are kept, so a cancelled run can be resumed.
    pub fn start(&mut self) {
        self.running = true;
        self.stop_reason = None;
    }

    /// Clears the running flag. The next call to [`step`](GainCalibrator::step) does nothing;
    /// nothing already recorded is undone.
    pub fn cancel(&mut self) {
        if self.running {
            info!("calibration cancelled after {} steps", self.iteration);
            self.running = false;
            self.stop_reason = Some(StopReason::Cancelled);
        }
    }

    fn finish(&mut self, reason: StopReason) {
        self.running = false;
        self.stop_reason = Some(reason);
        match self.best {
            Some(best) => info!(
                "calibration stopped ({}): best {} at step {} with distance {:.5}",
                reason,
                best.gains,
                best.iteration + 1,
                best.distance
            ),
            None => info!("calibration stopped ({}) without any measurement", reason),
        }
    }

    /// Takes one measurement and moves the gains toward the target.
    ///
    /// Returns `Ok(None)` when the calibrator is not running or has used up its steps. A failing
    /// provider aborts this step only: the history, the best candidate and the gains stay exactly as
    /// they were, and the step can be retried.
    pub fn step<M: Measure + ?Sized>(
        &mut self,
        meter: &mut M,
    ) -> Result<Option<CalibrationStep>, CalibrationError> {
        if !self.running {
            return Ok(None);
        }
        if self.iteration >= self.config.max_steps {
            self.finish(StopReason::StepLimit);
            return Ok(None);
        }

        let sample = meter.checked_measure(self.gains).map_err(|err| {
            warn!("measurement failed at step {}: {}", self.iteration + 1, err);
            CalibrationError::from(err)
        })?;
        let err_x = self.target.x - sample.x;
        let err_y = self.target.y - sample.y;
        let distance = (err_x * err_x + err_y * err_y).sqrt();

        let step = CalibrationStep {
            index: self.iteration,
            gains: self.gains,
            sample,
            distance,
        };
        debug!("{}", step);
        self.history.push(step);

        let min_distance = self.best.map_or(std::f64::INFINITY, |best| best.distance);
        if distance < min_distance {
            info!("new best {} with distance {:.5}", self.gains, distance);
            self.best = Some(BestCandidate {
                gains: self.gains,
                distance,
                iteration: self.iteration,
            });
        }

        let damping = self.config.damping;
        let red = self.gains.red() + damping * err_x / self.sensitivity.red;
        let green = self.gains.green() + damping * err_y / self.sensitivity.green;
        let blue = if distance > self.config.blue_threshold {
            self.gains.blue() + self.config.blue_step * (err_x + err_y)
        } else {
            self.gains.blue()
        };
        self.gains = GainTriple::new(red, green, blue);
        self.iteration += 1;

        let converged = self
            .config
            .convergence_threshold
            .map_or(false, |threshold| distance < threshold);
        if converged {
            self.finish(StopReason::Converged);
        } else if self.iteration >= self.config.max_steps {
            self.finish(StopReason::StepLimit);
        }
        Ok(Some(step))
    }

    /// Starts the calibrator and steps it until it stops. This never fails: a provider error ends
    /// the run with [`StopReason::MeasurementFailed`], keeping everything measured before it.
    pub fn run<M: Measure + ?Sized>(&mut self, meter: &mut M) -> CalibrationOutcome {
        self.start();
        let mut error = None;
        loop {
            match self.step(meter) {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(err) => {
                    self.finish(StopReason::MeasurementFailed);
                    error = Some(err);
                    break;
                }
            }
        }
        CalibrationOutcome {
            reason: self.stop_reason.unwrap_or(StopReason::StepLimit),
            best: self.best,
            steps: self.history.len(),
            error,
        }
    }

    /// Estimates how strongly this panel reacts to red and green by measuring at the current gains
    /// and again with each of them lowered by 15. The probe readings are not part of the history.
    ///
    /// If either estimate is too small to steer with, the configured sensitivity is kept and a
    /// warning is logged. Returns the sensitivity in effect afterwards.
    pub fn probe_sensitivity<M: Measure + ?Sized>(
        &mut self,
        meter: &mut M,
    ) -> Result<Sensitivity, CalibrationError> {
        let base = meter.checked_measure(self.gains)?;
        let red_probe = self.gains.with_red(self.gains.red() - PROBE_STEP);
        let green_probe = self.gains.with_green(self.gains.green() - PROBE_STEP);
        let red = meter.checked_measure(red_probe)?;
        let green = meter.checked_measure(green_probe)?;

        let probed = Sensitivity {
            red: (base.x - red.x).abs() / PROBE_STEP,
            green: (base.y - green.y).abs() / PROBE_STEP,
        };
        if probed.is_usable() {
            debug!(
                "probed sensitivity: red {:.6}, green {:.6}",
                probed.red, probed.green
            );
            self.sensitivity = probed;
        } else {
            warn!(
                "probed sensitivity (red {:e}, green {:e}) is unusable, keeping red {:.6}, green {:.6}",
                probed.red, probed.green, self.sensitivity.red, self.sensitivity.green
            );
        }
        Ok(self.sensitivity)
    }

    /// The target and the measured path through the chromaticity plane, ready to plot.
    pub fn plot_series(&self) -> PlotSeries {
        PlotSeries::from_history(self.target, &self.history)
    }
}
