//! This module turns a calibration history into things a host can show or keep: a series of
//! chromaticity points to plot against the target, and a CSV table with one row per step.

use std::io;

use crate::calibrator::CalibrationStep;
use crate::color::{Chromaticity, XyYColor};
use crate::gain::GainTriple;

/// The measured path of a calibration run in the chromaticity plane, together with the point it was
/// aiming for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    /// The target chromaticity.
    pub target: Chromaticity,
    /// Every reading, in the order it was taken.
    pub path: Vec<Chromaticity>,
}

impl PlotSeries {
    /// Collects the readings of a history.
    pub fn from_history(target: Chromaticity, history: &[CalibrationStep]) -> PlotSeries {
        PlotSeries {
            target,
            path: history.iter().map(|step| step.sample.chromaticity()).collect(),
        }
    }

    /// The path split into its x and y coordinates, the shape most plotting libraries want.
    pub fn coordinates(&self) -> (Vec<f64>, Vec<f64>) {
        self.path.iter().map(|point| (point.x, point.y)).unzip()
    }

    /// The last reading, if there is one.
    pub fn last(&self) -> Option<Chromaticity> {
        self.path.last().cloned()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Record {
    step: usize,
    red: f64,
    green: f64,
    blue: f64,
    x: f64,
    y: f64,
    luminance: f64,
    distance: f64,
}

impl From<&CalibrationStep> for Record {
    fn from(step: &CalibrationStep) -> Record {
        Record {
            step: step.index + 1,
            red: step.gains.red(),
            green: step.gains.green(),
            blue: step.gains.blue(),
            x: step.sample.x,
            y: step.sample.y,
            luminance: step.sample.luminance,
            distance: step.distance,
        }
    }
}

impl From<Record> for CalibrationStep {
    fn from(record: Record) -> CalibrationStep {
        CalibrationStep {
            index: record.step.saturating_sub(1),
            gains: GainTriple::new(record.red, record.green, record.blue),
            sample: XyYColor::new(record.x, record.y, record.luminance),
            distance: record.distance,
        }
    }
}

/// Writes a history as CSV with the header `step,red,green,blue,x,y,luminance,distance`. Steps
/// are numbered from 1, as in the status lines.
pub fn write_history_csv<W: io::Write>(writer: W, history: &[CalibrationStep]) -> csv::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    for step in history {
        writer.serialize(Record::from(step))?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads back a history written by [`write_history_csv`].
pub fn read_history_csv<R: io::Read>(reader: R) -> csv::Result<Vec<CalibrationStep>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut history = vec![];
    for result in reader.deserialize() {
        let record: Record = result?;
        history.push(CalibrationStep::from(record));
    }
    Ok(history)
}
