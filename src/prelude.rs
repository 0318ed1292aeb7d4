//! This module brings the pieces of a typical calibration session under a single namespace, to
//! prevent excessive imports: the color value types, the three computations (correction matrix,
//! CIEDE2000 and the gain controller), the measurement trait and the crate error. The gamma table,
//! CSV export and field parsing are left in their own modules.

pub use crate::calibrator::{
    BestCandidate, CalibrationOutcome, CalibrationStep, ControllerConfig, GainCalibrator,
    StopReason,
};
pub use crate::color::{Chromaticity, XYZColor, XyYColor};
pub use crate::colors::CIELABColor;
pub use crate::correction::{
    compute_correction_matrix, compute_gamut_matrix, CorrectionMatrix, Device, Primary,
    PrimarySet,
};
pub use crate::delta_e::{delta_e_2000, format_delta_e, DeltaECategory};
pub use crate::error::CalibrationError;
pub use crate::gain::{GainTriple, Sensitivity};
pub use crate::illuminants::Illuminant;
pub use crate::measure::{Measure, MeasureError, PanelSimulator};
