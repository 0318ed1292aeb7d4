//! This module provides an enum of the standard illuminants a display is usually calibrated to,
//! together with their white points. The tristimulus table is normalized so that the Y (luminance)
//! value is 100, which is the scale CIELAB conversion expects; the chromaticity table is what a
//! gain calibration targets. D65 uses the `108.883` Z value common to display tooling.

use crate::color::{Chromaticity, XYZColor};

/// A listing of the supported CIE standard illuminants. D65 is by far the most common white point
/// for displays (sRGB, BT.709); D50 is the print and graphic arts standard.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Illuminant {
    /// Horizon daylight, 5003 K. The graphic arts standard.
    D50,
    /// Mid-morning daylight, 5503 K.
    D55,
    /// Noon daylight, 6504 K. The white point of sRGB and BT.709.
    D65,
    /// North sky daylight, 7504 K.
    D75,
    /// Represents a light of any given chromaticity, as an array [x, y].
    Custom([f64; 2]),
}

/// An array of the named illuminants, in the same order as below.
pub static ILLUMINANTS: [Illuminant; 4] = [
    Illuminant::D50,
    Illuminant::D55,
    Illuminant::D65,
    Illuminant::D75,
];

/// White point tristimulus values for the named illuminants, normalized so that Y is 100. The
/// order of the rows is the order of the Illuminant enum definition.
pub static ILLUMINANT_WHITE_POINTS: [[f64; 3]; 4] = [
    [96.422, 100.000, 82.521],
    [95.682, 100.000, 92.149],
    [95.047, 100.000, 108.883],
    [94.972, 100.000, 122.638],
];

/// CIE 1931 2° chromaticity coordinates of the named illuminants, in the same order.
pub static ILLUMINANT_CHROMATICITIES: [[f64; 2]; 4] = [
    [0.3457, 0.3585],
    [0.3324, 0.3474],
    [0.3127, 0.3290],
    [0.2990, 0.3149],
];

impl Illuminant {
    /// Gets the XYZ coordinates of the white point, normalized so that Y is 100.
    pub fn white_point(&self) -> XYZColor {
        match *self {
            Illuminant::D50 => ILLUMINANT_WHITE_POINTS[0].into(),
            Illuminant::D55 => ILLUMINANT_WHITE_POINTS[1].into(),
            Illuminant::D65 => ILLUMINANT_WHITE_POINTS[2].into(),
            Illuminant::D75 => ILLUMINANT_WHITE_POINTS[3].into(),
            Illuminant::Custom(xy) => XYZColor {
                x: xy[0] * 100.0 / xy[1],
                y: 100.0,
                z: (1.0 - xy[0] - xy[1]) * 100.0 / xy[1],
            },
        }
    }

    /// Gets the chromaticity of the white point: the usual target of a white balance.
    pub fn chromaticity(&self) -> Chromaticity {
        let xy = match *self {
            Illuminant::D50 => ILLUMINANT_CHROMATICITIES[0],
            Illuminant::D55 => ILLUMINANT_CHROMATICITIES[1],
            Illuminant::D65 => ILLUMINANT_CHROMATICITIES[2],
            Illuminant::D75 => ILLUMINANT_CHROMATICITIES[3],
            Illuminant::Custom(xy) => xy,
        };
        Chromaticity { x: xy[0], y: xy[1] }
    }
}
