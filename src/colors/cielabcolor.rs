//! A module that implements the [CIELAB color
//! space](https://en.wikipedia.org/wiki/Lab_color_space#CIELAB). CIELAB has an L value for
//! lightness and two opponent color axes for chromaticity. Formally, the three values are called
//! L\*, a\*, and b\* to distinguish them from [generic
//! Lab](https://en.wikipedia.org/wiki/Lab_color_space), but for convenience they are just `l`, `a`,
//! and `b` in this module.
//!
//! Display calibration happens under D65, so unlike general-purpose libraries there is no chromatic
//! adaptation here: XYZ is normalized directly by the D65 white point.

use crate::color::XYZColor;
use crate::consts::{LAB_EPSILON, LAB_KAPPA_SLOPE, LAB_OFFSET};
use crate::illuminants::Illuminant;

/// A color in the CIELAB color space, relative to the D65 reference white.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CIELABColor {
    /// The lightness of a given color. 0 is black and 100 is the value of the reference white.
    pub l: f64,
    /// The first opponent color axis, green (negative) to magenta (positive).
    pub a: f64,
    /// The second opponent color axis, blue (negative) to yellow (positive).
    pub b: f64,
}

impl CIELABColor {
    /// Converts a CIE XYZ color, on the scale where the reference white has `Y = 100`, to CIELAB.
    /// Each normalized component `t` goes through the CIE nonlinearity: the cube root above
    /// `0.008856` and the linear segment `7.787t + 16/116` below it.
    pub fn from_xyz(xyz: XYZColor) -> CIELABColor {
        let f = |t: f64| {
            if t > LAB_EPSILON {
                t.powf(1.0 / 3.0)
            } else {
                LAB_KAPPA_SLOPE * t + LAB_OFFSET
            }
        };
        let white_point = Illuminant::D65.white_point();
        let fx = f(xyz.x / white_point.x);
        let fy = f(xyz.y / white_point.y);
        let fz = f(xyz.z / white_point.z);

        // a and b are opponent color axes
        CIELABColor {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// The CIELAB chroma, the distance from the neutral axis.
    pub fn chroma(&self) -> f64 {
        self.a.hypot(self.b)
    }

    /// The CIELAB hue angle in degrees, in `[0, 360)`. Neutral colors have no hue; this returns 0
    /// for them.
    pub fn hue(&self) -> f64 {
        if self.a == 0.0 && self.b == 0.0 {
            0.0
        } else {
            self.b.atan2(self.a).to_degrees().rem_euclid(360.0)
        }
    }
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;

    #[test]
    fn test_white_is_l100() {
        let lab = CIELABColor::from_xyz(Illuminant::D65.white_point());
        assert!((lab.l - 100.0).abs() <= 1e-10);
        assert!(lab.a.abs() <= 1e-10);
        assert!(lab.b.abs() <= 1e-10);
        assert!(lab.chroma() <= 1e-10);
    }

    #[test]
    fn test_black_and_linear_segment() {
        let black = CIELABColor::from_xyz(XYZColor::new(0.0, 0.0, 0.0));
        assert!(black.l.abs() <= 1e-10);
        assert_eq!(black.hue(), 0.0);
        // Y/Yn = 0.005 is below the cube-root cutoff: L = 116 (7.787 * 0.005 + 16/116) - 16
        let dark = CIELABColor::from_xyz(XYZColor::new(0.47, 0.5, 0.54));
        assert!((dark.l - 116.0 * 7.787 * 0.005).abs() <= 1e-10);
    }

    #[test]
    fn test_srgb_red() {
        // sRGB red is (41.24, 21.26, 1.93) under D65: Lab about (53.24, 80.09, 67.20)
        let lab = CIELABColor::from_xyz(XYZColor::new(41.24, 21.26, 1.93));
        assert!((lab.l - 53.24).abs() <= 0.01);
        assert!((lab.a - 80.09).abs() <= 0.05);
        assert!((lab.b - 67.20).abs() <= 0.05);
        assert!((lab.hue() - 40.0).abs() <= 0.1);
    }

    #[test]
    fn test_hue_quadrants() {
        let lab = |a, b| CIELABColor { l: 50.0, a, b };
        assert!((lab(1.0, 0.0).hue() - 0.0).abs() <= 1e-10);
        assert!((lab(0.0, 1.0).hue() - 90.0).abs() <= 1e-10);
        assert!((lab(-1.0, 0.0).hue() - 180.0).abs() <= 1e-10);
        assert!((lab(0.0, -1.0).hue() - 270.0).abs() <= 1e-10);
    }
}
