//! This module defines the two representations every measurement device speaks: CIE 1931 xyY
//! (chromaticity plus luminance) and CIE 1931 XYZ tristimulus values, together with the plain
//! chromaticity point used as a calibration target. All of these are small immutable values: a
//! reading is captured once and everything else is derived from it.
//!
//! Luminance is on the usual colorimeter scale, where diffuse white is around 100. That is also the
//! scale the CIELAB conversion in [`CIELABColor`](../colors/cielabcolor/struct.CIELABColor.html)
//! expects.

use std::fmt;

use crate::colors::cielabcolor::CIELABColor;
use crate::illuminants::Illuminant;

/// A point on the CIE 1931 chromaticity diagram. Both coordinates are dimensionless; physically
/// meaningful points have `0 <= x, y <= 1` and `x + y <= 1`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chromaticity {
    /// The x chromaticity coordinate.
    pub x: f64,
    /// The y chromaticity coordinate.
    pub y: f64,
}

impl Chromaticity {
    /// Creates a new chromaticity point.
    pub fn new(x: f64, y: f64) -> Chromaticity {
        Chromaticity { x, y }
    }

    /// The Euclidean distance between two points in the chromaticity plane. This is not a
    /// perceptual measure (see [`delta_e_2000`](../delta_e/fn.delta_e_2000.html) for that), but it
    /// is cheap and monotone enough to steer a feedback loop.
    /// # Example
    /// ```
    /// # use chromatune::color::Chromaticity;
    /// let d65 = Chromaticity::new(0.3127, 0.3290);
    /// let measured = Chromaticity::new(0.3157, 0.3330);
    /// assert!((d65.distance(&measured) - 0.005).abs() <= 1e-10);
    /// ```
    pub fn distance(&self, other: &Chromaticity) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

impl From<(f64, f64)> for Chromaticity {
    fn from(xy: (f64, f64)) -> Chromaticity {
        Chromaticity { x: xy.0, y: xy.1 }
    }
}

impl From<Chromaticity> for (f64, f64) {
    fn from(c: Chromaticity) -> (f64, f64) {
        (c.x, c.y)
    }
}

/// A reading in the CIE 1931 xyY space: chromaticity plus luminance. This is what colorimeters
/// report natively.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct XyYColor {
    /// The x chromaticity coordinate.
    pub x: f64,
    /// The y chromaticity coordinate.
    pub y: f64,
    /// The luminance, `Y`. Never negative for a real reading.
    pub luminance: f64,
}

impl XyYColor {
    /// Creates a new xyY reading.
    pub fn new(x: f64, y: f64, luminance: f64) -> XyYColor {
        XyYColor { x, y, luminance }
    }

    /// Returns `true` if this reading is physically plausible. See [`xyy_is_valid`].
    pub fn is_valid(&self) -> bool {
        xyy_is_valid(self.x, self.y, self.luminance)
    }

    /// Converts to XYZ. See [`xyy_to_xyz`] for the handling of degenerate input.
    pub fn to_xyz(&self) -> XYZColor {
        xyy_to_xyz(self.x, self.y, self.luminance)
    }

    /// The chromaticity part of this reading, dropping luminance.
    pub fn chromaticity(&self) -> Chromaticity {
        Chromaticity {
            x: self.x,
            y: self.y,
        }
    }
}

impl fmt::Display for XyYColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "x={}, y={}, Y={}", self.x, self.y, self.luminance)
    }
}

/// A point in the CIE 1931 XYZ color space. The `y` component is luminance, identical to the `Y` of
/// the xyY reading it may have come from.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct XYZColor {
    /// The X component.
    pub x: f64,
    /// The Y component, luminance.
    pub y: f64,
    /// The Z component.
    pub z: f64,
}

impl XYZColor {
    /// Creates a new tristimulus value.
    pub fn new(x: f64, y: f64, z: f64) -> XYZColor {
        XYZColor { x, y, z }
    }

    /// Projects back onto the chromaticity diagram. Black has no chromaticity, so a zero sum maps
    /// to the D65 white point with zero luminance, the convention most instruments use.
    pub fn to_xyy(&self) -> XyYColor {
        let sum = self.x + self.y + self.z;
        if sum == 0.0 {
            let white = Illuminant::D65.chromaticity();
            XyYColor {
                x: white.x,
                y: white.y,
                luminance: 0.0,
            }
        } else {
            XyYColor {
                x: self.x / sum,
                y: self.y / sum,
                luminance: self.y,
            }
        }
    }

    /// Converts to CIELAB relative to the D65 reference white.
    pub fn to_lab(&self) -> CIELABColor {
        CIELABColor::from_xyz(*self)
    }
}

impl From<[f64; 3]> for XYZColor {
    fn from(xyz: [f64; 3]) -> XYZColor {
        XYZColor {
            x: xyz[0],
            y: xyz[1],
            z: xyz[2],
        }
    }
}

impl From<XYZColor> for [f64; 3] {
    fn from(xyz: XYZColor) -> [f64; 3] {
        [xyz.x, xyz.y, xyz.z]
    }
}

/// Converts an xyY triple to XYZ, with `X = xY/y` and `Z = (1 - x - y)Y/y`.
///
/// This never fails loudly: `y = 0` or a negative luminance has no meaningful tristimulus value,
/// so the result is the all-zero color instead of a division by zero. Callers that need to tell
/// the difference should check [`xyy_is_valid`] first.
/// # Example
/// ```
/// # use chromatune::color::xyy_to_xyz;
/// let xyz = xyy_to_xyz(0.3127, 0.3290, 100.0);
/// assert!((xyz.x - 95.046).abs() <= 1e-3);
/// assert!((xyz.z - 108.906).abs() <= 1e-3);
/// // degenerate chromaticity maps to black
/// assert_eq!(xyy_to_xyz(0.4, 0.0, 50.0).y, 0.0);
/// ```
pub fn xyy_to_xyz(x: f64, y: f64, luminance: f64) -> XYZColor {
    if y == 0.0 || luminance < 0.0 {
        return XYZColor {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
    }
    XYZColor {
        x: x * luminance / y,
        y: luminance,
        z: (1.0 - x - y) * luminance / y,
    }
}

/// Returns `true` if `(x, y, Y)` is a physically plausible reading: both coordinates in `[0, 1]`,
/// `x + y <= 1` and a non-negative luminance. NaN fails every comparison, so it is never valid.
pub fn xyy_is_valid(x: f64, y: f64, luminance: f64) -> bool {
    (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) && x + y <= 1.0 && luminance >= 0.0
}

/// Converts XYZ (on the `Yn = 100` scale) to CIELAB against the D65 reference white. Shorthand for
/// [`CIELABColor::from_xyz`](../colors/cielabcolor/struct.CIELABColor.html#method.from_xyz).
pub fn xyz_to_lab(x: f64, y: f64, z: f64) -> CIELABColor {
    CIELABColor::from_xyz(XYZColor { x, y, z })
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use float_cmp::ApproxEqUlps;

    #[test]
    fn test_xyy_xyz_recovers_chromaticity() {
        let samples = [
            (0.3127, 0.3290, 100.0),
            (0.640, 0.330, 21.26),
            (0.300, 0.600, 71.52),
            (0.150, 0.060, 7.22),
            (0.05, 0.9, 0.5),
            (0.7, 0.29, 3000.0),
        ];
        for &(x, y, lum) in samples.iter() {
            let xyz = xyy_to_xyz(x, y, lum);
            assert_eq!(xyz.y, lum);
            let y_back = xyz.y / (xyz.x + xyz.y + xyz.z);
            assert!(y_back.approx_eq_ulps(&y, 64), "{} vs {}", y_back, y);
            let xyy = xyz.to_xyy();
            assert!((xyy.x - x).abs() <= 1e-12);
        }
    }

    #[test]
    fn test_zero_y_is_black() {
        for &(x, lum) in [(0.0, 0.0), (0.3, 100.0), (1.0, -5.0), (0.7, 1e9)].iter() {
            let xyz = xyy_to_xyz(x, 0.0, lum);
            assert_eq!(xyz, XYZColor::new(0.0, 0.0, 0.0));
        }
        assert_eq!(xyy_to_xyz(0.3, 0.3, -1.0), XYZColor::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_validity() {
        assert!(xyy_is_valid(0.3127, 0.3290, 100.0));
        assert!(xyy_is_valid(0.0, 0.0, 0.0));
        assert!(xyy_is_valid(0.5, 0.5, 1.0));
        assert!(!xyy_is_valid(0.6, 0.5, 1.0));
        assert!(!xyy_is_valid(-0.01, 0.3, 1.0));
        assert!(!xyy_is_valid(0.3, 1.2, 1.0));
        assert!(!xyy_is_valid(0.3, 0.3, -0.1));
        assert!(!xyy_is_valid(std::f64::NAN, 0.3, 1.0));
        assert!(!XyYColor::new(0.3, 0.3, std::f64::NAN).is_valid());
    }

    #[test]
    fn test_black_projects_to_white_point() {
        let black = XYZColor::new(0.0, 0.0, 0.0).to_xyy();
        assert_eq!(black.luminance, 0.0);
        assert_eq!(black.chromaticity(), Illuminant::D65.chromaticity());
    }
}
