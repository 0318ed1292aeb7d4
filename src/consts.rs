//! This file provides constants that are used for color space conversion and the calibration
//! math. Matrices are kept as `rulinalg` values built once through `lazy_static`, so the exact
//! tabulated numbers live in one place and every user multiplies against the same instance.

use rulinalg::matrix::Matrix;

/// Cutoff between the linear and cube-root parts of the CIELAB nonlinearity, `(6/29)^3` as
/// tabulated by the CIE.
pub const LAB_EPSILON: f64 = 0.008856;
/// Slope of the linear part of the CIELAB nonlinearity.
pub const LAB_KAPPA_SLOPE: f64 = 7.787;
/// Offset of the linear part of the CIELAB nonlinearity.
pub const LAB_OFFSET: f64 = 16.0 / 116.0;

/// `25^7`, which shows up in both the chroma compensation and rotation terms of CIEDE2000.
pub const POW25_7: f64 = 6103515625.0;

/// The highest gain the panel model can address.
pub const MAX_GAIN: f64 = 192.0;

/// Relative tolerance for treating a 3x3 matrix as singular, scaled by the product of the column
/// norms.
pub const SINGULAR_EPSILON: f64 = 1e-12;

lazy_static! {
    /// Linear BT.709 (sRGB) RGB to XYZ, D65 white with unit luminance.
    pub static ref BT709_RGB_TO_XYZ: Matrix<f64> = Matrix::new(
        3,
        3,
        vec![
            0.4124, 0.3576, 0.1805,
            0.2126, 0.7152, 0.0722,
            0.0193, 0.1192, 0.9505,
        ]
    );
}

#[cfg(test)]
pub const TEST_PRECISION: f64 = 1e-6;
