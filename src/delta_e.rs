//! This module implements CIEDE2000, the CIE's current recommendation for how different two colors
//! look. It is the metric used for final quality checks of a calibrated display: a ΔE00 below 1 is
//! generally invisible, and below 2 is visible only side by side.
//!
//! The formula is implemented exactly as published (CIE 142-2001, with the hue-mean correction
//! from Sharma, Wu and Dalal) with the parametric weights `kL = kC = kH = 1`. Angles are carried in
//! degrees and only converted to radians at the `sin` and `cos` calls.
//!
//! Note that the result is not guaranteed to be bit-for-bit symmetric under swapping the
//! arguments: the lightness and chroma terms are, but the hue difference is signed and feeds the
//! rotation term, so rounding can differ in the last few digits.

use std::fmt;

use crate::color::XYZColor;
use crate::colors::cielabcolor::CIELABColor;
use crate::consts::POW25_7;
use crate::error::CalibrationError;

/// Computes the CIEDE2000 difference between two tristimulus values (on the `Yn = 100` scale).
/// Both are converted to CIELAB against D65 first.
/// # Example
/// ```
/// # use chromatune::color::XYZColor;
/// # use chromatune::delta_e::delta_e_2000;
/// let reference = XYZColor::new(95.0, 100.0, 108.9);
/// assert_eq!(delta_e_2000(reference, reference), 0.0);
/// let sensor = XYZColor::new(92.5, 97.1, 104.2);
/// assert!(delta_e_2000(sensor, reference) > 1.0);
/// ```
pub fn delta_e_2000(xyz1: XYZColor, xyz2: XYZColor) -> f64 {
    delta_e_2000_lab(xyz1.to_lab(), xyz2.to_lab())
}

/// Like [`delta_e_2000`], but rejects input a real instrument cannot produce: any negative or
/// non-finite component is reported as
/// [`CalibrationError::InvalidTristimulus`](../error/enum.CalibrationError.html) naming the
/// offending field.
pub fn checked_delta_e_2000(xyz1: XYZColor, xyz2: XYZColor) -> Result<f64, CalibrationError> {
    let fields = [
        ("first X", xyz1.x),
        ("first Y", xyz1.y),
        ("first Z", xyz1.z),
        ("second X", xyz2.x),
        ("second Y", xyz2.y),
        ("second Z", xyz2.z),
    ];
    for &(field, value) in fields.iter() {
        if !value.is_finite() || value < 0.0 {
            return Err(CalibrationError::InvalidTristimulus { field, value });
        }
    }
    Ok(delta_e_2000(xyz1, xyz2))
}

/// The hue angle of `(a, b)` in degrees, in `[0, 360)`.
fn hue_degrees(a: f64, b: f64) -> f64 {
    b.atan2(a).to_degrees().rem_euclid(360.0)
}

/// The chroma compensation shared by `G` and `R_T`: `sqrt(C^7 / (C^7 + 25^7))`.
fn chroma_weight(c: f64) -> f64 {
    let c7 = c.powi(7);
    (c7 / (c7 + POW25_7)).sqrt()
}

/// Computes the CIEDE2000 difference between two CIELAB colors. This is the core of
/// [`delta_e_2000`], exposed for callers that already work in Lab.
pub fn delta_e_2000_lab(lab1: CIELABColor, lab2: CIELABColor) -> f64 {
    let c1 = lab1.a.hypot(lab1.b);
    let c2 = lab2.a.hypot(lab2.b);
    let c_avg = (c1 + c2) / 2.0;

    // compensate the a axis near neutral, where the original CIELAB hue spacing is too coarse
    let g = 0.5 * (1.0 - chroma_weight(c_avg));
    let a1p = lab1.a * (1.0 + g);
    let a2p = lab2.a * (1.0 + g);

    let c1p = a1p.hypot(lab1.b);
    let c2p = a2p.hypot(lab2.b);
    let cp_avg = (c1p + c2p) / 2.0;

    // achromatic colors have no hue: both angles are zero and so is the hue difference
    let (h1p, h2p) = if c1p * c2p == 0.0 {
        (0.0, 0.0)
    } else {
        (hue_degrees(a1p, lab1.b), hue_degrees(a2p, lab2.b))
    };

    // take the short way around the hue circle
    let dhp = if (h1p - h2p).abs() <= 180.0 {
        h2p - h1p
    } else if h2p > h1p {
        h2p - h1p - 360.0
    } else {
        h2p - h1p + 360.0
    };

    let d_l = lab2.l - lab1.l;
    let d_c = c2p - c1p;
    let d_h = 2.0 * (c1p * c2p).sqrt() * (dhp / 2.0).to_radians().sin();

    // the mean hue also has to go the short way around
    let hp_avg = if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };
    let l_avg = (lab1.l + lab2.l) / 2.0;

    let t = 1.0 - 0.17 * (hp_avg - 30.0).to_radians().cos()
        + 0.24 * (2.0 * hp_avg).to_radians().cos()
        + 0.32 * (3.0 * hp_avg + 6.0).to_radians().cos()
        - 0.20 * (4.0 * hp_avg - 63.0).to_radians().cos();
    let l50 = (l_avg - 50.0).powi(2);
    let s_l = 1.0 + 0.015 * l50 / (20.0 + l50).sqrt();
    let s_c = 1.0 + 0.045 * cp_avg;
    let s_h = 1.0 + 0.015 * cp_avg * t;

    // blue region rotation: 2 * 30 degrees at most, centered on 275
    let d_theta = 60.0 * (-((hp_avg - 275.0) / 25.0).powi(2)).exp();
    let r_t = -d_theta.to_radians().sin() * 2.0 * chroma_weight(cp_avg);

    let term_l = d_l / s_l;
    let term_c = d_c / s_c;
    let term_h = d_h / s_h;
    (term_l * term_l + term_c * term_c + term_h * term_h + r_t * term_c * term_h).sqrt()
}

/// How visible a given CIEDE2000 difference is to a typical observer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeltaECategory {
    /// Below 1: not perceptible.
    Imperceptible,
    /// From 1 up to 2: visible only on close inspection.
    BarelyPerceptible,
    /// From 2 up to 10: visible at a glance.
    Noticeable,
    /// 10 and above: clearly different colors.
    Large,
}

impl DeltaECategory {
    /// Classifies a ΔE00 value.
    pub fn from_delta_e(delta_e: f64) -> DeltaECategory {
        if delta_e < 1.0 {
            DeltaECategory::Imperceptible
        } else if delta_e < 2.0 {
            DeltaECategory::BarelyPerceptible
        } else if delta_e < 10.0 {
            DeltaECategory::Noticeable
        } else {
            DeltaECategory::Large
        }
    }
}

impl fmt::Display for DeltaECategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            DeltaECategory::Imperceptible => "imperceptible",
            DeltaECategory::BarelyPerceptible => "barely perceptible",
            DeltaECategory::Noticeable => "noticeable",
            DeltaECategory::Large => "large",
        };
        f.write_str(name)
    }
}

/// Renders a ΔE00 value the way results are shown to the user, to four decimal places.
/// # Example
/// ```
/// # use chromatune::delta_e::format_delta_e;
/// assert_eq!(format_delta_e(1.23456), "Delta E 2000: 1.2346");
/// ```
pub fn format_delta_e(delta_e: f64) -> String {
    format!("Delta E 2000: {:.4}", delta_e)
}
