//! This module finds the linear maps that make one device's XYZ agree with another's. The main
//! entry point is [`compute_correction_matrix`], the forward color matrix model (FCMM): measure
//! the red, green and blue primaries of a display with a reference instrument and with the sensor
//! to be corrected, and solve for the 3x3 matrix that carries the sensor's readings onto the
//! reference's. [`compute_gamut_matrix`] solves the related panel problem: which matrix maps a
//! panel's measured primaries onto the BT.709 gamut.
//!
//! Both build matrices whose columns are the R, G and B tristimulus vectors, in that order, and
//! invert with `rulinalg` after checking that the matrix is not numerically singular.

use std::collections::HashMap;
use std::fmt;

use rulinalg::matrix::Matrix;

use crate::color::{XYZColor, XyYColor};
use crate::consts::{BT709_RGB_TO_XYZ, SINGULAR_EPSILON};
use crate::error::CalibrationError;

/// One of the three display primaries.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Primary {
    /// The red channel.
    Red,
    /// The green channel.
    Green,
    /// The blue channel.
    Blue,
}

/// The primaries in matrix column order.
pub static PRIMARIES: [Primary; 3] = [Primary::Red, Primary::Green, Primary::Blue];

impl fmt::Display for Primary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Primary::Red => "R",
            Primary::Green => "G",
            Primary::Blue => "B",
        };
        f.write_str(name)
    }
}

/// Which side of a sensor correction a reading belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Device {
    /// The trusted instrument, whose color space is the target.
    Reference,
    /// The instrument being corrected.
    Sensor,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            Device::Reference => "reference",
            Device::Sensor => "sensor",
        };
        f.write_str(name)
    }
}

/// One reading per primary, as taken from a single device.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimarySet {
    /// The reading of the red primary.
    pub red: XyYColor,
    /// The reading of the green primary.
    pub green: XyYColor,
    /// The reading of the blue primary.
    pub blue: XyYColor,
}

impl PrimarySet {
    /// Creates a primary set from its three readings.
    pub fn new(red: XyYColor, green: XyYColor, blue: XyYColor) -> PrimarySet {
        PrimarySet { red, green, blue }
    }

    /// Builds a primary set from labelled readings, in any order. Every primary has to appear
    /// exactly once.
    /// # Example
    /// ```
    /// # use chromatune::color::XyYColor;
    /// # use chromatune::correction::{Primary, PrimarySet};
    /// let set = PrimarySet::from_entries(vec![
    ///     (Primary::Blue, XyYColor::new(0.150, 0.060, 7.22)),
    ///     (Primary::Red, XyYColor::new(0.640, 0.330, 21.26)),
    ///     (Primary::Green, XyYColor::new(0.300, 0.600, 71.52)),
    /// ]).unwrap();
    /// assert_eq!(set.get(Primary::Red).x, 0.640);
    /// assert!(PrimarySet::from_entries(vec![(Primary::Red, set.red)]).is_err());
    /// ```
    pub fn from_entries<I>(entries: I) -> Result<PrimarySet, CalibrationError>
    where
        I: IntoIterator<Item = (Primary, XyYColor)>,
    {
        let mut readings: HashMap<Primary, XyYColor> = HashMap::new();
        for (primary, sample) in entries {
            if readings.insert(primary, sample).is_some() {
                return Err(CalibrationError::InvalidPrimarySet(format!(
                    "{} given more than once",
                    primary
                )));
            }
        }
        let mut take = |primary: Primary| {
            readings.remove(&primary).ok_or_else(|| {
                CalibrationError::InvalidPrimarySet(format!("missing {}", primary))
            })
        };
        Ok(PrimarySet {
            red: take(Primary::Red)?,
            green: take(Primary::Green)?,
            blue: take(Primary::Blue)?,
        })
    }

    /// The reading of a given primary.
    pub fn get(&self, primary: Primary) -> XyYColor {
        match primary {
            Primary::Red => self.red,
            Primary::Green => self.green,
            Primary::Blue => self.blue,
        }
    }

    /// Checks every reading with `xyy_is_valid`, reporting the first one that fails.
    pub fn validate(&self, device: Device) -> Result<(), CalibrationError> {
        for &primary in PRIMARIES.iter() {
            let sample = self.get(primary);
            if !sample.is_valid() {
                warn!("rejecting {} {} reading: {}", device, primary, sample);
                return Err(CalibrationError::InvalidInput {
                    device,
                    primary,
                    sample,
                });
            }
        }
        Ok(())
    }

    /// The 3x3 matrix whose columns are the R, G and B tristimulus vectors.
    fn tristimulus_matrix(&self) -> Matrix<f64> {
        columns_to_matrix(&[self.red.to_xyz(), self.green.to_xyz(), self.blue.to_xyz()])
    }
}

fn columns_to_matrix(columns: &[XYZColor; 3]) -> Matrix<f64> {
    let mut data = Vec::with_capacity(9);
    for row in 0..3 {
        for column in columns.iter() {
            let values: [f64; 3] = (*column).into();
            data.push(values[row]);
        }
    }
    Matrix::new(3, 3, data)
}

/// The cofactor expansion of a 3x3 determinant along the first row.
fn determinant(m: &Matrix<f64>) -> f64 {
    m[[0, 0]] * (m[[1, 1]] * m[[2, 2]] - m[[1, 2]] * m[[2, 1]])
        - m[[0, 1]] * (m[[1, 0]] * m[[2, 2]] - m[[1, 2]] * m[[2, 0]])
        + m[[0, 2]] * (m[[1, 0]] * m[[2, 1]] - m[[1, 1]] * m[[2, 0]])
}

/// Inverts a 3x3 matrix, failing with `SingularMatrix` when its determinant is negligible next to
/// the product of its column lengths (the largest it could be).
fn checked_inverse(m: &Matrix<f64>) -> Result<Matrix<f64>, CalibrationError> {
    let det = determinant(m);
    let column_norm = |c: usize| (0..3).map(|r| m[[r, c]].powi(2)).sum::<f64>().sqrt();
    let bound = column_norm(0) * column_norm(1) * column_norm(2);
    if !det.is_finite() || det.abs() <= SINGULAR_EPSILON * bound {
        return Err(CalibrationError::SingularMatrix { determinant: det });
    }
    m.clone()
        .inverse()
        .map_err(|_| CalibrationError::SingularMatrix { determinant: det })
}

/// A 3x3 matrix mapping one device's XYZ onto another's. Once computed it never changes.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrectionMatrix {
    rows: [[f64; 3]; 3],
}

impl CorrectionMatrix {
    /// The matrix that changes nothing.
    pub fn identity() -> CorrectionMatrix {
        CorrectionMatrix {
            rows: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    /// Creates a matrix from its rows.
    pub fn from_rows(rows: [[f64; 3]; 3]) -> CorrectionMatrix {
        CorrectionMatrix { rows }
    }

    fn from_matrix(m: &Matrix<f64>) -> CorrectionMatrix {
        let mut rows = [[0.0; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[[r, c]];
            }
        }
        CorrectionMatrix { rows }
    }

    /// The rows of the matrix.
    pub fn rows(&self) -> [[f64; 3]; 3] {
        self.rows
    }

    /// A single entry, or `None` if `row` or `column` is past 2.
    pub fn get(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(column)).cloned()
    }

    /// Corrects a reading: multiplies the XYZ column vector by this matrix.
    pub fn apply(&self, xyz: XYZColor) -> XYZColor {
        let v: [f64; 3] = xyz.into();
        let dot = |row: &[f64; 3]| row[0] * v[0] + row[1] * v[1] + row[2] * v[2];
        XYZColor {
            x: dot(&self.rows[0]),
            y: dot(&self.rows[1]),
            z: dot(&self.rows[2]),
        }
    }

    /// Returns `true` if every entry is within `tolerance` of the identity matrix.
    pub fn is_identity(&self, tolerance: f64) -> bool {
        let identity = CorrectionMatrix::identity();
        (0..3).all(|r| (0..3).all(|c| (self.rows[r][c] - identity.rows[r][c]).abs() <= tolerance))
    }
}

/// Renders the matrix with six decimals, one bracketed row per line.
impl fmt::Display for CorrectionMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (r, row) in self.rows.iter().enumerate() {
            let open = if r == 0 { "[[" } else { " [" };
            let close = if r == 2 { "]]" } else { "],\n" };
            write!(
                f,
                "{}{:.6}, {:.6}, {:.6}{}",
                open, row[0], row[1], row[2], close
            )?;
        }
        Ok(())
    }
}

/// Solves for the sensor correction matrix `M = M_ref × inv(M_sens)`, where each side's matrix has
/// the XYZ of its R, G and B readings as columns. Multiplying a sensor XYZ reading by the result
/// gives what the reference instrument would have read.
///
/// Fails with `InvalidInput` naming the device and primary of the first reading that is not a
/// valid xyY triple, or with `SingularMatrix` if the sensor's primaries are linearly dependent.
/// # Example
/// ```
/// # use chromatune::color::XyYColor;
/// # use chromatune::correction::{compute_correction_matrix, PrimarySet};
/// let srgb = PrimarySet::new(
///     XyYColor::new(0.640, 0.330, 21.26),
///     XyYColor::new(0.300, 0.600, 71.52),
///     XyYColor::new(0.150, 0.060, 7.22),
/// );
/// let m = compute_correction_matrix(&srgb, &srgb).unwrap();
/// assert!(m.is_identity(1e-6));
/// ```
pub fn compute_correction_matrix(
    reference: &PrimarySet,
    sensor: &PrimarySet,
) -> Result<CorrectionMatrix, CalibrationError> {
    reference.validate(Device::Reference)?;
    sensor.validate(Device::Sensor)?;

    let reference_matrix = reference.tristimulus_matrix();
    let sensor_inverse = checked_inverse(&sensor.tristimulus_matrix())?;
    let correction = CorrectionMatrix::from_matrix(&(&reference_matrix * &sensor_inverse));
    debug!("sensor correction matrix:\n{}", correction);
    Ok(correction)
}

/// Solves for the panel gamut correction that maps a panel's measured primaries onto BT.709.
///
/// Each measured primary gives a unit-luminance direction `(x/y, 1, (1 - x - y)/y)`. Those columns
/// are scaled so that full drive of all three reproduces the measured white, which gives the
/// panel's RGB to XYZ matrix; the result is `BT709 × inv(panel)`. The measured white's luminance
/// sets the scale, so measure it relative to 1 to compare against the unit-luminance BT.709
/// matrix.
pub fn compute_gamut_matrix(
    measured: &PrimarySet,
    white: XyYColor,
) -> Result<CorrectionMatrix, CalibrationError> {
    measured.validate(Device::Sensor)?;
    if !white.is_valid() || white.y == 0.0 {
        warn!("rejecting white reading: {}", white);
        return Err(CalibrationError::InvalidWhitePoint(white));
    }

    let directions: Vec<XYZColor> = PRIMARIES
        .iter()
        .map(|&p| {
            let s = measured.get(p);
            XYZColor {
                x: s.x / s.y,
                y: 1.0,
                z: (1.0 - s.x - s.y) / s.y,
            }
        })
        .collect();
    let primaries = columns_to_matrix(&[directions[0], directions[1], directions[2]]);
    let primaries_inverse = checked_inverse(&primaries)?;

    let w: [f64; 3] = white.to_xyz().into();
    let mut scale = [0.0; 3];
    for (i, s) in scale.iter_mut().enumerate() {
        *s = (0..3).map(|j| primaries_inverse[[i, j]] * w[j]).sum();
    }
    let mut panel = primaries;
    for r in 0..3 {
        for (c, s) in scale.iter().enumerate() {
            panel[[r, c]] *= *s;
        }
    }

    let panel_inverse = checked_inverse(&panel)?;
    let correction = CorrectionMatrix::from_matrix(&(&*BT709_RGB_TO_XYZ * &panel_inverse));
    debug!("panel gamut matrix:\n{}", correction);
    Ok(correction)
}

#[cfg(test)]
mod tests {
    #[allow(unused_imports)]
    use super::*;
    use crate::consts::TEST_PRECISION;

    fn srgb() -> PrimarySet {
        PrimarySet::new(
            XyYColor::new(0.640, 0.330, 21.26),
            XyYColor::new(0.300, 0.600, 71.52),
            XyYColor::new(0.150, 0.060, 7.22),
        )
    }

    #[test]
    fn test_identical_devices_give_identity() {
        let m = compute_correction_matrix(&srgb(), &srgb()).unwrap();
        assert!(m.is_identity(TEST_PRECISION), "{}", m);
    }

    #[test]
    fn test_correction_maps_sensor_onto_reference() {
        // a sensor that reads a little off in every channel
        let sensor = PrimarySet::new(
            XyYColor::new(0.637, 0.332, 21.9),
            XyYColor::new(0.302, 0.597, 70.1),
            XyYColor::new(0.151, 0.061, 7.5),
        );
        let reference = srgb();
        let m = compute_correction_matrix(&reference, &sensor).unwrap();
        for &primary in PRIMARIES.iter() {
            let corrected = m.apply(sensor.get(primary).to_xyz());
            let expected = reference.get(primary).to_xyz();
            assert!((corrected.x - expected.x).abs() <= 1e-9);
            assert!((corrected.y - expected.y).abs() <= 1e-9);
            assert!((corrected.z - expected.z).abs() <= 1e-9);
        }
        assert!(!m.is_identity(TEST_PRECISION));
    }

    #[test]
    fn test_duplicate_sensor_primaries_are_singular() {
        let mut sensor = srgb();
        sensor.green = sensor.red;
        match compute_correction_matrix(&srgb(), &sensor) {
            Err(CalibrationError::SingularMatrix { .. }) => (),
            other => panic!("expected a singular matrix, got {:?}", other),
        }
        let mut sensor = srgb();
        sensor.blue = sensor.green;
        assert!(compute_correction_matrix(&srgb(), &sensor).is_err());
    }

    #[test]
    fn test_invalid_reading_names_device_and_primary() {
        let mut sensor = srgb();
        sensor.green = XyYColor::new(0.6, 0.5, 70.0);
        let err = compute_correction_matrix(&srgb(), &sensor).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::InvalidInput {
                device: Device::Sensor,
                primary: Primary::Green,
                sample: XyYColor::new(0.6, 0.5, 70.0),
            }
        );
        assert_eq!(
            err.to_string(),
            "invalid xyY values for sensor G: x=0.6, y=0.5, Y=70"
        );

        let mut reference = srgb();
        reference.red.luminance = -1.0;
        match compute_correction_matrix(&reference, &sensor) {
            Err(CalibrationError::InvalidInput { device, primary, .. }) => {
                assert_eq!(device, Device::Reference);
                assert_eq!(primary, Primary::Red);
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_primary_set_from_map() {
        let readings = hashmap! {
            Primary::Green => XyYColor::new(0.300, 0.600, 71.52),
            Primary::Blue => XyYColor::new(0.150, 0.060, 7.22),
            Primary::Red => XyYColor::new(0.640, 0.330, 21.26),
        };
        assert_eq!(PrimarySet::from_entries(readings).unwrap(), srgb());

        let missing = hashmap! {
            Primary::Green => XyYColor::new(0.300, 0.600, 71.52),
            Primary::Red => XyYColor::new(0.640, 0.330, 21.26),
        };
        assert_eq!(
            PrimarySet::from_entries(missing),
            Err(CalibrationError::InvalidPrimarySet("missing B".to_string()))
        );

        let twice = vec![
            (Primary::Red, XyYColor::new(0.640, 0.330, 21.26)),
            (Primary::Red, XyYColor::new(0.640, 0.330, 21.26)),
        ];
        assert!(PrimarySet::from_entries(twice).is_err());
    }

    #[test]
    fn test_display_six_decimals() {
        let m = CorrectionMatrix::from_rows([
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, -0.0123456789, 1.0],
        ]);
        assert_eq!(
            m.to_string(),
            "[[1.000000, 0.000000, 0.000000],\n [0.000000, 1.000000, 0.000000],\n [0.000000, -0.012346, 1.000000]]"
        );
    }

    #[test]
    fn test_entry_access() {
        let rows = [[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]];
        let m = CorrectionMatrix::from_rows(rows);
        assert_eq!(m.rows(), rows);
        assert_eq!(m.get(0, 0), Some(1.0));
        assert_eq!(m.get(1, 2), Some(6.0));
        assert_eq!(m.get(2, 1), Some(8.0));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 3), None);
    }

    #[test]
    fn test_gamut_of_ideal_panel_is_identity() {
        let white = XyYColor::new(0.3127, 0.3290, 1.0);
        let m = compute_gamut_matrix(&srgb(), white).unwrap();
        assert!(m.is_identity(1e-3), "{}", m);
        // the white of the panel maps onto the white of BT.709
        let corrected = m.apply(white.to_xyz());
        assert!((corrected.y - 1.0).abs() <= 1e-3);
    }

    #[test]
    fn test_gamut_rejects_bad_white() {
        let white = XyYColor::new(0.3127, 0.0, 1.0);
        assert_eq!(
            compute_gamut_matrix(&srgb(), white),
            Err(CalibrationError::InvalidWhitePoint(white))
        );
    }
}
