//! This module contains the perceptual color spaces derived from XYZ. For convenience, each main
//! type is imported into this module's namespace directly.
pub mod cielabcolor;

pub use self::cielabcolor::CIELABColor;
