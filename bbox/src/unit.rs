//! Coordinate unit markers.

use crate::common::*;

/// The unit in which box coordinates are expressed.
pub trait Unit: Debug + Clone + Copy + PartialEq + Eq + Hash {
    const NAME: &'static str;
}

/// Coordinates measured in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelUnit;

/// Coordinates measured as fractions of the image height and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RatioUnit;

impl Unit for PixelUnit {
    const NAME: &'static str = "pixel";
}

impl Unit for RatioUnit {
    const NAME: &'static str = "ratio";
}
