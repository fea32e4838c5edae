use hal::EulerAngles;

use crate::RotationVector;

/// Closed integer range used for linear remapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    pub const fn new(min: i32, max: i32) -> Self {
        AxisRange { min, max }
    }
}

/// Native heading range of the sensor
pub const X_NATIVE: AxisRange = AxisRange::new(0, 360);
/// Native roll range of the sensor
pub const Y_NATIVE: AxisRange = AxisRange::new(-90, 90);
/// Native pitch range of the sensor
pub const Z_NATIVE: AxisRange = AxisRange::new(-180, 180);

/// Target range for each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRanges {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

/// Identity target ranges
pub const NATIVE_RANGES: AxisRanges = AxisRanges {
    x: X_NATIVE,
    y: Y_NATIVE,
    z: Z_NATIVE,
};

impl Default for AxisRanges {
    fn default() -> Self {
        NATIVE_RANGES
    }
}

/// Linearly map `value` from one range into another.
///
/// Integer arithmetic with a 128-bit intermediate, so any pair of i32
/// ranges is safe; the quotient truncates toward zero and the result
/// saturates to i32. An empty source range maps everything to `to.min`.
pub fn map_range(value: i32, from: AxisRange, to: AxisRange) -> i32 {
    let span_in = i128::from(from.max) - i128::from(from.min);
    if span_in == 0 {
        return to.min;
    }
    let span_out = i128::from(to.max) - i128::from(to.min);
    let mapped = (i128::from(value) - i128::from(from.min)) * span_out / span_in + i128::from(to.min);
    mapped.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32
}

/// Remap a raw sample from the native ranges into `ranges`.
///
/// Works on the sensor axes as reported; no convention swap is applied.
pub fn remap(sample: &EulerAngles, ranges: &AxisRanges) -> RotationVector {
    RotationVector::new(
        map_range(sample.x as i32, X_NATIVE, ranges.x),
        map_range(sample.y as i32, Y_NATIVE, ranges.y),
        map_range(sample.z as i32, Z_NATIVE, ranges.z),
    )
}
