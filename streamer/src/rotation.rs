use hal::EulerAngles;

use crate::AxisConvention;

/// Integer rotation values produced by the last poll
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationVector {
    /// Rotation about the vertical axis (heading)
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RotationVector {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        RotationVector { x, y, z }
    }

    /// Reassign the sensor axes for the target engine.
    ///
    /// Heading always lands on x. Unity keeps roll/pitch on y/z, Unreal
    /// swaps them. Values are truncated toward zero and never clamped.
    pub fn from_sample(sample: &EulerAngles, convention: AxisConvention) -> Self {
        let x = sample.x as i32;
        match convention {
            AxisConvention::Unity => RotationVector::new(x, sample.y as i32, sample.z as i32),
            AxisConvention::Unreal => RotationVector::new(x, sample.z as i32, sample.y as i32),
        }
    }

    pub fn to_array(&self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }
}

/// Per-axis flags telling whether a rotation exceeded its margin
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeltaFlags {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl DeltaFlags {
    /// Flag every axis whose value is strictly above its margin
    pub fn exceeding(rotation: &RotationVector, margins: &[i32; 3]) -> Self {
        DeltaFlags {
            x: rotation.x > margins[0],
            y: rotation.y > margins[1],
            z: rotation.z > margins[2],
        }
    }

    pub fn to_array(&self) -> [bool; 3] {
        [self.x, self.y, self.z]
    }
}
