/// Absolute orientation sensor interface
use crate::types::EulerAngles;

/// Orientation sensor with on-chip fusion that reports Euler angles
pub trait OrientationSensor {
    /// Detect and initialize the sensor
    ///
    /// Returns false if the sensor could not be reached or identified
    fn begin(&mut self) -> bool;

    /// Use the external crystal as the timing reference, if the board has one
    fn set_ext_crystal_use(&mut self, use_ext_crystal: bool);

    /// Get the latest orientation event in degrees
    fn get_orientation(&mut self) -> EulerAngles;
}
