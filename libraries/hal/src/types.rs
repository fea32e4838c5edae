/// Common data types for hardware abstraction interfaces
pub use nalgebra::Vector3;

/// 3D vector representation using nalgebra
pub type Vector3d = Vector3<f32>;

/// Euler angles in degrees as reported by an absolute orientation sensor
///
/// `x` is the heading in [0, 360), `y` the roll in [-90, 90] and `z` the
/// pitch in [-180, 180].
pub type EulerAngles = Vector3d;
