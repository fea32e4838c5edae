use hal::{EulerAngles, OrientationSensor};
use log::debug;

/// Simulated BNO055 sweeping through its native ranges
///
/// Heading turns 3 degrees per poll, roll and pitch swing on slow sine
/// waves. Fully deterministic so runs can be compared.
pub struct SimulatedBno055 {
    present: bool,
    ext_crystal: bool,
    step: u32,
}

impl SimulatedBno055 {
    pub fn new(present: bool) -> Self {
        SimulatedBno055 {
            present,
            ext_crystal: false,
            step: 0,
        }
    }

    pub fn ext_crystal(&self) -> bool {
        self.ext_crystal
    }

    fn sample_at(step: u32) -> EulerAngles {
        let t = step as f32;
        let heading = (t * 3.0) % 360.0;
        let roll = 60.0 * (t * 0.05).sin();
        let pitch = 150.0 * (t * 0.03).cos();
        EulerAngles::new(heading, roll, pitch)
    }
}

impl OrientationSensor for SimulatedBno055 {
    fn begin(&mut self) -> bool {
        debug!("simulated BNO055 present: {}", self.present);
        self.present
    }

    fn set_ext_crystal_use(&mut self, use_ext_crystal: bool) {
        self.ext_crystal = use_ext_crystal;
    }

    fn get_orientation(&mut self) -> EulerAngles {
        let sample = Self::sample_at(self.step);
        self.step = self.step.wrapping_add(1);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_stay_in_native_ranges() {
        let mut sensor = SimulatedBno055::new(true);
        for _ in 0..1000 {
            let sample = sensor.get_orientation();
            assert!((0.0..360.0).contains(&sample.x), "heading out of range: {}", sample.x);
            assert!((-90.0..=90.0).contains(&sample.y), "roll out of range: {}", sample.y);
            assert!((-180.0..=180.0).contains(&sample.z), "pitch out of range: {}", sample.z);
        }
    }

    #[test]
    fn test_sweep_is_deterministic() {
        let mut a = SimulatedBno055::new(true);
        let mut b = SimulatedBno055::new(true);
        for _ in 0..10 {
            assert_eq!(a.get_orientation(), b.get_orientation());
        }
    }

    #[test]
    fn test_absent_sensor() {
        assert!(!SimulatedBno055::new(false).begin());
        assert!(SimulatedBno055::new(true).begin());
    }
}
