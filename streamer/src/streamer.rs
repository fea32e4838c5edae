use core::time::Duration;

use hal::{EulerAngles, OrientationSensor, SerialOutput};
use log::{debug, error, info, trace, warn};

use crate::format::{self, Frame};
use crate::{
    remap, AxisConvention, AxisRange, AxisRanges, DeltaFlags, RotationVector, StreamerConfig,
    StreamerError, StreamerResult, MAX_RECOMMENDED_LATENCY_MS, MIN_RECOMMENDED_LATENCY_MS,
};

/// Diagnostic written to the serial channel when no sensor answers
pub const SENSOR_NOT_FOUND_MESSAGE: &str = "No BNO055 was detected. Please check your connections";

enum State {
    Unconfigured,
    Ready(StreamerConfig),
    /// Sensor detection failed; nothing runs after this
    Halted,
}

fn ready(state: &State) -> StreamerResult<&StreamerConfig> {
    match state {
        State::Ready(config) => Ok(config),
        State::Unconfigured => Err(StreamerError::NotInitialized),
        State::Halted => Err(StreamerError::SensorNotFound),
    }
}

/// Polls an orientation sensor and streams the rotation as text.
///
/// Every stream operation performs exactly one poll, format and write,
/// then returns. Pacing is up to the caller, see [`OrientationStreamer::latency`].
pub struct OrientationStreamer<S, W> {
    sensor: S,
    serial: W,
    state: State,
    rotation: RotationVector,
    frame: Frame,
}

impl<S: OrientationSensor, W: SerialOutput> OrientationStreamer<S, W> {
    pub fn new(sensor: S, serial: W) -> Self {
        OrientationStreamer {
            sensor,
            serial,
            state: State::Unconfigured,
            rotation: RotationVector::default(),
            frame: Frame::new(),
        }
    }

    /// Open the serial channel, detect the sensor and lock in `config`.
    ///
    /// A missing sensor writes one diagnostic line and halts the streamer
    /// for good. Initializing an already configured streamer keeps the
    /// first configuration.
    pub fn initialize(&mut self, config: StreamerConfig) -> StreamerResult<()> {
        match &self.state {
            State::Halted => return Err(StreamerError::SensorNotFound),
            State::Ready(current) => {
                if *current != config {
                    warn!("streamer already initialized, ignoring new configuration");
                }
                return Ok(());
            }
            State::Unconfigured => {}
        }

        self.serial.begin(config.baud_rate);

        if !self.sensor.begin() {
            error!("orientation sensor not detected, halting");
            self.serial.write_text(SENSOR_NOT_FOUND_MESSAGE);
            self.state = State::Halted;
            return Err(StreamerError::SensorNotFound);
        }

        self.sensor.set_ext_crystal_use(true);

        if !config.latency_recommended() {
            warn!(
                "latency {} ms outside the recommended {}-{} ms window",
                config.latency_ms, MIN_RECOMMENDED_LATENCY_MS, MAX_RECOMMENDED_LATENCY_MS
            );
        }
        info!(
            "orientation streamer ready: {:?} convention, {} baud, {} ms latency",
            config.convention, config.baud_rate, config.latency_ms
        );

        self.state = State::Ready(config);
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, State::Ready(_))
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.state, State::Halted)
    }

    /// Poll the sensor and store the rotation in the configured convention
    pub fn read_euler_angles(&mut self) -> StreamerResult<EulerAngles> {
        let convention = ready(&self.state)?.convention;
        let sample = self.sensor.get_orientation();
        self.rotation = RotationVector::from_sample(&sample, convention);
        trace!("sample {:?} -> {:?}", sample, self.rotation);
        Ok(sample)
    }

    /// Poll the sensor and map each native axis into the given target range
    pub fn remap_axes(
        &mut self,
        x_range: AxisRange,
        y_range: AxisRange,
        z_range: AxisRange,
    ) -> StreamerResult<RotationVector> {
        ready(&self.state)?;
        let ranges = AxisRanges {
            x: x_range,
            y: y_range,
            z: z_range,
        };
        let sample = self.sensor.get_orientation();
        self.rotation = remap(&sample, &ranges);
        Ok(self.rotation)
    }

    /// [`remap_axes`](Self::remap_axes) with the ranges from the configuration
    pub fn remap_default(&mut self) -> StreamerResult<RotationVector> {
        let ranges = ready(&self.state)?.ranges;
        self.remap_axes(ranges.x, ranges.y, ranges.z)
    }

    /// All three values joined by the delimiter
    pub fn format_full(&mut self) -> StreamerResult<&str> {
        let config = ready(&self.state)?;
        format::write_full(&mut self.frame, &self.rotation, &config.delimiter, config.newline)?;
        Ok(self.frame.as_str())
    }

    /// Only the selected axes joined by the delimiter, no trailing delimiter
    pub fn format_selective(
        &mut self,
        include_x: bool,
        include_y: bool,
        include_z: bool,
    ) -> StreamerResult<&str> {
        let config = ready(&self.state)?;
        format::write_selective(
            &mut self.frame,
            &self.rotation,
            [include_x, include_y, include_z],
            &config.delimiter,
            config.newline,
        )?;
        Ok(self.frame.as_str())
    }

    /// Labeled line for calibration on a serial monitor. Not meant for parsers.
    pub fn format_labeled(&mut self) -> StreamerResult<&str> {
        ready(&self.state)?;
        format::write_labeled(&mut self.frame, &self.rotation)?;
        Ok(self.frame.as_str())
    }

    /// One cycle: read, format all three values, write
    pub fn stream_continuous(&mut self) -> StreamerResult<()> {
        self.read_euler_angles()?;
        let config = ready(&self.state)?;
        format::write_full(&mut self.frame, &self.rotation, &config.delimiter, config.newline)?;
        self.serial.write_text(&self.frame);
        debug!("streamed {:?}", self.rotation);
        Ok(())
    }

    /// One cycle: read, flag every axis above its margin, write the flags
    pub fn stream_delta_flags(&mut self) -> StreamerResult<DeltaFlags> {
        self.read_euler_angles()?;
        let config = ready(&self.state)?;
        let flags = DeltaFlags::exceeding(&self.rotation, &config.margins);
        format::write_flags(&mut self.frame, &flags, &config.delimiter, config.newline)?;
        self.serial.write_text(&self.frame);
        debug!("streamed flags {:?}", flags);
        Ok(flags)
    }

    /// One cycle: read and write the labeled diagnostic line
    pub fn stream_labeled(&mut self) -> StreamerResult<()> {
        self.read_euler_angles()?;
        format::write_labeled(&mut self.frame, &self.rotation)?;
        self.serial.write_text(&self.frame);
        Ok(())
    }

    /// One cycle: read and write only the selected axes
    pub fn stream_selective(
        &mut self,
        include_x: bool,
        include_y: bool,
        include_z: bool,
    ) -> StreamerResult<()> {
        self.read_euler_angles()?;
        self.format_selective(include_x, include_y, include_z)?;
        self.serial.write_text(&self.frame);
        Ok(())
    }

    pub fn x(&self) -> i32 {
        self.rotation.x
    }

    pub fn y(&self) -> i32 {
        self.rotation.y
    }

    pub fn z(&self) -> i32 {
        self.rotation.z
    }

    pub fn rotation(&self) -> RotationVector {
        self.rotation
    }

    /// Time the caller should wait between two cycles
    pub fn latency(&self) -> StreamerResult<Duration> {
        Ok(ready(&self.state)?.latency())
    }

    pub fn convention(&self) -> StreamerResult<AxisConvention> {
        Ok(ready(&self.state)?.convention)
    }

    pub fn sensor(&self) -> &S {
        &self.sensor
    }

    pub fn serial(&self) -> &W {
        &self.serial
    }

    /// Give the collaborators back
    pub fn release(self) -> (S, W) {
        (self.sensor, self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{X_NATIVE, Y_NATIVE, Z_NATIVE};
    use std::collections::VecDeque;

    struct ScriptedSensor {
        missing: bool,
        begun: bool,
        ext_crystal: bool,
        samples: VecDeque<EulerAngles>,
        last: EulerAngles,
        polls: usize,
    }

    impl Default for ScriptedSensor {
        fn default() -> Self {
            ScriptedSensor {
                missing: false,
                begun: false,
                ext_crystal: false,
                samples: VecDeque::new(),
                last: EulerAngles::zeros(),
                polls: 0,
            }
        }
    }

    impl ScriptedSensor {
        fn with_samples(samples: &[(f32, f32, f32)]) -> Self {
            ScriptedSensor {
                samples: samples.iter().map(|&(x, y, z)| EulerAngles::new(x, y, z)).collect(),
                ..Default::default()
            }
        }

        fn missing() -> Self {
            ScriptedSensor {
                missing: true,
                ..Default::default()
            }
        }
    }

    impl OrientationSensor for ScriptedSensor {
        fn begin(&mut self) -> bool {
            self.begun = !self.missing;
            self.begun
        }

        fn set_ext_crystal_use(&mut self, use_ext_crystal: bool) {
            self.ext_crystal = use_ext_crystal;
        }

        fn get_orientation(&mut self) -> EulerAngles {
            self.polls += 1;
            if let Some(sample) = self.samples.pop_front() {
                self.last = sample;
            }
            self.last
        }
    }

    #[derive(Default)]
    struct CapturingSerial {
        baud_rate: Option<u32>,
        writes: Vec<String>,
    }

    impl SerialOutput for CapturingSerial {
        fn begin(&mut self, baud_rate: u32) {
            self.baud_rate = Some(baud_rate);
        }

        fn write_text(&mut self, text: &str) {
            self.writes.push(text.to_string());
        }
    }

    fn streamer(
        samples: &[(f32, f32, f32)],
        convention: AxisConvention,
    ) -> OrientationStreamer<ScriptedSensor, CapturingSerial> {
        let mut streamer = OrientationStreamer::new(ScriptedSensor::with_samples(samples), CapturingSerial::default());
        let config = StreamerConfig {
            convention,
            ..Default::default()
        };
        streamer.initialize(config).expect("Scripted sensor should be detected");
        streamer
    }

    #[test]
    fn test_initialize() {
        let mut streamer = OrientationStreamer::new(ScriptedSensor::default(), CapturingSerial::default());
        assert!(!streamer.is_initialized());

        let config = StreamerConfig::new(AxisConvention::Unreal, 115_200, ";", false).unwrap();
        streamer.initialize(config).expect("Sensor should be detected");

        assert!(streamer.is_initialized());
        assert_eq!(streamer.convention(), Ok(AxisConvention::Unreal));
        assert_eq!(streamer.latency(), Ok(Duration::from_millis(45)));
        assert!(streamer.sensor().begun, "sensor should be started");
        assert!(streamer.sensor().ext_crystal, "external crystal should be enabled");
        assert_eq!(streamer.serial().baud_rate, Some(115_200));
        assert!(streamer.serial().writes.is_empty(), "successful init writes nothing");
    }

    #[test]
    fn test_not_initialized() {
        let mut streamer = OrientationStreamer::new(ScriptedSensor::default(), CapturingSerial::default());

        assert_eq!(streamer.read_euler_angles(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.remap_default(), Err(StreamerError::NotInitialized));
        assert_eq!(
            streamer.remap_axes(X_NATIVE, Y_NATIVE, Z_NATIVE),
            Err(StreamerError::NotInitialized)
        );
        assert_eq!(streamer.format_full(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.format_selective(true, true, true), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.format_labeled(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.stream_continuous(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.stream_delta_flags(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.stream_labeled(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.stream_selective(true, false, true), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.convention(), Err(StreamerError::NotInitialized));
        assert_eq!(streamer.latency(), Err(StreamerError::NotInitialized));

        let (sensor, serial) = streamer.release();
        assert_eq!(sensor.polls, 0, "sensor should never be polled");
        assert!(serial.writes.is_empty(), "no output before initialize");
    }

    #[test]
    fn test_sensor_not_found_halts() {
        let mut streamer = OrientationStreamer::new(ScriptedSensor::missing(), CapturingSerial::default());

        assert_eq!(streamer.initialize(StreamerConfig::default()), Err(StreamerError::SensorNotFound));
        assert!(streamer.is_halted());
        assert!(!streamer.sensor().ext_crystal, "crystal is left alone on failure");
        assert_eq!(streamer.serial().writes, vec![SENSOR_NOT_FOUND_MESSAGE.to_string()]);

        // fail-stop: nothing else runs and nothing else is written
        assert_eq!(streamer.stream_continuous(), Err(StreamerError::SensorNotFound));
        assert_eq!(streamer.stream_delta_flags(), Err(StreamerError::SensorNotFound));
        assert_eq!(streamer.initialize(StreamerConfig::default()), Err(StreamerError::SensorNotFound));
        assert_eq!(streamer.serial().writes.len(), 1, "diagnostic is written exactly once");
        assert_eq!(streamer.sensor().polls, 0);
    }

    #[test]
    fn test_reinitialize_keeps_configuration() {
        let mut streamer = streamer(&[(10.0, 20.0, 30.0)], AxisConvention::Unity);
        let other = StreamerConfig {
            convention: AxisConvention::Unreal,
            ..Default::default()
        };
        assert_eq!(streamer.initialize(other), Ok(()));
        assert_eq!(streamer.convention(), Ok(AxisConvention::Unity), "convention is fixed for the lifetime");
    }

    #[test]
    fn test_read_euler_angles_conventions() {
        let mut unity = streamer(&[(200.9, -45.5, 120.2)], AxisConvention::Unity);
        let sample = unity.read_euler_angles().unwrap();
        assert_eq!(sample, EulerAngles::new(200.9, -45.5, 120.2), "raw sample is returned untouched");
        assert_eq!((unity.x(), unity.y(), unity.z()), (200, -45, 120));

        let mut unreal = streamer(&[(200.9, -45.5, 120.2)], AxisConvention::Unreal);
        unreal.read_euler_angles().unwrap();
        assert_eq!((unreal.x(), unreal.y(), unreal.z()), (200, 120, -45));
    }

    #[test]
    fn test_conventions_differ_only_in_vertical_axes() {
        let samples = [(12.0, 34.0, -56.0), (359.0, -90.0, 180.0), (0.0, 0.0, 0.0)];
        let mut unity = streamer(&samples, AxisConvention::Unity);
        let mut unreal = streamer(&samples, AxisConvention::Unreal);

        for _ in 0..samples.len() {
            unity.stream_continuous().unwrap();
            unreal.stream_continuous().unwrap();
        }

        for (a, b) in unity.serial().writes.iter().zip(&unreal.serial().writes) {
            let a: Vec<&str> = a.trim_end().split(',').collect();
            let b: Vec<&str> = b.trim_end().split(',').collect();
            assert_eq!(a[0], b[0], "axis 0 must match");
            assert_eq!((a[1], a[2]), (b[2], b[1]), "axes 1 and 2 must be swapped");
        }
    }

    #[test]
    fn test_stream_continuous() {
        let mut streamer = streamer(&[(90.0, 10.0, -20.0), (91.5, 11.0, -21.0)], AxisConvention::Unity);
        streamer.stream_continuous().unwrap();
        streamer.stream_continuous().unwrap();

        assert_eq!(streamer.serial().writes, vec!["90,10,-20\n".to_string(), "91,11,-21\n".to_string()]);
        assert_eq!(streamer.sensor().polls, 2, "one poll per cycle");
    }

    #[test]
    fn test_stream_continuous_custom_delimiter() {
        let mut streamer = OrientationStreamer::new(
            ScriptedSensor::with_samples(&[(1.0, 2.0, 3.0)]),
            CapturingSerial::default(),
        );
        let config = StreamerConfig::new(AxisConvention::Unity, 9600, " ", false).unwrap();
        streamer.initialize(config).unwrap();
        streamer.stream_continuous().unwrap();

        assert_eq!(streamer.serial().writes, vec!["1 2 3".to_string()]);
    }

    #[test]
    fn test_stream_delta_flags() {
        let mut streamer = streamer(&[(31.0, 10.0, 31.0)], AxisConvention::Unity);
        let flags = streamer.stream_delta_flags().unwrap();

        assert_eq!(flags.to_array(), [true, false, true]);
        assert_eq!(streamer.serial().writes, vec!["1,0,1\n".to_string()], "all three flags are emitted");
    }

    #[test]
    fn test_stream_delta_flags_custom_margins() {
        let mut streamer = OrientationStreamer::new(
            ScriptedSensor::with_samples(&[(5.0, 5.0, 50.0)]),
            CapturingSerial::default(),
        );
        streamer
            .initialize(StreamerConfig::default().with_margins([0, 10, 40]))
            .unwrap();

        let flags = streamer.stream_delta_flags().unwrap();
        assert_eq!(flags.to_array(), [true, false, true]);
    }

    #[test]
    fn test_formats_use_latest_rotation() {
        let mut streamer = streamer(&[(31.0, -10.0, 31.0)], AxisConvention::Unity);
        streamer.read_euler_angles().unwrap();

        assert_eq!(streamer.format_full(), Ok("31,-10,31\n"));
        assert_eq!(streamer.format_selective(true, false, true), Ok("31,31\n"));
        assert_eq!(streamer.format_selective(false, false, false), Ok("\n"));
        assert_eq!(streamer.format_labeled(), Ok("X: 31, Y: -10, Z: 31"));
        assert!(streamer.serial().writes.is_empty(), "formatting alone writes nothing");
    }

    #[test]
    fn test_stream_labeled_and_selective() {
        let mut streamer = streamer(&[(1.0, 2.0, 3.0)], AxisConvention::Unreal);
        streamer.stream_labeled().unwrap();
        streamer.stream_selective(false, true, true).unwrap();

        assert_eq!(
            streamer.serial().writes,
            vec!["X: 1, Y: 3, Z: 2".to_string(), "3,2\n".to_string()]
        );
    }

    #[test]
    fn test_remap_axes() {
        let mut streamer = streamer(&[(0.0, 0.0, 0.0), (180.0, 45.0, -90.0)], AxisConvention::Unreal);
        streamer.read_euler_angles().unwrap();

        let rotation = streamer
            .remap_axes(AxisRange::new(0, 100), AxisRange::new(0, 180), AxisRange::new(-100, 100))
            .unwrap();

        // fresh sample, native axis order regardless of convention
        assert_eq!(rotation, RotationVector::new(50, 135, -50));
        assert_eq!(streamer.rotation(), rotation, "remap updates the stored rotation");
        assert_eq!(streamer.sensor().polls, 2);
    }

    #[test]
    fn test_remap_default_is_identity() {
        let mut streamer = streamer(&[(359.9, -90.0, 179.5)], AxisConvention::Unity);
        let rotation = streamer.remap_default().unwrap();
        assert_eq!(rotation, RotationVector::new(359, -90, 179));
    }
}
