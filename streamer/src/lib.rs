#![cfg_attr(not(test), no_std)]

mod config;
mod error;
mod format;
mod remap;
mod rotation;
mod streamer;

pub use config::{
    AxisConvention, Delimiter, StreamerConfig, DEFAULT_BAUD_RATE, DEFAULT_DELIMITER,
    DEFAULT_LATENCY_MS, DEFAULT_MARGINS, MAX_DELIMITER_LEN, MAX_RECOMMENDED_LATENCY_MS,
    MIN_RECOMMENDED_LATENCY_MS,
};
pub use error::{StreamerError, StreamerResult};
pub use format::FRAME_CAPACITY;
pub use remap::{map_range, remap, AxisRange, AxisRanges, NATIVE_RANGES, X_NATIVE, Y_NATIVE, Z_NATIVE};
pub use rotation::{DeltaFlags, RotationVector};
pub use streamer::{OrientationStreamer, SENSOR_NOT_FOUND_MESSAGE};
