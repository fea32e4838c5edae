use core::time::Duration;

use heapless::String;

use crate::{AxisRanges, StreamerError, StreamerResult};

/// Default transmission rate of the serial channel
pub const DEFAULT_BAUD_RATE: u32 = 9600;
/// Default time between two transmissions, in milliseconds
pub const DEFAULT_LATENCY_MS: u32 = 45;
/// Below this latency hand jitter shows up in the stream
pub const MIN_RECOMMENDED_LATENCY_MS: u32 = 30;
/// Above this latency movement stops looking smooth
pub const MAX_RECOMMENDED_LATENCY_MS: u32 = 150;
pub const DEFAULT_DELIMITER: &str = ",";
pub const MAX_DELIMITER_LEN: usize = 8;
/// Per-axis thresholds for the delta flags
pub const DEFAULT_MARGINS: [i32; 3] = [30, 30, 30];

pub type Delimiter = String<MAX_DELIMITER_LEN>;

/// `DEFAULT_DELIMITER` as a bounded string, empty if it ever outgrows the bound
fn default_delimiter() -> Delimiter {
    Delimiter::try_from(DEFAULT_DELIMITER).unwrap_or_default()
}

/// Coordinate convention of the consuming engine
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisConvention {
    /// Y is vertical
    #[default]
    Unity,
    /// Z is vertical
    Unreal,
}

/// Configuration for the orientation streamer
///
/// Built once before `initialize` and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamerConfig {
    /// Which sensor axis becomes the vertical output axis
    pub convention: AxisConvention,

    /// Serial transmission rate
    pub baud_rate: u32,

    /// Time between subsequent transmissions in milliseconds.
    /// The caller paces the stream with it.
    pub latency_ms: u32,

    /// Separator placed between emitted values
    pub delimiter: Delimiter,

    /// Terminate every emitted line with `\n`
    pub newline: bool,

    /// Target ranges for the modular remap
    pub ranges: AxisRanges,

    /// Thresholds for the delta flags
    pub margins: [i32; 3],
}

impl Default for StreamerConfig {
    fn default() -> Self {
        Self {
            convention: AxisConvention::default(),
            baud_rate: DEFAULT_BAUD_RATE,
            latency_ms: DEFAULT_LATENCY_MS,
            delimiter: default_delimiter(),
            newline: true,
            ranges: AxisRanges::default(),
            margins: DEFAULT_MARGINS,
        }
    }
}

impl StreamerConfig {
    pub fn new(
        convention: AxisConvention,
        baud_rate: u32,
        delimiter: &str,
        newline: bool,
    ) -> StreamerResult<Self> {
        let mut config = StreamerConfig {
            convention,
            baud_rate,
            newline,
            ..Default::default()
        };
        config.set_delimiter(delimiter)?;
        Ok(config)
    }

    pub fn set_delimiter(&mut self, delimiter: &str) -> StreamerResult<&mut Self> {
        let mut value = Delimiter::new();
        value
            .push_str(delimiter)
            .map_err(|_| StreamerError::DelimiterTooLong { max: MAX_DELIMITER_LEN })?;
        self.delimiter = value;
        Ok(self)
    }

    pub fn with_latency(mut self, latency_ms: u32) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_ranges(mut self, ranges: AxisRanges) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn with_margins(mut self, margins: [i32; 3]) -> Self {
        self.margins = margins;
        self
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(u64::from(self.latency_ms))
    }

    /// Whether the latency lies in the recommended 30-150 ms window
    pub fn latency_recommended(&self) -> bool {
        (MIN_RECOMMENDED_LATENCY_MS..=MAX_RECOMMENDED_LATENCY_MS).contains(&self.latency_ms)
    }
}
