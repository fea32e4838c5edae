use anyhow::bail;
use clap::{Parser, ValueEnum};
use streamer::{AxisConvention, StreamerConfig, DEFAULT_BAUD_RATE, DEFAULT_DELIMITER, DEFAULT_LATENCY_MS};

#[derive(Parser, Debug)]
#[command(author, version, about = "Stream orientation from a simulated BNO055 as delimited text", long_about = None)]
pub struct Args {
    /// Coordinate convention of the consuming engine
    #[arg(short, long, value_enum, default_value_t = Convention::Unity)]
    pub convention: Convention,

    /// Serial transmission rate
    #[arg(short, long, default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,

    /// Time between transmissions in ms (30-150 recommended)
    #[arg(short, long, default_value_t = DEFAULT_LATENCY_MS)]
    pub latency: u32,

    /// Separator between values
    #[arg(short, long, default_value = DEFAULT_DELIMITER, allow_hyphen_values = true)]
    pub delimiter: String,

    /// Do not terminate lines with a newline
    #[arg(long)]
    pub no_newline: bool,

    /// What to emit every cycle
    #[arg(short, long, value_enum, default_value_t = Mode::Continuous)]
    pub mode: Mode,

    /// Axes emitted in selective mode, any combination of x, y and z
    #[arg(long, default_value = "xyz")]
    pub axes: String,

    /// Stop after this many cycles, 0 runs forever
    #[arg(long, default_value_t = 0)]
    pub cycles: u64,

    /// Simulate a missing sensor
    #[arg(long)]
    pub absent: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convention {
    /// Y axis up
    Unity,
    /// Z axis up
    Unreal,
}

impl From<Convention> for AxisConvention {
    fn from(convention: Convention) -> Self {
        match convention {
            Convention::Unity => AxisConvention::Unity,
            Convention::Unreal => AxisConvention::Unreal,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// All three rotation values
    Continuous,
    /// One flag per axis above its margin
    Delta,
    /// Labeled values for calibration
    Labeled,
    /// Only the axes given by --axes
    Selective,
}

impl Args {
    pub fn config(&self) -> anyhow::Result<StreamerConfig> {
        let config = StreamerConfig::new(
            self.convention.into(),
            self.baud,
            &self.delimiter,
            !self.no_newline,
        )?;
        Ok(config.with_latency(self.latency))
    }

    pub fn selected_axes(&self) -> anyhow::Result<[bool; 3]> {
        let mut axes = [false; 3];
        for c in self.axes.chars() {
            match c.to_ascii_lowercase() {
                'x' => axes[0] = true,
                'y' => axes[1] = true,
                'z' => axes[2] = true,
                other => bail!("unknown axis '{}', expected x, y or z", other),
            }
        }
        Ok(axes)
    }
}
