use std::io::{self, Stdout, Write};

use hal::SerialOutput;
use log::{info, warn};

use crate::sim::SimulatedBno055;

/// Serial channel backed by any byte sink, stdout on the SITL board
pub struct ConsoleSerial<O: Write> {
    out: O,
    baud_rate: Option<u32>,
}

impl<O: Write> ConsoleSerial<O> {
    pub fn new(out: O) -> Self {
        ConsoleSerial { out, baud_rate: None }
    }

    pub fn baud_rate(&self) -> Option<u32> {
        self.baud_rate
    }

    pub fn into_inner(self) -> O {
        self.out
    }
}

impl<O: Write> SerialOutput for ConsoleSerial<O> {
    fn begin(&mut self, baud_rate: u32) {
        info!("serial opened at {} baud", baud_rate);
        self.baud_rate = Some(baud_rate);
    }

    fn write_text(&mut self, text: &str) {
        // no backpressure on a serial line, drop what cannot be written
        if let Err(err) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            warn!("serial write failed: {}", err);
        }
    }
}

pub struct SitlBoard {
    sensor: SimulatedBno055,
    serial: ConsoleSerial<Stdout>,
}

impl SitlBoard {
    pub fn new(sensor_present: bool) -> Self {
        SitlBoard {
            sensor: SimulatedBno055::new(sensor_present),
            serial: ConsoleSerial::new(io::stdout()),
        }
    }

    pub fn name(&self) -> &str {
        "SITL"
    }

    pub fn split_resources(self) -> (SimulatedBno055, ConsoleSerial<Stdout>) {
        (self.sensor, self.serial)
    }
}
