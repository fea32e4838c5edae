/// Serial-like text output interface

/// Character sink for the emitted stream
///
/// Writes are fire-and-forget: there is no acknowledgement and no
/// backpressure signal.
pub trait SerialOutput {
    /// Open the channel at the given transmission rate
    fn begin(&mut self, baud_rate: u32);

    /// Write text to the channel
    fn write_text(&mut self, text: &str);
}
