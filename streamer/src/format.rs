// Text frames written to the serial channel.
//
// Every writer clears the frame first, so nothing accumulates between
// calls. Capacity covers three i32 values, two maximum-length delimiters
// and a newline.

use core::fmt::Write;

use heapless::String;

use crate::{DeltaFlags, RotationVector, StreamerError, StreamerResult};

pub const FRAME_CAPACITY: usize = 64;

pub type Frame = String<FRAME_CAPACITY>;

fn write_joined<I>(frame: &mut Frame, values: I, delimiter: &str, newline: bool) -> StreamerResult<()>
where
    I: IntoIterator<Item = i32>,
{
    frame.clear();
    for (index, value) in values.into_iter().enumerate() {
        if index > 0 {
            frame.push_str(delimiter).map_err(|_| StreamerError::FrameOverflow)?;
        }
        write!(frame, "{}", value).map_err(|_| StreamerError::FrameOverflow)?;
    }
    if newline {
        frame.push('\n').map_err(|_| StreamerError::FrameOverflow)?;
    }
    Ok(())
}

/// `x{d}y{d}z`, optionally newline terminated
pub fn write_full(
    frame: &mut Frame,
    rotation: &RotationVector,
    delimiter: &str,
    newline: bool,
) -> StreamerResult<()> {
    write_joined(frame, rotation.to_array(), delimiter, newline)
}

/// Only the selected axes, in x, y, z order.
///
/// Included values are joined by the delimiter; there is never a trailing
/// delimiter, whatever subset is selected.
pub fn write_selective(
    frame: &mut Frame,
    rotation: &RotationVector,
    include: [bool; 3],
    delimiter: &str,
    newline: bool,
) -> StreamerResult<()> {
    let values = rotation
        .to_array()
        .into_iter()
        .zip(include)
        .filter_map(|(value, included)| included.then_some(value));
    write_joined(frame, values, delimiter, newline)
}

/// Human readable `X: x, Y: y, Z: z`, never newline terminated
pub fn write_labeled(frame: &mut Frame, rotation: &RotationVector) -> StreamerResult<()> {
    frame.clear();
    write!(frame, "X: {}, Y: {}, Z: {}", rotation.x, rotation.y, rotation.z)
        .map_err(|_| StreamerError::FrameOverflow)
}

/// Flags as `1`/`0` joined by the delimiter
pub fn write_flags(
    frame: &mut Frame,
    flags: &DeltaFlags,
    delimiter: &str,
    newline: bool,
) -> StreamerResult<()> {
    write_joined(frame, flags.to_array().map(i32::from), delimiter, newline)
}
