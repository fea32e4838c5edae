use thiserror::Error;

/// Errors reported by the orientation streamer
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamerError {
    /// The sensor did not identify itself during initialization.
    ///
    /// Terminal: the streamer stays halted and refuses every later call.
    #[error("no orientation sensor detected, check the bus connections")]
    SensorNotFound,

    /// A read or stream operation was called before a successful initialize
    #[error("streamer used before a successful initialize")]
    NotInitialized,

    /// The configured delimiter does not fit the frame budget
    #[error("delimiter longer than {max} bytes")]
    DelimiterTooLong {
        /// Maximum delimiter length in bytes
        max: usize,
    },

    /// A formatted line did not fit the frame buffer
    #[error("output line does not fit the frame buffer")]
    FrameOverflow,
}

/// Type alias for Result with StreamerError
pub type StreamerResult<T> = Result<T, StreamerError>;
