use thiserror::Error;

#[doc = r#"
Problems with the 8 byte header in front of a track chunk.

These are raised while building a [`TrackBuffer`](crate::reader::TrackBuffer),
before any event is scanned.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ChunkError {
    /// The chunk is shorter than its own header
    #[error("Chunk holds {0} bytes, the chunk header alone needs 8")]
    HeaderTooShort(usize),
    /// The chunk is not tagged `MTrk`
    #[error("Expected an MTrk chunk, found tag {0:02X?}")]
    UnexpectedTag([u8; 4]),
}

/// A channel number outside of `1..=16`
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Channel {0} is not in 1..=16")]
pub struct ChannelError(pub u8);

/// Errors parsing SMPTE values, either from a file's division field
/// or from an `FF 54` offset meta event.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteError {
    /// The division's high byte is not -24, -25, -29 or -30
    #[error("Invalid SMPTE frame rate in division: {0}")]
    HeaderFrameTime(i8),
    /// Ticks per frame in the division must fit in 7 bits
    #[error("Invalid ticks per frame: {0}")]
    TicksPerFrame(u8),
    /// The offset payload is not exactly five bytes
    #[error("SMPTE offset payload must be 5 bytes, got {0}")]
    Length(usize),
    /// Hour is above 23
    #[error("Invalid hour offset: {0}")]
    HourOffset(u8),
    /// Minute is above 59
    #[error("Invalid minute offset: {0}")]
    MinuteOffset(u8),
    /// Second is above 59
    #[error("Invalid second offset: {0}")]
    SecondOffset(u8),
    /// Frame does not exist at the offset's frame rate
    #[error("Invalid frame {frame} for {fps} fps")]
    Frame {
        /// The offending frame
        frame: u8,
        /// Nominal frames per second
        fps: u8,
    },
    /// Subframes count hundredths of a frame
    #[error("Invalid subframe: {0}")]
    Subframe(u8),
}
