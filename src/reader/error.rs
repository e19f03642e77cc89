use crate::SmpteError;
use thiserror::Error;

#[doc = r#"
An error raised while scanning the events of a track chunk.

The position is the byte offset into the whole chunk (header included)
where the offending event or value starts.
"#]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("Scanning at position {position}, {kind}")]
pub struct ScanError {
    position: usize,
    pub(crate) kind: ScanErrorKind,
}

/// A kind of error the scanner can produce
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScanErrorKind {
    /// A variable-length quantity (a delta-time, or a meta event length)
    /// kept its continuation bit set past the byte cap.
    #[error("Variable-length quantity not terminated within {max_bytes} bytes")]
    MalformedDeltaTime {
        /// The configured byte cap
        max_bytes: usize,
    },
    /// The byte is neither a known status nor covered by running status
    #[error("Unknown event category for byte {0:#04X}")]
    UnknownEventCategory(u8),
    /// `FF` followed by a sub-type the interpreter does not know
    #[error("Unknown meta event sub-type {0:#04X}")]
    UnknownMetaSubtype(u8),
    /// No `F7` inside the sysex search window
    #[error("System exclusive message has no F7 within {window} bytes")]
    UnterminatedSysex {
        /// The configured search window
        window: usize,
    },
    /// A length-prefixed payload runs past the end of the chunk
    #[error("Payload needs {needed} bytes, only {available} remain")]
    TruncatedPayload {
        /// Bytes the payload declares
        needed: usize,
        /// Bytes left before the chunk bound
        available: usize,
    },
    /// A fixed-size read would go past the end of the chunk
    #[error("Read past the end of the track chunk")]
    BufferExhausted,
    /// A tempo meta event declaring zero microseconds per quarter note
    #[error("Tempo of zero microseconds per quarter note")]
    InvalidTempo,
    /// A SMPTE offset meta event carrying nonsense
    #[error("Invalid SMPTE offset: {0}")]
    InvalidSmpteOffset(#[from] SmpteError),
}

impl ScanErrorKind {
    /// True for the kinds that a [`RecoveryPolicy::Skip`](crate::scan::RecoveryPolicy::Skip)
    /// scan steps over instead of stopping.
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::UnknownEventCategory(_)
                | Self::UnknownMetaSubtype(_)
                | Self::UnterminatedSysex { .. }
        )
    }

    /// True for the kinds that never stop a scan; the offending value is dropped.
    pub const fn is_advisory(&self) -> bool {
        matches!(self, Self::InvalidTempo | Self::InvalidSmpteOffset(_))
    }
}

impl ScanError {
    /// Create a scan error from a position and kind
    pub const fn new(position: usize, kind: ScanErrorKind) -> Self {
        Self { position, kind }
    }
    /// Create a new out of bounds error
    pub const fn exhausted(position: usize) -> Self {
        Self::new(position, ScanErrorKind::BufferExhausted)
    }
    /// True if the scan simply ran into the end of the chunk
    pub const fn is_buffer_exhausted(&self) -> bool {
        matches!(self.kind, ScanErrorKind::BufferExhausted)
    }
    /// Returns the error kind.
    pub fn kind(&self) -> &ScanErrorKind {
        &self.kind
    }
    /// Returns the byte offset where the error occurred.
    pub fn position(&self) -> usize {
        self.position
    }
}

/// The Scan Result type (see [`ScanError`])
pub type ScanResult<T> = Result<T, ScanError>;

#[test]
fn recovery_classes() {
    use ScanErrorKind::*;
    for kind in [
        UnknownEventCategory(0xF1),
        UnknownMetaSubtype(0x7F),
        UnterminatedSysex { window: 127 },
    ] {
        assert!(kind.is_skippable());
        assert!(!kind.is_advisory());
    }
    for kind in [InvalidTempo, ScanErrorKind::from(SmpteError::Subframe(100))] {
        assert!(kind.is_advisory());
        assert!(!kind.is_skippable());
    }
    for kind in [
        MalformedDeltaTime { max_bytes: 4 },
        TruncatedPayload {
            needed: 3,
            available: 1,
        },
        BufferExhausted,
    ] {
        assert!(!kind.is_skippable());
        assert!(!kind.is_advisory());
    }
}
