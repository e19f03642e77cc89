use crate::reader::ScanErrorKind;

/// Lowest byte value that is a status rather than data
pub const STATUS_BIT: u8 = 0x80;
/// Starts a system exclusive message
pub const SYSEX_START: u8 = 0xF0;
/// Ends a system exclusive message
pub const SYSEX_END: u8 = 0xF7;
/// Starts a meta event
pub const META: u8 = 0xFF;

#[doc = r#"
Where the status of an event came from.

Channel-voice events may leave out their status byte when it repeats the
previous one ("running status"). In that case the byte after the delta-time
is already the first data byte.
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// The status byte is present in the stream
    Explicit(u8),
    /// The status is carried over from the previous channel-voice event
    Inherited(u8),
}

impl Status {
    /// Decide the status for `byte`, read right after a delta-time.
    ///
    /// `running` is the last channel-voice status seen, if any.
    pub const fn resolve(byte: u8, running: Option<u8>) -> Result<Self, ScanErrorKind> {
        if byte >= STATUS_BIT {
            return Ok(Self::Explicit(byte));
        }
        match running {
            Some(status) if EventCategory::is_channel_voice_status(status) => {
                Ok(Self::Inherited(status))
            }
            _ => Err(ScanErrorKind::UnknownEventCategory(byte)),
        }
    }

    /// The status byte value
    pub const fn byte(&self) -> u8 {
        match self {
            Self::Explicit(b) | Self::Inherited(b) => *b,
        }
    }

    /// Bytes the status itself occupies in the stream
    pub const fn encoded_len(&self) -> usize {
        match self {
            Self::Explicit(_) => 1,
            Self::Inherited(_) => 0,
        }
    }
}

#[doc = r#"
The category of an event, decided from its status byte.

| Status | Category | Length (with status) |
|---|---|---|
| `8n` | note off | 3 |
| `9n` | note on | 3 |
| `An` | polyphonic key pressure | 3 |
| `Bn` | control change | 3 |
| `Cn` | program change | 2 |
| `Dn` | channel pressure | 2 |
| `En` | pitch bend | 3 |
| `F0` | system exclusive | up to the next `F7` |
| `FF` | meta | by sub-type |
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventCategory {
    /// `8n`
    NoteOff,
    /// `9n`
    NoteOn,
    /// `An`
    PolyPressure,
    /// `Bn`
    ControlChange,
    /// `Cn`
    ProgramChange,
    /// `Dn`
    ChannelPressure,
    /// `En`
    PitchBend,
    /// `F0`
    SysEx,
    /// `FF`
    Meta,
}

impl EventCategory {
    /// Classify a status byte
    pub const fn classify(status: u8) -> Result<Self, ScanErrorKind> {
        Ok(match status {
            0x80..=0x8F => Self::NoteOff,
            0x90..=0x9F => Self::NoteOn,
            0xA0..=0xAF => Self::PolyPressure,
            0xB0..=0xBF => Self::ControlChange,
            0xC0..=0xCF => Self::ProgramChange,
            0xD0..=0xDF => Self::ChannelPressure,
            0xE0..=0xEF => Self::PitchBend,
            SYSEX_START => Self::SysEx,
            META => Self::Meta,
            other => return Err(ScanErrorKind::UnknownEventCategory(other)),
        })
    }

    /// True for `0x80..=0xEF`, the statuses running status may repeat
    pub const fn is_channel_voice_status(status: u8) -> bool {
        matches!(status, 0x80..=0xEF)
    }

    /// Number of data bytes after the status for channel-voice categories
    pub const fn data_len(&self) -> Option<usize> {
        match self {
            Self::ProgramChange | Self::ChannelPressure => Some(1),
            Self::SysEx | Self::Meta => None,
            _ => Some(2),
        }
    }

    /// Full event length including an explicit status byte, when fixed
    pub const fn fixed_len(&self) -> Option<usize> {
        match self.data_len() {
            Some(n) => Some(n + 1),
            None => None,
        }
    }
}

#[test]
fn classify_ranges() {
    use EventCategory::*;
    let expected = [
        (0x80, NoteOff, Some(3)),
        (0x9F, NoteOn, Some(3)),
        (0xA3, PolyPressure, Some(3)),
        (0xBF, ControlChange, Some(3)),
        (0xC0, ProgramChange, Some(2)),
        (0xDF, ChannelPressure, Some(2)),
        (0xE5, PitchBend, Some(3)),
        (0xF0, SysEx, None),
        (0xFF, Meta, None),
    ];
    for (status, category, len) in expected {
        let got = EventCategory::classify(status).unwrap();
        assert_eq!(got, category);
        assert_eq!(got.fixed_len(), len);
    }
}

#[test]
fn system_common_is_unknown() {
    for status in [0xF1, 0xF2, 0xF7, 0xF8, 0xFE] {
        assert_eq!(
            EventCategory::classify(status),
            Err(ScanErrorKind::UnknownEventCategory(status))
        );
    }
}

#[test]
fn running_status_only_for_channel_voice() {
    assert_eq!(Status::resolve(0x3C, Some(0x90)), Ok(Status::Inherited(0x90)));
    assert_eq!(Status::resolve(0x3C, Some(0xE2)), Ok(Status::Inherited(0xE2)));
    assert_eq!(
        Status::resolve(0x3C, Some(0xFF)),
        Err(ScanErrorKind::UnknownEventCategory(0x3C))
    );
    assert_eq!(
        Status::resolve(0x3C, None),
        Err(ScanErrorKind::UnknownEventCategory(0x3C))
    );
    assert_eq!(Status::resolve(0x91, Some(0x90)), Ok(Status::Explicit(0x91)));
}
