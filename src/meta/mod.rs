#![doc = r#"
Meta events (`FF`) and the values a chart import takes from them

# Layout

A meta event is `FF <sub-type> <length> <payload>`. The importer only
acts on four sub-types:

| Sub-type | Meaning | Kept as |
|---|---|---|
| `03` | sequence / track name | decoded text |
| `2F` | end of track | stops the scan |
| `51` | tempo | [`Tempo`] |
| `58` | time signature | [`TimeSignature`] (raw bytes) |

The remaining known sub-types are decoded only far enough to step over
them. Their lengths are fixed:

| Sub-type | Event length |
|---|---|
| `01`-`07` | `3 + length` |
| `20`, `21` | 4 |
| `2F` | 0 |
| `51` | 6 |
| `54` | 8 |
| `58` | 7 |
| `59` | 5 |
"#]

mod smpte_offset;
pub use smpte_offset::*;

mod tempo;
pub use tempo::*;

mod time_signature;
pub use time_signature::*;

use crate::reader::{ByteSource, MAX_DELTA_TIME_BYTES, ScanResult, read_varlen};
use num_enum::TryFromPrimitive;

/// The meta event sub-types the interpreter recognizes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MetaType {
    /// `FF 01`
    Text = 0x01,
    /// `FF 02`
    Copyright = 0x02,
    /// `FF 03`
    TrackName = 0x03,
    /// `FF 04`
    InstrumentName = 0x04,
    /// `FF 05`
    Lyric = 0x05,
    /// `FF 06`
    Marker = 0x06,
    /// `FF 07`
    CuePoint = 0x07,
    /// `FF 20`
    ChannelPrefix = 0x20,
    /// `FF 21`
    Port = 0x21,
    /// `FF 2F`
    EndOfTrack = 0x2F,
    /// `FF 51`
    Tempo = 0x51,
    /// `FF 54`
    SmpteOffset = 0x54,
    /// `FF 58`
    TimeSignature = 0x58,
    /// `FF 59`
    KeySignature = 0x59,
}

impl MetaType {
    /// The whole event length for sub-types with a fixed layout
    pub const fn fixed_len(&self) -> Option<usize> {
        match self {
            Self::ChannelPrefix | Self::Port => Some(4),
            Self::EndOfTrack => Some(0),
            Self::Tempo => Some(6),
            Self::SmpteOffset => Some(8),
            Self::TimeSignature => Some(7),
            Self::KeySignature => Some(5),
            _ => None,
        }
    }
}

#[doc = r#"
A decoded meta event
"#]
#[derive(Clone, Debug, PartialEq)]
pub enum MetaEvent<'a> {
    /// `01`-`07`; the payload is left undecoded
    Text {
        /// Which text event
        kind: MetaType,
        /// Raw text bytes
        bytes: &'a [u8],
    },
    /// `20` channel prefix or `21` port
    Prefix {
        /// Which prefix
        kind: MetaType,
        /// The channel or port
        value: u8,
    },
    /// `51`
    Tempo(Tempo),
    /// `54`, the five raw payload bytes
    SmpteOffset(&'a [u8]),
    /// `58`
    TimeSignature(TimeSignature),
    /// `59`
    KeySignature {
        /// Negative for flats, positive for sharps
        sharps_flats: i8,
        /// Minor key
        minor: bool,
    },
    /// `2F`
    EndOfTrack,
    /// A sub-type the interpreter does not know, stepped over by its length
    Unknown {
        /// The sub-type byte
        subtype: u8,
        /// The payload
        payload: &'a [u8],
    },
}

impl MetaEvent<'_> {
    /// The sub-type byte of the event
    pub const fn subtype(&self) -> u8 {
        match self {
            Self::Text { kind, .. } | Self::Prefix { kind, .. } => *kind as u8,
            Self::Tempo(_) => MetaType::Tempo as u8,
            Self::SmpteOffset(_) => MetaType::SmpteOffset as u8,
            Self::TimeSignature(_) => MetaType::TimeSignature as u8,
            Self::KeySignature { .. } => MetaType::KeySignature as u8,
            Self::EndOfTrack => MetaType::EndOfTrack as u8,
            Self::Unknown { subtype, .. } => *subtype,
        }
    }

    /// The track name payload, if this is `FF 03`
    pub fn track_name(&self) -> Option<&[u8]> {
        match self {
            Self::Text {
                kind: MetaType::TrackName,
                bytes,
            } => Some(*bytes),
            _ => None,
        }
    }
}

/// Decode the meta event whose `FF` is at `start`.
///
/// Returns the event and the length it occupies, `FF` included. End of track
/// reports a length of zero.
pub(crate) fn read_meta<'a>(
    source: ByteSource<'a>,
    start: usize,
) -> ScanResult<(MetaEvent<'a>, usize)> {
    let subtype = source.byte_at(start + 1)?;
    let Ok(kind) = MetaType::try_from(subtype) else {
        let (payload, len) = read_prefixed(source, start)?;
        return Ok((MetaEvent::Unknown { subtype, payload }, len));
    };

    let payload_at = start + 3;
    let event = match kind {
        MetaType::ChannelPrefix | MetaType::Port => MetaEvent::Prefix {
            kind,
            value: source.byte_at(payload_at)?,
        },
        MetaType::EndOfTrack => MetaEvent::EndOfTrack,
        MetaType::Tempo => MetaEvent::Tempo(Tempo::from_be_bytes(source.array(payload_at)?)),
        MetaType::SmpteOffset => MetaEvent::SmpteOffset(source.span(payload_at, 5)?),
        MetaType::TimeSignature => {
            MetaEvent::TimeSignature(TimeSignature::from_bytes(source.array(payload_at)?))
        }
        MetaType::KeySignature => {
            let [sf, mi] = source.array::<2>(payload_at)?;
            MetaEvent::KeySignature {
                sharps_flats: sf as i8,
                minor: mi != 0,
            }
        }
        _ => {
            let (bytes, len) = read_prefixed(source, start)?;
            return Ok((MetaEvent::Text { kind, bytes }, len));
        }
    };
    let len = kind.fixed_len().unwrap_or_default();
    Ok((event, len))
}

/// Read a length-prefixed payload. A single length byte gives `3 + length`.
fn read_prefixed<'a>(source: ByteSource<'a>, start: usize) -> ScanResult<(&'a [u8], usize)> {
    let length = read_varlen(source, start + 2, MAX_DELTA_TIME_BYTES)?;
    let payload_at = start + 2 + length.len;
    let payload = source.payload(start, payload_at, length.value as usize)?;
    Ok((payload, 2 + length.len + payload.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ScanErrorKind;
    use pretty_assertions::assert_eq;

    fn read(bytes: &[u8]) -> ScanResult<(MetaEvent<'_>, usize)> {
        read_meta(ByteSource::from_slice(bytes), 0)
    }

    #[test]
    fn track_name() {
        let (event, len) = read(&[0xFF, 0x03, 0x04, b'D', b'r', b'u', b'm']).unwrap();
        assert_eq!(len, 7);
        assert_eq!(event.track_name(), Some(&b"Drum"[..]));
    }

    #[test]
    fn other_text_is_not_a_name() {
        let (event, len) = read(&[0xFF, 0x01, 0x02, b'h', b'i']).unwrap();
        assert_eq!(len, 5);
        assert_eq!(event.track_name(), None);
        assert_eq!(event.subtype(), 0x01);
    }

    #[test]
    fn fixed_lengths() {
        let cases: [(&[u8], usize); 6] = [
            (&[0xFF, 0x20, 0x01, 0x09], 4),
            (&[0xFF, 0x21, 0x01, 0x00], 4),
            (&[0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20], 6),
            (&[0xFF, 0x54, 0x05, 0x41, 0x17, 0x2D, 0x0C, 0x22], 8),
            (&[0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08], 7),
            (&[0xFF, 0x59, 0x02, 0xFD, 0x01], 5),
        ];
        for (bytes, expected) in cases {
            let (_, len) = read(bytes).unwrap();
            assert_eq!(len, expected);
        }
    }

    #[test]
    fn end_of_track_has_no_length() {
        let (event, len) = read(&[0xFF, 0x2F, 0x00]).unwrap();
        assert_eq!(event, MetaEvent::EndOfTrack);
        assert_eq!(len, 0);
    }

    #[test]
    fn key_signature() {
        let (event, _) = read(&[0xFF, 0x59, 0x02, 0xFD, 0x01]).unwrap();
        assert_eq!(
            event,
            MetaEvent::KeySignature {
                sharps_flats: -3,
                minor: true
            }
        );
    }

    #[test]
    fn unknown_subtype_keeps_its_payload() {
        let (event, len) = read(&[0xFF, 0x7F, 0x03, 0x00, 0x00, 0x41, 0x00]).unwrap();
        assert_eq!(len, 6);
        assert_eq!(
            event,
            MetaEvent::Unknown {
                subtype: 0x7F,
                payload: &[0x00, 0x00, 0x41]
            }
        );
    }

    #[test]
    fn long_text_uses_a_multi_byte_length() {
        let mut bytes = vec![0xFF, 0x01, 0x81, 0x00];
        bytes.extend([b'a'; 128]);
        let (event, len) = read(&bytes).unwrap();
        assert_eq!(len, 4 + 128);
        assert!(matches!(event, MetaEvent::Text { bytes, .. } if bytes.len() == 128));
    }

    #[test]
    fn text_longer_than_the_chunk() {
        let err = read(&[0xFF, 0x03, 0x10, b'a']).unwrap_err();
        assert_eq!(
            err.kind(),
            &ScanErrorKind::TruncatedPayload {
                needed: 16,
                available: 1
            }
        );
    }

    #[test]
    fn short_tempo_exhausts_the_buffer() {
        let err = read(&[0xFF, 0x51, 0x03, 0x07]).unwrap_err();
        assert!(err.is_buffer_exhausted());
    }
}
