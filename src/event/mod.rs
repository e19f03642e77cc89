#![doc = r#"
The events a track chunk decodes into

# Overview

Every step of a scan yields one [`TrackEvent`], wrapped in a [`Ticked`]
that records the cumulative tick it falls on and the byte offset it was
read from.

```text
                    |------------|
                    | TrackEvent |
                    |------------|
        /         /        |         \           \
|------|  |---------|  |-------|  |------|  |------------|
| Note |  | Control |  | SysEx |  | Meta |  | EndOfTrack |
|------|  |---------|  |-------|  |------|  |------------|
```
"#]

mod channel;
pub use channel::*;

mod status;
pub use status::*;

use crate::{
    meta::MetaEvent,
    reader::{ByteSource, ScanError, ScanErrorKind, ScanResult},
};
use core::fmt;

#[doc = r#"
An event positioned on the track's tick clock
"#]
#[derive(Clone, Debug, PartialEq)]
pub struct Ticked<E> {
    accumulated_ticks: u32,
    offset: usize,
    event: E,
}

impl<E> Ticked<E> {
    /// Pair an event with its cumulative tick and chunk offset
    pub const fn new(accumulated_ticks: u32, offset: usize, event: E) -> Self {
        Self {
            accumulated_ticks,
            offset,
            event,
        }
    }
    /// Ticks since the start of the track
    pub const fn accumulated_ticks(&self) -> u32 {
        self.accumulated_ticks
    }
    /// Byte offset of the event's delta-time within the chunk
    pub const fn offset(&self) -> usize {
        self.offset
    }
    /// The event
    pub const fn event(&self) -> &E {
        &self.event
    }
    /// Take the event
    pub fn into_event(self) -> E {
        self.event
    }
}

#[doc = r#"
One decoded event of a track chunk
"#]
#[derive(Clone, Debug, PartialEq)]
pub enum TrackEvent<'a> {
    /// Note on or off
    Note(NoteEvent),
    /// Any other channel-voice message
    Control(ControlEvent),
    /// A system exclusive message, `F0` through `F7` inclusive
    SysEx(&'a [u8]),
    /// A meta event other than end of track
    Meta(MetaEvent<'a>),
    /// `FF 2F`, the last event of a track
    EndOfTrack,
}

impl TrackEvent<'_> {
    /// True for the terminal event
    pub const fn is_end_of_track(&self) -> bool {
        matches!(self, Self::EndOfTrack)
    }
}

/// Whether a [`NoteEvent`] presses or releases
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NoteKind {
    /// `8n`, or `9n` with velocity 0 when configured so
    Off,
    /// `9n`
    On,
}

/// A note on or note off
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoteEvent {
    /// On or off
    pub kind: NoteKind,
    /// Channel the status addressed
    pub channel: Channel,
    /// Note number, 0-127
    pub note: u8,
    /// Velocity, 0-127
    pub velocity: u8,
}

impl NoteEvent {
    /// True for a note on
    pub const fn is_on(&self) -> bool {
        matches!(self.kind, NoteKind::On)
    }
}

/// A channel-voice message that is not a note
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlEvent {
    /// Which message this is
    pub category: EventCategory,
    /// Channel the status addressed
    pub channel: Channel,
    /// First data byte: key, controller, program, pressure or bend LSB
    pub data: u8,
    /// Second data byte, absent for program change and channel pressure
    pub value: Option<u8>,
}

/// Decode the data bytes of a channel-voice event.
///
/// `first_data` is the offset of the first data byte, which for an inherited
/// status is the byte right after the delta-time. Returns the event and the
/// number of data bytes it used.
pub(crate) fn read_channel_voice(
    source: ByteSource<'_>,
    first_data: usize,
    status: u8,
    category: EventCategory,
    velocity_zero_is_note_off: bool,
) -> ScanResult<(TrackEvent<'static>, usize)> {
    let channel = Channel::from_status(status);
    let (data, value, len) = match category.data_len() {
        Some(1) => (source.byte_at(first_data)?, None, 1),
        _ => {
            let [data, value] = source.array::<2>(first_data)?;
            (data, Some(value), 2)
        }
    };
    let data = data & 0x7F;
    let value = value.map(|v| v & 0x7F);

    let event = match (category, value) {
        (EventCategory::NoteOn | EventCategory::NoteOff, Some(velocity)) => {
            let kind = match category {
                EventCategory::NoteOn if velocity == 0 && velocity_zero_is_note_off => {
                    NoteKind::Off
                }
                EventCategory::NoteOn => NoteKind::On,
                _ => NoteKind::Off,
            };
            TrackEvent::Note(NoteEvent {
                kind,
                channel,
                note: data,
                velocity,
            })
        }
        _ => TrackEvent::Control(ControlEvent {
            category,
            channel,
            data,
            value,
        }),
    };
    Ok((event, len))
}

/// Find the `F7` ending a system exclusive message starting at `start`.
///
/// Only `window` bytes after the `F0` are searched. Returns the whole message.
/// Meeting the chunk bound first ends the scan like any other cut event.
pub(crate) fn read_sysex<'a>(
    source: ByteSource<'a>,
    start: usize,
    window: usize,
) -> ScanResult<&'a [u8]> {
    for i in 1..=window {
        if source.byte_at(start + i)? == SYSEX_END {
            return source.span(start, i + 1);
        }
    }
    Err(ScanError::new(
        start,
        ScanErrorKind::UnterminatedSysex { window },
    ))
}

impl fmt::Display for TrackEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Note(n) => {
                let label = if n.is_on() { "N-ON " } else { "N-OFF" };
                write!(f, "{label} {} note {:#04X} vel {}", n.channel, n.note, n.velocity)
            }
            Self::Control(c) => write!(f, "{:?} {} {:#04X}", c.category, c.channel, c.data),
            Self::SysEx(bytes) => write!(f, "SysEx {:02X?}", bytes),
            Self::Meta(m) => write!(f, "Meta {:#04X}", m.subtype()),
            Self::EndOfTrack => f.write_str("End of track"),
        }
    }
}
