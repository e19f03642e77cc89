#![doc = r#"
The track scan loop

# Overview

A scan walks a track chunk once, front to back:

```text
          ┌──────────────────────────────────────────┐
          ▼                                          │
  [ delta-time ] → [ status / running status ] → [ payload ] → dispatch
                                                     │
                      end of track / chunk bound / error → Stopped
```

[`TrackEvents`] is the raw step iterator. [`TrackScanner`] drives it, hands
note-ons to a [`ChipCollector`] and keeps the meta values a chart import
cares about, producing a [`TrackScan`].
"#]

mod config;
pub use config::*;

use crate::{
    chip::{Chip, ChipCollector, NoteTally},
    event::{
        Channel, EventCategory, STATUS_BIT, Status, Ticked, TrackEvent, read_channel_voice,
        read_sysex,
    },
    meta::{MetaEvent, MetaType, SmpteOffset, Tempo, TimeSignature, read_meta},
    reader::{
        ByteSource, CHUNK_HEADER_LEN, ScanError, ScanErrorKind, ScanResult, TrackBuffer,
        read_varlen,
    },
};
use core::iter::FusedIterator;

/// Why a scan stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// An `FF 2F` end of track event
    EndOfTrack,
    /// The cursor reached the end of the chunk
    BufferExhausted,
    /// An error the recovery policy does not step over
    Error,
}

/// Where a scan stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanState {
    /// More events may follow
    Scanning,
    /// Terminal
    Stopped(StopReason),
}

/// Read position, tick clock and running status of a scan
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanCursor {
    offset: usize,
    ticks: u32,
    running_status: Option<u8>,
}

impl Default for ScanCursor {
    fn default() -> Self {
        Self::start()
    }
}

impl ScanCursor {
    /// Right after the chunk header, at tick zero
    pub const fn start() -> Self {
        Self {
            offset: CHUNK_HEADER_LEN,
            ticks: 0,
            running_status: None,
        }
    }
    /// Byte offset of the next delta-time
    pub const fn offset(&self) -> usize {
        self.offset
    }
    /// Ticks accumulated so far
    pub const fn ticks(&self) -> u32 {
        self.ticks
    }
    /// The channel-voice status a data byte would inherit
    pub const fn running_status(&self) -> Option<u8> {
        self.running_status
    }
}

#[doc = r#"
Iterator over the events of a track chunk.

Yields `Ok` for every decoded event, up to and including end of track.
Reaching the chunk bound simply ends the iteration. Errors are yielded as
`Err`; after an error the iteration ends unless the configured
[`RecoveryPolicy`] steps over it.
"#]
#[derive(Clone, Debug)]
pub struct TrackEvents<'a> {
    source: ByteSource<'a>,
    config: ScanConfig,
    cursor: ScanCursor,
    state: ScanState,
}

impl<'a> TrackEvents<'a> {
    /// Iterate the events of `buffer`
    pub fn new(buffer: &'a TrackBuffer<'_>, config: &ScanConfig) -> Self {
        Self {
            source: buffer.source(),
            config: *config,
            cursor: ScanCursor::start(),
            state: ScanState::Scanning,
        }
    }

    /// The current cursor
    pub const fn cursor(&self) -> ScanCursor {
        self.cursor
    }

    /// The current state
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Why the iteration stopped, once it has
    pub const fn stop_reason(&self) -> Option<StopReason> {
        match self.state {
            ScanState::Scanning => None,
            ScanState::Stopped(reason) => Some(reason),
        }
    }

    fn stop(&mut self, reason: StopReason) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            ?reason,
            offset = self.cursor.offset,
            ticks = self.cursor.ticks,
            "track scan stopped"
        );
        self.state = ScanState::Stopped(reason);
    }

    /// Step over an undecodable status byte
    fn reject_status(&mut self, at: usize, byte: u8, kind: ScanErrorKind) -> ScanError {
        self.cursor.offset = at + 1;
        if byte >= STATUS_BIT {
            self.cursor.running_status = None;
        }
        ScanError::new(at, kind)
    }

    fn step(&mut self) -> ScanResult<Ticked<TrackEvent<'a>>> {
        let start = self.cursor.offset;
        let delta = read_varlen(self.source, start, self.config.max_delta_time_bytes())?;
        let status_at = start + delta.len;
        let byte = self.source.byte_at(status_at)?;
        self.cursor.ticks = self.cursor.ticks.saturating_add(delta.value);

        let status = match Status::resolve(byte, self.cursor.running_status) {
            Ok(status) => status,
            Err(kind) => return Err(self.reject_status(status_at, byte, kind)),
        };
        let category = match EventCategory::classify(status.byte()) {
            Ok(category) => category,
            Err(kind) => return Err(self.reject_status(status_at, byte, kind)),
        };

        let (event, len) = match category {
            EventCategory::SysEx => {
                self.cursor.running_status = None;
                match read_sysex(self.source, status_at, self.config.sysex_search_window()) {
                    Ok(bytes) => (TrackEvent::SysEx(bytes), bytes.len()),
                    Err(e) => {
                        if matches!(e.kind(), ScanErrorKind::UnterminatedSysex { .. }) {
                            self.cursor.offset = status_at + 1;
                        }
                        return Err(e);
                    }
                }
            }
            EventCategory::Meta => {
                self.cursor.running_status = None;
                match read_meta(self.source, status_at)? {
                    (MetaEvent::Unknown { subtype, .. }, len) => {
                        self.cursor.offset = status_at + len;
                        return Err(ScanError::new(
                            status_at,
                            ScanErrorKind::UnknownMetaSubtype(subtype),
                        ));
                    }
                    (MetaEvent::EndOfTrack, len) => (TrackEvent::EndOfTrack, len),
                    (meta, len) => (TrackEvent::Meta(meta), len),
                }
            }
            _ => {
                let first_data = status_at + status.encoded_len();
                let (event, data_len) = read_channel_voice(
                    self.source,
                    first_data,
                    status.byte(),
                    category,
                    self.config.velocity_zero_is_note_off(),
                )?;
                self.cursor.running_status = Some(status.byte());
                (event, status.encoded_len() + data_len)
            }
        };

        self.cursor.offset = status_at + len;
        Ok(Ticked::new(self.cursor.ticks, start, event))
    }
}

impl<'a> Iterator for TrackEvents<'a> {
    type Item = ScanResult<Ticked<TrackEvent<'a>>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != ScanState::Scanning {
            return None;
        }
        if self.cursor.offset >= self.source.len() {
            self.stop(StopReason::BufferExhausted);
            return None;
        }
        match self.step() {
            Ok(ticked) => {
                #[cfg(feature = "tracing")]
                tracing::trace!(
                    tick = ticked.accumulated_ticks(),
                    offset = ticked.offset(),
                    event = %ticked.event(),
                    "track event"
                );
                if ticked.event().is_end_of_track() {
                    self.stop(StopReason::EndOfTrack);
                }
                Some(Ok(ticked))
            }
            Err(e) if e.is_buffer_exhausted() => {
                self.stop(StopReason::BufferExhausted);
                None
            }
            Err(e) => {
                if !self.config.skips(&e) && !e.kind().is_advisory() {
                    self.stop(StopReason::Error);
                }
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for TrackEvents<'_> {}

#[doc = r#"
Scans one track chunk into a [`TrackScan`].

Scanning is pure: the same buffer and configuration always give the same
result, and the buffer is never modified.
"#]
#[derive(Clone, Debug)]
pub struct TrackScanner<'a> {
    buffer: &'a TrackBuffer<'a>,
    config: ScanConfig,
}

impl<'a> TrackScanner<'a> {
    /// Prepare a scan of `buffer`
    pub fn new(buffer: &'a TrackBuffer<'a>, config: &ScanConfig) -> Self {
        Self {
            buffer,
            config: *config,
        }
    }

    /// The raw event stream
    pub fn events(&self) -> TrackEvents<'a> {
        TrackEvents::new(self.buffer, &self.config)
    }

    /// Run the scan to its end
    pub fn scan(&self) -> TrackScan {
        let mut events = self.events();
        let mut collector = ChipCollector::new(self.config.import_channel());
        let mut scan = TrackScan::default();

        for item in events.by_ref() {
            match item {
                Ok(ticked) => {
                    scan.event_count += 1;
                    scan.end_tick = ticked.accumulated_ticks();
                    self.dispatch(&ticked, &mut collector, &mut scan);
                }
                Err(e) if self.skips(&e) || e.kind().is_advisory() => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(error = %e, "skipped undecodable event");
                    scan.warnings.push(e);
                }
                Err(e) => scan.error = Some(e),
            }
        }

        scan.end_tick = scan.end_tick.max(events.cursor().ticks());
        scan.stop_reason = events.stop_reason().unwrap_or(StopReason::BufferExhausted);
        (scan.chips, scan.note_counts) = collector.into_parts();
        scan
    }

    fn skips(&self, error: &ScanError) -> bool {
        self.config.skips(error)
    }

    fn dispatch(
        &self,
        ticked: &Ticked<TrackEvent<'_>>,
        chips: &mut ChipCollector,
        scan: &mut TrackScan,
    ) {
        match ticked.event() {
            TrackEvent::Note(note) => {
                if note.is_on() {
                    scan.last_channel = Some(note.channel);
                }
                chips.offer(ticked.accumulated_ticks(), note);
            }
            TrackEvent::Meta(meta) => self.interpret(ticked.offset(), meta, scan),
            TrackEvent::Control(_) | TrackEvent::SysEx(_) | TrackEvent::EndOfTrack => {}
        }
    }

    fn interpret(&self, offset: usize, meta: &MetaEvent<'_>, scan: &mut TrackScan) {
        let advisory = match meta {
            MetaEvent::Text {
                kind: MetaType::TrackName,
                bytes,
            } => {
                scan.track_name = self.config.text_encoding().decode(bytes);
                None
            }
            MetaEvent::Tempo(tempo) if tempo.is_valid() => {
                scan.tempo = Some(*tempo);
                None
            }
            MetaEvent::Tempo(_) => Some(ScanErrorKind::InvalidTempo),
            MetaEvent::TimeSignature(signature) => {
                scan.time_signature = Some(*signature);
                None
            }
            MetaEvent::SmpteOffset(payload) => match SmpteOffset::parse(payload) {
                Ok(smpte) => {
                    scan.smpte_offset = Some(smpte);
                    None
                }
                Err(e) => Some(ScanErrorKind::from(e)),
            },
            _ => None,
        };
        if let Some(kind) = advisory {
            let error = ScanError::new(offset, kind);
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %error, "ignored meta event value");
            scan.warnings.push(error);
        }
    }
}

#[doc = r#"
Everything one scan of a track chunk produced
"#]
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackScan {
    track_name: String,
    tempo: Option<Tempo>,
    time_signature: Option<TimeSignature>,
    smpte_offset: Option<SmpteOffset>,
    chips: Vec<Chip>,
    note_counts: NoteTally,
    last_channel: Option<Channel>,
    end_tick: u32,
    event_count: usize,
    stop_reason: StopReason,
    error: Option<ScanError>,
    warnings: Vec<ScanError>,
}

impl Default for TrackScan {
    fn default() -> Self {
        Self {
            track_name: String::new(),
            tempo: None,
            time_signature: None,
            smpte_offset: None,
            chips: Vec::new(),
            note_counts: NoteTally::default(),
            last_channel: None,
            end_tick: 0,
            event_count: 0,
            stop_reason: StopReason::BufferExhausted,
            error: None,
            warnings: Vec::new(),
        }
    }
}

impl TrackScan {
    /// The `FF 03` name, empty if the track has none
    pub fn track_name(&self) -> &str {
        &self.track_name
    }
    /// The last valid tempo event
    pub fn tempo(&self) -> Option<Tempo> {
        self.tempo
    }
    /// The last valid tempo, in BPM rounded to two decimals
    pub fn bpm(&self) -> Option<f64> {
        self.tempo.and_then(|t| t.bpm())
    }
    /// The last time signature event
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.time_signature
    }
    /// The last valid SMPTE offset event
    pub fn smpte_offset(&self) -> Option<SmpteOffset> {
        self.smpte_offset
    }
    /// Chips on the import channel, in encounter order
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }
    /// Per-note counts of the chips
    pub fn note_counts(&self) -> &NoteTally {
        &self.note_counts
    }
    /// Channel of the last note-on, on any channel
    pub fn last_channel(&self) -> Option<Channel> {
        self.last_channel
    }
    /// Cumulative tick where the scan stopped
    pub fn end_tick(&self) -> u32 {
        self.end_tick
    }
    /// Number of events decoded
    pub fn event_count(&self) -> usize {
        self.event_count
    }
    /// Why the scan stopped
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }
    /// The error that stopped the scan
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }
    /// Errors stepped over or values ignored along the way
    pub fn warnings(&self) -> &[ScanError] {
        &self.warnings
    }
    /// True if the track ended with an end of track event
    pub fn is_complete(&self) -> bool {
        self.stop_reason == StopReason::EndOfTrack
    }
}
