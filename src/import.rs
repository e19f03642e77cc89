#![doc = r#"
The shared state of importing one MIDI file into a chart

A file has several track chunks. Each is scanned on its own, and the results
land in one [`ImportContext`]:

- chips are appended, track after track
- note counts add up
- tempo and time signature are overwritten by every track that has them, so
  the last one merged wins; without any tempo event the caller's default stays

Tracks may be scanned on other threads with [`TrackScanner`] and merged
afterwards with [`ImportContext::merge`]; the merge order decides which
tempo wins.
"#]

use crate::{
    chip::{Chip, NoteTally},
    event::Channel,
    meta::TimeSignature,
    reader::{ScanError, TrackBuffer},
    scan::{ScanConfig, StopReason, TrackScan, TrackScanner},
};

/// What became of one merged track
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackReport {
    index: usize,
    name: String,
    chip_count: usize,
    stop_reason: StopReason,
    error: Option<ScanError>,
    warning_count: usize,
}

impl TrackReport {
    /// Position of the track in merge order
    pub fn index(&self) -> usize {
        self.index
    }
    /// The track name, empty if none
    pub fn name(&self) -> &str {
        &self.name
    }
    /// Chips the track contributed
    pub fn chip_count(&self) -> usize {
        self.chip_count
    }
    /// Why the track's scan stopped
    pub fn stop_reason(&self) -> StopReason {
        self.stop_reason
    }
    /// The error that stopped the scan, if any
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }
    /// Anomalies stepped over
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }
}

#[doc = r#"
Chart import state for one MIDI file.

```rust
# use midichip::prelude::*;
let mut import = ImportContext::new(ScanConfig::new().with_import_channel(Channel::Ten));
let bytes = [
    b'M', b'T', b'r', b'k', 0, 0, 0, 11,
    0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 BPM
    0x00, 0xFF, 0x2F, 0x00,
];
let report = import.import_track(&TrackBuffer::new(&bytes[..]).unwrap());
assert_eq!(report.stop_reason(), StopReason::EndOfTrack);
assert_eq!(import.bpm(), 120.0);
```
"#]
#[derive(Clone, Debug)]
pub struct ImportContext {
    config: ScanConfig,
    bpm: f64,
    time_signature: Option<TimeSignature>,
    chips: Vec<Chip>,
    note_counts: NoteTally,
    tracks: Vec<TrackReport>,
}

impl ImportContext {
    /// The BPM assumed until a tempo event says otherwise
    pub const DEFAULT_BPM: f64 = 120.;

    /// Start an import
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            bpm: Self::DEFAULT_BPM,
            time_signature: None,
            chips: Vec::new(),
            note_counts: NoteTally::default(),
            tracks: Vec::new(),
        }
    }

    /// Replace the BPM kept when no track has a tempo event
    pub fn with_default_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// The scan configuration used by [`ImportContext::import_track`]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// The channel chips are taken from
    pub fn import_channel(&self) -> Option<Channel> {
        self.config.import_channel()
    }

    /// Scan a track chunk and merge the result
    pub fn import_track(&mut self, buffer: &TrackBuffer<'_>) -> &TrackReport {
        let scan = TrackScanner::new(buffer, &self.config).scan();
        self.merge(scan)
    }

    /// Merge a track scanned elsewhere
    pub fn merge(&mut self, scan: TrackScan) -> &TrackReport {
        if let Some(bpm) = scan.bpm() {
            self.bpm = bpm;
        }
        if let Some(signature) = scan.time_signature() {
            self.time_signature = Some(signature);
        }
        self.note_counts.absorb(scan.note_counts());
        self.chips.extend_from_slice(scan.chips());

        let report = TrackReport {
            index: self.tracks.len(),
            name: scan.track_name().to_owned(),
            chip_count: scan.chips().len(),
            stop_reason: scan.stop_reason(),
            error: scan.error().copied(),
            warning_count: scan.warnings().len(),
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(
            index = report.index,
            name = %report.name,
            chips = report.chip_count,
            stop = ?report.stop_reason,
            "merged track"
        );
        self.tracks.push(report);
        &self.tracks[self.tracks.len() - 1]
    }

    /// Current BPM: the last tempo merged, or the default
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// The last time signature merged
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.time_signature
    }

    /// All chips, track by track in merge order
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Per-note counts over all tracks
    pub fn note_counts(&self) -> &NoteTally {
        &self.note_counts
    }

    /// One report per merged track
    pub fn tracks(&self) -> &[TrackReport] {
        &self.tracks
    }

    /// Give up the chips, leaving the context empty of them
    pub fn take_chips(&mut self) -> Vec<Chip> {
        core::mem::take(&mut self.chips)
    }
}
