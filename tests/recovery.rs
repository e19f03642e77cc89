use midichip::prelude::*;
use pretty_assertions::assert_eq;

fn track(data: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend((data.len() as u32).to_be_bytes());
    bytes.extend(data);
    bytes
}

fn scan(data: &[u8], config: ScanConfig) -> TrackScan {
    let bytes = track(data);
    let buffer = TrackBuffer::new(&bytes[..]).unwrap();
    TrackScanner::new(&buffer, &config).scan()
}

fn drums() -> ScanConfig {
    ScanConfig::new().with_import_channel(Channel::Ten)
}

fn skipping() -> ScanConfig {
    drums().with_recovery(RecoveryPolicy::Skip)
}

#[test]
fn unknown_meta_subtype() {
    let data = [
        0x00, 0xFF, 0x7F, 0x02, 0xAA, 0xBB, // sequencer specific
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];

    let aborted = scan(&data, drums());
    assert_eq!(aborted.stop_reason(), StopReason::Error);
    let error = aborted.error().unwrap();
    assert_eq!(error.position(), 9);
    assert_eq!(error.kind(), &ScanErrorKind::UnknownMetaSubtype(0x7F));
    assert!(aborted.chips().is_empty());

    let skipped = scan(&data, skipping());
    assert_eq!(skipped.stop_reason(), StopReason::EndOfTrack);
    assert_eq!(skipped.error(), None);
    assert_eq!(skipped.warnings().len(), 1);
    assert_eq!(skipped.chips(), &[Chip::new(0, 36, 100)]);
}

#[test]
fn data_byte_without_running_status() {
    let data = [
        0x00, 0x3C, // no status to inherit
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];

    let aborted = scan(&data, drums());
    assert_eq!(aborted.stop_reason(), StopReason::Error);
    assert_eq!(
        aborted.error().map(|e| (e.position(), *e.kind())),
        Some((9, ScanErrorKind::UnknownEventCategory(0x3C)))
    );

    let skipped = scan(&data, skipping());
    assert_eq!(skipped.stop_reason(), StopReason::EndOfTrack);
    assert_eq!(skipped.chips(), &[Chip::new(0, 36, 100)]);
}

#[test]
fn system_common_status() {
    let data = [
        0x00, 0xF1, // MIDI time code quarter frame
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    assert_eq!(
        scan(&data, drums()).error().map(|e| *e.kind()),
        Some(ScanErrorKind::UnknownEventCategory(0xF1))
    );
    let skipped = scan(&data, skipping());
    assert_eq!(skipped.chips().len(), 1);
    assert_eq!(skipped.warnings().len(), 1);
}

#[test]
fn meta_clears_running_status() {
    let data = [
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x01, 0x00, // empty text
        0x00, 38, 100,
    ];
    let scan = scan(&data, drums());
    assert_eq!(scan.chips(), &[Chip::new(0, 36, 100)]);
    assert_eq!(scan.stop_reason(), StopReason::Error);
    assert_eq!(
        scan.error().map(|e| *e.kind()),
        Some(ScanErrorKind::UnknownEventCategory(38))
    );
}

#[test]
fn sysex_within_the_window() {
    let data = [
        0x00, 0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0xF7, //
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let scan = scan(&data, drums());
    assert!(scan.is_complete());
    assert_eq!(scan.chips(), &[Chip::new(0, 36, 100)]);
}

#[test]
fn sysex_beyond_the_window() {
    let data = [
        0x00, 0xF0, 0x01, 0x02, 0x03, 0x04, 0x05, 0xF7, //
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];

    let aborted = scan(&data, drums().with_sysex_search_window(4));
    assert_eq!(aborted.stop_reason(), StopReason::Error);
    assert_eq!(
        aborted.error().map(|e| (e.position(), *e.kind())),
        Some((9, ScanErrorKind::UnterminatedSysex { window: 4 }))
    );

    // Only the F0 is stepped over, so the message body is read as
    // delta-times and stray data bytes until the scan finds its feet.
    let skipped = scan(&data, skipping().with_sysex_search_window(4));
    assert_eq!(skipped.stop_reason(), StopReason::EndOfTrack);
    assert_eq!(skipped.warnings().len(), 4);
    assert_eq!(skipped.chips(), &[Chip::new(1 + 3 + 5, 36, 100)]);
}

#[test]
fn sysex_cut_by_the_chunk_end() {
    let data = [
        0x00, 0x99, 36, 100, //
        0x00, 0xF0, 0x43, 0x10, 0xF7, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    // The declared length ends the chunk right after the 0x43.
    let mut bytes = b"MTrk".to_vec();
    bytes.extend(7u32.to_be_bytes());
    bytes.extend(data);
    let buffer = TrackBuffer::new(&bytes[..]).unwrap();

    for config in [drums(), skipping()] {
        let scan = TrackScanner::new(&buffer, &config).scan();
        assert_eq!(scan.stop_reason(), StopReason::BufferExhausted);
        assert_eq!(scan.error(), None);
        assert_eq!(scan.chips(), &[Chip::new(0, 36, 100)]);
    }
}

#[test]
fn unknown_status_clears_running_status() {
    let data = [
        0x00, 0x99, 36, 100, //
        0x00, 0xF1, // stepped over
        0x00, 38, 100, // nothing left to inherit
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let scan = scan(&data, skipping());
    assert_eq!(scan.chips(), &[Chip::new(0, 36, 100)]);
    assert_eq!(scan.note_counts().count(38), 0);
    assert_eq!(
        scan.warnings()[..2]
            .iter()
            .map(|w| (w.position(), *w.kind()))
            .collect::<Vec<_>>(),
        vec![
            (13, ScanErrorKind::UnknownEventCategory(0xF1)),
            (15, ScanErrorKind::UnknownEventCategory(38)),
        ]
    );
    // The stray velocity is then read as a delta-time, so the scan never
    // reaches end of track.
    assert_eq!(scan.stop_reason(), StopReason::BufferExhausted);
    assert_eq!(scan.error(), None);
}

#[test]
fn truncated_text_aborts_under_any_policy() {
    let data = [0x00, 0xFF, 0x03, 0x10, b'a'];
    for config in [drums(), skipping()] {
        let scan = scan(&data, config);
        assert_eq!(scan.stop_reason(), StopReason::Error);
        assert_eq!(
            scan.error().map(|e| (e.position(), *e.kind())),
            Some((
                9,
                ScanErrorKind::TruncatedPayload {
                    needed: 16,
                    available: 1
                }
            ))
        );
        assert_eq!(scan.track_name(), "");
    }
}

#[test]
fn zero_tempo_is_a_warning() {
    let data = [
        0x00, 0xFF, 0x51, 0x03, 0x00, 0x00, 0x00, //
        0x00, 0x99, 36, 100, //
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let scan = scan(&data, drums());
    assert!(scan.is_complete());
    assert_eq!(scan.tempo(), None);
    assert_eq!(scan.bpm(), None);
    assert_eq!(
        scan.warnings().iter().map(|w| *w.kind()).collect::<Vec<_>>(),
        vec![ScanErrorKind::InvalidTempo]
    );
    assert_eq!(scan.chips().len(), 1);
}

#[test]
fn bad_smpte_offset_is_a_warning() {
    let data = [
        0x00, 0xFF, 0x54, 0x05, 0x18, 0x00, 0x00, 0x00, 0x00, // hour 24
        0x00, 0xFF, 0x2F, 0x00,
    ];
    let scan = scan(&data, drums());
    assert!(scan.is_complete());
    assert_eq!(scan.smpte_offset(), None);
    assert_eq!(
        scan.warnings().iter().map(|w| *w.kind()).collect::<Vec<_>>(),
        vec![ScanErrorKind::InvalidSmpteOffset(SmpteError::HourOffset(24))]
    );
}
