use midichip::prelude::*;
use pretty_assertions::assert_eq;

fn track(data: &[u8]) -> Vec<u8> {
    let mut bytes = b"MTrk".to_vec();
    bytes.extend((data.len() as u32 + 4).to_be_bytes());
    bytes.extend(data);
    bytes.extend([0x00, 0xFF, 0x2F, 0x00]);
    bytes
}

/// A conductor track, a kick track and a snare track
fn file() -> Vec<Vec<u8>> {
    vec![
        track(&[
            0x00, 0xFF, 0x03, 0x05, b'T', b'e', b'm', b'p', b'o', //
            0x00, 0xFF, 0x51, 0x03, 0x07, 0xA1, 0x20, // 120 BPM
            0x00, 0xFF, 0x58, 0x04, 0x04, 0x02, 0x18, 0x08,
        ]),
        track(&[
            0x00, 0xFF, 0x03, 0x04, b'K', b'i', b'c', b'k', //
            0x00, 0xFF, 0x51, 0x03, 0x06, 0x1A, 0x80, // 150 BPM
            0x00, 0x99, 36, 100, //
            0x83, 0x60, 36, 90,
        ]),
        track(&[
            0x00, 0xFF, 0x03, 0x05, b'S', b'n', b'a', b'r', b'e', //
            0x83, 0x60, 0x99, 38, 110, //
            0x00, 0x90, 60, 100, // melody, not imported
        ]),
    ]
}

fn import(tracks: &[Vec<u8>]) -> ImportContext {
    let mut import = ImportContext::new(ScanConfig::new().with_import_channel(Channel::Ten));
    for bytes in tracks {
        import.import_track(&TrackBuffer::new(&bytes[..]).unwrap());
    }
    import
}

#[test]
fn tracks_accumulate() {
    let import = import(&file());

    assert_eq!(
        import.chips(),
        &[
            Chip::new(0, 36, 100),
            Chip::new(480, 36, 90),
            Chip::new(480, 38, 110),
        ]
    );
    assert_eq!(import.note_counts().count(36), 2);
    assert_eq!(import.note_counts().count(38), 1);
    assert_eq!(import.note_counts().count(60), 0);
    assert_eq!(import.note_counts().total(), 3);

    let names: Vec<_> = import.tracks().iter().map(TrackReport::name).collect();
    assert_eq!(names, vec!["Tempo", "Kick", "Snare"]);
    let counts: Vec<_> = import.tracks().iter().map(TrackReport::chip_count).collect();
    assert_eq!(counts, vec![0, 2, 1]);
    assert!(
        import
            .tracks()
            .iter()
            .all(|t| t.stop_reason() == StopReason::EndOfTrack && t.error().is_none())
    );
}

#[test]
fn last_tempo_merged_wins() {
    let tracks = file();
    assert_eq!(import(&tracks).bpm(), 150.0);

    let reversed: Vec<_> = tracks.iter().rev().cloned().collect();
    assert_eq!(import(&reversed).bpm(), 120.0);
    assert_eq!(
        import(&reversed).time_signature().map(|s| *s.as_bytes()),
        Some([0x04, 0x02, 0x18, 0x08])
    );
}

#[test]
fn default_bpm_without_tempo_events() {
    let snare = &file()[2];
    let mut import = ImportContext::new(ScanConfig::new()).with_default_bpm(133.0);
    import.import_track(&TrackBuffer::new(&snare[..]).unwrap());
    assert_eq!(import.bpm(), 133.0);
    assert_eq!(import.time_signature(), None);

    assert_eq!(ImportContext::new(ScanConfig::new()).bpm(), ImportContext::DEFAULT_BPM);
}

#[test]
fn parallel_scans_merge_in_order() {
    let tracks = file();
    let config = ScanConfig::new().with_import_channel(Channel::Ten);
    let buffers: Vec<_> = tracks
        .iter()
        .map(|bytes| TrackBuffer::new(&bytes[..]).unwrap())
        .collect();

    let scans: Vec<TrackScan> = std::thread::scope(|s| {
        let handles: Vec<_> = buffers
            .iter()
            .map(|buffer| s.spawn(move || TrackScanner::new(buffer, &config).scan()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut parallel = ImportContext::new(config);
    for scan in scans {
        parallel.merge(scan);
    }
    let sequential = import(&tracks);

    assert_eq!(parallel.chips(), sequential.chips());
    assert_eq!(parallel.note_counts(), sequential.note_counts());
    assert_eq!(parallel.bpm(), sequential.bpm());
    assert_eq!(parallel.tracks(), sequential.tracks());
}

#[test]
fn failed_tracks_still_contribute() {
    let mut import = ImportContext::new(ScanConfig::new().with_import_channel(Channel::Ten));
    let broken = {
        let data = [0x00, 0x99, 36, 100, 0x00, 0xFF, 0x7F, 0x01, 0x00];
        let mut bytes = b"MTrk".to_vec();
        bytes.extend((data.len() as u32).to_be_bytes());
        bytes.extend(data);
        bytes
    };
    let report = import.import_track(&TrackBuffer::new(&broken[..]).unwrap());
    assert_eq!(report.index(), 0);
    assert_eq!(report.stop_reason(), StopReason::Error);
    assert_eq!(
        report.error().map(|e| *e.kind()),
        Some(ScanErrorKind::UnknownMetaSubtype(0x7F))
    );
    assert_eq!(import.chips(), &[Chip::new(0, 36, 100)]);

    let taken = import.take_chips();
    assert_eq!(taken.len(), 1);
    assert!(import.chips().is_empty());
    assert_eq!(import.note_counts().count(36), 1);
}
