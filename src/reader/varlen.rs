use super::{ByteSource, ScanError, ScanErrorKind, ScanResult};

/// The byte cap used unless configured otherwise.
///
/// Four bytes carry 28 bits, the largest delta-time a standard MIDI file allows.
pub const DEFAULT_DELTA_TIME_BYTES: usize = 4;

/// The cap older DTX importers applied, which cannot read deltas of `0x20_0000` or more.
pub const LEGACY_DELTA_TIME_BYTES: usize = 3;

/// The largest cap that still fits a `u32`
pub const MAX_DELTA_TIME_BYTES: usize = 4;

/// A decoded variable-length quantity
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VarLen {
    /// The decoded value
    pub value: u32,
    /// Bytes consumed, at least one
    pub len: usize,
}

/// Decode a variable-length quantity at `position`.
///
/// Seven bits are taken from each byte, most significant group first. The
/// quantity ends on the first byte with its high bit clear. If `max_bytes`
/// bytes all carry the continuation bit the quantity is malformed.
pub fn read_varlen(source: ByteSource<'_>, position: usize, max_bytes: usize) -> ScanResult<VarLen> {
    let max_bytes = max_bytes.clamp(1, MAX_DELTA_TIME_BYTES);
    let mut value: u32 = 0;
    for i in 0..max_bytes {
        let byte = source.byte_at(position + i)?;
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok(VarLen { value, len: i + 1 });
        }
    }
    Err(ScanError::new(
        position,
        ScanErrorKind::MalformedDeltaTime { max_bytes },
    ))
}

#[cfg(test)]
fn encode(mut value: u32) -> Vec<u8> {
    let mut out = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        out.insert(0, (value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
    out
}

#[test]
fn single_byte_values_are_identity() {
    for v in 0..0x80u8 {
        let bytes = [v, 0xFF];
        let read = read_varlen(ByteSource::from_slice(&bytes), 0, DEFAULT_DELTA_TIME_BYTES).unwrap();
        assert_eq!(read, VarLen { value: v as u32, len: 1 });
    }
}

#[test]
fn multi_byte_values() {
    for (value, len) in [
        (0x80, 2),
        (0x2000, 2),
        (0x3FFF, 2),
        (0x4000, 3),
        (0x1F_FFFF, 3),
        (0x20_0000, 4),
        (0x0FFF_FFFF, 4),
    ] {
        let bytes = encode(value);
        assert_eq!(bytes.len(), len);
        let read = read_varlen(ByteSource::from_slice(&bytes), 0, DEFAULT_DELTA_TIME_BYTES).unwrap();
        assert_eq!(read, VarLen { value, len });
    }
}

#[test]
fn reads_from_offset() {
    let bytes = [0x00, 0x00, 0x81, 0x00, 0x90];
    let read = read_varlen(ByteSource::from_slice(&bytes), 2, DEFAULT_DELTA_TIME_BYTES).unwrap();
    assert_eq!(read, VarLen { value: 0x80, len: 2 });
}

#[test]
fn legacy_cap_rejects_four_byte_values() {
    let bytes = encode(0x20_0000);
    let err = read_varlen(ByteSource::from_slice(&bytes), 0, LEGACY_DELTA_TIME_BYTES).unwrap_err();
    assert_eq!(
        err.kind(),
        &ScanErrorKind::MalformedDeltaTime {
            max_bytes: LEGACY_DELTA_TIME_BYTES
        }
    );
}

#[test]
fn unterminated_quantity_is_malformed() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x00];
    let err = read_varlen(ByteSource::from_slice(&bytes), 0, DEFAULT_DELTA_TIME_BYTES).unwrap_err();
    assert_eq!(err.position(), 0);
    assert!(matches!(err.kind(), ScanErrorKind::MalformedDeltaTime { .. }));
}

#[test]
fn running_off_the_end_is_exhaustion() {
    let bytes = [0x81, 0x80];
    let err = read_varlen(ByteSource::from_slice(&bytes), 0, DEFAULT_DELTA_TIME_BYTES).unwrap_err();
    assert!(err.is_buffer_exhausted());
    assert_eq!(err.position(), 2);
}
