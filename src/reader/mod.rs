#![doc = r#"
Bounded byte access over a track chunk

# Overview

A track chunk arrives fully materialized from whatever split the file into
chunks. It always starts with an 8 byte header:

```text
|  4 bytes  |       4 bytes        |   declared length bytes   |
|   "MTrk"  | declared length (BE) |  delta-time / event pairs |
```

[`TrackBuffer`] owns (or borrows) those bytes and works out the scan bound:
the declared length plus the header, clipped to what is actually there. A
[`ByteSource`] is the copyable view the decoders read through; none of its
reads ever reach past that bound.
"#]

mod error;
pub use error::*;

mod varlen;
pub use varlen::*;

use crate::ChunkError;
use std::borrow::Cow;

/// Size of the tag and length fields in front of every chunk
pub const CHUNK_HEADER_LEN: usize = 8;

/// The tag of a standard track chunk
pub const TRACK_TAG: [u8; 4] = *b"MTrk";

#[doc = r#"
The raw bytes of one track chunk, header included.

The buffer is read-only for its whole life; scanning it any number of
times yields the same result.
"#]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackBuffer<'a> {
    bytes: Cow<'a, [u8]>,
    declared_len: u32,
}

impl<'a> TrackBuffer<'a> {
    /// Wrap the bytes of a chunk. The tag is not checked.
    pub fn new<B>(bytes: B) -> Result<Self, ChunkError>
    where
        B: Into<Cow<'a, [u8]>>,
    {
        let bytes = bytes.into();
        if bytes.len() < CHUNK_HEADER_LEN {
            return Err(ChunkError::HeaderTooShort(bytes.len()));
        }
        let declared_len = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        Ok(Self {
            bytes,
            declared_len,
        })
    }

    /// Wrap the bytes of a chunk, rejecting anything not tagged `MTrk`.
    pub fn new_track<B>(bytes: B) -> Result<Self, ChunkError>
    where
        B: Into<Cow<'a, [u8]>>,
    {
        let buffer = Self::new(bytes)?;
        if buffer.tag() != TRACK_TAG {
            return Err(ChunkError::UnexpectedTag(buffer.tag()));
        }
        Ok(buffer)
    }

    /// The four tag bytes of the chunk
    pub fn tag(&self) -> [u8; 4] {
        [self.bytes[0], self.bytes[1], self.bytes[2], self.bytes[3]]
    }

    /// The data length the chunk header claims
    pub const fn declared_len(&self) -> u32 {
        self.declared_len
    }

    /// True if the header claims more data than the buffer holds
    pub fn is_truncated(&self) -> bool {
        self.declared_end() > self.bytes.len()
    }

    /// Offset one past the last byte the scanner may read.
    ///
    /// This is `declared length + 8`, or the buffer length if that is smaller.
    pub fn end(&self) -> usize {
        self.declared_end().min(self.bytes.len())
    }

    fn declared_end(&self) -> usize {
        (self.declared_len as usize).saturating_add(CHUNK_HEADER_LEN)
    }

    /// All raw bytes, including any trailing bytes past the declared length
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// A bounded view for the decoders
    pub fn source(&self) -> ByteSource<'_> {
        ByteSource {
            bytes: &self.bytes[..self.end()],
        }
    }
}

#[doc = r#"
A length-bounded, copyable view over chunk bytes.

Offsets are relative to the start of the chunk header. Fixed-size reads
that run off the end report [`ScanErrorKind::BufferExhausted`]; payloads
whose length was read from the stream report
[`ScanErrorKind::TruncatedPayload`].
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteSource<'a> {
    bytes: &'a [u8],
}

impl<'a> ByteSource<'a> {
    /// View a plain slice. The whole slice is readable.
    pub const fn from_slice(bytes: &'a [u8]) -> Self {
        Self { bytes }
    }

    /// Offset one past the last readable byte
    pub const fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if nothing can be read
    pub const fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Bytes left from `position` to the bound
    pub const fn remaining(&self, position: usize) -> usize {
        self.bytes.len().saturating_sub(position)
    }

    /// Read the byte at `position`
    pub fn byte_at(&self, position: usize) -> ScanResult<u8> {
        self.bytes
            .get(position)
            .copied()
            .ok_or(ScanError::exhausted(position))
    }

    /// Read `len` bytes of fixed-size structure at `position`
    pub fn span(&self, position: usize, len: usize) -> ScanResult<&'a [u8]> {
        let end = position.saturating_add(len);
        self.bytes
            .get(position..end)
            .ok_or(ScanError::exhausted(position))
    }

    /// Read exactly `N` bytes at `position`
    pub fn array<const N: usize>(&self, position: usize) -> ScanResult<[u8; N]> {
        let span = self.span(position, N)?;
        let mut out = [0; N];
        out.copy_from_slice(span);
        Ok(out)
    }

    /// Read a payload of `len` bytes whose length came from the stream.
    ///
    /// `event_start` is reported as the error position.
    pub fn payload(&self, event_start: usize, position: usize, len: usize) -> ScanResult<&'a [u8]> {
        let end = position.saturating_add(len);
        self.bytes.get(position..end).ok_or(ScanError::new(
            event_start,
            ScanErrorKind::TruncatedPayload {
                needed: len,
                available: self.remaining(position),
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn header_fields() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 1, 2];
        let buffer = TrackBuffer::new(&bytes[..]).unwrap();
        assert_eq!(buffer.tag(), TRACK_TAG);
        assert_eq!(buffer.declared_len(), 0x0102);
        assert!(buffer.is_truncated());
        assert_eq!(buffer.end(), 8);
    }

    #[test]
    fn short_header_is_rejected() {
        let err = TrackBuffer::new(&[b'M', b'T', b'r'][..]).unwrap_err();
        assert_eq!(err, ChunkError::HeaderTooShort(3));
    }

    #[test]
    fn tag_checked_only_when_asked() {
        let bytes = [b'M', b'T', b'h', b'd', 0, 0, 0, 0];
        assert!(TrackBuffer::new(&bytes[..]).is_ok());
        let err = TrackBuffer::new_track(&bytes[..]).unwrap_err();
        assert_eq!(err, ChunkError::UnexpectedTag(*b"MThd"));
    }

    #[test]
    fn bound_ignores_trailing_bytes() {
        let bytes = [b'M', b'T', b'r', b'k', 0, 0, 0, 2, 0xAA, 0xBB, 0xCC];
        let buffer = TrackBuffer::new(bytes.to_vec()).unwrap();
        let source = buffer.source();
        assert_eq!(source.len(), 10);
        assert_eq!(source.byte_at(9).unwrap(), 0xBB);
        assert!(source.byte_at(10).unwrap_err().is_buffer_exhausted());
    }

    #[test]
    fn payload_reports_truncation() {
        let source = ByteSource::from_slice(&[0, 1, 2, 3]);
        assert_eq!(source.payload(0, 1, 3).unwrap(), &[1, 2, 3]);
        let err = source.payload(0, 2, 5).unwrap_err();
        assert_eq!(
            err.kind(),
            &ScanErrorKind::TruncatedPayload {
                needed: 5,
                available: 2
            }
        );
        assert_eq!(err.position(), 0);
    }
}
