#![doc = r#"
The `FF 54` SMPTE offset

A track may state the absolute time at which it starts, as an SMPTE time
code. Chart import never needs it to place chips, but it is decoded so a
caller can line a chart up with video.

Payload layout:

```text
0rrhhhhh mm ss ff ss
 |  |    |  |  |  └ subframes, 1/100 of a frame
 |  |    |  |  └ frame
 |  |    |  └ second
 |  |    └ minute
 |  └ hour
 └ frame rate (24, 25, 29.97, 30)
```
"#]

use crate::{SmpteError, UMicros, timing::SmpteFps};

/// A track's starting position in SMPTE time code
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmpteOffset {
    fps: SmpteFps,
    hour: u8,
    minute: u8,
    second: u8,
    frame: u8,
    subframe: u8,
}

impl SmpteOffset {
    /// Decode the five payload bytes
    pub const fn parse(data: &[u8]) -> Result<Self, SmpteError> {
        let [rate_hour, minute, second, frame, subframe] = match data {
            [a, b, c, d, e] => [*a, *b, *c, *d, *e],
            _ => return Err(SmpteError::Length(data.len())),
        };
        let fps = SmpteFps::from_offset_bits(rate_hour >> 5);
        let hour = rate_hour & 0b0001_1111;
        if hour > 23 {
            return Err(SmpteError::HourOffset(hour));
        }
        if minute > 59 {
            return Err(SmpteError::MinuteOffset(minute));
        }
        if second > 59 {
            return Err(SmpteError::SecondOffset(second));
        }
        if frame >= fps.as_division() {
            return Err(SmpteError::Frame {
                frame,
                fps: fps.as_division(),
            });
        }
        if subframe > 99 {
            return Err(SmpteError::Subframe(subframe));
        }
        Ok(Self {
            fps,
            hour,
            minute,
            second,
            frame,
            subframe,
        })
    }

    /// Frame rate of the time code
    pub const fn fps(&self) -> SmpteFps {
        self.fps
    }

    /// `(hour, minute, second, frame, subframe)`
    pub const fn time_code(&self) -> (u8, u8, u8, u8, u8) {
        (
            self.hour,
            self.minute,
            self.second,
            self.frame,
            self.subframe,
        )
    }

    /// The offset in microseconds, at the time code's own frame rate
    pub fn as_micros(&self) -> UMicros {
        let whole_seconds =
            self.hour as u64 * 3600 + self.minute as u64 * 60 + self.second as u64;
        let frames = self.frame as f64 + self.subframe as f64 / 100.;
        let frame_micros = frames * 1_000_000. / self.fps.as_f64();
        UMicros::new(whole_seconds * 1_000_000 + frame_micros as u64)
    }
}

#[test]
fn parse_smpte_offset() {
    use pretty_assertions::assert_eq;
    let offset = SmpteOffset::parse(&[0x41, 0x17, 0x2D, 0x0C, 0x22]).unwrap();
    assert_eq!(offset.fps(), SmpteFps::TwentyNine);
    assert_eq!(offset.time_code(), (1, 23, 45, 12, 34));
}

#[test]
fn offset_in_micros() {
    // 25 fps, 00:00:01, frame 5, no subframes
    let offset = SmpteOffset::parse(&[0x20, 0, 1, 5, 0]).unwrap();
    assert_eq!(offset.as_micros(), UMicros::new(1_200_000));
}

#[test]
fn parse_invalid_smpte_offset() {
    use pretty_assertions::assert_eq;
    assert_eq!(
        SmpteOffset::parse(&[0x7F, 0x17, 0x2D, 0x0C, 0x22]),
        Err(SmpteError::HourOffset(31))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x41, 0x50, 0x2D, 0x0C, 0x22]),
        Err(SmpteError::MinuteOffset(80))
    );
    assert_eq!(
        SmpteOffset::parse(&[0x00, 0x00, 0x00, 24, 0x00]),
        Err(SmpteError::Frame { frame: 24, fps: 24 })
    );
    assert_eq!(SmpteOffset::parse(&[0x00; 3]), Err(SmpteError::Length(3)));
}
