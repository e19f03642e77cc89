#![doc = r#"
Converting chip ticks into time

Ticks only mean something together with the division field of the file
header, which the upstream container parser hands over as two raw bytes.
"#]

mod smpte;
pub use smpte::*;

use crate::{SmpteError, UMicros, chip::Chip, meta::Tempo};

/// How a file divides time into ticks.
///
/// Either a number of ticks per quarter note, or SMPTE frames subdivided into
/// ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Timing {
    /// Tick length follows the tempo
    TicksPerQuarterNote(u16),
    /// Tick length is fixed in absolute time
    Smpte {
        /// Frames per second
        fps: SmpteFps,
        /// Ticks per frame
        ticks_per_frame: u8,
    },
}

impl Timing {
    /// Decode the two division bytes of a header chunk
    pub fn from_division(bytes: [u8; 2]) -> Result<Self, SmpteError> {
        if bytes[0] & 0x80 == 0 {
            return Ok(Self::TicksPerQuarterNote(u16::from_be_bytes(bytes)));
        }
        let frames = bytes[0] as i8;
        let fps = SmpteFps::from_division(frames).ok_or(SmpteError::HeaderFrameTime(frames))?;
        if bytes[1] & 0x80 != 0 {
            return Err(SmpteError::TicksPerFrame(bytes[1]));
        }
        Ok(Self::Smpte {
            fps,
            ticks_per_frame: bytes[1],
        })
    }

    /// Microseconds one tick lasts at `tempo`.
    ///
    /// SMPTE timing ignores the tempo. Returns `None` if the division is zero
    /// or the tempo is invalid while it matters.
    pub fn micros_per_tick(&self, tempo: Tempo) -> Option<f64> {
        match *self {
            Self::TicksPerQuarterNote(0) => None,
            Self::TicksPerQuarterNote(tpqn) => {
                // µs_per_tick = tempo / TPQN
                tempo
                    .is_valid()
                    .then(|| tempo.micros_per_quarter_note() as f64 / tpqn as f64)
            }
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => {
                let ticks_per_second = fps.as_division() as u32 * ticks_per_frame as u32;
                (ticks_per_second != 0).then(|| 1_000_000. / ticks_per_second as f64)
            }
        }
    }

    /// Time of `tick` since the start of the track, at a constant tempo
    pub fn tick_to_micros(&self, tick: u32, tempo: Tempo) -> Option<UMicros> {
        let (numerator, denominator) = match *self {
            Self::TicksPerQuarterNote(tpqn) => {
                if !tempo.is_valid() {
                    return None;
                }
                (tempo.micros_per_quarter_note() as u64, tpqn as u64)
            }
            Self::Smpte {
                fps,
                ticks_per_frame,
            } => (1_000_000, fps.as_division() as u64 * ticks_per_frame as u64),
        };
        if denominator == 0 {
            return None;
        }
        Some(UMicros::new(tick as u64 * numerator / denominator))
    }

    /// Time of a chip since the start of the track, at a constant tempo
    pub fn chip_time(&self, chip: &Chip, tempo: Tempo) -> Option<UMicros> {
        self.tick_to_micros(chip.tick(), tempo)
    }
}

#[test]
fn ticks_per_quarter_note() {
    let timing = Timing::from_division([0x01, 0xE0]).unwrap();
    assert_eq!(timing, Timing::TicksPerQuarterNote(480));
    assert_eq!(
        timing.tick_to_micros(960, Tempo::DEFAULT),
        Some(UMicros::new(1_000_000))
    );
    assert_eq!(timing.tick_to_micros(960, Tempo::new(0)), None);
}

#[test]
fn smpte_division() {
    let timing = Timing::from_division([(-30i8) as u8, 40]).unwrap();
    assert_eq!(
        timing,
        Timing::Smpte {
            fps: SmpteFps::Thirty,
            ticks_per_frame: 40
        }
    );
    assert_eq!(
        timing.tick_to_micros(1200, Tempo::new(0)),
        Some(UMicros::new(1_000_000))
    );
}

#[test]
fn bad_smpte_division() {
    assert_eq!(
        Timing::from_division([(-23i8) as u8, 40]),
        Err(SmpteError::HeaderFrameTime(-23))
    );
}

#[test]
fn tick_length() {
    let tpqn = Timing::TicksPerQuarterNote(500);
    assert_eq!(tpqn.micros_per_tick(Tempo::DEFAULT), Some(1_000.));
    assert_eq!(tpqn.micros_per_tick(Tempo::new(0)), None);
    assert_eq!(
        Timing::TicksPerQuarterNote(0).micros_per_tick(Tempo::DEFAULT),
        None
    );

    let smpte = Timing::Smpte {
        fps: SmpteFps::TwentyFive,
        ticks_per_frame: 40,
    };
    assert_eq!(smpte.micros_per_tick(Tempo::new(0)), Some(1_000.));
}
