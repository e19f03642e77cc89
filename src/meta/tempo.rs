use core::fmt;

#[doc = r#"
The tempo of a track, as carried by `FF 51 03 tt tt tt`

The payload is a 24-bit big-endian count of microseconds per quarter note.
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tempo(u32);

impl Default for Tempo {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Tempo {
    /// 120 BPM, the tempo a track has before any tempo event
    pub const DEFAULT: Self = Self(500_000);

    /// Create a tempo from microseconds per quarter note
    pub const fn new(micros_per_quarter_note: u32) -> Self {
        Self(micros_per_quarter_note)
    }

    /// Create a tempo from the three payload bytes
    pub const fn from_be_bytes(bytes: [u8; 3]) -> Self {
        Self(u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]))
    }

    /// Microseconds per quarter note
    pub const fn micros_per_quarter_note(&self) -> u32 {
        self.0
    }

    /// A tempo of zero has no meaning
    pub const fn is_valid(&self) -> bool {
        self.0 != 0
    }

    /// Beats per minute, rounded to two decimal places.
    ///
    /// Halfway cases round to even. `None` for a zero tempo.
    pub fn bpm(&self) -> Option<f64> {
        if !self.is_valid() {
            return None;
        }
        let exact = 60_000_000. / self.0 as f64;
        Some((exact * 100.).round_ties_even() / 100.)
    }
}

impl fmt::Display for Tempo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bpm() {
            Some(bpm) => write!(f, "{bpm:.2} BPM"),
            None => f.write_str("invalid tempo"),
        }
    }
}

#[test]
fn tempo_bpm() {
    let tempo = Tempo::from_be_bytes([0x07, 0xA1, 0x20]);
    assert_eq!(tempo.micros_per_quarter_note(), 500_000);
    assert_eq!(tempo.bpm(), Some(120.0));
    assert_eq!(tempo, Tempo::DEFAULT);
}

#[test]
fn tempo_is_rounded_to_hundredths() {
    // 60e6 / 461538 = 130.000130...
    assert_eq!(Tempo::new(461_538).bpm(), Some(130.0));
    // 60e6 / 700000 = 85.714285...
    assert_eq!(Tempo::new(700_000).bpm(), Some(85.71));
}

#[test]
fn zero_tempo_has_no_bpm() {
    assert_eq!(Tempo::new(0).bpm(), None);
}
