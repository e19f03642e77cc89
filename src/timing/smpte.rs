#![doc = r#"
SMPTE frame rates

A file may count its ticks in SMPTE frames instead of quarter notes, and a
track may carry an `FF 54` offset expressed in frames. Both use one of the
four frame rates below.
"#]

/// The frame rates a MIDI file can express
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SmpteFps {
    /// 24 fps, film
    TwentyFour,
    /// 25 fps, PAL/SECAM
    TwentyFive,
    /// 29.97 fps, NTSC drop-frame
    TwentyNine,
    /// 30 fps
    Thirty,
}

impl SmpteFps {
    /// The nominal integer rate, as used in the division field.
    ///
    /// Drop-frame counts as 30 here.
    pub const fn as_division(&self) -> u8 {
        match self {
            Self::TwentyFour => 24,
            Self::TwentyFive => 25,
            Self::TwentyNine | Self::Thirty => 30,
        }
    }

    /// The real frame rate, `30000 / 1001` for drop-frame
    pub const fn as_f64(&self) -> f64 {
        match self {
            Self::TwentyFour => 24.,
            Self::TwentyFive => 25.,
            Self::TwentyNine => DROP_FRAME,
            Self::Thirty => 30.,
        }
    }

    /// Decode the two rate bits of an SMPTE offset's hour byte
    pub(crate) const fn from_offset_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => Self::TwentyFour,
            1 => Self::TwentyFive,
            2 => Self::TwentyNine,
            _ => Self::Thirty,
        }
    }

    /// Decode the negative frame count in a division's high byte
    pub(crate) const fn from_division(byte: i8) -> Option<Self> {
        match byte {
            -24 => Some(Self::TwentyFour),
            -25 => Some(Self::TwentyFive),
            -29 => Some(Self::TwentyNine),
            -30 => Some(Self::Thirty),
            _ => None,
        }
    }
}

const DROP_FRAME: f64 = 30_000. / 1001.;
