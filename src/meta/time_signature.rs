use core::fmt;

#[doc = r#"
The time signature payload of `FF 58 04 nn dd cc bb`

The four bytes are kept as-is for the chart importer. The accessors only
interpret them on request:

- `nn`: numerator
- `dd`: denominator as a power of two (`2` means a quarter note)
- `cc`: MIDI clocks per metronome click
- `bb`: notated 32nd notes per MIDI quarter note
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSignature([u8; 4]);

impl TimeSignature {
    /// Wrap the raw payload
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// The raw payload
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Beats per measure
    pub const fn numerator(&self) -> u8 {
        self.0[0]
    }

    /// The beat unit, if the exponent is sane
    pub const fn denominator(&self) -> Option<u32> {
        match self.0[1] {
            e if e < 32 => Some(1 << e),
            _ => None,
        }
    }

    /// MIDI clocks per metronome click
    pub const fn clocks_per_click(&self) -> u8 {
        self.0[2]
    }

    /// Notated 32nd notes in a MIDI quarter note
    pub const fn thirty_seconds_per_quarter(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a:02X}{b:02X}{c:02X}{d:02X}")
    }
}

#[test]
fn four_four() {
    let sig = TimeSignature::from_bytes([0x04, 0x02, 0x18, 0x08]);
    assert_eq!(sig.numerator(), 4);
    assert_eq!(sig.denominator(), Some(4));
    assert_eq!(sig.clocks_per_click(), 24);
    assert_eq!(sig.thirty_seconds_per_quarter(), 8);
    assert_eq!(sig.to_string(), "04021808");
}

#[test]
fn absurd_denominator() {
    let sig = TimeSignature::from_bytes([0x03, 0x40, 0x18, 0x08]);
    assert_eq!(sig.denominator(), None);
}
