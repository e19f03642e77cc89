use crate::ChannelError;
use core::fmt;
use num_enum::TryFromPrimitive;

#[doc = r#"
One of the sixteen MIDI channels.

The discriminant is the low nibble of a channel-voice status byte, so
[`Channel::One`] is nibble `0`. Users (and chart files) count from one;
see [`Channel::number`] and [`Channel::new`].
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Channel {
    /// 0bxxxx0000
    One,
    /// 0bxxxx0001
    Two,
    /// 0bxxxx0010
    Three,
    /// 0bxxxx0011
    Four,
    /// 0bxxxx0100
    Five,
    /// 0bxxxx0101
    Six,
    /// 0bxxxx0110
    Seven,
    /// 0bxxxx0111
    Eight,
    /// 0bxxxx1000
    Nine,
    /// 0bxxxx1001
    Ten,
    /// 0bxxxx1010
    Eleven,
    /// 0bxxxx1011
    Twelve,
    /// 0bxxxx1100
    Thirteen,
    /// 0bxxxx1101
    Fourteen,
    /// 0bxxxx1110
    Fifteen,
    /// 0bxxxx1111
    Sixteen,
}

impl Channel {
    /// Create a channel from its 1-based number
    pub fn new(number: u8) -> Result<Self, ChannelError> {
        number
            .checked_sub(1)
            .and_then(|nibble| Self::try_from(nibble).ok())
            .ok_or(ChannelError(number))
    }

    /// The channel a status byte addresses
    pub const fn from_status(status: u8) -> Self {
        match status & 0x0F {
            0 => Self::One,
            1 => Self::Two,
            2 => Self::Three,
            3 => Self::Four,
            4 => Self::Five,
            5 => Self::Six,
            6 => Self::Seven,
            7 => Self::Eight,
            8 => Self::Nine,
            9 => Self::Ten,
            10 => Self::Eleven,
            11 => Self::Twelve,
            12 => Self::Thirteen,
            13 => Self::Fourteen,
            14 => Self::Fifteen,
            _ => Self::Sixteen,
        }
    }

    /// The 1-based channel number
    pub const fn number(&self) -> u8 {
        *self as u8 + 1
    }

    /// The low nibble of a status byte on this channel
    pub const fn to_nibble(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.number())
    }
}

#[test]
fn one_based_numbers() {
    assert_eq!(Channel::new(1), Ok(Channel::One));
    assert_eq!(Channel::new(10), Ok(Channel::Ten));
    assert_eq!(Channel::new(16), Ok(Channel::Sixteen));
    assert_eq!(Channel::new(0), Err(ChannelError(0)));
    assert_eq!(Channel::new(17), Err(ChannelError(17)));
}

#[test]
fn status_nibble() {
    assert_eq!(Channel::from_status(0x90), Channel::One);
    assert_eq!(Channel::from_status(0x99), Channel::Ten);
    assert_eq!(Channel::from_status(0x8F), Channel::Sixteen);
    assert_eq!(Channel::from_status(0x99).number(), 0x99 - 0x90 + 1);
    for nibble in 0..16 {
        let channel = Channel::from_status(0x90 | nibble);
        assert_eq!(channel.to_nibble(), nibble);
        assert_eq!(channel.number(), nibble + 1);
    }
}
