use core::fmt;
use core::ops::Add;
use core::time::Duration;

/// A point on the track clock, or a span of it, in microseconds.
///
/// Chip times and SMPTE offsets are both expressed in this unit so that an
/// offset can simply be added to a chip's time.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// The start of the track
    pub const ZERO: Self = Self(0);

    /// Wrap a count of microseconds
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Microseconds
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// Whole milliseconds, rounded down
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }

    /// Seconds
    pub const fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.
    }

    /// Span from `earlier` to `self`, zero if `earlier` is later
    pub const fn saturating_sub(&self, earlier: Self) -> Self {
        Self(self.0.saturating_sub(earlier.0))
    }
}

impl From<UMicros> for Duration {
    fn from(value: UMicros) -> Self {
        Duration::from_micros(value.0)
    }
}

impl Add for UMicros {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for UMicros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}s", self.0 / 1_000_000, self.0 % 1_000_000)
    }
}

#[test]
fn offsets_add_to_chip_times() {
    let start = UMicros::new(1_200_000);
    let chip = UMicros::new(480_000);
    assert_eq!((start + chip).as_millis(), 1_680);
    assert_eq!((start + chip).to_string(), "1.680000s");
    assert_eq!(chip.saturating_sub(start), UMicros::ZERO);
    assert_eq!(Duration::from(chip), Duration::from_millis(480));
    assert_eq!(chip.as_secs_f64(), 0.48);
}
