use crate::{
    TextEncoding,
    event::Channel,
    reader::{DEFAULT_DELTA_TIME_BYTES, MAX_DELTA_TIME_BYTES, ScanError},
};

/// How far past an `F0` the scanner looks for the closing `F7`
pub const DEFAULT_SYSEX_SEARCH_WINDOW: usize = 127;

#[doc = r#"
What a scan does when it meets something it cannot classify.

Only unknown status bytes, unknown meta sub-types and unterminated system
exclusive messages are subject to the policy. A malformed delta-time or a
payload running past the chunk always stops the scan, since there is no
reliable place to resume from.
"#]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RecoveryPolicy {
    /// Stop and return what was decoded so far along with the error
    #[default]
    Abort,
    /// Record the error as a warning, step over the event and carry on.
    ///
    /// An unknown status byte is stepped over alone. An unknown meta event is
    /// stepped over by its length. An unterminated sysex steps over the `F0`.
    Skip,
}

#[doc = r#"
Settings for a [`TrackScanner`](super::TrackScanner)

```rust
# use midichip::prelude::*;
let config = ScanConfig::new()
    .with_import_channel(Channel::Ten)
    .with_recovery(RecoveryPolicy::Skip)
    .with_text_encoding(TextEncoding::ShiftJis);
assert_eq!(config.import_channel(), Some(Channel::Ten));
```
"#]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    import_channel: Option<Channel>,
    max_delta_time_bytes: usize,
    sysex_search_window: usize,
    velocity_zero_is_note_off: bool,
    recovery: RecoveryPolicy,
    text_encoding: TextEncoding,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanConfig {
    /// No import channel, standard delta-times, abort on unknown events
    pub const fn new() -> Self {
        Self {
            import_channel: None,
            max_delta_time_bytes: DEFAULT_DELTA_TIME_BYTES,
            sysex_search_window: DEFAULT_SYSEX_SEARCH_WINDOW,
            velocity_zero_is_note_off: false,
            recovery: RecoveryPolicy::Abort,
            text_encoding: TextEncoding::Auto,
        }
    }

    /// Collect note-ons on `channel`
    pub const fn with_import_channel(mut self, channel: Channel) -> Self {
        self.import_channel = Some(channel);
        self
    }

    /// Collect on `channel`, or nothing for `None`
    pub const fn with_optional_channel(mut self, channel: Option<Channel>) -> Self {
        self.import_channel = channel;
        self
    }

    /// Cap on delta-time bytes, clamped to `1..=4`
    pub const fn with_max_delta_time_bytes(mut self, bytes: usize) -> Self {
        self.max_delta_time_bytes = if bytes == 0 {
            1
        } else if bytes > MAX_DELTA_TIME_BYTES {
            MAX_DELTA_TIME_BYTES
        } else {
            bytes
        };
        self
    }

    /// Bytes after `F0` searched for `F7`
    pub const fn with_sysex_search_window(mut self, window: usize) -> Self {
        self.sysex_search_window = window;
        self
    }

    /// Treat `9n` with velocity 0 as a note off
    pub const fn with_velocity_zero_as_note_off(mut self, enabled: bool) -> Self {
        self.velocity_zero_is_note_off = enabled;
        self
    }

    /// What to do with unknown events
    pub const fn with_recovery(mut self, recovery: RecoveryPolicy) -> Self {
        self.recovery = recovery;
        self
    }

    /// How to decode track names
    pub const fn with_text_encoding(mut self, encoding: TextEncoding) -> Self {
        self.text_encoding = encoding;
        self
    }

    /// The import channel
    pub const fn import_channel(&self) -> Option<Channel> {
        self.import_channel
    }

    /// Cap on delta-time bytes
    pub const fn max_delta_time_bytes(&self) -> usize {
        self.max_delta_time_bytes
    }

    /// Bytes after `F0` searched for `F7`
    pub const fn sysex_search_window(&self) -> usize {
        self.sysex_search_window
    }

    /// Whether `9n` with velocity 0 is a note off
    pub const fn velocity_zero_is_note_off(&self) -> bool {
        self.velocity_zero_is_note_off
    }

    /// What to do with unknown events
    pub const fn recovery(&self) -> RecoveryPolicy {
        self.recovery
    }

    /// How to decode track names
    pub const fn text_encoding(&self) -> TextEncoding {
        self.text_encoding
    }

    /// True if a scan under this configuration steps over `error`
    pub const fn skips(&self, error: &ScanError) -> bool {
        matches!(self.recovery, RecoveryPolicy::Skip) && error.kind.is_skippable()
    }
}

#[test]
fn optional_channel() {
    let ten = ScanConfig::new().with_optional_channel(Channel::new(10).ok());
    assert_eq!(ten.import_channel(), Some(Channel::Ten));
    let none = ten.with_optional_channel(Channel::new(0).ok());
    assert_eq!(none.import_channel(), None);
}

#[test]
fn delta_time_cap_is_clamped() {
    assert_eq!(ScanConfig::new().max_delta_time_bytes(), 4);
    assert_eq!(
        ScanConfig::new()
            .with_max_delta_time_bytes(0)
            .max_delta_time_bytes(),
        1
    );
    assert_eq!(
        ScanConfig::new()
            .with_max_delta_time_bytes(9)
            .max_delta_time_bytes(),
        4
    );
}
