#![doc = r#"
Scan MIDI track chunks into chips for a rhythm-game chart

# Overview

`midichip` reads a single `MTrk`-style track chunk and turns it into the
handful of values a chart importer cares about:

- every note-on on the import channel, as a [`Chip`](crate::prelude::Chip)
  positioned at its cumulative tick
- a tally of how often each of the 128 note numbers was hit
- the track name, the tempo (in BPM) and the raw time signature

Everything else in the track (controllers, pitch bend, system exclusive
messages, most meta events) is stepped over so that the scan stays in sync.

# Example
```rust
use midichip::prelude::*;

let bytes = [
    b'M', b'T', b'r', b'k', 0, 0, 0, 11,
    0x00, 0x90, 60, 100,      // note on, channel 1
    0x60, 62, 90,             // running status
    0x00, 0xFF, 0x2F, 0x00,   // end of track
];

let track = TrackBuffer::new(&bytes[..]).unwrap();
let config = ScanConfig::new().with_import_channel(Channel::One);
let scan = TrackScanner::new(&track, &config).scan();

assert_eq!(scan.stop_reason(), StopReason::EndOfTrack);
assert_eq!(scan.chips().len(), 2);
assert_eq!(scan.chips()[1].tick(), 0x60);
```

# Features
- `tracing`: emits per-event `trace` spans and warnings for recovered anomalies
- `serde`: serialize and deserialize the scan output and configuration
"#]
#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chip;
pub mod event;
pub mod import;
pub mod meta;
pub mod reader;
pub mod scan;
pub mod timing;

mod micros;
pub use micros::*;

mod text;
pub use text::*;

mod error;
pub use error::*;

#[doc = r#"
Common re-exports when working with `midichip`
"#]
pub mod prelude {
    pub use crate::{
        chip::*,
        error::*,
        event::*,
        import::*,
        meta::*,
        micros::*,
        reader::{ScanError, ScanErrorKind, ScanResult, TrackBuffer},
        scan::*,
        text::*,
        timing::*,
    };
}
