#![doc = r#"
Chips: the note-ons a chart is built from

A [`ChipCollector`] sits at the end of a scan. It sees every note-on,
keeps the ones on the import channel as [`Chip`]s in the order they were
encountered, and counts how often each note number was hit so the importer
can offer a note-to-lane mapping.
"#]

use crate::event::{Channel, NoteEvent};
use core::ops::Index;

/// A note-on accepted for the chart
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chip {
    tick: u32,
    note: u8,
    velocity: u8,
}

impl Chip {
    /// Create a chip
    pub const fn new(tick: u32, note: u8, velocity: u8) -> Self {
        Self {
            tick,
            note,
            velocity,
        }
    }
    /// Cumulative tick of the note-on
    pub const fn tick(&self) -> u32 {
        self.tick
    }
    /// Note number, 0-127
    pub const fn note(&self) -> u8 {
        self.note
    }
    /// Velocity, 0-127
    pub const fn velocity(&self) -> u8 {
        self.velocity
    }
}

/// How many collected chips fall on each of the 128 note numbers
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NoteTally([u32; 128]);

impl Default for NoteTally {
    fn default() -> Self {
        Self([0; 128])
    }
}

impl NoteTally {
    /// Count one more hit on `note`
    pub fn record(&mut self, note: u8) {
        let slot = &mut self.0[(note & 0x7F) as usize];
        *slot = slot.saturating_add(1);
    }

    /// Hits on `note`
    pub fn count(&self, note: u8) -> u32 {
        self.0[(note & 0x7F) as usize]
    }

    /// Total hits over all notes
    pub fn total(&self) -> u64 {
        self.0.iter().map(|c| *c as u64).sum()
    }

    /// Note numbers hit at least once, with their counts, lowest note first
    pub fn used_notes(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(note, c)| (note as u8, *c))
    }

    /// Add another tally into this one
    pub fn absorb(&mut self, other: &NoteTally) {
        for (mine, theirs) in self.0.iter_mut().zip(other.0.iter()) {
            *mine = mine.saturating_add(*theirs);
        }
    }

    /// The raw buckets
    pub fn as_array(&self) -> &[u32; 128] {
        &self.0
    }
}

impl Index<u8> for NoteTally {
    type Output = u32;
    fn index(&self, note: u8) -> &Self::Output {
        &self.0[(note & 0x7F) as usize]
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for NoteTally {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.as_array())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for NoteTally {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let counts = <Vec<u32> as serde::Deserialize>::deserialize(deserializer)?;
        let counts: [u32; 128] = counts
            .try_into()
            .map_err(|v: Vec<u32>| serde::de::Error::invalid_length(v.len(), &"128 note counts"))?;
        Ok(Self(counts))
    }
}

#[doc = r#"
Collects the note-ons of one channel.

The chip list is append-only: chips already collected are never touched
again.
"#]
#[derive(Clone, Debug, Default)]
pub struct ChipCollector {
    channel: Option<Channel>,
    chips: Vec<Chip>,
    tally: NoteTally,
}

impl ChipCollector {
    /// Collect on `channel`, or nothing at all for `None`
    pub fn new(channel: Option<Channel>) -> Self {
        Self {
            channel,
            ..Default::default()
        }
    }

    /// The channel being collected
    pub const fn channel(&self) -> Option<Channel> {
        self.channel
    }

    /// Offer a note event at `tick`. Returns true if it became a chip.
    pub fn offer(&mut self, tick: u32, note: &NoteEvent) -> bool {
        if !note.is_on() || Some(note.channel) != self.channel {
            return false;
        }
        self.chips.push(Chip::new(tick, note.note, note.velocity));
        self.tally.record(note.note);
        true
    }

    /// Chips so far, in encounter order
    pub fn chips(&self) -> &[Chip] {
        &self.chips
    }

    /// Per-note counts so far
    pub fn tally(&self) -> &NoteTally {
        &self.tally
    }

    /// Consume the collector
    pub fn into_parts(self) -> (Vec<Chip>, NoteTally) {
        (self.chips, self.tally)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::NoteKind;
    use pretty_assertions::assert_eq;

    fn note(kind: NoteKind, channel: Channel, note: u8) -> NoteEvent {
        NoteEvent {
            kind,
            channel,
            note,
            velocity: 100,
        }
    }

    #[test]
    fn only_the_import_channel_is_collected() {
        let mut collector = ChipCollector::new(Some(Channel::Ten));
        assert!(collector.offer(0, &note(NoteKind::On, Channel::Ten, 36)));
        assert!(!collector.offer(10, &note(NoteKind::On, Channel::One, 36)));
        assert!(!collector.offer(20, &note(NoteKind::Off, Channel::Ten, 36)));
        assert!(collector.offer(30, &note(NoteKind::On, Channel::Ten, 38)));

        assert_eq!(
            collector.chips(),
            &[Chip::new(0, 36, 100), Chip::new(30, 38, 100)]
        );
        assert_eq!(collector.tally().count(36), 1);
        assert_eq!(collector.tally()[38], 1);
        assert_eq!(collector.tally().total(), 2);
    }

    #[test]
    fn no_channel_collects_nothing() {
        let mut collector = ChipCollector::new(None);
        assert!(!collector.offer(0, &note(NoteKind::On, Channel::One, 60)));
        assert!(collector.chips().is_empty());
    }

    #[test]
    fn tallies_merge() {
        let mut a = NoteTally::default();
        a.record(42);
        let mut b = NoteTally::default();
        b.record(42);
        b.record(46);
        a.absorb(&b);
        assert_eq!(a.used_notes().collect::<Vec<_>>(), vec![(42, 2), (46, 1)]);
        assert_eq!(a.as_array()[42], 2);
        assert_eq!(a.as_array().iter().sum::<u32>(), 3);
    }
}
