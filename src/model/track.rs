use super::event::Event;

/// Multi-track file with tracks played in parallel.
pub const FORMAT: u16 = 1;
/// Ticks per quarter note. One sampled pixel is one tick.
pub const DIVISION: u16 = 5;

/// An event and the number of ticks since the previous event in its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    pub delta: u8,
    pub event: Event,
}

/// One timed event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub events: Vec<TimedEvent>,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_event(&mut self, delta: u8, event: Event) {
        self.events.push(TimedEvent { delta, event });
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// All tracks of one conversion plus the fixed header fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Song {
    pub format: u16,
    pub division: u16,
    pub tracks: Vec<Track>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            format: FORMAT,
            division: DIVISION,
            tracks: Vec::new(),
        }
    }
}

impl Song {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_track(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }
}
