/// Velocity written for every note event unless configured otherwise.
pub const DEFAULT_VELOCITY: u8 = 64;

/// A note event. Only note-on and note-off are ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    NoteOn { pitch: u8, velocity: u8 },
    NoteOff { pitch: u8 },
}

impl Event {
    pub const fn note_on(pitch: u8) -> Self {
        Event::NoteOn { pitch, velocity: DEFAULT_VELOCITY }
    }

    pub const fn note_off(pitch: u8) -> Self {
        Event::NoteOff { pitch }
    }

    pub const fn pitch(self) -> u8 {
        match self {
            Event::NoteOn { pitch, .. } | Event::NoteOff { pitch } => pitch,
        }
    }

    /// Status byte on channel 0.
    pub const fn status(self) -> u8 {
        match self {
            Event::NoteOn { .. } => 0x90,
            Event::NoteOff { .. } => 0x80,
        }
    }
}
