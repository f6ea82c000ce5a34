use crate::model::{Event, Track};

/// Largest delta-time one event can carry (a single byte).
pub const MAX_DELTA: usize = u8::MAX as usize;

/// A stretch of consecutive samples that quantized to the same note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Run {
    pub note: u8,
    pub length: usize,
}

/// Collapse a note stream into runs of identical notes.
pub fn coalesce(notes: impl IntoIterator<Item = u8>) -> Vec<Run> {
    let mut runs: Vec<Run> = Vec::new();
    for note in notes {
        match runs.last_mut() {
            Some(run) if run.note == note => run.length += 1,
            _ => runs.push(Run { note, length: 1 }),
        }
    }
    runs
}

/// Append a note-on at delta 0 and a note-off after the run's length for
/// every run.
///
/// A run longer than `MAX_DELTA` is written as several back-to-back pairs of
/// the same note, each at most `MAX_DELTA` long, so a 256-sample run becomes
/// 255 + 1. Returns how many runs had to be split.
pub fn append_runs(track: &mut Track, runs: &[Run], velocity: u8) -> usize {
    let mut split = 0;
    for run in runs {
        if run.length > MAX_DELTA {
            split += 1;
        }
        let mut remaining = run.length;
        while remaining > 0 {
            let chunk = remaining.min(MAX_DELTA);
            track.add_event(0, Event::NoteOn { pitch: run.note, velocity });
            track.add_event(u8::try_from(chunk).unwrap_or(u8::MAX), Event::note_off(run.note));
            remaining -= chunk;
        }
    }
    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TimedEvent, DEFAULT_VELOCITY};

    fn expand(runs: &[Run]) -> Vec<u8> {
        runs.iter()
            .flat_map(|r| std::iter::repeat(r.note).take(r.length))
            .collect()
    }

    /// Rebuild the sample stream from note-on / note-off pairs.
    fn replay(track: &Track) -> Vec<u8> {
        let mut out = Vec::new();
        for pair in track.events.chunks(2) {
            assert_eq!(pair.len(), 2, "odd event count");
            let (on, off) = (&pair[0], &pair[1]);
            assert_eq!(on.delta, 0);
            assert!(matches!(on.event, Event::NoteOn { .. }));
            assert!(matches!(off.event, Event::NoteOff { .. }));
            assert_eq!(on.event.pitch(), off.event.pitch());
            out.extend(std::iter::repeat(off.event.pitch()).take(off.delta as usize));
        }
        out
    }

    #[test]
    fn empty_stream_has_no_runs() {
        assert!(coalesce(Vec::new()).is_empty());
    }

    #[test]
    fn single_sample() {
        assert_eq!(coalesce([60]), vec![Run { note: 60, length: 1 }]);
    }

    #[test]
    fn runs_split_on_change() {
        assert_eq!(
            coalesce([60, 60, 62, 60, 60, 60]),
            vec![
                Run { note: 60, length: 2 },
                Run { note: 62, length: 1 },
                Run { note: 60, length: 3 },
            ]
        );
    }

    #[test]
    fn coalescing_is_lossless() {
        let notes = vec![1, 1, 2, 3, 3, 3, 1, 2, 2, 9];
        assert_eq!(expand(&coalesce(notes.clone())), notes);
    }

    #[test]
    fn events_for_runs() {
        let mut track = Track::new();
        let split = append_runs(&mut track, &coalesce([60, 60, 62]), DEFAULT_VELOCITY);
        assert_eq!(split, 0);
        assert_eq!(
            track.events,
            vec![
                TimedEvent { delta: 0, event: Event::note_on(60) },
                TimedEvent { delta: 2, event: Event::note_off(60) },
                TimedEvent { delta: 0, event: Event::note_on(62) },
                TimedEvent { delta: 1, event: Event::note_off(62) },
            ]
        );
    }

    #[test]
    fn velocity_is_applied_to_note_on() {
        let mut track = Track::new();
        append_runs(&mut track, &[Run { note: 70, length: 1 }], 100);
        assert_eq!(track.events[0].event, Event::NoteOn { pitch: 70, velocity: 100 });
    }

    #[test]
    fn run_of_255_fits_one_pair() {
        let mut track = Track::new();
        let split = append_runs(&mut track, &[Run { note: 64, length: 255 }], DEFAULT_VELOCITY);
        assert_eq!(split, 0);
        assert_eq!(track.len(), 2);
        assert_eq!(track.events[1].delta, 255);
    }

    #[test]
    fn run_of_256_splits_into_255_and_1() {
        let mut track = Track::new();
        let split = append_runs(&mut track, &[Run { note: 64, length: 256 }], DEFAULT_VELOCITY);
        assert_eq!(split, 1);
        assert_eq!(track.len(), 4);
        assert_eq!(track.events[1].delta, 255);
        assert_eq!(track.events[3].delta, 1);
        assert_eq!(track.events[2].event, Event::note_on(64));
    }

    #[test]
    fn long_runs_replay_losslessly() {
        let mut notes = vec![60; 600];
        notes.extend([62; 3]);
        notes.extend([60; 510]);
        let mut track = Track::new();
        append_runs(&mut track, &coalesce(notes.clone()), DEFAULT_VELOCITY);
        assert_eq!(replay(&track), notes);
    }
}
