//! Standard MIDI file output for note-on / note-off tracks.
//!
//! Layout (all integers big-endian):
//!
//! ```text
//! "MThd" len=6 format ntracks division
//! "MTrk" len=4*events+4 { delta status pitch velocity }* 00 FF 2F 00
//! ```
//!
//! Every event is exactly four bytes because delta-times are capped at one
//! byte (see `engine::runs`), which is what keeps the chunk length formula
//! exact.

use std::path::Path;

use crate::error::AppError;
use crate::files::atomic_write;
use crate::model::{Event, Song, Track, DEFAULT_VELOCITY};

const HEADER_LEN: u32 = 6;
const EVENT_LEN: usize = 4;
const END_OF_TRACK: [u8; 4] = [0x00, 0xFF, 0x2F, 0x00];

/// Declared byte length of a track chunk body.
pub fn track_chunk_len(track: &Track) -> usize {
    EVENT_LEN * track.len() + END_OF_TRACK.len()
}

/// Serialize a song into a complete file image.
pub fn song_to_bytes(song: &Song) -> Result<Vec<u8>, AppError> {
    let ntracks = u16::try_from(song.tracks.len()).map_err(|_| AppError::Output {
        message: format!("{} tracks do not fit in a MIDI header", song.tracks.len()),
    })?;

    let body: usize = song.tracks.iter().map(|t| 8 + track_chunk_len(t)).sum();
    let mut out = Vec::with_capacity(14 + body);

    out.extend_from_slice(b"MThd");
    out.extend_from_slice(&HEADER_LEN.to_be_bytes());
    out.extend_from_slice(&song.format.to_be_bytes());
    out.extend_from_slice(&ntracks.to_be_bytes());
    out.extend_from_slice(&song.division.to_be_bytes());

    for (index, track) in song.tracks.iter().enumerate() {
        write_track(&mut out, track).map_err(|message| AppError::Output {
            message: format!("track {index}: {message}"),
        })?;
    }
    Ok(out)
}

fn write_track(out: &mut Vec<u8>, track: &Track) -> Result<(), String> {
    let len = u32::try_from(track_chunk_len(track))
        .map_err(|_| format!("{} events do not fit in one chunk", track.len()))?;
    out.extend_from_slice(b"MTrk");
    out.extend_from_slice(&len.to_be_bytes());

    for timed in &track.events {
        let velocity = match timed.event {
            Event::NoteOn { velocity, .. } => velocity,
            Event::NoteOff { .. } => DEFAULT_VELOCITY,
        };
        out.extend_from_slice(&[timed.delta, timed.event.status(), timed.event.pitch(), velocity]);
    }

    out.extend_from_slice(&END_OF_TRACK);
    Ok(())
}

/// Serialize and write `song` to `path`. The file is replaced in one step;
/// a failed write never leaves a truncated file under `path`.
pub fn write_song(path: &Path, song: &Song) -> Result<(), AppError> {
    let bytes = song_to_bytes(song)?;
    atomic_write(path, &bytes).map_err(|e| AppError::Output {
        message: format!("{}: {e}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song_with(tracks: Vec<Track>) -> Song {
        let mut song = Song::new();
        for t in tracks {
            song.push_track(t);
        }
        song
    }

    fn pair_track(pitch: u8, length: u8) -> Track {
        let mut t = Track::new();
        t.add_event(0, Event::note_on(pitch));
        t.add_event(length, Event::note_off(pitch));
        t
    }

    #[test]
    fn empty_song_is_header_only() {
        let bytes = song_to_bytes(&Song::new()).unwrap();
        assert_eq!(
            bytes,
            vec![0x4D, 0x54, 0x68, 0x64, 0, 0, 0, 6, 0, 1, 0, 0, 0, 5]
        );
    }

    #[test]
    fn header_prefix_and_track_count() {
        let song = song_with(vec![Track::new(), Track::new(), Track::new()]);
        let bytes = song_to_bytes(&song).unwrap();
        assert_eq!(&bytes[..10], &[0x4D, 0x54, 0x68, 0x64, 0x00, 0x00, 0x00, 0x06, 0x00, 0x01]);
        assert_eq!(&bytes[10..14], &[0x00, 0x03, 0x00, 0x05]);
    }

    #[test]
    fn single_pair_track_bytes() {
        let bytes = song_to_bytes(&song_with(vec![pair_track(69, 1)])).unwrap();
        assert_eq!(
            &bytes[14..],
            &[
                b'M', b'T', b'r', b'k', 0, 0, 0, 12,
                0x00, 0x90, 69, 64,
                0x01, 0x80, 69, 64,
                0x00, 0xFF, 0x2F, 0x00,
            ]
        );
    }

    #[test]
    fn empty_track_is_just_terminator() {
        let bytes = song_to_bytes(&song_with(vec![Track::new()])).unwrap();
        assert_eq!(&bytes[14..], &[b'M', b'T', b'r', b'k', 0, 0, 0, 4, 0x00, 0xFF, 0x2F, 0x00]);
    }

    #[test]
    fn declared_length_matches_events() {
        let mut track = Track::new();
        for p in 0..70u8 {
            track.add_event(0, Event::note_on(p));
            track.add_event(3, Event::note_off(p));
        }
        let bytes = song_to_bytes(&song_with(vec![track.clone()])).unwrap();
        let declared = u32::from_be_bytes([bytes[18], bytes[19], bytes[20], bytes[21]]) as usize;
        assert_eq!(declared, 4 * track.len() + 4);
        assert_eq!(bytes.len(), 14 + 8 + declared);
    }

    #[test]
    fn tracks_follow_each_other() {
        let bytes = song_to_bytes(&song_with(vec![pair_track(60, 2), pair_track(62, 5)])).unwrap();
        assert_eq!(bytes.len(), 14 + 2 * (8 + 12));
        assert_eq!(&bytes[34..38], b"MTrk");
        assert_eq!(bytes[42 + 2], 62);
        assert_eq!(bytes[46], 5);
    }

    #[test]
    fn note_on_velocity_is_written() {
        let mut track = Track::new();
        track.add_event(0, Event::NoteOn { pitch: 60, velocity: 100 });
        let bytes = song_to_bytes(&song_with(vec![track])).unwrap();
        assert_eq!(&bytes[22..26], &[0x00, 0x90, 60, 100]);
    }

    #[test]
    fn write_song_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("song.mid");
        let song = song_with(vec![pair_track(60, 1)]);
        write_song(&path, &song).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), song_to_bytes(&song).unwrap());
    }

    #[test]
    fn write_song_reports_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-dir").join("song.mid");
        let err = write_song(&path, &Song::new()).unwrap_err();
        assert!(matches!(err, AppError::Output { .. }));
    }
}
