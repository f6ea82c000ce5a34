use image::{DynamicImage, Rgb, RgbImage};

use pixmidi::dsl::compile_source;
use pixmidi::engine::{convert_image, Mode};
use pixmidi::input::{load_image, raster_from_image};
use pixmidi::midi::{song_to_bytes, write_song};
use pixmidi::model::{Event, Raster};
use pixmidi::settings::Settings;

fn expressions(sources: &[&str]) -> Mode {
    Mode::Expressions(sources.iter().map(|s| compile_source(s).unwrap()).collect())
}

#[test]
fn one_pixel_image_gives_one_note_pair() {
    let image = Raster::rgb(1, 1, vec![30, 0, 0]).unwrap();
    let song = convert_image(&image, &Settings::default(), expressions(&["x"]), false).unwrap();
    let bytes = song_to_bytes(&song).unwrap();

    // 30 lies in (21, 42] → note 64
    assert_eq!(
        bytes,
        vec![
            0x4D, 0x54, 0x68, 0x64, 0, 0, 0, 6, 0, 1, 0, 1, 0, 5,
            b'M', b'T', b'r', b'k', 0, 0, 0, 12,
            0x00, 0x90, 64, 64,
            0x01, 0x80, 64, 64,
            0x00, 0xFF, 0x2F, 0x00,
        ]
    );
}

#[test]
fn gradient_diagonal_produces_ordered_notes() {
    // Red rises by 40 per diagonal step: 0, 40, 80, 120, 160, 200, 240.
    let img = RgbImage::from_fn(7, 7, |x, y| if x == y { Rgb([(x * 40) as u8, 0, 0]) } else { Rgb([0, 0, 0]) });
    let raster = raster_from_image(DynamicImage::ImageRgb8(img)).unwrap();
    let song = convert_image(&raster, &Settings::default(), expressions(&["x"]), false).unwrap();

    let pitches: Vec<u8> = song.tracks[0]
        .events
        .iter()
        .filter(|e| matches!(e.event, Event::NoteOn { .. }))
        .map(|e| e.event.pitch())
        .collect();
    assert_eq!(pitches, vec![60, 64, 67, 71, 74, 79, 81]);
}

#[test]
fn long_uniform_diagonal_splits_at_255() {
    let raster = Raster::gray(300, 300, vec![0; 300 * 300]).unwrap();
    let song = convert_image(&raster, &Settings::default(), expressions(&["x"]), false).unwrap();
    let deltas: Vec<u8> = song.tracks[0].events.iter().map(|e| e.delta).collect();
    assert_eq!(deltas, vec![0, 255, 0, 45]);
}

#[test]
fn range_mode_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.png");
    let output = dir.path().join("out.mid");
    RgbImage::from_pixel(16, 16, Rgb([255, 255, 255])).save(&input).unwrap();

    let raster = load_image(&input).unwrap();
    let song = convert_image(&raster, &Settings::default(), Mode::Range { tracks: 3 }, false).unwrap();
    write_song(&output, &song).unwrap();

    let bytes = std::fs::read(&output).unwrap();
    assert_eq!(&bytes[10..12], &[0, 3]);
    // Tracks start at columns 12, 8, 4: 4, 8 and 12 samples, one run each.
    let lengths: Vec<u8> = song.tracks.iter().map(|t| t.events[1].delta).collect();
    assert_eq!(lengths, vec![4, 8, 12]);
}
