use crate::dsl::bytecode::Bytecode;
use crate::dsl::error::ExecError;
use crate::dsl::vm::Vm;
use crate::error::AppError;
use crate::model::{Raster, Song, Track};
use crate::settings::Settings;

use super::note_map::RangeMap;
use super::runs::{append_runs, coalesce, MAX_DELTA};
use super::sampler::{sample_diagonal, sample_gray_diagonal};

/// A way of turning an image into one quantized note per sampled position,
/// once per track.
pub trait NoteStrategy {
    /// How many tracks this strategy produces.
    fn track_count(&self) -> usize;

    /// The quantized note stream for track `track` (0-based, in output order).
    fn notes(
        &mut self,
        image: &Raster,
        track: usize,
        note_map: &RangeMap<i32, u8>,
    ) -> Result<Vec<u8>, ExecError>;
}

/// Fixed-range mode: each track reads the luminance diagonal from row 0,
/// starting `spacing` columns further right than the track after it. With
/// `n` tracks the starting columns are `n*spacing, (n-1)*spacing, …, spacing`.
#[derive(Debug, Clone, Copy)]
pub struct FixedRange {
    pub tracks: u32,
    pub spacing: u32,
}

impl FixedRange {
    pub fn start_column(&self, track: usize) -> u32 {
        let from_end = self.tracks.saturating_sub(u32::try_from(track).unwrap_or(u32::MAX));
        from_end.saturating_mul(self.spacing)
    }
}

impl NoteStrategy for FixedRange {
    fn track_count(&self) -> usize {
        self.tracks as usize
    }

    fn notes(
        &mut self,
        image: &Raster,
        track: usize,
        note_map: &RangeMap<i32, u8>,
    ) -> Result<Vec<u8>, ExecError> {
        let x0 = self.start_column(track);
        Ok(sample_gray_diagonal(image, x0, 0)
            .map(|luma| note_map.get(&i32::from(luma)))
            .collect())
    }
}

/// Expression mode: one track per compiled expression, each evaluated on the
/// RGB diagonal from the origin with `x, y, z = r, g, b`.
#[derive(Debug)]
pub struct Expressions {
    code: Vec<Bytecode>,
    vm: Vm,
}

impl Expressions {
    pub fn new(code: Vec<Bytecode>) -> Self {
        Self { code, vm: Vm::new() }
    }
}

impl NoteStrategy for Expressions {
    fn track_count(&self) -> usize {
        self.code.len()
    }

    fn notes(
        &mut self,
        image: &Raster,
        track: usize,
        note_map: &RangeMap<i32, u8>,
    ) -> Result<Vec<u8>, ExecError> {
        let Some(code) = self.code.get(track) else {
            return Ok(Vec::new());
        };
        let vm = &mut self.vm;
        sample_diagonal(image, 0, 0)
            .map(|pixel| {
                let (x, y, z) = pixel.xyz();
                vm.execute(code, x, y, z).map(|v| note_map.get(&v))
            })
            .collect()
    }
}

/// Drives a strategy over an image and builds the song.
#[derive(Debug, Clone)]
pub struct Converter {
    note_map: RangeMap<i32, u8>,
    velocity: u8,
    verbose: bool,
}

impl Converter {
    pub fn new(note_map: RangeMap<i32, u8>, velocity: u8) -> Self {
        Self { note_map, velocity, verbose: false }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        settings.validate()?;
        Ok(Self::new(settings.note_map()?, settings.velocity))
    }

    /// Log one line per finished track to stderr.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Run every track of `strategy` over `image`. The first evaluation fault
    /// aborts the whole conversion.
    pub fn convert(&self, image: &Raster, strategy: &mut dyn NoteStrategy) -> Result<Song, AppError> {
        let mut song = Song::new();
        for index in 0..strategy.track_count() {
            let notes = strategy
                .notes(image, index, &self.note_map)
                .map_err(|source| AppError::Execution { track: index, source })?;
            let runs = coalesce(notes);

            let mut track = Track::new();
            let split = append_runs(&mut track, &runs, self.velocity);
            if self.verbose {
                eprintln!(
                    "[pixmidi] Track {index}: {} runs, {} events",
                    runs.len(),
                    track.len()
                );
                if split > 0 {
                    eprintln!(
                        "[pixmidi] Track {index}: {split} runs longer than {MAX_DELTA} samples were split"
                    );
                }
            }
            song.push_track(track);
        }
        Ok(song)
    }
}

/// Which strategy a conversion uses.
#[derive(Debug, Clone)]
pub enum Mode {
    /// Fixed-range mode with this many tracks.
    Range { tracks: u32 },
    /// Expression mode, one track per compiled expression.
    Expressions(Vec<Bytecode>),
}

/// Convert `image` with the given settings and mode.
pub fn convert_image(image: &Raster, settings: &Settings, mode: Mode, verbose: bool) -> Result<Song, AppError> {
    let converter = Converter::from_settings(settings)?.verbose(verbose);
    match mode {
        Mode::Range { tracks } => converter.convert(
            image,
            &mut FixedRange { tracks, spacing: settings.track_spacing },
        ),
        Mode::Expressions(code) => converter.convert(image, &mut Expressions::new(code)),
    }
}
