//! Image-to-MIDI conversion.
//!
//! Pixels along a diagonal of the image are turned into numbers (either
//! their luminance or the result of a user expression over their R, G, B
//! channels), quantized to notes through a breakpoint table, collapsed into
//! runs, and written as a multi-track MIDI file.

pub mod dsl;
pub mod engine;
pub mod error;
pub mod files;
pub mod input;
pub mod midi;
pub mod model;
pub mod settings;
