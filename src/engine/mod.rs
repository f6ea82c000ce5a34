pub mod builder;
pub mod note_map;
pub mod runs;
pub mod sampler;

pub use builder::{convert_image, Converter, Expressions, FixedRange, Mode, NoteStrategy};
pub use note_map::RangeMap;
