pub mod event;
pub mod raster;
pub mod track;

// Re-export commonly used types at the model level.
pub use event::{Event, DEFAULT_VELOCITY};
pub use raster::{Channels, Pixel, Raster};
pub use track::{Song, TimedEvent, Track};
