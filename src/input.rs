use std::path::Path;

use image::{DynamicImage, ImageReader};

use crate::error::AppError;
use crate::model::Raster;

/// Decode an image file and normalise it to an RGB raster.
///
/// Gray input repeats its channel into R, G and B; alpha is dropped.
pub fn load_image(path: &Path) -> Result<Raster, AppError> {
    let io_error = |e: std::io::Error| AppError::Input {
        message: format!("{}: {e}", path.display()),
    };
    let reader = ImageReader::open(path).map_err(io_error)?;
    let decoded = reader.with_guessed_format().map_err(io_error)?.decode()?;
    raster_from_image(decoded)
}

pub fn raster_from_image(image: DynamicImage) -> Result<Raster, AppError> {
    let rgb = image.into_rgb8();
    let (width, height) = rgb.dimensions();
    Raster::rgb(width, height, rgb.into_raw())
}
