use crate::model::{Pixel, Raster};

/// Walk from `(x0, y0)` along `(x0 + i, y0 + i)` until either coordinate
/// leaves the image. Each call starts a fresh traversal.
pub fn sample_diagonal(image: &Raster, x0: u32, y0: u32) -> Diagonal<'_> {
    Diagonal { image, x: x0, y: y0 }
}

/// Like `sample_diagonal`, but every pixel is reduced to its luminance.
pub fn sample_gray_diagonal(image: &Raster, x0: u32, y0: u32) -> impl Iterator<Item = u8> + '_ {
    sample_diagonal(image, x0, y0).map(Pixel::luma)
}

/// Number of pixels a diagonal starting at `(x0, y0)` visits.
pub fn diagonal_len(image: &Raster, x0: u32, y0: u32) -> usize {
    let w = image.width().saturating_sub(x0);
    let h = image.height().saturating_sub(y0);
    w.min(h) as usize
}

/// Iterator over the pixels of one diagonal.
#[derive(Debug, Clone)]
pub struct Diagonal<'a> {
    image: &'a Raster,
    x: u32,
    y: u32,
}

impl Iterator for Diagonal<'_> {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        let pixel = self.image.pixel(self.x, self.y)?;
        self.x += 1;
        self.y += 1;
        Some(pixel)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = diagonal_len(self.image, self.x, self.y);
        (n, Some(n))
    }
}

impl ExactSizeIterator for Diagonal<'_> {}
