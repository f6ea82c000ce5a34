use crate::error::AppError;

/// Number of 8-bit channels per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    Gray = 1,
    Rgb = 3,
}

impl Channels {
    pub const fn count(self) -> usize {
        self as usize
    }
}

/// One pixel of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pixel {
    Gray(u8),
    Rgb([u8; 3]),
}

impl Pixel {
    /// Luminance with weights 0.30 / 0.59 / 0.11 in 14-bit fixed point.
    pub fn luma(self) -> u8 {
        match self {
            Pixel::Gray(v) => v,
            Pixel::Rgb([r, g, b]) => {
                let y = (4915 * u32::from(r) + 9667 * u32::from(g) + 1802 * u32::from(b) + 8192) >> 14;
                u8::try_from(y).unwrap_or(u8::MAX)
            }
        }
    }

    /// The three channel values an expression reads as `x`, `y`, `z`.
    /// A gray pixel repeats its value in all three.
    pub fn xyz(self) -> (i32, i32, i32) {
        match self {
            Pixel::Gray(v) => (i32::from(v), i32::from(v), i32::from(v)),
            Pixel::Rgb([r, g, b]) => (i32::from(r), i32::from(g), i32::from(b)),
        }
    }
}

/// A decoded image: row-major, tightly packed 8-bit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    channels: Channels,
    data: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Result<Self, AppError> {
        let expected = u64::from(width) * u64::from(height) * channels.count() as u64;
        if data.len() as u64 != expected {
            return Err(AppError::Input {
                message: format!(
                    "{width}x{height} {channels:?} image needs {expected} bytes, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self { width, height, channels, data })
    }

    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AppError> {
        Self::new(width, height, Channels::Rgb, data)
    }

    pub fn gray(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AppError> {
        Self::new(width, height, Channels::Gray, data)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at column `x`, row `y`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let n = self.channels.count();
        let idx = (y as usize * self.width as usize + x as usize) * n;
        match self.channels {
            Channels::Gray => self.data.get(idx).copied().map(Pixel::Gray),
            Channels::Rgb => match self.data.get(idx..idx + n)? {
                &[r, g, b] => Some(Pixel::Rgb([r, g, b])),
                _ => None,
            },
        }
    }
}
