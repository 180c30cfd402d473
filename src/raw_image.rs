use crate::header::{Channels, Colorspace, Header};
use crate::pixel::Pixel;

/// A decoded image: interleaved samples in raster order, `channels` bytes per
/// pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawImage {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: Colorspace,
}

impl RawImage {
    pub(crate) fn from_header(header: &Header, pixels: Vec<u8>) -> Self {
        Self {
            pixels,
            width: header.width,
            height: header.height,
            channels: header.channels,
            colorspace: header.colorspace,
        }
    }

    /// Pixel at column `x`, row `y`. Alpha reads as 255 for RGB images.
    ///
    /// Panics if the coordinates are out of bounds.
    pub fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) out of bounds");
        let channels = self.channels.count();
        let offset = (y as usize * self.width as usize + x as usize) * channels;
        Pixel::from_channels(&self.pixels[offset..offset + channels], channels)
    }

    pub fn pixel_iter(&self) -> impl Iterator<Item = Pixel> + '_ {
        let channels = self.channels.count();
        self.pixels
            .chunks_exact(channels)
            .map(move |chunk| Pixel::from_channels(chunk, channels))
    }
}
