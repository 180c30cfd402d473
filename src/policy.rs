//! Choosing between 3 and 4 channel output.
//!
//! An image is written without alpha when every pixel is fully opaque. A
//! source that already knows this can say so through
//! [`PixelSource::is_known_opaque`]; otherwise the pixels are scanned.

use std::io::Write;

use log::debug;

use crate::encoder::encode;
use crate::error::Result;
use crate::header::{check_dimensions, Channels};
use crate::pixel::Pixel;
use crate::raw_image::RawImage;

/// Random access to the pixels of an image in some foreign representation.
pub trait PixelSource {
    /// `(width, height)` in pixels.
    fn dimensions(&self) -> (u32, u32);

    fn pixel_at(&self, x: u32, y: u32) -> Pixel;

    /// `Some(true)` when the source is known to hold only opaque pixels,
    /// `Some(false)` when it is known not to, `None` when it cannot tell
    /// without looking.
    fn is_known_opaque(&self) -> Option<bool> {
        None
    }
}

/// Whether every pixel of `source` has alpha 255.
pub fn is_opaque<S: PixelSource + ?Sized>(source: &S) -> bool {
    if let Some(opaque) = source.is_known_opaque() {
        return opaque;
    }
    let (width, height) = source.dimensions();
    (0..height).all(|y| (0..width).all(|x| source.pixel_at(x, y).a() == 255))
}

pub fn select_channels<S: PixelSource + ?Sized>(source: &S) -> Channels {
    if is_opaque(source) {
        Channels::Rgb
    } else {
        Channels::Rgba
    }
}

/// Encodes `source`, dropping alpha when the image is opaque. Returns the
/// channel count that was written.
pub fn encode_image<W, S>(writer: &mut W, source: &S) -> Result<Channels>
where
    W: Write + ?Sized,
    S: PixelSource + ?Sized,
{
    let (width, height) = source.dimensions();
    check_dimensions(width, height)?;
    let channels = select_channels(source);
    debug!("{width}x{height} source selected {} channels", channels.count());

    let count = channels.count();
    let mut pixels = Vec::with_capacity(width as usize * height as usize * count);
    for y in 0..height {
        for x in 0..width {
            pixels.extend_from_slice(&source.pixel_at(x, y).0[..count]);
        }
    }
    encode(writer, &pixels, width, height, channels)?;
    Ok(channels)
}

impl PixelSource for RawImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        RawImage::pixel_at(self, x, y)
    }

    fn is_known_opaque(&self) -> Option<bool> {
        match self.channels {
            Channels::Rgb => Some(true),
            Channels::Rgba => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::decoder::decode;
    use crate::header::Colorspace;

    /// Source that records how many pixels were inspected.
    struct Counting {
        pixels: Vec<Pixel>,
        width: u32,
        known: Option<bool>,
        reads: Cell<usize>,
    }

    impl Counting {
        fn new(pixels: Vec<Pixel>, width: u32, known: Option<bool>) -> Self {
            Self {
                pixels,
                width,
                known,
                reads: Cell::new(0),
            }
        }
    }

    impl PixelSource for Counting {
        fn dimensions(&self) -> (u32, u32) {
            (self.width, self.pixels.len() as u32 / self.width)
        }

        fn pixel_at(&self, x: u32, y: u32) -> Pixel {
            self.reads.set(self.reads.get() + 1);
            self.pixels[(y * self.width + x) as usize]
        }

        fn is_known_opaque(&self) -> Option<bool> {
            self.known
        }
    }

    #[test]
    fn test_scan_finds_translucent_pixel() {
        let mut pixels = vec![Pixel::new(1, 2, 3, 255); 16];
        pixels[5] = Pixel::new(1, 2, 3, 254);
        let source = Counting::new(pixels, 4, None);
        assert_eq!(select_channels(&source), Channels::Rgba);
        // stops at the first translucent pixel
        assert_eq!(source.reads.get(), 6);
    }

    #[test]
    fn test_scan_opaque() {
        let source = Counting::new(vec![Pixel::new(1, 2, 3, 255); 16], 4, None);
        assert_eq!(select_channels(&source), Channels::Rgb);
        assert_eq!(source.reads.get(), 16);
    }

    #[test]
    fn test_capability_is_trusted() {
        let source = Counting::new(vec![Pixel::new(1, 2, 3, 255); 16], 4, Some(false));
        assert_eq!(select_channels(&source), Channels::Rgba);
        assert_eq!(source.reads.get(), 0);
    }

    #[test]
    fn test_opaque_image_drops_alpha() {
        let pixels: Vec<Pixel> = (0..12u8).map(|i| Pixel::new(i, i * 2, i * 3, 255)).collect();
        let source = Counting::new(pixels.clone(), 3, None);

        let mut bytes: Vec<u8> = vec![];
        assert_eq!(encode_image(&mut bytes, &source).unwrap(), Channels::Rgb);
        assert_eq!(bytes[12], 3);

        let image = decode(&mut bytes.as_slice()).unwrap();
        assert_eq!(image.channels, Channels::Rgb);
        assert_eq!(image.pixels.len(), 12 * 3);
        assert_eq!(image.pixel_iter().collect::<Vec<_>>(), pixels);
    }

    #[test]
    fn test_translucent_image_keeps_alpha() {
        let image = RawImage {
            pixels: vec![9, 9, 9, 255, 9, 9, 9, 128],
            width: 2,
            height: 1,
            channels: Channels::Rgba,
            colorspace: Colorspace::Srgb,
        };
        let mut bytes: Vec<u8> = vec![];
        assert_eq!(encode_image(&mut bytes, &image).unwrap(), Channels::Rgba);
        assert_eq!(decode(&mut bytes.as_slice()).unwrap(), image);
    }

    #[test]
    fn test_empty_source_is_rejected() {
        let source = Counting::new(vec![], 1, None);
        assert!(encode_image(&mut Vec::<u8>::new(), &source).is_err());
    }
}
