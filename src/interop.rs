//! Bridges to the `image` crate.

use image::{DynamicImage, GenericImageView, ImageBuffer, RgbImage, RgbaImage};

use crate::error::{Error, Result};
use crate::header::Channels;
use crate::pixel::Pixel;
use crate::policy::PixelSource;
use crate::raw_image::RawImage;

impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        Pixel(self.get_pixel(x, y).0)
    }
}

impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        ImageBuffer::dimensions(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        Pixel::from(self.get_pixel(x, y).0)
    }

    fn is_known_opaque(&self) -> Option<bool> {
        Some(true)
    }
}

impl PixelSource for DynamicImage {
    fn dimensions(&self) -> (u32, u32) {
        GenericImageView::dimensions(self)
    }

    fn pixel_at(&self, x: u32, y: u32) -> Pixel {
        Pixel(self.get_pixel(x, y).0)
    }

    /// Images without an alpha channel are opaque; the rest are scanned.
    fn is_known_opaque(&self) -> Option<bool> {
        (!self.color().has_alpha()).then_some(true)
    }
}

impl RawImage {
    /// Moves the samples into an `image` buffer of the matching colour type.
    pub fn into_dynamic_image(self) -> Result<DynamicImage> {
        let expected = self.width as usize * self.height as usize * self.channels.count();
        let got = self.pixels.len();
        let image = match self.channels {
            Channels::Rgb => ImageBuffer::from_raw(self.width, self.height, self.pixels)
                .map(DynamicImage::ImageRgb8),
            Channels::Rgba => ImageBuffer::from_raw(self.width, self.height, self.pixels)
                .map(DynamicImage::ImageRgba8),
        };
        image.ok_or(Error::BufferSizeMismatch { expected, got })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageOutputFormat, Rgba};

    use super::*;
    use crate::decoder::decode;
    use crate::policy::{encode_image, select_channels};

    fn gradient(alpha: impl Fn(u32, u32) -> u8) -> RgbaImage {
        RgbaImage::from_fn(37, 21, |x, y| {
            Rgba([(x * 7) as u8, (y * 11) as u8, ((x + y) * 3) as u8, alpha(x, y)])
        })
    }

    #[test]
    fn test_rgb_image_is_known_opaque() {
        let image = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        assert_eq!(image.is_known_opaque(), Some(true));
        assert_eq!(select_channels(&image), Channels::Rgb);
    }

    #[test]
    fn test_rgba_image_is_scanned() {
        let opaque = DynamicImage::ImageRgba8(gradient(|_, _| 255));
        assert_eq!(opaque.is_known_opaque(), None);
        assert_eq!(select_channels(&opaque), Channels::Rgb);

        let translucent = gradient(|x, y| if x == 36 && y == 20 { 0 } else { 255 });
        assert_eq!(select_channels(&translucent), Channels::Rgba);
    }

    #[test]
    fn test_png_round_trip() {
        let source = DynamicImage::ImageRgba8(gradient(|x, _| (x * 5) as u8));
        let mut png = Cursor::new(Vec::<u8>::new());
        source.write_to(&mut png, ImageOutputFormat::Png).unwrap();
        let png_image = image::load_from_memory(png.get_ref()).unwrap();

        let mut qoi: Vec<u8> = vec![];
        assert_eq!(encode_image(&mut qoi, &png_image).unwrap(), Channels::Rgba);
        let decoded = decode(&mut qoi.as_slice())
            .unwrap()
            .into_dynamic_image()
            .unwrap();
        assert_eq!(decoded.to_rgba8(), png_image.to_rgba8());
    }

    #[test]
    fn test_into_dynamic_image() {
        let raw = RawImage {
            pixels: vec![1, 2, 3, 4, 5, 6],
            width: 2,
            height: 1,
            channels: Channels::Rgb,
            colorspace: Default::default(),
        };
        let image = raw.into_dynamic_image().unwrap();
        assert_eq!(image.get_pixel(1, 0), Rgba([4, 5, 6, 255]));

        let short = RawImage {
            pixels: vec![1, 2, 3],
            width: 2,
            height: 1,
            channels: Channels::Rgb,
            colorspace: Default::default(),
        };
        assert!(matches!(
            short.into_dynamic_image(),
            Err(Error::BufferSizeMismatch {
                expected: 6,
                got: 3
            })
        ));
    }
}
