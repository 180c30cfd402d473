use std::io::{self, Read};

use log::debug;

use crate::cache::PixelCache;
use crate::error::{Error, Result};
use crate::header::{decode_header, Colorspace, Header};
use crate::op::{OpCode, END};
use crate::pixel::Pixel;
use crate::raw_image::RawImage;

/// Summary returned by [`decode_into`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeInfo {
    /// Length of the prefix of the destination holding the image.
    pub bytes_written: usize,
    pub width: u32,
    pub height: u32,
    pub has_alpha: bool,
    pub colorspace: Colorspace,
}

/// Chunk state machine. Lives for exactly one image.
struct Decoder {
    previous_pixel: Pixel,
    cache: PixelCache,
    run: u8,
}

impl Decoder {
    fn new() -> Self {
        Self {
            previous_pixel: Pixel::START,
            cache: PixelCache::new(),
            run: 0,
        }
    }

    fn next_pixel<R: Read + ?Sized>(&mut self, reader: &mut R) -> io::Result<Pixel> {
        if self.run > 0 {
            self.run -= 1;
        } else {
            use OpCode::*;
            let previous = self.previous_pixel;
            self.previous_pixel = match OpCode::read(reader)? {
                Rgba(r, g, b, a) => Pixel::new(r, g, b, a),
                Rgb(r, g, b) => Pixel::new(r, g, b, previous.a()),
                Index(index) => self.cache.get(index as usize),
                Diff(dr, dg, db) => self.diff(dr, dg, db),
                Luma(dg, dr_dg, db_dg) => self.luma(dg, dr_dg, db_dg),
                Run(run) => {
                    self.run = run;
                    previous
                }
            };
        }
        // Run iterations rewrite the slot too; existing streams rely on it.
        self.cache.insert(self.previous_pixel);
        Ok(self.previous_pixel)
    }

    fn diff(&self, dr: u8, dg: u8, db: u8) -> Pixel {
        // The encoder stores unsigned values only, so remove the bias of 2
        Pixel::new(
            self.previous_pixel.r().wrapping_add(dr).wrapping_sub(2),
            self.previous_pixel.g().wrapping_add(dg).wrapping_sub(2),
            self.previous_pixel.b().wrapping_add(db).wrapping_sub(2),
            self.previous_pixel.a(),
        )
    }

    fn luma(&self, dg: u8, dr_dg: u8, db_dg: u8) -> Pixel {
        let g = self.previous_pixel.g().wrapping_add(dg).wrapping_sub(32);
        Pixel::new(
            self.previous_pixel
                .r()
                .wrapping_add(dr_dg)
                .wrapping_add(dg)
                .wrapping_sub(8 + 32),
            g,
            self.previous_pixel
                .b()
                .wrapping_add(db_dg)
                .wrapping_add(dg)
                .wrapping_sub(8 + 32),
            self.previous_pixel.a(),
        )
    }

    /// Fills `out`, which must be exactly `pixel_count * channels` long, then
    /// checks the end marker.
    fn decode_pixels<R: Read + ?Sized>(
        &mut self,
        reader: &mut R,
        out: &mut [u8],
        channels: usize,
    ) -> Result<()> {
        let expected = out.len() / channels;
        for (decoded, chunk) in out.chunks_exact_mut(channels).enumerate() {
            let pixel = self
                .next_pixel(reader)
                .map_err(|err| stream_error(err, decoded, expected))?;
            chunk.copy_from_slice(&pixel.0[..channels]);
        }

        let mut end = [0u8; END.len()];
        reader
            .read_exact(&mut end)
            .map_err(|err| stream_error(err, expected, expected))?;
        if end != END {
            return Err(Error::InvalidEnd);
        }
        Ok(())
    }
}

fn stream_error(err: io::Error, decoded: usize, expected: usize) -> Error {
    match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedStream { decoded, expected },
        _ => Error::Io(err),
    }
}

/// Decodes a complete stream into a freshly allocated buffer.
///
/// On failure the pixels decoded so far are dropped; use [`decode_into`] to
/// keep them.
pub fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<RawImage> {
    let header = decode_header(reader)?;
    debug!(
        "decoding {}x{} image with {} channels",
        header.width,
        header.height,
        header.channels.count()
    );

    let mut pixels = vec![0u8; header.byte_len()];
    Decoder::new().decode_pixels(reader, &mut pixels, header.channels.count())?;
    Ok(RawImage::from_header(&header, pixels))
}

/// Decodes into the front of `dest`, so one buffer can be reused across many
/// images. Bytes past the image are left untouched.
///
/// Fails with [`Error::BufferTooSmall`] before reading any chunk if `dest`
/// cannot hold the image. On any later error the bytes already written stay
/// in `dest`.
pub fn decode_into<R: Read + ?Sized>(reader: &mut R, dest: &mut [u8]) -> Result<DecodeInfo> {
    let header = decode_header(reader)?;
    let required = header.byte_len();
    if dest.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            capacity: dest.len(),
        });
    }
    debug!(
        "decoding {}x{} image into a {} byte buffer",
        header.width,
        header.height,
        dest.len()
    );

    Decoder::new().decode_pixels(reader, &mut dest[..required], header.channels.count())?;
    Ok(info(&header))
}

fn info(header: &Header) -> DecodeInfo {
    DecodeInfo {
        bytes_written: header.byte_len(),
        width: header.width,
        height: header.height,
        has_alpha: header.channels.has_alpha(),
        colorspace: header.colorspace,
    }
}
