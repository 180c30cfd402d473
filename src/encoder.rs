use std::io::{self, Write};

use log::{debug, trace};

use crate::cache::PixelCache;
use crate::error::{Error, Result};
use crate::header::{check_dimensions, encode_header, Channels, Colorspace, HEADER_LEN};
use crate::op::{OpCode, END, MAX_RUN};
use crate::pixel::Pixel;

/// Greedy chunk selection. Lives for exactly one image.
struct Encoder {
    cache: PixelCache,
    previous_pixel: Pixel,
    run_length: u8,
}

impl Encoder {
    fn new() -> Self {
        Self {
            cache: PixelCache::new(),
            previous_pixel: Pixel::START,
            run_length: 0,
        }
    }

    fn encode_pixels<W: Write + ?Sized>(
        &mut self,
        writer: &mut W,
        pixels: &[u8],
        channels: usize,
    ) -> io::Result<()> {
        let pixel_count = pixels.len() / channels;
        for (position, chunk) in pixels.chunks_exact(channels).enumerate() {
            let pixel = Pixel::from_channels(chunk, channels);
            self.push(writer, pixel, position + 1 == pixel_count)?;
        }
        writer.write_all(&END)
    }

    fn push<W: Write + ?Sized>(
        &mut self,
        writer: &mut W,
        pixel: Pixel,
        is_last: bool,
    ) -> io::Result<()> {
        if pixel == self.previous_pixel {
            self.run_length += 1;
            if self.run_length == MAX_RUN || is_last {
                self.flush_run(writer)?;
            }
            return Ok(());
        }
        self.flush_run(writer)?;

        let op = self
            .index(pixel)
            .or_else(|| self.rgba(pixel))
            .or_else(|| self.diff(pixel))
            .or_else(|| self.luma(pixel))
            .unwrap_or_else(|| self.rgb(pixel));
        op.write(writer)?;

        self.previous_pixel = pixel;
        Ok(())
    }

    fn flush_run<W: Write + ?Sized>(&mut self, writer: &mut W) -> io::Result<()> {
        // The run opcode has a bias of -1
        if self.run_length > 0 {
            OpCode::Run(self.run_length - 1).write(writer)?;
            self.run_length = 0;
        }
        Ok(())
    }

    /// Index chunk on a cache hit. On a miss the pixel takes over the slot.
    fn index(&mut self, pixel: Pixel) -> Option<OpCode> {
        self.cache
            .find_or_insert(pixel)
            .map(|index| OpCode::Index(index as u8))
    }

    fn rgba(&self, pixel: Pixel) -> Option<OpCode> {
        (self.previous_pixel.a() != pixel.a())
            .then(|| OpCode::Rgba(pixel.r(), pixel.g(), pixel.b(), pixel.a()))
    }

    fn diff(&self, pixel: Pixel) -> Option<OpCode> {
        let dr = pixel
            .r()
            .wrapping_sub(self.previous_pixel.r())
            .wrapping_add(2);
        let dg = pixel
            .g()
            .wrapping_sub(self.previous_pixel.g())
            .wrapping_add(2);
        let db = pixel
            .b()
            .wrapping_sub(self.previous_pixel.b())
            .wrapping_add(2);
        (dr < 4 && dg < 4 && db < 4).then_some(OpCode::Diff(dr, dg, db))
    }

    fn luma(&self, pixel: Pixel) -> Option<OpCode> {
        let dg = pixel
            .g()
            .wrapping_sub(self.previous_pixel.g())
            .wrapping_add(32);
        let dr_dg = pixel
            .r()
            .wrapping_sub(self.previous_pixel.r())
            .wrapping_sub(dg)
            .wrapping_add(8 + 32);
        let db_dg = pixel
            .b()
            .wrapping_sub(self.previous_pixel.b())
            .wrapping_sub(dg)
            .wrapping_add(8 + 32);
        (dg < 64 && dr_dg < 16 && db_dg < 16).then_some(OpCode::Luma(dg, dr_dg, db_dg))
    }

    fn rgb(&self, pixel: Pixel) -> OpCode {
        OpCode::Rgb(pixel.r(), pixel.g(), pixel.b())
    }
}

fn check_buffer(pixels: &[u8], width: u32, height: u32, channels: Channels) -> Result<()> {
    check_dimensions(width, height)?;
    let expected = width as usize * height as usize * channels.count();
    if pixels.len() != expected {
        return Err(Error::BufferSizeMismatch {
            expected,
            got: pixels.len(),
        });
    }
    Ok(())
}

/// Encodes `pixels`, interleaved with `channels` bytes per pixel, as a
/// complete stream: header, chunks, end marker.
///
/// Chunks are written one at a time, so an unbuffered `writer` should be
/// wrapped in a [`std::io::BufWriter`].
pub fn encode<W: Write + ?Sized>(
    writer: &mut W,
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: Channels,
) -> Result<()> {
    check_buffer(pixels, width, height, channels)?;
    debug!(
        "encoding {}x{} image with {} channels",
        width,
        height,
        channels.count()
    );

    encode_header(writer, width, height, channels, Colorspace::Srgb)?;
    Encoder::new().encode_pixels(writer, pixels, channels.count())?;
    Ok(())
}

/// Like [`encode`], collecting the stream in memory.
pub fn encode_to_vec(
    pixels: &[u8],
    width: u32,
    height: u32,
    channels: Channels,
) -> Result<Vec<u8>> {
    check_buffer(pixels, width, height, channels)?;
    // worst case: one literal chunk per pixel
    let pixel_count = width as usize * height as usize;
    let mut out =
        Vec::with_capacity(HEADER_LEN + pixel_count * (channels.count() + 1) + END.len());
    encode(&mut out, pixels, width, height, channels)?;
    trace!("encoded {} pixel bytes into {} bytes", pixels.len(), out.len());
    Ok(out)
}
