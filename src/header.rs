use std::io::{self, Read, Write};

use crate::error::{Error, Result};

pub const MAGIC: [u8; 4] = *b"qoif";
pub const HEADER_LEN: usize = 14;

/// Upper bound (exclusive) on `width * height`, so a header cannot ask for an
/// unbounded allocation.
pub const MAX_PIXELS: u64 = 400_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub const fn count(self) -> usize {
        self as usize
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, Channels::Rgba)
    }
}

impl TryFrom<u8> for Channels {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            3 => Ok(Channels::Rgb),
            4 => Ok(Channels::Rgba),
            other => Err(Error::InvalidChannels(other)),
        }
    }
}

/// Carried through the codec untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Colorspace {
    /// sRGB colour channels with linear alpha.
    #[default]
    Srgb = 0,
    /// All channels linear.
    Linear = 1,
}

impl TryFrom<u8> for Colorspace {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Colorspace::Srgb),
            1 => Ok(Colorspace::Linear),
            other => Err(Error::InvalidColorspace(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub width: u32,
    pub height: u32,
    pub channels: Channels,
    pub colorspace: Colorspace,
}

impl Header {
    /// Builds a header, rejecting empty images and images at or above
    /// [`MAX_PIXELS`].
    pub fn new(
        width: u32,
        height: u32,
        channels: Channels,
        colorspace: Colorspace,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            channels,
            colorspace,
        })
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Size in bytes of the raw pixel buffer this header describes.
    pub fn byte_len(&self) -> usize {
        self.pixel_count() * self.channels.count()
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        bytes[0..4].copy_from_slice(&MAGIC);
        bytes[4..8].copy_from_slice(&self.width.to_be_bytes());
        bytes[8..12].copy_from_slice(&self.height.to_be_bytes());
        bytes[12] = self.channels as u8;
        bytes[13] = self.colorspace as u8;
        bytes
    }
}

impl TryFrom<&[u8; HEADER_LEN]> for Header {
    type Error = Error;

    fn try_from(bytes: &[u8; HEADER_LEN]) -> Result<Self> {
        decode_header(&mut bytes.as_slice())
    }
}

pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<()> {
    let pixels = width as u64 * height as u64;
    if pixels == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    if pixels >= MAX_PIXELS {
        return Err(Error::TooManyPixels { width, height });
    }
    Ok(())
}

fn read_field<R: Read + ?Sized, const N: usize>(
    reader: &mut R,
    field: &'static str,
) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => Error::TruncatedHeader { field },
        _ => Error::Io(err),
    })?;
    Ok(buf)
}

/// Reads and validates the 14 byte header, leaving `reader` positioned at the
/// first chunk.
pub fn decode_header<R: Read + ?Sized>(reader: &mut R) -> Result<Header> {
    let magic: [u8; 4] = read_field(reader, "magic")?;
    if magic != MAGIC {
        return Err(Error::InvalidMagicBytes(magic));
    }
    let width = u32::from_be_bytes(read_field(reader, "width")?);
    let height = u32::from_be_bytes(read_field(reader, "height")?);
    let [channels] = read_field::<_, 1>(reader, "channels")?;
    let channels = Channels::try_from(channels)?;
    let [colorspace] = read_field::<_, 1>(reader, "colorspace")?;
    let colorspace = Colorspace::try_from(colorspace)?;

    Header::new(width, height, channels, colorspace)
}

pub fn encode_header<W: Write + ?Sized>(
    writer: &mut W,
    width: u32,
    height: u32,
    channels: Channels,
    colorspace: Colorspace,
) -> Result<()> {
    let header = Header::new(width, height, channels, colorspace)?;
    writer.write_all(&header.to_bytes())?;
    Ok(())
}
