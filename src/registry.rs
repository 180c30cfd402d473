//! Picking a decoder by the magic bytes at the start of a stream.
//!
//! A [`FormatRegistry`] is built once, usually with
//! [`FormatRegistry::with_defaults`], and handed to whatever needs to open
//! images of unknown type.

use std::fmt;
use std::io::{self, Read};

use log::debug;

use crate::decoder::decode;
use crate::error::{Error, Result};
use crate::header::MAGIC;
use crate::raw_image::RawImage;

pub type DecodeFn = fn(&mut dyn Read) -> Result<RawImage>;

#[derive(Clone, Copy)]
pub struct Format {
    pub name: &'static str,
    pub magic: &'static [u8],
    pub decode: DecodeFn,
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("name", &self.name)
            .field("magic", &self.magic)
            .finish_non_exhaustive()
    }
}

fn decode_qoi(reader: &mut dyn Read) -> Result<RawImage> {
    decode(reader)
}

pub const QOI: Format = Format {
    name: "qoi",
    magic: &MAGIC,
    decode: decode_qoi,
};

#[derive(Clone, Debug, Default)]
pub struct FormatRegistry {
    formats: Vec<Format>,
}

impl FormatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that knows the QOI format.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(QOI);
        registry
    }

    /// Formats registered first win when magic prefixes overlap.
    pub fn register(&mut self, format: Format) {
        self.formats.push(format);
    }

    pub fn formats(&self) -> &[Format] {
        &self.formats
    }

    /// The first format whose magic is a prefix of `head`.
    pub fn sniff(&self, head: &[u8]) -> Option<&Format> {
        self.formats
            .iter()
            .find(|format| head.starts_with(format.magic))
    }

    /// Reads just enough of `reader` to identify its format, then decodes the
    /// whole stream with it.
    pub fn decode<R: Read>(&self, mut reader: R) -> Result<(&Format, RawImage)> {
        let longest = self
            .formats
            .iter()
            .map(|format| format.magic.len())
            .max()
            .unwrap_or(0);

        let mut head = Vec::with_capacity(longest);
        reader
            .by_ref()
            .take(longest as u64)
            .read_to_end(&mut head)?;
        let format = self.sniff(&head).ok_or(Error::UnknownFormat)?;
        debug!("detected {} stream", format.name);

        let mut stream = io::Cursor::new(head).chain(reader);
        let image = (format.decode)(&mut stream)?;
        Ok((format, image))
    }
}
