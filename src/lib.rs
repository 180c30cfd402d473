//! Encoder and decoder for the [QOI image format](https://qoiformat.org).
//!
//! Images are raw interleaved samples, 3 (RGB) or 4 (RGBA) bytes per pixel,
//! in raster order. [`encode`] writes a complete stream to any
//! [`std::io::Write`]; [`decode`] and [`decode_into`] read one back from any
//! [`std::io::Read`]. Reads and writes are small and frequent, so streams
//! should be buffered.
//!
//! ```rust
//! use qoif::{decode, encode_to_vec, Channels};
//!
//! // A single opaque black pixel.
//! let bytes = encode_to_vec(&[0, 0, 0], 1, 1, Channels::Rgb).unwrap();
//! assert_eq!(bytes.len(), 23);
//!
//! let image = decode(&mut bytes.as_slice()).unwrap();
//! assert_eq!(image.pixels, vec![0, 0, 0]);
//! ```
//!
//! [`encode_image`] picks the channel count itself, dropping alpha when every
//! pixel is opaque. With the `image` feature it accepts `image` crate buffers
//! directly.

mod cache;
mod decoder;
mod encoder;
mod error;
mod header;
#[cfg(feature = "image")]
mod interop;
mod op;
mod pixel;
mod policy;
mod raw_image;
mod registry;

pub use crate::decoder::{decode, decode_into, DecodeInfo};
pub use crate::encoder::{encode, encode_to_vec};
pub use crate::error::{Error, Result};
pub use crate::header::{
    decode_header, encode_header, Channels, Colorspace, Header, HEADER_LEN, MAGIC, MAX_PIXELS,
};
pub use crate::op::END;
pub use crate::pixel::Pixel;
pub use crate::policy::{encode_image, is_opaque, select_channels, PixelSource};
pub use crate::raw_image::RawImage;
pub use crate::registry::{DecodeFn, Format, FormatRegistry, QOI};
