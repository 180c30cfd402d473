use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("The QOI decoder does not support decoding the format with magic bytes {0:?}")]
    InvalidMagicBytes([u8; 4]),

    #[error("Invalid channel count {0}, expected 3 or 4")]
    InvalidChannels(u8),

    #[error("Invalid colorspace {0}, expected 0 (sRGB) or 1 (linear)")]
    InvalidColorspace(u8),

    #[error("The image header is truncated while reading the {field}")]
    TruncatedHeader { field: &'static str },

    /// The stream ended early. `decoded` counts the pixels that were produced
    /// before the data ran out; it equals `expected` when only the end marker
    /// is missing.
    #[error("The stream ended after {decoded} of {expected} pixels")]
    TruncatedStream { decoded: usize, expected: usize },

    #[error("The image end is invalid")]
    InvalidEnd,

    #[error("Destination buffer holds {capacity} bytes but the image needs {required}")]
    BufferTooSmall { required: usize, capacity: usize },

    #[error("Pixel buffer has {got} bytes, expected {expected}")]
    BufferSizeMismatch { expected: usize, got: usize },

    #[error("Invalid image dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Image of {width}x{height} exceeds the pixel limit")]
    TooManyPixels { width: u32, height: u32 },

    #[error("No registered format matches the stream's magic bytes")]
    UnknownFormat,

    #[error("Could not read or write byte")]
    Io(#[from] std::io::Error),
}
