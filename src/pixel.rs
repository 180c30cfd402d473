/// One RGBA sample, 8 bits per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pixel(pub [u8; 4]);

impl Pixel {
    /// The implicit pixel that precedes the first one in every stream.
    pub const START: Pixel = Pixel([0, 0, 0, 255]);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Pixel {
        Pixel([r, g, b, a])
    }

    pub const fn r(&self) -> u8 {
        self.0[0]
    }

    pub const fn g(&self) -> u8 {
        self.0[1]
    }

    pub const fn b(&self) -> u8 {
        self.0[2]
    }

    pub const fn a(&self) -> u8 {
        self.0[3]
    }

    /// Builds a pixel from the first `channels` bytes of `bytes`. With three
    /// channels alpha is taken to be opaque.
    pub(crate) fn from_channels(bytes: &[u8], channels: usize) -> Pixel {
        let a = if channels == 4 { bytes[3] } else { 255 };
        Pixel([bytes[0], bytes[1], bytes[2], a])
    }

    /// Slot of this pixel in the 64 entry history cache.
    pub fn hash(&self) -> usize {
        let sum = (self.r() as u16) * 3
            + (self.g() as u16) * 5
            + (self.b() as u16) * 7
            + (self.a() as u16) * 11;
        (sum % 64) as usize
    }
}

impl From<[u8; 4]> for Pixel {
    fn from(rgba: [u8; 4]) -> Self {
        Pixel(rgba)
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Pixel([r, g, b, 255])
    }
}
