use std::io::{self, Read, Write};

pub const QOI_OP_INDEX: u8 = 0b00000000;
pub const QOI_OP_DIFF: u8 = 0b01000000;
pub const QOI_OP_LUMA: u8 = 0b10000000;
pub const QOI_OP_RUN: u8 = 0b11000000;
pub const QOI_OP_RGB: u8 = 0b11111110;
pub const QOI_OP_RGBA: u8 = 0b11111111;
pub const QOI_MASK_2: u8 = 0b11000000;

/// Longest run a single chunk can carry. 63 and 64 would collide with the
/// RGB and RGBA tags.
pub const MAX_RUN: u8 = 62;

pub const END: [u8; 8] = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01];

/// One chunk of the stream. Payloads are stored biased, exactly as they
/// appear on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpCode {
    /// Run length minus one.
    Run(u8),
    Index(u8),
    Rgba(u8, u8, u8, u8),
    /// Per channel deltas, each biased by 2.
    Diff(u8, u8, u8),
    /// Green delta biased by 32, then red and blue minus green biased by 8.
    Luma(u8, u8, u8),
    Rgb(u8, u8, u8),
}

impl OpCode {
    /// Reads one chunk. An `UnexpectedEof` error means the stream ended
    /// inside or before the chunk.
    pub fn read<R: Read + ?Sized>(reader: &mut R) -> io::Result<Self> {
        use OpCode::*;

        let mut tag = [0u8; 1];
        reader.read_exact(&mut tag)?;
        let op = match tag[0] {
            QOI_OP_RGB => {
                let mut rgb = [0u8; 3];
                reader.read_exact(&mut rgb)?;
                Rgb(rgb[0], rgb[1], rgb[2])
            }
            QOI_OP_RGBA => {
                let mut rgba = [0u8; 4];
                reader.read_exact(&mut rgba)?;
                Rgba(rgba[0], rgba[1], rgba[2], rgba[3])
            }
            x => match x & QOI_MASK_2 {
                QOI_OP_INDEX => Index(x & 0b00111111),
                QOI_OP_DIFF => Diff(
                    (x & 0b00110000) >> 4,
                    (x & 0b00001100) >> 2,
                    x & 0b00000011,
                ),
                QOI_OP_LUMA => {
                    let mut second = [0u8; 1];
                    reader.read_exact(&mut second)?;
                    Luma(x & 0b00111111, second[0] >> 4, second[0] & 0b00001111)
                }
                // the mask leaves only QOI_OP_RUN
                _ => Run(x & 0b00111111),
            },
        };
        Ok(op)
    }

    /// Packs the chunk into `buf` and returns the number of bytes used.
    pub fn pack(self, buf: &mut [u8; 5]) -> usize {
        use OpCode::*;

        match self {
            Rgba(r, g, b, a) => {
                *buf = [QOI_OP_RGBA, r, g, b, a];
            }
            Rgb(r, g, b) => {
                buf[..4].copy_from_slice(&[QOI_OP_RGB, r, g, b]);
            }
            Run(run) => {
                debug_assert!(run < MAX_RUN);
                buf[0] = QOI_OP_RUN | (run & 0b00111111);
            }
            Index(index) => {
                debug_assert!(index < 64);
                buf[0] = QOI_OP_INDEX | (index & 0b00111111);
            }
            Diff(dr, dg, db) => {
                debug_assert!(dr < 4 && dg < 4 && db < 4);
                buf[0] = QOI_OP_DIFF | (dr << 4) | (dg << 2) | db;
            }
            Luma(dg, dr_dg, db_dg) => {
                debug_assert!(dg < 64 && dr_dg < 16 && db_dg < 16);
                buf[..2].copy_from_slice(&[QOI_OP_LUMA | dg, (dr_dg << 4) | db_dg]);
            }
        }
        self.len()
    }

    pub fn write<W: Write + ?Sized>(self, writer: &mut W) -> io::Result<()> {
        let mut buf = [0u8; 5];
        let len = self.pack(&mut buf);
        writer.write_all(&buf[..len])
    }

    pub fn len(&self) -> usize {
        use OpCode::*;
        match self {
            Rgba(..) => 5,
            Rgb(..) => 4,
            Run(_) | Index(_) | Diff(..) => 1,
            Luma(..) => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(mut bytes: &[u8]) -> Vec<OpCode> {
        let mut ops = vec![];
        while !bytes.is_empty() {
            ops.push(OpCode::read(&mut bytes).unwrap());
        }
        ops
    }

    #[test]
    fn test_tag_dispatch() {
        let bytes = [
            0xfe, 1, 2, 3, // rgb
            0xff, 1, 2, 3, 4, // rgba
            0x09, // index 9
            0b01_11_00_11, // diff
            0b10_111110, 0b1010_0101, // luma
            0xc0, // run 1
            0xfd, // run 62
        ];
        assert_eq!(
            read_all(&bytes),
            vec![
                OpCode::Rgb(1, 2, 3),
                OpCode::Rgba(1, 2, 3, 4),
                OpCode::Index(9),
                OpCode::Diff(3, 0, 3),
                OpCode::Luma(62, 10, 5),
                OpCode::Run(0),
                OpCode::Run(61),
            ]
        );
    }

    #[test]
    fn test_pack() {
        let mut buf = [0u8; 5];
        assert_eq!(OpCode::Run(61).pack(&mut buf), 1);
        assert_eq!(buf[0], 0xfd);
        assert_eq!(OpCode::Luma(62, 10, 5).pack(&mut buf), 2);
        assert_eq!(&buf[..2], &[0b10_111110, 0b1010_0101]);
        assert_eq!(OpCode::Diff(3, 0, 3).pack(&mut buf), 1);
        assert_eq!(buf[0], 0b01_11_00_11);
        assert_eq!(OpCode::Rgb(7, 8, 9).pack(&mut buf), 4);
        assert_eq!(&buf[..4], &[0xfe, 7, 8, 9]);
    }

    #[test]
    fn test_truncated_payload() {
        let cases: [&[u8]; 4] = [&[0xfe, 1, 2], &[0xff, 1, 2, 3], &[0x80], &[]];
        for mut bytes in cases {
            let err = OpCode::read(&mut bytes).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        }
    }
}
