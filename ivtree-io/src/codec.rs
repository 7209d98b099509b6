use std::io::{Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use ivtree_core::Scalar;

/// Fixed little-endian on-disk encoding for a key type.
///
/// Every [`Scalar`] the index supports gets a one-byte tag recorded in the
/// stream header; reading a stream back as the wrong key type fails instead
/// of reinterpreting bytes.
pub trait KeyCodec: Scalar {
    /// Tag distinguishing this key type in the stream header.
    const TAG: u8;

    fn write_key<W: Write>(self, writer: &mut W) -> std::io::Result<()>;

    fn read_key<R: Read>(reader: &mut R) -> std::io::Result<Self>;
}

macro_rules! impl_key_codec {
    ($($t:ty => $tag:expr, $write:ident, $read:ident;)*) => {$(
        impl KeyCodec for $t {
            const TAG: u8 = $tag;

            #[inline]
            fn write_key<W: Write>(self, writer: &mut W) -> std::io::Result<()> {
                writer.$write::<LittleEndian>(self)
            }

            #[inline]
            fn read_key<R: Read>(reader: &mut R) -> std::io::Result<Self> {
                reader.$read::<LittleEndian>()
            }
        }
    )*};
}

impl_key_codec! {
    i16 => 0x01, write_i16, read_i16;
    i32 => 0x02, write_i32, read_i32;
    i64 => 0x03, write_i64, read_i64;
    u32 => 0x04, write_u32, read_u32;
    u64 => 0x05, write_u64, read_u64;
    f32 => 0x06, write_f32, read_f32;
    f64 => 0x07, write_f64, read_f64;
}
