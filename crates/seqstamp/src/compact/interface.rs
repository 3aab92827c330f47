use std::io::{self, Read, Write};

use super::{MAX_VARINT_LEN, VarInt, encode_varint_to_buf};
use crate::{Error, Result};

/// Extension trait that writes compact integers to any [`Write`] sink.
///
/// # Example
///
/// ```
/// use seqstamp::CompactWriteExt;
///
/// let mut out = Vec::new();
/// out.write_non_negative(300_i32).unwrap();
/// out.write_small(-1_i32).unwrap();
/// assert_eq!(out, [0xAC, 0x02, 0x00]);
/// ```
pub trait CompactWriteExt: Write {
    /// Writes `value` as a base-128 varint.
    ///
    /// Negative values are not rejected; they encode from their
    /// two's-complement bits and take [`VarInt::MAX_ENCODED_LEN`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails.
    fn write_non_negative<T: VarInt>(&mut self, value: T) -> Result<()> {
        let mut buf = [0; MAX_VARINT_LEN];
        let len = encode_varint_to_buf(value, &mut buf);
        self.write_all(&buf[..len])?;
        Ok(())
    }

    /// Writes `value` offset by the default minimum of `-1`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails.
    fn write_small<T: VarInt>(&mut self, value: T) -> Result<()> {
        self.write_small_with(value, T::DEFAULT_MIN_NEGATIVE)
    }

    /// Writes `value - min_negative` as a varint, so a range starting at
    /// `min_negative` costs the same as one starting at zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the sink fails.
    fn write_small_with<T: VarInt>(&mut self, value: T, min_negative: T) -> Result<()> {
        self.write_non_negative(value.wrapping_sub(min_negative))
    }
}

impl<W: Write + ?Sized> CompactWriteExt for W {}

/// Extension trait that reads compact integers from any [`Read`] source.
pub trait CompactReadExt: Read {
    /// Reads a base-128 varint written by
    /// [`CompactWriteExt::write_non_negative`].
    ///
    /// # Errors
    ///
    /// - [`Error::Truncated`] if the stream ends before a byte without the
    ///   continuation bit.
    /// - [`Error::VarintOverflow`] if the encoding carries more bits than `T`.
    /// - [`Error::Io`] for any other read failure.
    fn read_non_negative<T: VarInt>(&mut self) -> Result<T> {
        let mut acc = 0_u64;
        for index in 0..T::MAX_ENCODED_LEN {
            let byte = read_byte(self)?;
            let shift = 7 * index as u32;
            let payload = u64::from(byte & 0x7F);

            if index == T::MAX_ENCODED_LEN - 1 {
                // The last permitted byte may only carry the bits left over.
                let remaining = T::BITS - shift;
                if byte & 0x80 != 0 || payload >> remaining != 0 {
                    return Err(Error::VarintOverflow);
                }
            }

            acc |= payload << shift;
            if byte & 0x80 == 0 {
                return Ok(T::from_bits(acc));
            }
        }
        Err(Error::VarintOverflow)
    }

    /// Reads a value written by [`CompactWriteExt::write_small`].
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_non_negative`].
    fn read_small<T: VarInt>(&mut self) -> Result<T> {
        self.read_small_with(T::DEFAULT_MIN_NEGATIVE)
    }

    /// Reads a value written by [`CompactWriteExt::write_small_with`] using
    /// the same `min_negative`.
    ///
    /// # Errors
    ///
    /// Same as [`Self::read_non_negative`].
    fn read_small_with<T: VarInt>(&mut self, min_negative: T) -> Result<T> {
        let raw: T = self.read_non_negative()?;
        Ok(raw.wrapping_add(min_negative))
    }
}

impl<R: Read + ?Sized> CompactReadExt for R {}

fn read_byte<R: Read + ?Sized>(reader: &mut R) -> Result<u8> {
    let mut byte = [0_u8; 1];
    match reader.read_exact(&mut byte) {
        Ok(()) => Ok(byte[0]),
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(Error::Truncated),
        Err(e) => Err(Error::Io(e)),
    }
}

/// Encodes `value` as a standalone varint byte vector.
pub fn encode_non_negative<T: VarInt>(value: T) -> Vec<u8> {
    let mut buf = [0; MAX_VARINT_LEN];
    let len = encode_varint_to_buf(value, &mut buf);
    buf[..len].to_vec()
}

/// Encodes `value - min_negative` as a standalone varint byte vector.
///
/// # Example
///
/// ```
/// use seqstamp::{encode_non_negative, encode_small};
///
/// assert_eq!(encode_small(5_i32, -1), encode_non_negative(6_i32));
/// ```
pub fn encode_small<T: VarInt>(value: T, min_negative: T) -> Vec<u8> {
    encode_non_negative(value.wrapping_sub(min_negative))
}

/// Decodes a varint from the start of `bytes`. Trailing bytes are ignored.
///
/// # Errors
///
/// See [`CompactReadExt::read_non_negative`].
pub fn decode_non_negative<T: VarInt>(mut bytes: &[u8]) -> Result<T> {
    bytes.read_non_negative()
}

/// Decodes an offset varint from the start of `bytes`.
///
/// # Errors
///
/// See [`CompactReadExt::read_non_negative`].
pub fn decode_small<T: VarInt>(mut bytes: &[u8], min_negative: T) -> Result<T> {
    bytes.read_small_with(min_negative)
}
