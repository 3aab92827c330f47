use core::fmt;

/// The longest encoding any supported width produces (`i64`, 10 bytes).
pub const MAX_VARINT_LEN: usize = 10;

/// The offset used by the `small` encoding when none is given.
///
/// Values that start at `-1` (e.g. "no index" sentinels) then encode `-1` as
/// a single `0x00` byte.
pub const DEFAULT_MIN_NEGATIVE: i32 = -1;

/// A signed integer width that the compact codec can encode.
///
/// The codec operates on the two's-complement bit pattern, so a negative value
/// is accepted by the non-negative encoding and simply expands to
/// [`VarInt::MAX_ENCODED_LEN`] bytes.
pub trait VarInt: Copy + Eq + Ord + fmt::Debug + fmt::Display {
    /// Number of value bits.
    const BITS: u32;
    /// Maximum number of bytes a value of this width encodes to.
    const MAX_ENCODED_LEN: usize;
    /// Default offset for the `small` encoding.
    const DEFAULT_MIN_NEGATIVE: Self;

    /// Returns the two's-complement bit pattern, zero-extended to 64 bits.
    fn to_bits(self) -> u64;

    /// Rebuilds a value from its (truncated) bit pattern.
    fn from_bits(bits: u64) -> Self;

    fn wrapping_add(self, rhs: Self) -> Self;

    fn wrapping_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_varint {
    ($ty:ty, $unsigned:ty) => {
        impl VarInt for $ty {
            const BITS: u32 = <$ty>::BITS;
            const MAX_ENCODED_LEN: usize = (<$ty>::BITS as usize).div_ceil(7);
            const DEFAULT_MIN_NEGATIVE: Self = DEFAULT_MIN_NEGATIVE as $ty;

            #[inline]
            fn to_bits(self) -> u64 {
                self as $unsigned as u64
            }

            #[inline]
            fn from_bits(bits: u64) -> Self {
                bits as $unsigned as $ty
            }

            #[inline]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$ty>::wrapping_add(self, rhs)
            }

            #[inline]
            fn wrapping_sub(self, rhs: Self) -> Self {
                <$ty>::wrapping_sub(self, rhs)
            }
        }
    };
}

impl_varint!(i32, u32);
impl_varint!(i64, u64);

/// Encodes `value` into `buf` and returns the number of bytes written.
///
/// Seven payload bits per byte, least significant group first; every byte but
/// the last carries the `0x80` continuation bit.
#[inline]
pub fn encode_varint_to_buf<T: VarInt>(value: T, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut bits = value.to_bits();
    let mut len = 0;
    while bits >= 0x80 {
        buf[len] = (bits as u8) | 0x80;
        bits >>= 7;
        len += 1;
    }
    buf[len] = bits as u8;
    len + 1
}
