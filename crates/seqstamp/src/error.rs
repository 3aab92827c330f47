use std::io;

/// A result type defaulting to this crate's [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `seqstamp` can emit.
///
/// Argument errors (`BufferTooSmall`, `UniquifierOutOfRange`) and format
/// errors (`Truncated`, `VarintOverflow`, `InvalidTimestamp`,
/// `InvalidIdString`) are never retried internally; they surface to the caller
/// immediately.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The sequencer lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison and this
    /// variant is never produced.
    #[error("sequencer lock poisoned")]
    LockPoisoned,

    /// The timestamp cannot advance any further: the uniquifier is saturated
    /// and the instant is already the largest representable one.
    #[error("monotonic timestamp space exhausted")]
    Exhausted,

    /// The caller-supplied buffer cannot hold an encoded identifier.
    #[error("buffer too small: need {need} bytes, got {len}", need = crate::ENCODED_LEN)]
    BufferTooSmall {
        /// Length of the rejected buffer.
        len: usize,
    },

    /// The stream ended before a varint terminator byte was read.
    #[error("stream truncated inside a variable-length integer")]
    Truncated,

    /// The varint carries more payload bits than the target width holds.
    #[error("variable-length integer overflows the target width")]
    VarintOverflow,

    /// A decoded uniquifier does not fit in `0..=255`.
    #[error("uniquifier {value} out of range 0..=255")]
    UniquifierOutOfRange {
        /// The rejected value.
        value: i64,
    },

    /// The text (or decoded components) do not describe a timestamp.
    #[error("invalid timestamp: {input:?}")]
    InvalidTimestamp {
        /// The rejected input.
        input: String,
    },

    /// The text is not an 11-character URL-safe base64 identifier.
    #[error("invalid identifier string: {input:?}")]
    InvalidIdString {
        /// The rejected input.
        input: String,
    },

    /// Any other failure of the underlying reader or writer.
    #[error(transparent)]
    Io(#[from] io::Error),
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
