use portable_atomic::{AtomicI64, Ordering};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Error, Result,
    encoding::{self, ENCODED_LEN},
    generator::IdGenerator,
    rand::{RandSource, ThreadRandom},
};

/// A lock-free generator of unique 64-bit identifiers.
///
/// The only shared state is one counter that is advanced with a single atomic
/// increment, so the generator can be shared by reference across threads
/// without any lock. The counter is seeded from cryptographically secure
/// randomness, which makes collisions between independently seeded instances
/// astronomically unlikely.
///
/// ## Features
/// - ✅ Thread-safe, lock-free
/// - ✅ Unique within an instance (until the 64-bit counter wraps)
/// - ❌ No ordering promise between calls racing on different threads
///
/// ## See Also
/// - [`TimestampSequencer`] when values must follow generation time
///
/// [`TimestampSequencer`]: crate::TimestampSequencer
#[derive(Debug)]
pub struct UniqueIdGenerator<R = ThreadRandom>
where
    R: RandSource<[u8; 8]>,
{
    #[cfg(feature = "cache-padded")]
    next: crossbeam_utils::CachePadded<AtomicI64>,
    #[cfg(not(feature = "cache-padded"))]
    next: AtomicI64,
    rng: R,
}

impl<R> UniqueIdGenerator<R>
where
    R: RandSource<[u8; 8]>,
{
    /// Creates a generator whose counter is seeded with 8 bytes from `rng`.
    ///
    /// The same source is later used by [`Self::random_string`].
    pub fn new(rng: R) -> Self {
        let seed = i64::from_ne_bytes(rng.rand());
        Self::with_seed(seed, rng)
    }

    /// Creates a generator with an explicit initial counter value.
    ///
    /// The first call to [`Self::next_long`] returns `initial + 1`. This is
    /// useful for deterministic tests, or for handing out disjoint ranges to
    /// several generators up front.
    pub fn with_seed(initial: i64, rng: R) -> Self {
        Self {
            #[cfg(feature = "cache-padded")]
            next: crossbeam_utils::CachePadded::new(AtomicI64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            next: AtomicI64::new(initial),
            rng,
        }
    }

    /// Atomically increments the counter and returns the new value.
    ///
    /// After `i64::MAX` the counter wraps to `i64::MIN`; this is not treated
    /// as an error.
    ///
    /// # Example
    /// ```
    /// use seqstamp::UniqueIdGenerator;
    ///
    /// let generator = UniqueIdGenerator::from_seed(0);
    /// assert_eq!(generator.next_long(), 1);
    /// assert_eq!(generator.next_long(), 2);
    /// ```
    #[inline]
    pub fn next_long(&self) -> i64 {
        self.next.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }

    /// Writes the next identifier into the first 11 bytes of `buffer`.
    ///
    /// This is the allocation-free entry point for hot paths. Bytes past the
    /// first [`ENCODED_LEN`] are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferTooSmall`] if `buffer` is shorter than
    /// [`ENCODED_LEN`]. The counter is not advanced in that case.
    ///
    /// # Example
    /// ```
    /// use seqstamp::UniqueIdGenerator;
    ///
    /// let generator = UniqueIdGenerator::from_seed(0);
    /// let mut buf = [0_u8; 16];
    /// generator.fill_next_utf8(&mut buf).unwrap();
    /// assert_eq!(&buf[..11], b"AAAAAAAAAAE");
    /// ```
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self, buffer)))]
    pub fn fill_next_utf8(&self, buffer: &mut [u8]) -> Result<()> {
        let len = buffer.len();
        let Some(dst) = buffer.first_chunk_mut::<ENCODED_LEN>() else {
            return Err(Error::BufferTooSmall { len });
        };
        encoding::encode_to_buf(self.next_long(), dst);
        Ok(())
    }

    /// Returns the next identifier as an 11-character URL-safe string.
    pub fn next_string(&self) -> String {
        encoding::encode(self.next_long())
    }

    /// Returns a label built from 8 fresh random bytes.
    ///
    /// The result has the same shape as [`Self::next_string`] but no ordering
    /// relationship with the counter or with earlier labels.
    pub fn random_string(&self) -> String {
        encoding::encode(i64::from_be_bytes(self.rng.rand()))
    }
}

impl UniqueIdGenerator<ThreadRandom> {
    /// Creates a generator with an explicit initial counter value and the
    /// default random source.
    pub fn from_seed(initial: i64) -> Self {
        Self::with_seed(initial, ThreadRandom)
    }

    /// Encodes an identifier obtained elsewhere exactly like
    /// [`Self::next_string`] would have. Does not touch any counter.
    ///
    /// # Example
    /// ```
    /// use seqstamp::UniqueIdGenerator;
    ///
    /// let generator = UniqueIdGenerator::from_seed(0);
    /// assert_eq!(UniqueIdGenerator::encode(1), generator.next_string());
    /// ```
    pub fn encode(value: i64) -> String {
        encoding::encode(value)
    }
}

impl Default for UniqueIdGenerator<ThreadRandom> {
    fn default() -> Self {
        Self::new(ThreadRandom)
    }
}

impl<R> IdGenerator for UniqueIdGenerator<R>
where
    R: RandSource<[u8; 8]>,
{
    fn next_long(&self) -> i64 {
        self.next_long()
    }

    fn next_string(&self) -> String {
        self.next_string()
    }
}
