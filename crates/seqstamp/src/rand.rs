use rand::{Rng, rng};

/// A trait for random sources that return random values.
///
/// This abstraction allows you to plug in a real random source or a mocked
/// random source in tests.
///
/// # Example
/// ```
/// use seqstamp::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn rand(&self) -> u64 {
///         1234
///     }
/// }
///
/// let rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random value.
    fn rand(&self) -> T;
}

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// The underlying generator is a ChaCha-based CSPRNG seeded and periodically
/// reseeded from the operating system, so it is suitable for seeding
/// identifier counters.
///
/// Each OS thread has its own RNG instance. This type does **not** store the
/// RNG; it is a zero-sized handle that may be freely shared across threads.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<[u8; 8]> for ThreadRandom {
    fn rand(&self) -> [u8; 8] {
        let mut bytes = [0; 8];
        rng().fill(&mut bytes);
        bytes
    }
}
