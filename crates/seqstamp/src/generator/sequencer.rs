use chrono::{DateTime, Utc};
use core::fmt;
use portable_atomic::{AtomicU128, Ordering};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result,
    generator::{Mutex, MutexGuard, TimestampGenerator},
    time::{Clock, SystemClock},
    timestamp::MonotonicTimestamp,
};

struct Shared {
    #[cfg(feature = "cache-padded")]
    current: crossbeam_utils::CachePadded<Mutex<MonotonicTimestamp>>,
    #[cfg(not(feature = "cache-padded"))]
    current: Mutex<MonotonicTimestamp>,
    /// Packed copy of `current`, written inside the critical section.
    snapshot: AtomicU128,
}

/// A lock-based sequencer that turns wall-clock readings into strictly
/// increasing [`MonotonicTimestamp`]s, suitable for multi-threaded
/// environments.
///
/// All mutation is serialized behind a single mutex and the critical section
/// only runs [`MonotonicTimestamp::combine`]. Cloning a sequencer yields
/// another handle to the *same* state, so construct one at startup and pass
/// clones to every caller that must share the ordering guarantee.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Strictly increasing across all handles of one instance
/// - ✅ Lock-free reads of the last issued value
///
/// ## See Also
/// - [`UniqueIdGenerator`] when uniqueness without time order is enough
///
/// [`UniqueIdGenerator`]: crate::UniqueIdGenerator
pub struct TimestampSequencer<C = SystemClock>
where
    C: Clock,
{
    shared: Arc<Shared>,
    clock: C,
}

impl<C> TimestampSequencer<C>
where
    C: Clock,
{
    /// Creates a sequencer that starts at [`MonotonicTimestamp::MIN`].
    ///
    /// # Example
    /// ```
    /// use seqstamp::{SystemClock, TimestampSequencer};
    ///
    /// let sequencer = TimestampSequencer::new(SystemClock);
    /// let a = sequencer.next_now().unwrap();
    /// let b = sequencer.next_now().unwrap();
    /// assert!(a < b);
    /// ```
    pub fn new(clock: C) -> Self {
        Self::from_timestamp(MonotonicTimestamp::MIN, clock)
    }

    /// Creates a sequencer whose last issued value is `start`.
    ///
    /// Useful for resuming a sequence from a persisted timestamp: every value
    /// issued afterwards compares greater than `start`.
    pub fn from_timestamp(start: MonotonicTimestamp, clock: C) -> Self {
        let shared = Shared {
            #[cfg(feature = "cache-padded")]
            current: crossbeam_utils::CachePadded::new(Mutex::new(start)),
            #[cfg(not(feature = "cache-padded"))]
            current: Mutex::new(start),
            snapshot: AtomicU128::new(start.to_raw()),
        };
        Self {
            shared: Arc::new(shared),
            clock,
        }
    }

    /// Returns the last issued timestamp.
    ///
    /// This read does not take the lock. It may miss an update that is in
    /// flight, but it always returns a value that was actually issued (or the
    /// starting value).
    pub fn value(&self) -> MonotonicTimestamp {
        let raw = self.shared.snapshot.load(Ordering::Acquire);
        MonotonicTimestamp::from_raw(raw).unwrap_or(MonotonicTimestamp::UNKNOWN)
    }

    /// Unconditionally replaces the current value and returns it.
    ///
    /// Values issued after a reset are ordered relative to the reset value
    /// only, not to anything issued before it.
    ///
    /// # Errors
    /// - Returns [`Error::LockPoisoned`] if the std mutex is poisoned.
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip(self)))]
    pub fn reset(&self, instant: DateTime<Utc>, uniquifier: u8) -> Result<MonotonicTimestamp> {
        let mut current = self.lock()?;
        let next = MonotonicTimestamp::reset(instant, uniquifier);
        self.store(&mut current, next);
        Ok(next)
    }

    /// Issues `combine(current, candidate)`, stores it and returns it.
    ///
    /// # Errors
    /// - Returns [`Error::LockPoisoned`] if the std mutex is poisoned.
    /// - Returns [`Error::Exhausted`] if the timestamp space is exhausted.
    ///
    /// # Example
    /// ```
    /// use chrono::DateTime;
    /// use seqstamp::{SystemClock, TimestampSequencer};
    ///
    /// let sequencer = TimestampSequencer::new(SystemClock);
    /// let t = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    ///
    /// let a = sequencer.next(t).unwrap();
    /// let b = sequencer.next(t).unwrap();
    /// assert_eq!((a.uniquifier(), b.uniquifier()), (0, 1));
    /// ```
    ///
    /// [`Error::LockPoisoned`]: crate::Error::LockPoisoned
    /// [`Error::Exhausted`]: crate::Error::Exhausted
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next(&self, candidate: DateTime<Utc>) -> Result<MonotonicTimestamp> {
        let mut current = self.lock()?;
        let next = current.combine(candidate)?;
        self.store(&mut current, next);
        drop(current);

        // Only a saturated uniquifier yields (instant != candidate, 0).
        #[cfg(feature = "tracing")]
        if next.uniquifier() == 0 && next.instant() != candidate {
            tracing::debug!(to = %next, "uniquifier saturated, advanced instant by 1ns");
        }
        Ok(next)
    }

    /// Equivalent to `next(clock.now())`.
    ///
    /// The clock is read before the lock is taken.
    ///
    /// # Errors
    /// - Same as [`Self::next`].
    pub fn next_now(&self) -> Result<MonotonicTimestamp> {
        let candidate = self.clock.now();
        self.next(candidate)
    }

    /// Returns the clock this sequencer reads in [`Self::next_now`].
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub(super) fn lock(&self) -> Result<MutexGuard<'_, MonotonicTimestamp>> {
        #[cfg(feature = "parking-lot")]
        let current = self.shared.current.lock();
        #[cfg(not(feature = "parking-lot"))]
        let current = self.shared.current.lock()?;
        Ok(current)
    }

    #[cfg(test)]
    pub(super) fn is_locked(&self) -> bool {
        #[cfg(feature = "parking-lot")]
        let locked = self.shared.current.is_locked();
        #[cfg(not(feature = "parking-lot"))]
        let locked = self.shared.current.try_lock().is_err();
        locked
    }

    fn store(&self, current: &mut MonotonicTimestamp, next: MonotonicTimestamp) {
        *current = next;
        self.shared.snapshot.store(next.to_raw(), Ordering::Release);
    }
}

impl Default for TimestampSequencer<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C> Clone for TimestampSequencer<C>
where
    C: Clock + Clone,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
            clock: self.clock.clone(),
        }
    }
}

impl<C> fmt::Debug for TimestampSequencer<C>
where
    C: Clock + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimestampSequencer")
            .field("value", &self.value())
            .field("clock", &self.clock)
            .finish()
    }
}

impl<C> TimestampGenerator for TimestampSequencer<C>
where
    C: Clock,
{
    type Err = crate::Error;

    fn value(&self) -> MonotonicTimestamp {
        self.value()
    }

    fn next_at(&self, candidate: DateTime<Utc>) -> Result<MonotonicTimestamp> {
        self.next(candidate)
    }

    fn next_now(&self) -> Result<MonotonicTimestamp> {
        self.next_now()
    }
}
