use chrono::{DateTime, Utc};
use core::fmt;

use crate::{MonotonicTimestamp, encode};

/// A minimal interface for issuing strictly increasing timestamps
pub trait TimestampGenerator {
    type Err: fmt::Debug;

    /// Returns the last issued value without waiting on writers.
    fn value(&self) -> MonotonicTimestamp;

    /// Issues the successor of the last value for `candidate`.
    ///
    /// # Errors
    /// - May return an error if the underlying lock is poisoned or the
    ///   timestamp space is exhausted.
    fn next_at(&self, candidate: DateTime<Utc>) -> Result<MonotonicTimestamp, Self::Err>;

    /// Issues the successor of the last value for the generator's clock.
    ///
    /// # Errors
    /// - Same as [`Self::next_at`].
    fn next_now(&self) -> Result<MonotonicTimestamp, Self::Err>;
}

/// A minimal interface for issuing unique 64-bit identifiers
pub trait IdGenerator {
    /// Returns the next identifier.
    fn next_long(&self) -> i64;

    /// Returns the next identifier in its 11-character text form.
    fn next_string(&self) -> String {
        encode(self.next_long())
    }
}
