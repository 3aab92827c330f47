use chrono::{DateTime, Utc};

/// A trait for wall-clock sources consulted by the
/// [`TimestampSequencer`](crate::TimestampSequencer).
///
/// This abstraction allows you to plug in the real system clock or a mocked
/// clock in tests. The returned instant is not required to be monotonic; the
/// sequencer repairs repeated or backwards readings.
///
/// # Example
///
/// ```
/// use chrono::{DateTime, Utc};
/// use seqstamp::Clock;
///
/// struct FixedTime;
/// impl Clock for FixedTime {
///     fn now(&self) -> DateTime<Utc> {
///         DateTime::UNIX_EPOCH
///     }
/// }
///
/// assert_eq!(FixedTime.now().timestamp(), 0);
/// ```
pub trait Clock {
    /// Returns the current UTC instant.
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock (`Utc::now()`).
#[derive(Default, Clone, Copy, Debug)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_tracks_utc_now() {
        let before = Utc::now();
        let now = SystemClock.now();
        let after = Utc::now();
        assert!(before <= now && now <= after);
    }
}
