use core::{fmt, str::FromStr};
use std::io::{Read, Write};

use chrono::{DateTime, TimeDelta, Utc};

use super::{INSTANT_FORMAT, Scanner};
use crate::{CompactReadExt, CompactWriteExt, Error, Result};

/// A UTC instant paired with a tie-breaking `uniquifier`.
///
/// Timestamps are totally ordered, first by instant and then by uniquifier,
/// so several events that observe the same wall-clock instant can still be
/// given distinct, strictly increasing keys via [`Self::combine`].
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use seqstamp::MonotonicTimestamp;
///
/// let t = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 45).unwrap();
/// let first = MonotonicTimestamp::new(t, 0);
/// let second = first.combine(t).unwrap();
///
/// assert!(second > first);
/// assert_eq!(second.uniquifier(), 1);
/// assert_eq!(second.to_string(), "2024-05-01T12-30-45.000000000Z(1)");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonotonicTimestamp {
    instant: DateTime<Utc>,
    uniquifier: u8,
}

impl MonotonicTimestamp {
    /// The "no value" sentinel. Compares below every other timestamp.
    pub const UNKNOWN: Self = Self {
        instant: DateTime::<Utc>::MIN_UTC,
        uniquifier: 0,
    };

    /// The lowest timestamp a sequence starts from. Compares below every
    /// timestamp whose instant is after [`DateTime::MIN_UTC`].
    pub const MIN: Self = Self {
        instant: DateTime::<Utc>::MIN_UTC,
        uniquifier: 1,
    };

    /// Creates a timestamp from an explicit instant and uniquifier.
    pub const fn new(instant: DateTime<Utc>, uniquifier: u8) -> Self {
        Self {
            instant,
            uniquifier,
        }
    }

    /// Creates a fresh timestamp without consulting any previous value.
    ///
    /// This intentionally bypasses the ordering guarantee: the result may
    /// compare below values issued before it. It is meant for re-seeding a
    /// sequence, e.g. after a clock correction.
    pub const fn reset(instant: DateTime<Utc>, uniquifier: u8) -> Self {
        Self::new(instant, uniquifier)
    }

    pub const fn instant(&self) -> DateTime<Utc> {
        self.instant
    }

    pub const fn uniquifier(&self) -> u8 {
        self.uniquifier
    }

    /// Returns `true` for the [`Self::UNKNOWN`] sentinel.
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Derives the successor of `self` for a newly observed instant.
    ///
    /// - If `candidate` is strictly after `self.instant()`, the result is
    ///   `(candidate, 0)`.
    /// - Otherwise the previous instant is kept and the uniquifier is bumped,
    ///   so the result is greater than `self` even when the clock stalls or
    ///   moves backwards.
    /// - If the uniquifier is already `255`, the instant is advanced by one
    ///   nanosecond and the uniquifier restarts at `0`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Exhausted`] if the uniquifier is saturated and the
    /// instant is already [`DateTime::MAX_UTC`].
    pub fn combine(self, candidate: DateTime<Utc>) -> Result<Self> {
        if candidate > self.instant {
            return Ok(Self::new(candidate, 0));
        }
        match self.uniquifier.checked_add(1) {
            Some(uniquifier) => Ok(Self::new(self.instant, uniquifier)),
            None => self.cold_uniquifier_overflow(),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_uniquifier_overflow(self) -> Result<Self> {
        let instant = self
            .instant
            .checked_add_signed(TimeDelta::nanoseconds(1))
            .ok_or(Error::Exhausted)?;
        Ok(Self::new(instant, 0))
    }

    /// Packs the timestamp into 128 bits whose unsigned order matches the
    /// timestamp order.
    ///
    /// Layout (most significant first): 64 bits of Unix seconds with the sign
    /// bit flipped, 32 bits of sub-second nanoseconds, 24 zero bits and the
    /// 8-bit uniquifier.
    pub fn to_raw(&self) -> u128 {
        let secs = (self.instant.timestamp() as u64) ^ (1 << 63);
        let nanos = self.instant.timestamp_subsec_nanos();
        (u128::from(secs) << 64) | (u128::from(nanos) << 32) | u128::from(self.uniquifier)
    }

    /// Inverse of [`Self::to_raw`]. Returns `None` if the packed seconds and
    /// nanoseconds do not form a representable instant.
    pub fn from_raw(raw: u128) -> Option<Self> {
        let secs = (((raw >> 64) as u64) ^ (1 << 63)) as i64;
        let nanos = (raw >> 32) as u32;
        let instant = DateTime::from_timestamp(secs, nanos)?;
        Some(Self::new(instant, raw as u8))
    }

    /// Writes the timestamp in its compact binary form.
    ///
    /// Seconds are written with [`CompactWriteExt::write_small_with`] offset
    /// by the earliest representable second, followed by the nanoseconds and
    /// the uniquifier as non-negative varints.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the writer fails.
    pub fn write_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<()> {
        writer.write_small_with(self.instant.timestamp(), min_seconds())?;
        writer.write_non_negative(self.instant.timestamp_subsec_nanos() as i32)?;
        writer.write_non_negative(i32::from(self.uniquifier))?;
        Ok(())
    }

    /// Reads a timestamp written by [`Self::write_to`].
    ///
    /// # Errors
    ///
    /// - [`Error::Truncated`] / [`Error::VarintOverflow`] for malformed
    ///   varints.
    /// - [`Error::InvalidTimestamp`] if seconds and nanoseconds do not form a
    ///   representable instant.
    /// - [`Error::UniquifierOutOfRange`] if the uniquifier exceeds 255.
    pub fn read_from<R: Read + ?Sized>(reader: &mut R) -> Result<Self> {
        let secs: i64 = reader.read_small_with(min_seconds())?;
        let nanos: i32 = reader.read_non_negative()?;
        let uniquifier: i32 = reader.read_non_negative()?;

        let instant = u32::try_from(nanos)
            .ok()
            .and_then(|nanos| DateTime::from_timestamp(secs, nanos))
            .ok_or_else(|| Error::InvalidTimestamp {
                input: format!("{secs}s {nanos}ns"),
            })?;
        let uniquifier = u8::try_from(uniquifier).map_err(|_| Error::UniquifierOutOfRange {
            value: i64::from(uniquifier),
        })?;
        Ok(Self::new(instant, uniquifier))
    }
}

fn min_seconds() -> i64 {
    DateTime::<Utc>::MIN_UTC.timestamp()
}

impl Default for MonotonicTimestamp {
    fn default() -> Self {
        Self::UNKNOWN
    }
}

impl fmt::Display for MonotonicTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.instant.format(INSTANT_FORMAT))?;
        if self.uniquifier != 0 {
            write!(f, "({})", self.uniquifier)?;
        }
        Ok(())
    }
}

impl fmt::Debug for MonotonicTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicTimestamp")
            .field("instant", &format_args!("{}", self.instant.format(INSTANT_FORMAT)))
            .field("uniquifier", &self.uniquifier)
            .finish()
    }
}

impl FromStr for MonotonicTimestamp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut scanner = Scanner::new(s);
        match scanner.match_timestamp() {
            Some(ts) if scanner.is_at_end() => Ok(ts),
            _ => Err(Error::InvalidTimestamp {
                input: s.to_owned(),
            }),
        }
    }
}

impl From<DateTime<Utc>> for MonotonicTimestamp {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::new(instant, 0)
    }
}
