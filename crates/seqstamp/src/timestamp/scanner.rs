use chrono::{DateTime, NaiveDateTime, Utc};

use super::{INSTANT_PARSE_FORMAT, MonotonicTimestamp};

/// A cursor over text that matches timestamp tokens cooperatively.
///
/// Every `match_*` method either consumes the token it recognizes and returns
/// `Some`, or returns `None` and leaves the position where it was, so the
/// caller can try an alternative grammar at the same spot.
///
/// # Example
///
/// ```
/// use seqstamp::Scanner;
///
/// let mut scanner = Scanner::new("2024-05-01T12-30-45.000000000Z(256).log");
/// assert!(scanner.match_timestamp().is_none());
/// assert_eq!(scanner.position(), 0);
///
/// let mut scanner = Scanner::new("2024-05-01T12-30-45.000000000Z(7).log");
/// let ts = scanner.match_timestamp().unwrap();
/// assert_eq!(ts.uniquifier(), 7);
/// assert_eq!(scanner.remaining(), ".log");
/// ```
#[derive(Clone, Debug)]
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Byte offset of the cursor.
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// The unconsumed tail of the input.
    pub fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    pub fn is_at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Runs `f`, rewinding the cursor if it returns `None`.
    pub fn attempt<T>(&mut self, f: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.pos;
        let matched = f(self);
        if matched.is_none() {
            self.pos = saved;
        }
        matched
    }

    /// Consumes `expected` if it is the next character.
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.remaining().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consumes a non-empty run of ASCII digits.
    pub fn match_digits(&mut self) -> Option<&'a str> {
        let rest = self.remaining();
        let len = rest.bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    /// Matches a filename-safe UTC instant token ending in `Z`.
    pub fn match_instant(&mut self) -> Option<DateTime<Utc>> {
        self.attempt(|s| {
            let rest = s.remaining();
            let end = rest.find('Z')? + 1;
            let instant = NaiveDateTime::parse_from_str(&rest[..end], INSTANT_PARSE_FORMAT)
                .ok()?
                .and_utc();
            s.pos += end;
            Some(instant)
        })
    }

    /// Matches a `(n)` suffix with `n` in `0..=255`.
    pub fn match_uniquifier(&mut self) -> Option<u8> {
        self.attempt(|s| {
            if !s.match_char('(') {
                return None;
            }
            let value = s.match_digits()?.parse::<u8>().ok()?;
            s.match_char(')').then_some(value)
        })
    }

    /// Matches an instant optionally followed by a uniquifier suffix.
    ///
    /// If a `(` follows the instant but does not start a valid uniquifier,
    /// the whole match fails and nothing is consumed.
    pub fn match_timestamp(&mut self) -> Option<MonotonicTimestamp> {
        self.attempt(|s| {
            let instant = s.match_instant()?;
            let uniquifier = if s.remaining().starts_with('(') {
                s.match_uniquifier()?
            } else {
                0
            };
            Some(MonotonicTimestamp::new(instant, uniquifier))
        })
    }
}
