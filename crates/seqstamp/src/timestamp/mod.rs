mod monotonic;
mod scanner;

pub use monotonic::*;
pub use scanner::*;

/// `chrono` format of the instant token: UTC, no colons, nine fractional
/// digits, so it is safe in file names and sorts lexicographically for years
/// 0000 through 9999.
pub const INSTANT_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.9fZ";

/// Parse-side counterpart of [`INSTANT_FORMAT`]; accepts any number of
/// fractional digits, including none.
const INSTANT_PARSE_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.fZ";
