//! Record ids and timestamps.
//!
//! Ids are `<unix-millis>-<9 base36 chars>`. The millisecond prefix keeps
//! ids roughly creation-ordered; the suffix makes same-millisecond creates
//! distinct. Timestamps are fixed-width UTC ISO-8601 so they sort
//! lexicographically.

use rand::Rng;
use time::OffsetDateTime;

const SUFFIX_LEN: usize = 9;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh record id for `now`.
#[must_use]
pub fn generate_id(now: OffsetDateTime) -> String {
    let millis = now.unix_timestamp_nanos() / 1_000_000;
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(ALPHABET[rng.random_range(0..ALPHABET.len())]))
        .collect();
    format!("{millis}-{suffix}")
}

/// Format `at` as `YYYY-MM-DDTHH:MM:SS.mmmZ` in UTC.
#[must_use]
pub fn format_timestamp(at: OffsetDateTime) -> String {
    let at = at.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}Z",
        at.year(),
        u8::from(at.month()),
        at.day(),
        at.hour(),
        at.minute(),
        at.second(),
        at.millisecond()
    )
}

/// Current time as a record timestamp.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

#[cfg(test)]
#[path = "id_test.rs"]
mod tests;
