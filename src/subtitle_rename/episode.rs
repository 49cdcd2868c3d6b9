//! Normalized episode keys used to join videos with subtitles.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

/// Minimum number of digits in a normalized key.
pub const KEY_WIDTH: usize = 2;

/// Normalized episode number.
///
/// Leading zeros are stripped and the number is re-padded to [`KEY_WIDTH`] digits,
/// so `"1"`, `"01"` and `"001"` all produce the key `"01"`.
/// Ordering is numeric: `"99" < "100"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EpisodeKey(String);

impl EpisodeKey {
    /// Normalize a raw digit string into a key.
    ///
    /// Returns `None` if the input is empty or contains anything other than ASCII digits.
    #[must_use]
    pub fn normalize(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = raw.trim_start_matches('0');
        let digits = if digits.is_empty() { "0" } else { digits };
        Some(Self(format!("{digits:0>width$}", width = KEY_WIDTH)))
    }

    /// Key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Episode number as an integer, if it fits.
    #[must_use]
    pub fn number(&self) -> Option<u32> {
        self.0.parse().ok()
    }
}

impl Ord for EpisodeKey {
    fn cmp(&self, other: &Self) -> Ordering {
        // Normalized keys have no superfluous leading zeros,
        // so a longer key is always a bigger number.
        self.0.len().cmp(&other.0.len()).then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for EpisodeKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
