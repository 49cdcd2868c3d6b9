//! Episode number extraction with an ordered set of regex patterns.

use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use itertools::Itertools;
use regex::{Regex, RegexBuilder};

use crate::subtitle_rename::EpisodeKey;

/// Name of the capture group used for the episode number when a pattern defines it.
pub const EPISODE_GROUP: &str = "episode";

/// Built-in episode patterns in priority order.
/// The first pattern that matches a file name wins.
pub const DEFAULT_PATTERNS: [&str; 8] = [
    // S01E02, S01 E02, S01.E02
    r"(?i)s\d{1,2}[\s._-]?e(\d{1,4})",
    // 1x02
    r"(?i)(?:^|[^0-9a-z])\d{1,2}x(\d{1,3})(?:[^0-9a-z]|$)",
    // Episode 02, Ep02, EP.02, ep_2
    r"(?i)(?:^|[^a-z])(?:episode|ep)\.?[\s._-]*(\d{1,4})",
    // 第02話, 第 02 集
    r"第\s*(\d{1,4})",
    // E02
    r"(?i)(?:^|[^0-9a-z])e(\d{1,4})(?:v\d+)?(?:[^0-9a-z]|$)",
    // Show - 02 [1080p], Show - 02v2
    r"(?i)\s-\s(\d{1,4})(?:v\d+)?(?:[\s.\[(]|$)",
    // [02], [02v2]
    r"(?i)\[(\d{1,4})(?:v\d+)?\]",
    // Last number group that is not followed by letters
    r"(?i)(?:^|\D)(\d{1,4})(?:v\d+)?(?:[^0-9a-z][^0-9]*)?$",
];

static DEFAULT_PATTERN_SET: LazyLock<PatternSet> = LazyLock::new(|| PatternSet {
    patterns: DEFAULT_PATTERNS
        .iter()
        .map(|pattern| EpisodePattern::new(pattern).expect("Failed to create default episode pattern"))
        .collect(),
});

/// A compiled regex together with the index of the group holding the episode number.
#[derive(Debug, Clone)]
pub struct EpisodePattern {
    regex: Regex,
    group: usize,
}

/// Ordered list of episode patterns.
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: Vec<EpisodePattern>,
}

impl EpisodePattern {
    /// Compile a pattern case-insensitively.
    ///
    /// The episode number is taken from the group named `episode` if it exists,
    /// otherwise from the first capture group.
    ///
    /// # Errors
    /// Returns an error naming the pattern if it is not a valid regex or has no capture group.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("Invalid episode pattern: '{pattern}'"))?;

        let group = regex
            .capture_names()
            .position(|name| name == Some(EPISODE_GROUP))
            .or_else(|| (regex.captures_len() > 1).then_some(1))
            .with_context(|| format!("Invalid episode pattern: '{pattern}' has no capture group"))?;

        Ok(Self { regex, group })
    }

    /// Try to extract a normalized episode key from the given name.
    #[must_use]
    pub fn extract(&self, name: &str) -> Option<EpisodeKey> {
        let captures = self.regex.captures(name)?;
        let episode = captures.get(self.group)?;
        EpisodeKey::normalize(episode.as_str())
    }

    /// The source regex pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl PatternSet {
    /// The built-in patterns.
    #[must_use]
    pub fn defaults() -> Self {
        DEFAULT_PATTERN_SET.clone()
    }

    /// Compile user patterns and put them before the built-in defaults.
    ///
    /// # Errors
    /// Returns an error naming the first pattern that fails to compile.
    pub fn with_user_patterns(user_patterns: &[String]) -> Result<Self> {
        let mut patterns = user_patterns
            .iter()
            .map(|pattern| pattern.trim())
            .filter(|pattern| !pattern.is_empty())
            .unique()
            .map(EpisodePattern::new)
            .collect::<Result<Vec<_>>>()?;

        patterns.extend(DEFAULT_PATTERN_SET.patterns.iter().cloned());
        Ok(Self { patterns })
    }

    /// Extract the episode key from a file name.
    ///
    /// Patterns are tried in order and the first one that yields a valid number wins.
    #[must_use]
    pub fn extract(&self, name: &str) -> Option<EpisodeKey> {
        self.patterns.iter().find_map(|pattern| pattern.extract(name))
    }

    /// Extract the episode key from the file name of a path, ignoring the extension.
    #[must_use]
    pub fn extract_from_path(&self, path: &Path) -> Option<EpisodeKey> {
        self.extract(&crate::normalized_file_stem(path))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EpisodePattern> {
        self.patterns.iter()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::defaults()
    }
}

impl fmt::Display for PatternSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.patterns
                .iter()
                .enumerate()
                .map(|(index, pattern)| format!("{:>3}: {}", index + 1, pattern.as_str()))
                .join("\n")
        )
    }
}
