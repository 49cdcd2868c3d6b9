//! Pair videos with subtitles by episode key.

use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::subtitle_rename::{EpisodeKey, MediaFile};

/// A video and subtitle sharing the same episode key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedPair {
    pub video: MediaFile,
    pub subtitle: MediaFile,
    pub episode_key: EpisodeKey,
}

/// Result of matching: every input file ends up in exactly one place.
#[derive(Debug, Default, Clone, Serialize)]
pub struct MatchOutcome {
    /// Pairs ordered by episode key.
    pub pairs: Vec<MatchedPair>,
    /// Videos without a key or without a subtitle, ordered by path.
    pub unmatched_videos: Vec<MediaFile>,
    /// Subtitles without a key or without a video, ordered by path.
    pub unmatched_subtitles: Vec<MediaFile>,
    /// Keys shared by more than one video or more than one subtitle.
    pub ambiguous_keys: Vec<EpisodeKey>,
}

/// Match videos with subtitles by equal episode key.
///
/// When several files on one side share a key, each side is sorted by path and
/// the first video is paired with the first subtitle. The rest stay unmatched.
#[must_use]
pub fn match_files(videos: Vec<MediaFile>, subtitles: Vec<MediaFile>) -> MatchOutcome {
    let mut outcome = MatchOutcome::default();

    let (mut videos_by_key, unkeyed_videos) = group_by_key(videos);
    let (mut subtitles_by_key, unkeyed_subtitles) = group_by_key(subtitles);
    outcome.unmatched_videos.extend(unkeyed_videos);
    outcome.unmatched_subtitles.extend(unkeyed_subtitles);

    let keys: Vec<EpisodeKey> = videos_by_key
        .keys()
        .chain(subtitles_by_key.keys())
        .unique()
        .sorted()
        .cloned()
        .collect();

    for key in keys {
        let mut key_videos = videos_by_key.remove(&key).unwrap_or_default();
        let mut key_subtitles = subtitles_by_key.remove(&key).unwrap_or_default();

        if key_videos.is_empty() || key_subtitles.is_empty() {
            outcome.unmatched_videos.extend(key_videos);
            outcome.unmatched_subtitles.extend(key_subtitles);
            continue;
        }

        if key_videos.len() > 1 || key_subtitles.len() > 1 {
            outcome.ambiguous_keys.push(key.clone());
        }

        key_videos.sort_by(|a, b| a.path.cmp(&b.path));
        key_subtitles.sort_by(|a, b| a.path.cmp(&b.path));

        let mut video_iter = key_videos.into_iter();
        let mut subtitle_iter = key_subtitles.into_iter();
        if let (Some(video), Some(subtitle)) = (video_iter.next(), subtitle_iter.next()) {
            outcome.pairs.push(MatchedPair {
                video,
                subtitle,
                episode_key: key,
            });
        }
        outcome.unmatched_videos.extend(video_iter);
        outcome.unmatched_subtitles.extend(subtitle_iter);
    }

    outcome.unmatched_videos.sort_by(|a, b| a.path.cmp(&b.path));
    outcome.unmatched_subtitles.sort_by(|a, b| a.path.cmp(&b.path));
    outcome
}

/// Split files into groups by episode key and a list of files without a key.
fn group_by_key(files: Vec<MediaFile>) -> (HashMap<EpisodeKey, Vec<MediaFile>>, Vec<MediaFile>) {
    let mut grouped: HashMap<EpisodeKey, Vec<MediaFile>> = HashMap::with_capacity(files.len());
    let mut unkeyed = Vec::new();
    for file in files {
        match file.episode_key.clone() {
            Some(key) => grouped.entry(key).or_default().push(file),
            None => unkeyed.push(file),
        }
    }
    (grouped, unkeyed)
}

impl MatchOutcome {
    /// Total number of files in all output lists.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.pairs.len() * 2 + self.unmatched_videos.len() + self.unmatched_subtitles.len()
    }
}
