//! Media file classification.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::subtitle_rename::EpisodeKey;

/// Recognized video file extensions, lowercase without the leading dot.
pub const VIDEO_EXTENSIONS: [&str; 8] = ["mkv", "mp4", "avi", "mov", "flv", "wmv", "m4v", "webm"];

/// Recognized subtitle file extensions, lowercase without the leading dot.
pub const SUBTITLE_EXTENSIONS: [&str; 5] = ["srt", "ass", "ssa", "vtt", "sub"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Video,
    Subtitle,
}

/// A scanned video or subtitle file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaFile {
    pub path: PathBuf,
    /// Lowercase extension including the leading dot, for example `.srt`.
    pub extension: String,
    pub kind: FileKind,
    pub episode_key: Option<EpisodeKey>,
}

impl FileKind {
    /// Classify a path by its extension, case-insensitively.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = crate::path_to_file_extension_string(path);
        if extension.is_empty() {
            None
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Video)
        } else if SUBTITLE_EXTENSIONS.contains(&extension.as_str()) {
            Some(Self::Subtitle)
        } else {
            None
        }
    }
}

impl MediaFile {
    /// Create a media file for the given path.
    ///
    /// Returns `None` if the extension is not a recognized video or subtitle extension.
    #[must_use]
    pub fn new(path: PathBuf) -> Option<Self> {
        let kind = FileKind::from_path(&path)?;
        let extension = format!(".{}", crate::path_to_file_extension_string(&path));
        Some(Self {
            path,
            extension,
            kind,
            episode_key: None,
        })
    }

    /// File name including the extension.
    #[must_use]
    pub fn file_name(&self) -> String {
        crate::path_to_filename_string(&self.path)
    }

    /// File name without the extension.
    #[must_use]
    pub fn file_stem(&self) -> String {
        crate::path_to_file_stem_string(&self.path)
    }

    /// Set the extracted episode key.
    #[must_use]
    pub fn with_episode_key(mut self, episode_key: Option<EpisodeKey>) -> Self {
        self.episode_key = episode_key;
        self
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Video => write!(f, "video"),
            Self::Subtitle => write!(f, "subtitle"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_video_extensions() {
        for name in ["a.mkv", "a.MP4", "a.webm", "a.M4V"] {
            assert_eq!(FileKind::from_path(Path::new(name)), Some(FileKind::Video), "{name}");
        }
    }

    #[test]
    fn classifies_subtitle_extensions() {
        for name in ["a.srt", "a.ASS", "a.ssa", "a.vtt", "a.Sub"] {
            assert_eq!(FileKind::from_path(Path::new(name)), Some(FileKind::Subtitle), "{name}");
        }
    }

    #[test]
    fn ignores_other_files() {
        assert_eq!(FileKind::from_path(Path::new("notes.txt")), None);
        assert_eq!(FileKind::from_path(Path::new("README")), None);
        assert_eq!(FileKind::from_path(Path::new("archive.srt.zip")), None);
    }

    #[test]
    fn extension_is_lowercase_with_dot() {
        let file = MediaFile::new(PathBuf::from("/tmp/Show.E01.SRT")).unwrap();
        assert_eq!(file.extension, ".srt");
        assert_eq!(file.kind, FileKind::Subtitle);
        assert_eq!(file.file_stem(), "Show.E01");
        assert_eq!(file.file_name(), "Show.E01.SRT");
        assert!(file.episode_key.is_none());
    }
}
