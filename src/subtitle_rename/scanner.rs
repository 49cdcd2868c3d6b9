//! Collect video and subtitle files from the input directories.

use std::path::Path;

use walkdir::WalkDir;

use crate::subtitle_rename::{FileKind, MediaFile};

/// Scanned files split by kind. Both lists are sorted by path.
#[derive(Debug, Default)]
pub struct ScannedFiles {
    pub videos: Vec<MediaFile>,
    pub subtitles: Vec<MediaFile>,
}

/// Scan for videos and subtitles.
///
/// When both directories are the same, the directory is only walked once.
/// Unreadable entries are skipped with a warning.
#[must_use]
pub fn scan(video_dir: &Path, subtitle_dir: &Path, recurse: bool) -> ScannedFiles {
    let mut scanned = ScannedFiles::default();
    if video_dir == subtitle_dir {
        for file in collect_media_files(video_dir, recurse) {
            match file.kind {
                FileKind::Video => scanned.videos.push(file),
                FileKind::Subtitle => scanned.subtitles.push(file),
            }
        }
    } else {
        scanned.videos = collect_media_files(video_dir, recurse)
            .into_iter()
            .filter(|file| file.kind == FileKind::Video)
            .collect();
        scanned.subtitles = collect_media_files(subtitle_dir, recurse)
            .into_iter()
            .filter(|file| file.kind == FileKind::Subtitle)
            .collect();
    }
    scanned
}

/// Get all recognized media files under the given directory.
fn collect_media_files(directory: &Path, recurse: bool) -> Vec<MediaFile> {
    let mut files: Vec<MediaFile> = WalkDir::new(directory)
        .min_depth(1)
        .max_depth(if recurse { usize::MAX } else { 1 })
        .into_iter()
        .filter_entry(|e| !crate::should_skip_entry(e))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(error) => {
                crate::print_warning!("Skipping unreadable entry: {error}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| MediaFile::new(entry.into_path()))
        .collect();

    files.sort_unstable_by(|a, b| a.path.cmp(&b.path));
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::{self, File};
    use std::path::PathBuf;

    use tempfile::TempDir;

    fn create_file(dir: &Path, name: &str) {
        File::create(dir.join(name)).expect("Failed to create file");
    }

    fn create_subdir(dir: &Path, name: &str) -> PathBuf {
        let subdir = dir.join(name);
        fs::create_dir(&subdir).expect("Failed to create subdir");
        subdir
    }

    fn names(files: &[MediaFile]) -> Vec<String> {
        files.iter().map(MediaFile::file_name).collect()
    }

    #[test]
    fn test_scan_splits_by_kind() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        create_file(dir, "b.mkv");
        create_file(dir, "a.MP4");
        create_file(dir, "a.srt");
        create_file(dir, "b.ASS");
        create_file(dir, "notes.txt");

        let scanned = scan(dir, dir, false);
        assert_eq!(names(&scanned.videos), vec!["a.MP4", "b.mkv"]);
        assert_eq!(names(&scanned.subtitles), vec!["a.srt", "b.ASS"]);
    }

    #[test]
    fn test_scan_separate_directories() {
        let temp_dir = TempDir::new().unwrap();
        let videos = create_subdir(temp_dir.path(), "videos");
        let subs = create_subdir(temp_dir.path(), "subs");
        create_file(&videos, "e01.mkv");
        create_file(&videos, "stray.srt");
        create_file(&subs, "e01.srt");
        create_file(&subs, "stray.mkv");

        let scanned = scan(&videos, &subs, false);
        assert_eq!(names(&scanned.videos), vec!["e01.mkv"]);
        assert_eq!(names(&scanned.subtitles), vec!["e01.srt"]);
    }

    #[test]
    fn test_scan_non_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        create_file(dir, "root.mkv");
        let subdir = create_subdir(dir, "extras");
        create_file(&subdir, "nested.mkv");

        let scanned = scan(dir, dir, false);
        assert_eq!(names(&scanned.videos), vec!["root.mkv"]);
    }

    #[test]
    fn test_scan_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        create_file(dir, "root.mkv");
        let subdir = create_subdir(dir, "season 1");
        create_file(&subdir, "nested.mkv");
        create_file(&create_subdir(&subdir, "subs"), "nested.srt");

        let scanned = scan(dir, dir, true);
        assert_eq!(scanned.videos.len(), 2);
        assert_eq!(scanned.subtitles.len(), 1);
    }

    #[test]
    fn test_scan_skips_hidden() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        create_file(dir, ".hidden.srt");
        let hidden_dir = create_subdir(dir, ".cache");
        create_file(&hidden_dir, "e01.srt");

        let scanned = scan(dir, dir, true);
        assert!(scanned.subtitles.is_empty());
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let scanned = scan(temp_dir.path(), temp_dir.path(), true);
        assert!(scanned.videos.is_empty());
        assert!(scanned.subtitles.is_empty());
    }
}
