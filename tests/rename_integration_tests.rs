//! End-to-end rename scenarios run through the library entry point.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use subtitle_renamer::subtitle_rename::{
    EpisodeKey, MediaFile, OperationStatus, PatternSet, PlanOptions, RenameAction, RenameConfig, SubtitleRenamer,
    match_files, plan,
};

fn create_files(dir: &Path, names: &[&str]) {
    for name in names {
        File::create(dir.join(name)).expect("Failed to create file");
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

fn config(dir: &Path) -> RenameConfig {
    RenameConfig {
        video_dir: Some(dir.to_path_buf()),
        ..RenameConfig::default()
    }
}

fn media_file(name: &str) -> MediaFile {
    let path = PathBuf::from("/media/show").join(name);
    let key = PatternSet::defaults().extract_from_path(&path);
    MediaFile::new(path).expect("known extension").with_episode_key(key)
}

#[test]
fn subtitle_is_renamed_to_video_name() {
    let dir = TempDir::new().unwrap();
    create_files(dir.path(), &["Show.S01E01.mkv", "show_ep1.srt"]);

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();

    assert_eq!(result.renamed_count, 1);
    assert_eq!(result.total_matched_count, 1);
    assert_eq!(result.pairs[0].episode_key.as_str(), "01");
    assert_eq!(file_names(dir.path()), vec!["Show.S01E01.mkv", "Show.S01E01.srt"]);
}

#[test]
fn video_without_subtitle_is_unmatched() {
    let dir = TempDir::new().unwrap();
    create_files(dir.path(), &["Show.S01E01.mkv", "Show.S01E02.mkv", "show_ep1.srt"]);

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();

    assert_eq!(result.renamed_count, 1);
    assert_eq!(result.unmatched_videos.len(), 1);
    assert_eq!(result.unmatched_videos[0].file_name(), "Show.S01E02.mkv");
    assert!(result.unmatched_subtitles.is_empty());
}

#[test]
fn duplicate_subtitle_keys_pair_first_by_path() {
    let dir = TempDir::new().unwrap();
    create_files(dir.path(), &["ep1.srt", "ep01.srt", "v01.mkv"]);

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();

    assert_eq!(result.total_matched_count, 1);
    assert_eq!(result.pairs[0].subtitle.file_name(), "ep01.srt");
    assert_eq!(result.unmatched_subtitles.len(), 1);
    assert_eq!(result.unmatched_subtitles[0].file_name(), "ep1.srt");
    assert_eq!(result.ambiguous_keys, vec![EpisodeKey::normalize("1").unwrap()]);
    assert_eq!(file_names(dir.path()), vec!["ep1.srt", "v01.mkv", "v01.srt"]);
}

#[test]
fn keep_existing_skips_existing_destination() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Ep1.srt"), "new").unwrap();
    fs::write(dir.path().join("Show.S01E01.srt"), "old").unwrap();
    create_files(dir.path(), &["Show.S01E01.mkv"]);

    let mut config = config(dir.path());
    config.keep_existing = true;
    let result = SubtitleRenamer::new(config).unwrap().run();

    assert_eq!(result.renamed_count, 0);
    assert_eq!(result.count(&OperationStatus::Skipped), 1);
    assert_eq!(result.outcomes[0].operation.action, RenameAction::SkipExists);
    assert_eq!(fs::read_to_string(dir.path().join("Ep1.srt")).unwrap(), "new");
    assert_eq!(fs::read_to_string(dir.path().join("Show.S01E01.srt")).unwrap(), "old");
}

#[test]
fn overwrite_is_default_without_keep_existing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Ep1.srt"), "new").unwrap();
    fs::write(dir.path().join("Show.S01E01.srt"), "old").unwrap();
    create_files(dir.path(), &["Show.S01E01.mkv"]);

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();

    assert_eq!(result.renamed_count, 1);
    assert_eq!(result.overwritten_count(), 1);
    assert_eq!(fs::read_to_string(dir.path().join("Show.S01E01.srt")).unwrap(), "new");
    assert!(!dir.path().join("Ep1.srt").exists());
}

#[test]
fn dryrun_does_not_modify_files() {
    let dir = TempDir::new().unwrap();
    let names = ["Show.S01E01.mkv", "Show.S01E02.mkv", "show_ep1.srt", "show_ep2.ass"];
    create_files(dir.path(), &names);
    let before = file_names(dir.path());

    let mut config = config(dir.path());
    config.dryrun = true;
    let result = SubtitleRenamer::new(config).unwrap().run();

    assert_eq!(result.renamed_count, 0);
    assert_eq!(result.total_matched_count, 2);
    assert!(
        result
            .outcomes
            .iter()
            .all(|outcome| outcome.status == OperationStatus::Previewed)
    );
    assert_eq!(file_names(dir.path()), before);
}

#[test]
fn destination_keeps_subtitle_extension() {
    let dir = TempDir::new().unwrap();
    create_files(
        dir.path(),
        &["Show.S01E01.mkv", "Show.S01E02.mp4", "[Sub] Show - 01.ASS", "Show 1x02.vtt"],
    );

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();

    assert_eq!(result.renamed_count, 2);
    for outcome in &result.outcomes {
        assert_eq!(
            outcome.operation.destination.extension(),
            outcome.operation.source.extension()
        );
    }
    assert!(dir.path().join("Show.S01E01.ASS").exists());
    assert!(dir.path().join("Show.S01E02.vtt").exists());
}

#[test]
fn recurse_finds_nested_files() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("Season 1");
    fs::create_dir(&nested).unwrap();
    create_files(&nested, &["Show.S01E03.mkv", "show ep 3.srt"]);

    let result = SubtitleRenamer::new(config(dir.path())).unwrap().run();
    assert_eq!(result.total_matched_count, 0);

    let mut config = config(dir.path());
    config.recurse = true;
    let result = SubtitleRenamer::new(config).unwrap().run();
    assert_eq!(result.renamed_count, 1);
    assert!(nested.join("Show.S01E03.srt").exists());
}

#[test]
fn missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = SubtitleRenamer::new(config(&dir.path().join("missing")));
    assert!(result.is_err());
}

#[test]
fn invalid_user_pattern_names_the_pattern() {
    let dir = TempDir::new().unwrap();
    let mut config = config(dir.path());
    config.video_patterns = vec!["[unclosed(\\d+)".to_string()];
    let error = SubtitleRenamer::new(config).unwrap_err();
    assert!(format!("{error:#}").contains("[unclosed(\\d+)"));
}

#[test]
fn matching_is_total_and_order_independent() {
    let videos = ["Show.S01E01.mkv", "Show.S01E02.mkv", "trailer.mkv", "Show.S01E03.mkv"];
    let subtitles = ["ep1.srt", "ep01.srt", "ep3.ass", "notes.srt", "ep9.srt"];

    let forward = match_files(
        videos.iter().map(|name| media_file(name)).collect(),
        subtitles.iter().map(|name| media_file(name)).collect(),
    );
    let reverse = match_files(
        videos.iter().rev().map(|name| media_file(name)).collect(),
        subtitles.iter().rev().map(|name| media_file(name)).collect(),
    );

    assert_eq!(forward.pairs, reverse.pairs);
    assert_eq!(forward.unmatched_videos, reverse.unmatched_videos);
    assert_eq!(forward.unmatched_subtitles, reverse.unmatched_subtitles);
    assert_eq!(forward.file_count(), videos.len() + subtitles.len());
}

#[test]
fn planner_skips_existing_with_keep_existing() {
    let outcome = match_files(vec![media_file("Show.S01E01.mkv")], vec![media_file("show_ep1.srt")]);
    let existing = PathBuf::from("/media/show/Show.S01E01.srt");

    let keep = PlanOptions {
        keep_existing: true,
        ..PlanOptions::default()
    };
    let operations = plan(&outcome.pairs, keep, |path| path == existing);
    assert_eq!(operations[0].action, RenameAction::SkipExists);
    assert_eq!(operations[0].destination, existing);

    let dryrun = PlanOptions {
        keep_existing: true,
        dryrun: true,
        ..PlanOptions::default()
    };
    let operations = plan(&outcome.pairs, dryrun, |path| path == existing);
    assert_eq!(operations[0].action, RenameAction::WouldRename);
    assert!(operations[0].destination_exists);
}
