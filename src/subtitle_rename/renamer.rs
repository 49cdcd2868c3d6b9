//! Library entry point: scan, match, plan and execute subtitle renames.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::subtitle_rename::executor::{self, OperationOutcome, OperationStatus};
use crate::subtitle_rename::matcher::{self, MatchedPair};
use crate::subtitle_rename::planner::{self, PlanOptions, RenameOperation, TransferMode};
use crate::subtitle_rename::scanner;
use crate::subtitle_rename::{EpisodeKey, MediaFile, PatternSet};

/// Options for a subtitle rename run.
///
/// Pattern lists are tried before the built-in defaults.
#[derive(Debug, Clone, Default)]
pub struct RenameConfig {
    /// Directory containing the videos. Defaults to the current working directory.
    pub video_dir: Option<PathBuf>,
    /// Directory containing the subtitles. Defaults to the video directory.
    pub subtitle_dir: Option<PathBuf>,
    pub dryrun: bool,
    pub recurse: bool,
    pub remove_originals: bool,
    pub keep_existing: bool,
    pub verbose: bool,
    pub video_patterns: Vec<String>,
    pub subtitle_patterns: Vec<String>,
}

/// Validated renamer ready to run.
#[derive(Debug)]
pub struct SubtitleRenamer {
    video_dir: PathBuf,
    subtitle_dir: PathBuf,
    video_patterns: PatternSet,
    subtitle_patterns: PatternSet,
    options: PlanOptions,
    recurse: bool,
    verbose: bool,
}

/// Everything computed before touching the filesystem.
#[derive(Debug, Default, Clone, Serialize)]
pub struct RenamePlan {
    pub operations: Vec<RenameOperation>,
    pub pairs: Vec<MatchedPair>,
    pub unmatched_videos: Vec<MediaFile>,
    pub unmatched_subtitles: Vec<MediaFile>,
    pub ambiguous_keys: Vec<EpisodeKey>,
}

/// Outcome of a run.
///
/// `renamed_count` only counts subtitles actually renamed,
/// so it is always zero for a dry run and never above `total_matched_count`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub video_dir: PathBuf,
    pub subtitle_dir: PathBuf,
    pub dryrun: bool,
    pub renamed_count: usize,
    pub total_matched_count: usize,
    pub pairs: Vec<MatchedPair>,
    pub outcomes: Vec<OperationOutcome>,
    pub unmatched_videos: Vec<MediaFile>,
    pub unmatched_subtitles: Vec<MediaFile>,
    pub ambiguous_keys: Vec<EpisodeKey>,
}

impl SubtitleRenamer {
    /// Validate directories and compile patterns.
    ///
    /// # Errors
    /// Returns an error if a directory does not exist, is not a directory, or cannot be read,
    /// or if a user pattern is not a valid regex with a capture group.
    pub fn new(config: RenameConfig) -> Result<Self> {
        let video_dir =
            crate::resolve_input_directory(config.video_dir.as_deref()).context("Invalid video directory")?;
        let subtitle_dir = match config.subtitle_dir.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => {
                crate::resolve_input_directory(Some(path)).context("Invalid subtitle directory")?
            }
            _ => video_dir.clone(),
        };

        let video_patterns =
            PatternSet::with_user_patterns(&config.video_patterns).context("Failed to compile video patterns")?;
        let subtitle_patterns = PatternSet::with_user_patterns(&config.subtitle_patterns)
            .context("Failed to compile subtitle patterns")?;

        Ok(Self {
            video_dir,
            subtitle_dir,
            video_patterns,
            subtitle_patterns,
            options: PlanOptions {
                keep_existing: config.keep_existing,
                remove_originals: config.remove_originals,
                dryrun: config.dryrun,
            },
            recurse: config.recurse,
            verbose: config.verbose,
        })
    }

    #[must_use]
    pub fn video_dir(&self) -> &Path {
        &self.video_dir
    }

    #[must_use]
    pub fn subtitle_dir(&self) -> &Path {
        &self.subtitle_dir
    }

    #[must_use]
    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Scan, extract episode keys, match and plan without modifying anything.
    #[must_use]
    pub fn plan(&self) -> RenamePlan {
        let scanned = scanner::scan(&self.video_dir, &self.subtitle_dir, self.recurse);

        let videos: Vec<MediaFile> = scanned
            .videos
            .into_iter()
            .map(|file| {
                let key = self.video_patterns.extract_from_path(&file.path);
                file.with_episode_key(key)
            })
            .collect();

        let subtitles: Vec<MediaFile> = scanned
            .subtitles
            .into_iter()
            .map(|file| {
                let key = self.subtitle_patterns.extract_from_path(&file.path);
                file.with_episode_key(key)
            })
            .collect();

        let matched = matcher::match_files(videos, subtitles);
        let operations = planner::plan(&matched.pairs, self.options, Path::exists);

        RenamePlan {
            operations,
            pairs: matched.pairs,
            unmatched_videos: matched.unmatched_videos,
            unmatched_subtitles: matched.unmatched_subtitles,
            ambiguous_keys: matched.ambiguous_keys,
        }
    }

    /// Plan and execute the renames.
    ///
    /// Individual rename failures are recorded in the result and do not stop the run.
    #[must_use]
    pub fn run(&self) -> RunResult {
        let plan = self.plan();
        let total_matched_count = plan.pairs.len();
        let outcomes = executor::execute(plan.operations);
        let renamed_count = outcomes.iter().filter(|outcome| outcome.is_renamed()).count();

        RunResult {
            video_dir: self.video_dir.clone(),
            subtitle_dir: self.subtitle_dir.clone(),
            dryrun: self.options.dryrun,
            renamed_count,
            total_matched_count,
            pairs: plan.pairs,
            outcomes,
            unmatched_videos: plan.unmatched_videos,
            unmatched_subtitles: plan.unmatched_subtitles,
            ambiguous_keys: plan.ambiguous_keys,
        }
    }
}

impl RunResult {
    /// Number of operations with the given status.
    #[must_use]
    pub fn count(&self, status: &OperationStatus) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| std::mem::discriminant(&outcome.status) == std::mem::discriminant(status))
            .count()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_failed()).count()
    }

    /// Number of renames that replaced an existing file.
    #[must_use]
    pub fn overwritten_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_renamed() && outcome.operation.destination_exists)
            .count()
    }

    /// Number of renames that copied the subtitle and removed the original.
    #[must_use]
    pub fn copied_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_renamed() && outcome.operation.transfer == TransferMode::CopyThenRemove)
            .count()
    }
}

impl fmt::Display for SubtitleRenamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Config:")?;
        writeln!(f, "  video dir:        {}", self.video_dir.display())?;
        writeln!(f, "  subtitle dir:     {}", self.subtitle_dir.display())?;
        writeln!(f, "  dryrun:           {}", crate::colorize_bool(self.options.dryrun))?;
        writeln!(f, "  keep existing:    {}", crate::colorize_bool(self.options.keep_existing))?;
        writeln!(f, "  remove originals: {}", crate::colorize_bool(self.options.remove_originals))?;
        writeln!(f, "  recurse:          {}", crate::colorize_bool(self.recurse))?;
        writeln!(f, "  verbose:          {}", crate::colorize_bool(self.verbose))?;
        writeln!(f, "Video patterns:\n{}", self.video_patterns)?;
        write!(f, "Subtitle patterns:\n{}", self.subtitle_patterns)
    }
}
