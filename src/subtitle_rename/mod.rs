//! Rename subtitle files to match the video file of the same episode.
//!
//! Videos and subtitles are scanned from one or two directories,
//! an episode key is extracted from each file name with an ordered set of regex patterns,
//! files are paired by equal key, and each matched subtitle is renamed to the video's
//! file stem while keeping its own extension.

mod episode;
mod executor;
mod matcher;
mod media;
mod patterns;
mod planner;
mod renamer;
mod report;
mod scanner;

pub use episode::{EpisodeKey, KEY_WIDTH};
pub use executor::{OperationOutcome, OperationStatus, execute};
pub use matcher::{MatchOutcome, MatchedPair, match_files};
pub use media::{FileKind, MediaFile, SUBTITLE_EXTENSIONS, VIDEO_EXTENSIONS};
pub use patterns::{DEFAULT_PATTERNS, EPISODE_GROUP, EpisodePattern, PatternSet};
pub use planner::{
    PlanOptions, RenameAction, RenameOperation, TransferMode, destination_path, is_case_only_change, is_same_file, plan,
};
pub use renamer::{RenameConfig, RenamePlan, RunResult, SubtitleRenamer};
pub use report::{print_json, print_run_result};
pub use scanner::{ScannedFiles, scan};
