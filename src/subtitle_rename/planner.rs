//! Turn matched pairs into rename operations.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::subtitle_rename::{EpisodeKey, MatchedPair};

/// What should happen to a subtitle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameAction {
    /// Rename the subtitle, overwriting an existing destination.
    Rename,
    /// Destination exists and existing files are kept.
    SkipExists,
    /// Dry run: the rename is only reported.
    WouldRename,
    /// Subtitle already has the video's name.
    Unchanged,
}

/// How the executor moves a subtitle to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferMode {
    /// Plain rename. Falls back to copy and remove across filesystems.
    Move,
    /// Copy to the destination, then delete the original.
    CopyThenRemove,
}

/// Planning policy flags.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlanOptions {
    pub keep_existing: bool,
    pub remove_originals: bool,
    pub dryrun: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameOperation {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub action: RenameAction,
    pub transfer: TransferMode,
    /// Destination existed, or was claimed by an earlier operation, when planning.
    pub destination_exists: bool,
    pub episode_key: EpisodeKey,
}

/// Plan a rename operation for each pair.
///
/// The destination is the subtitle's directory joined with the video's file stem
/// and the subtitle's original extension. `exists` reports whether a path is already taken.
#[must_use]
pub fn plan(pairs: &[MatchedPair], options: PlanOptions, exists: impl Fn(&Path) -> bool) -> Vec<RenameOperation> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut operations = Vec::with_capacity(pairs.len());

    for pair in pairs {
        let source = pair.subtitle.path.clone();
        let destination = destination_path(&pair.video.path, &source);

        if destination == source {
            operations.push(RenameOperation {
                source,
                destination,
                action: RenameAction::Unchanged,
                transfer: TransferMode::Move,
                destination_exists: true,
                episode_key: pair.episode_key.clone(),
            });
            continue;
        }

        // On case-insensitive filesystems a case-only change reports the source itself as existing
        let destination_exists =
            claimed.contains(&destination) || (exists(&destination) && !is_same_file(&source, &destination));

        let action = if options.dryrun {
            RenameAction::WouldRename
        } else if destination_exists && options.keep_existing {
            RenameAction::SkipExists
        } else {
            RenameAction::Rename
        };

        let transfer = if options.remove_originals && action == RenameAction::Rename {
            TransferMode::CopyThenRemove
        } else {
            TransferMode::Move
        };

        if action != RenameAction::SkipExists {
            claimed.insert(destination.clone());
        }

        operations.push(RenameOperation {
            source,
            destination,
            action,
            transfer,
            destination_exists,
            episode_key: pair.episode_key.clone(),
        });
    }

    operations
}

/// Destination for a subtitle: video file stem with the subtitle extension,
/// in the subtitle's directory.
#[must_use]
pub fn destination_path(video: &Path, subtitle: &Path) -> PathBuf {
    let mut file_name: OsString = video.file_stem().unwrap_or_default().to_os_string();
    if let Some(extension) = subtitle.extension() {
        file_name.push(".");
        file_name.push(extension);
    }
    subtitle
        .parent()
        .map_or_else(|| PathBuf::from(&file_name), |parent| parent.join(&file_name))
}

/// Check if two paths only differ by letter case.
#[must_use]
pub fn is_case_only_change(source: &Path, destination: &Path) -> bool {
    source != destination
        && crate::path_to_string(source).to_lowercase() == crate::path_to_string(destination).to_lowercase()
}

/// Check if two paths refer to the same file on disk.
///
/// Returns `false` if either path does not exist.
#[must_use]
pub fn is_same_file(first: &Path, second: &Path) -> bool {
    if first == second {
        return true;
    }
    match (dunce::canonicalize(first), dunce::canonicalize(second)) {
        (Ok(first_canonical), Ok(second_canonical)) => {
            first_canonical == second_canonical || same_inode(&first_canonical, &second_canonical)
        }
        _ => false,
    }
}

#[cfg(unix)]
fn same_inode(first: &Path, second: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;

    match (fs::metadata(first), fs::metadata(second)) {
        (Ok(first), Ok(second)) => first.dev() == second.dev() && first.ino() == second.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
const fn same_inode(_first: &Path, _second: &Path) -> bool {
    false
}

impl RenameOperation {
    /// True if the operation will modify the filesystem.
    #[must_use]
    pub fn is_mutation(&self) -> bool {
        self.action == RenameAction::Rename
    }
}

impl fmt::Display for RenameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Rename => "rename",
            Self::SkipExists => "skip (exists)",
            Self::WouldRename => "would rename",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{name}")
    }
}
