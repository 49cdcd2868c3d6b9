//! Apply planned rename operations to the filesystem.

use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::subtitle_rename::{RenameAction, RenameOperation, TransferMode, is_case_only_change, is_same_file};

/// Result of a single operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationStatus {
    Renamed,
    Skipped,
    Previewed,
    Unchanged,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub operation: RenameOperation,
    pub status: OperationStatus,
}

/// Execute all operations.
///
/// Only [`RenameAction::Rename`] touches the filesystem.
/// A failing operation is recorded and the remaining operations still run.
#[must_use]
pub fn execute(operations: Vec<RenameOperation>) -> Vec<OperationOutcome> {
    operations
        .into_iter()
        .map(|operation| {
            let status = match operation.action {
                RenameAction::WouldRename => OperationStatus::Previewed,
                RenameAction::SkipExists => OperationStatus::Skipped,
                RenameAction::Unchanged => OperationStatus::Unchanged,
                RenameAction::Rename => match apply(&operation) {
                    Ok(()) => OperationStatus::Renamed,
                    Err(error) => OperationStatus::Failed(format!("{error:#}")),
                },
            };
            OperationOutcome { operation, status }
        })
        .collect()
}

/// Move or copy a single subtitle to its destination.
///
/// A destination that names the source file itself, as a case-only change does on a
/// case-insensitive filesystem, is always renamed through a temporary name.
/// Copying onto it would truncate the source.
fn apply(operation: &RenameOperation) -> Result<()> {
    let source = &operation.source;
    let destination = &operation.destination;
    let result = if is_case_only_change(source, destination) || is_same_file(source, destination) {
        rename_with_temp_file(source, destination)
    } else {
        match operation.transfer {
            TransferMode::Move => move_file(source, destination),
            TransferMode::CopyThenRemove => copy_then_remove(source, destination),
        }
    };
    result.with_context(|| format!("Failed to rename {} to {}", source.display(), destination.display()))
}

fn move_file(source: &Path, destination: &Path) -> Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::CrossesDevices => copy_then_remove(source, destination),
        Err(error) => Err(error.into()),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> Result<()> {
    fs::copy(source, destination).context("Failed to copy file")?;
    fs::remove_file(source).context("Failed to remove original file")?;
    Ok(())
}

/// Work around case-insensitive filesystems by renaming through a temporary name.
fn rename_with_temp_file(source: &Path, destination: &Path) -> Result<()> {
    let temp_file = crate::append_extension_to_path(destination.to_path_buf(), "tmp");
    fs::rename(source, &temp_file)?;
    if is_same_file(&temp_file, destination) {
        // Destination is another link to the same file
        fs::remove_file(&temp_file)?;
    } else {
        fs::rename(&temp_file, destination)?;
    }
    Ok(())
}

impl OperationOutcome {
    #[must_use]
    pub const fn is_renamed(&self) -> bool {
        matches!(self.status, OperationStatus::Renamed)
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.status, OperationStatus::Failed(_))
    }
}
